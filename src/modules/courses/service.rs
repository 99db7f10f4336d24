use anyhow::Context;
use axum::http::StatusCode;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::courses::model::{Course, CourseDto, CourseFilterParams};
use crate::utils::errors::AppError;

const COURSE_COLUMNS: &str = "id, code, description, level";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        params: &CourseFilterParams,
    ) -> Result<(Vec<Course>, i64), AppError> {
        let pattern = params.search.as_ref().map(|term| format!("%{term}%"));
        let order_by = match params.ordering.as_deref() {
            Some("code") => "code ASC, id ASC",
            Some("-code") => "code DESC, id ASC",
            _ => "id ASC",
        };

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
        push_code_filter(&mut count, &pattern);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count courses")
            .map_err(AppError::database)?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {COURSE_COLUMNS} FROM courses"));
        push_code_filter(&mut query, &pattern);
        query.push(" ORDER BY ").push(order_by);
        query
            .push(" LIMIT ")
            .push_bind(params.pagination.limit())
            .push(" OFFSET ")
            .push_bind(params.pagination.offset());

        let courses = query
            .build_query_as::<Course>()
            .fetch_all(db)
            .await
            .context("Failed to fetch courses")
            .map_err(AppError::database)?;

        Ok((courses, total))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (code, description, level) \
             VALUES ($1, $2, $3) \
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.level)
        .fetch_one(db)
        .await
        .map_err(|e| map_code_conflict(e, &dto.code))
    }

    /// Full-replace update: every field is taken from the payload.
    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: i64, dto: CourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses \
             SET code = $1, description = $2, level = $3 \
             WHERE id = $4 \
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.level)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_code_conflict(e, &dto.code))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Deleting a course cascades to its enrollments at the database level.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete course")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }
}

fn push_code_filter(query: &mut QueryBuilder<'_, Postgres>, pattern: &Option<String>) {
    if let Some(pattern) = pattern {
        query.push(" WHERE code ILIKE ").push_bind(pattern.clone());
    }
}

fn map_code_conflict(e: sqlx::Error, code: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::field(
                StatusCode::BAD_REQUEST,
                "code",
                format!("A course with code {code} already exists"),
            );
        }
        if db_err.is_check_violation() {
            return AppError::field(
                StatusCode::UNPROCESSABLE_ENTITY,
                "code",
                "code must be at least 3 characters",
            );
        }
    }
    AppError::database(anyhow::Error::from(e))
}
