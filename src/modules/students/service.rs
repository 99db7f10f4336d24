use anyhow::Context;
use axum::http::StatusCode;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::students::model::{Student, StudentDto, StudentFilterParams};
use crate::utils::errors::AppError;

const STUDENT_COLUMNS: &str = "id, name, email, cpf, birth_date, phone";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        params: &StudentFilterParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let pattern = params.search.as_ref().map(|term| format!("%{term}%"));
        let order_by = match params.ordering.as_deref() {
            Some("name") => "name ASC, id ASC",
            Some("-name") => "name DESC, id ASC",
            _ => "id ASC",
        };

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students");
        push_search_filter(&mut count, &pattern);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {STUDENT_COLUMNS} FROM students"
        ));
        push_search_filter(&mut query, &pattern);
        query.push(" ORDER BY ").push(order_by);
        query
            .push(" LIMIT ")
            .push_bind(params.pagination.limit())
            .push(" OFFSET ")
            .push_bind(params.pagination.offset());

        let students = query
            .build_query_as::<Student>()
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: StudentDto) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (name, email, cpf, birth_date, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.cpf)
        .bind(dto.birth_date)
        .bind(&dto.phone)
        .fetch_one(db)
        .await
        .map_err(|e| map_cpf_conflict(e, &dto.cpf))
    }

    /// Full-replace update: every field is taken from the payload.
    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: i64, dto: StudentDto) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students \
             SET name = $1, email = $2, cpf = $3, birth_date = $4, phone = $5 \
             WHERE id = $6 \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.cpf)
        .bind(dto.birth_date)
        .bind(&dto.phone)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_cpf_conflict(e, &dto.cpf))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    /// Deleting a student cascades to the student's enrollments at the
    /// database level.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}

fn push_search_filter(query: &mut QueryBuilder<'_, Postgres>, pattern: &Option<String>) {
    if let Some(pattern) = pattern {
        query
            .push(" WHERE (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cpf ILIKE ")
            .push_bind(pattern.clone())
            .push(")");
    }
}

fn map_cpf_conflict(e: sqlx::Error, cpf: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::field(
                StatusCode::BAD_REQUEST,
                "cpf",
                format!("A student with CPF {cpf} already exists"),
            );
        }
    }
    AppError::database(anyhow::Error::from(e))
}
