use anyhow::Context;
use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::enrollments::model::{
    CourseEnrollmentRow, Enrollment, EnrollmentDto, Period, StudentEnrollmentRow,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, period";

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Enrollment>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(db)
            .await
            .context("Failed to count enrollments")
            .map_err(AppError::database)?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch enrollments")
        .map_err(AppError::database)?;

        Ok((enrollments, total))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i64) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch enrollment")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Enrollment not found")))
    }

    /// Referential integrity is checked by the foreign keys; a dangling
    /// student or course reference comes back as a field-scoped 422.
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: EnrollmentDto) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (student_id, course_id, period) \
             VALUES ($1, $2, $3) \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(dto.period)
        .fetch_one(db)
        .await
        .map_err(|e| map_reference_violation(e, &dto))
    }

    /// By-student projection: the course's description and the period's
    /// human-readable label, in ascending enrollment-id order. An unknown
    /// student id yields an empty list, not a 404.
    #[instrument(skip(db))]
    pub async fn list_by_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentRow>, AppError> {
        let rows = sqlx::query_as::<_, (String, Period)>(
            "SELECT c.description, e.period \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.student_id = $1 \
             ORDER BY e.id ASC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrollments by student")
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(|(course, period)| StudentEnrollmentRow {
                course,
                period: period.label().to_string(),
            })
            .collect())
    }

    /// By-course projection: the enrolled students' names, in ascending
    /// enrollment-id order.
    #[instrument(skip(db))]
    pub async fn list_by_course(
        db: &PgPool,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollmentRow>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT s.name \
             FROM enrollments e \
             JOIN students s ON s.id = e.student_id \
             WHERE e.course_id = $1 \
             ORDER BY e.id ASC",
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrollments by course")
        .map_err(AppError::database)?;

        Ok(names
            .into_iter()
            .map(|student_name| CourseEnrollmentRow { student_name })
            .collect())
    }
}

fn map_reference_violation(e: sqlx::Error, dto: &EnrollmentDto) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return match db_err.constraint() {
                Some("enrollments_student_id_fkey") => AppError::field(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "student_id",
                    format!("Student {} does not exist", dto.student_id),
                ),
                Some("enrollments_course_id_fkey") => AppError::field(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "course_id",
                    format!("Course {} does not exist", dto.course_id),
                ),
                _ => AppError::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    anyhow::anyhow!("Enrollment references a missing record"),
                ),
            };
        }
    }
    AppError::database(anyhow::Error::from(e))
}
