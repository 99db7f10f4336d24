//! Enrollment handlers.
//!
//! Enrollments accept anonymous callers but every request is counted
//! against the caller's daily quota; update and delete are refused by
//! policy for everyone. The two projection handlers live here as well,
//! routed under the student and course resources.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::{AuthUser, Caller};
use crate::modules::enrollments::model::{
    CourseEnrollmentRow, Enrollment, EnrollmentDto, PaginatedEnrollmentsResponse,
    StudentEnrollmentRow,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = EnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 422, description = "Unknown student or course reference"),
        (status = 429, description = "Daily quota exceeded")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state, dto))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<EnrollmentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    state.throttles.check(&caller)?;
    let enrollment = EnrollmentService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated enrollments", body = PaginatedEnrollmentsResponse),
        (status = 429, description = "Daily quota exceeded")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollments(
    State(state): State<AppState>,
    caller: Caller,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    state.throttles.check(&caller)?;
    let (enrollments, total) = EnrollmentService::list(&state.db, &pagination).await?;
    let meta = PaginationMeta::new(total, &pagination, enrollments.len());
    Ok(Json(PaginatedEnrollmentsResponse {
        data: enrollments,
        meta,
    }))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment details", body = Enrollment),
        (status = 404, description = "Enrollment not found"),
        (status = 429, description = "Daily quota exceeded")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Enrollment>, AppError> {
    state.throttles.check(&caller)?;
    let enrollment = EnrollmentService::get(&state.db, id).await?;
    Ok(Json(enrollment))
}

/// Policy, not a constraint check: enrollments are immutable through the
/// API regardless of who asks.
pub async fn enrollment_update_not_allowed() -> AppError {
    AppError::method_not_allowed("Enrollments cannot be updated")
}

pub async fn enrollment_delete_not_allowed() -> AppError {
    AppError::method_not_allowed("Enrollments cannot be deleted")
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/enrollments",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Course description and period label per enrollment", body = [StudentEnrollmentRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_student_enrollments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<StudentEnrollmentRow>>, AppError> {
    let rows = EnrollmentService::list_by_student(&state.db, id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled student names", body = [CourseEnrollmentRow])
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_course_enrollments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CourseEnrollmentRow>>, AppError> {
    let rows = EnrollmentService::list_by_course(&state.db, id).await?;
    Ok(Json(rows))
}
