//! Course handlers. Reads are open to anonymous callers; writes require a
//! bearer token.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::courses::model::{
    Course, CourseDto, CourseFilterParams, PaginatedCoursesResponse,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Duplicate course code"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation failure with field-scoped messages")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Paginated courses", body = PaginatedCoursesResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseFilterParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let (courses, total) = CourseService::list(&state.db, &params).await?;
    let meta = PaginationMeta::new(total, &params.pagination, courses.len());
    Ok(Json(PaginatedCoursesResponse {
        data: courses,
        meta,
    }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get(&state.db, id).await?;
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = CourseDto,
    responses(
        (status = 200, description = "Course replaced", body = Course),
        (status = 400, description = "Duplicate course code"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failure with field-scoped messages")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted, enrollments cascade"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CourseService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
