use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::students::model::{
    PaginatedStudentsResponse, Student, StudentDto, StudentFilterParams, StudentResponse,
    StudentShape, VersionParams,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Duplicate CPF"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation failure with field-scoped messages")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<StudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Paginated students in the requested shape", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let shape = StudentShape::from_version_token(params.version.as_deref());
    let (students, total) = StudentService::list(&state.db, &params).await?;

    let meta = PaginationMeta::new(total, &params.pagination, students.len());
    let data = students
        .into_iter()
        .map(|student| shape.project(student))
        .collect();

    Ok(Json(PaginatedStudentsResponse { data, meta }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID"),
        VersionParams
    ),
    responses(
        (status = 200, description = "Student in the requested shape", body = StudentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<VersionParams>,
) -> Result<Json<StudentResponse>, AppError> {
    let shape = StudentShape::from_version_token(params.version.as_deref());
    let student = StudentService::get(&state.db, id).await?;
    Ok(Json(shape.project(student)))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = StudentDto,
    responses(
        (status = 200, description = "Student replaced", body = Student),
        (status = 400, description = "Duplicate CPF"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Validation failure with field-scoped messages")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<StudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted, enrollments cascade"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
