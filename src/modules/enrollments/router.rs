use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::enrollments::controller::{
    create_enrollment, enrollment_delete_not_allowed, enrollment_update_not_allowed,
    get_course_enrollments, get_enrollment, get_enrollments, get_student_enrollments,
};
use crate::state::AppState;

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_enrollment).get(get_enrollments))
        .route(
            "/{id}",
            get(get_enrollment)
                .put(enrollment_update_not_allowed)
                .delete(enrollment_delete_not_allowed),
        )
}

/// Nested under `/students/{id}/enrollments`.
pub fn init_student_enrollments_router() -> Router<AppState> {
    Router::new().route("/", get(get_student_enrollments))
}

/// Nested under `/courses/{id}/enrollments`.
pub fn init_course_enrollments_router() -> Router<AppState> {
    Router::new().route("/", get(get_course_enrollments))
}
