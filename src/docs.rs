use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::courses::model::{
    Course, CourseDto, CourseLevel, PaginatedCoursesResponse,
};
use crate::modules::enrollments::model::{
    CourseEnrollmentRow, Enrollment, EnrollmentDto, PaginatedEnrollmentsResponse, Period,
    StudentEnrollmentRow,
};
use crate::modules::students::model::{
    PaginatedStudentsResponse, Student, StudentDto, StudentResponse, StudentV2,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::get_enrollments,
        crate::modules::enrollments::controller::get_enrollment,
        crate::modules::enrollments::controller::get_student_enrollments,
        crate::modules::enrollments::controller::get_course_enrollments,
    ),
    components(
        schemas(
            Student,
            StudentV2,
            StudentResponse,
            StudentDto,
            PaginatedStudentsResponse,
            Course,
            CourseLevel,
            CourseDto,
            PaginatedCoursesResponse,
            Enrollment,
            Period,
            EnrollmentDto,
            PaginatedEnrollmentsResponse,
            StudentEnrollmentRow,
            CourseEnrollmentRow,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Students", description = "Student registration endpoints"),
        (name = "Courses", description = "Course catalog endpoints"),
        (name = "Enrollments", description = "Enrollment endpoints and projections")
    ),
    info(
        title = "Escola API",
        version = "0.1.0",
        description = "School registration REST API: students, courses and enrollments.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
