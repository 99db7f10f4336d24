//! Student entity, write payload and response shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::validators;

/// A student as persisted, and the default (full) response shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub phone: String,
}

/// The reduced "v2" shape: no CPF, no birth date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentV2 {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<Student> for StudentV2 {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            phone: student.phone,
        }
    }
}

/// Which response shape a caller asked for via the `version` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentShape {
    #[default]
    Full,
    V2,
}

impl StudentShape {
    /// Unknown or absent tokens fall back to the full shape.
    pub fn from_version_token(token: Option<&str>) -> Self {
        match token {
            Some("v2") => StudentShape::V2,
            _ => StudentShape::Full,
        }
    }

    pub fn project(self, student: Student) -> StudentResponse {
        match self {
            StudentShape::Full => StudentResponse::Full(student),
            StudentShape::V2 => StudentResponse::V2(student.into()),
        }
    }
}

/// A student projected into one of the versioned shapes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StudentResponse {
    Full(Student),
    V2(StudentV2),
}

/// Create / full-replace payload. The three domain validators run on the
/// submitted values alongside the form and length constraints.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StudentDto {
    #[validate(
        length(max = 100, message = "name must be at most 100 characters"),
        custom(function = validators::validate_nome)
    )]
    pub name: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 30, message = "email must be at most 30 characters")
    )]
    pub email: String,
    #[validate(custom(function = validators::validate_cpf))]
    pub cpf: String,
    pub birth_date: NaiveDate,
    #[validate(
        length(max = 14, message = "phone must be at most 14 characters"),
        custom(function = validators::validate_celular)
    )]
    pub phone: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StudentFilterParams {
    /// Substring match against name or CPF
    pub search: Option<String>,
    /// `name` or `-name`; anything else keeps the default id order
    pub ordering: Option<String>,
    /// API version token; `v2` selects the reduced shape
    pub version: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VersionParams {
    /// API version token; `v2` selects the reduced shape
    pub version: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentResponse>,
    pub meta: PaginationMeta,
}
