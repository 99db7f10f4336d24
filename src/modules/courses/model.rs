//! Course entity, level enum and write payload.

use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, FromRow, Type, postgres::PgTypeInfo};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Course difficulty level. Serialized and stored as its one-letter code;
/// [`CourseLevel::label`] gives the human-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum CourseLevel {
    #[default]
    #[serde(rename = "B")]
    Basic,
    #[serde(rename = "I")]
    Intermediate,
    #[serde(rename = "A")]
    Advanced,
}

impl CourseLevel {
    pub fn code(self) -> &'static str {
        match self {
            CourseLevel::Basic => "B",
            CourseLevel::Intermediate => "I",
            CourseLevel::Advanced => "A",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseLevel::Basic => "Basic",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(CourseLevel::Basic),
            "I" => Some(CourseLevel::Intermediate),
            "A" => Some(CourseLevel::Advanced),
            _ => None,
        }
    }
}

impl Type<sqlx::Postgres> for CourseLevel {
    fn type_info() -> PgTypeInfo {
        <&str as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for CourseLevel {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for CourseLevel {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let code = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Self::from_code(code).ok_or_else(|| format!("unknown course level code: {code}").into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub level: CourseLevel,
}

/// Create / full-replace payload. `level` defaults to Basic when omitted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CourseDto {
    #[validate(length(
        min = 3,
        max = 10,
        message = "code must be between 3 and 10 characters"
    ))]
    pub code: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "description must be between 1 and 100 characters"
    ))]
    pub description: String,
    #[serde(default)]
    pub level: CourseLevel,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CourseFilterParams {
    /// Substring match against the course code
    pub search: Option<String>,
    /// `code` or `-code`; anything else keeps the default id order
    pub ordering: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}
