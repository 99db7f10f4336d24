//! Enrollment entity, period enum and the cross-entity projection rows.

use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, FromRow, Type, postgres::PgTypeInfo};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Time slot an enrollment runs in. Serialized and stored as its one-letter
/// code; [`Period::label`] gives the human-readable name used by the
/// by-student projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Period {
    #[default]
    #[serde(rename = "M")]
    Morning,
    #[serde(rename = "V")]
    Afternoon,
    #[serde(rename = "N")]
    Evening,
}

impl Period {
    pub fn code(self) -> &'static str {
        match self {
            Period::Morning => "M",
            Period::Afternoon => "V",
            Period::Evening => "N",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Period::Morning),
            "V" => Some(Period::Afternoon),
            "N" => Some(Period::Evening),
            _ => None,
        }
    }
}

impl Type<sqlx::Postgres> for Period {
    fn type_info() -> PgTypeInfo {
        <&str as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Period {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Period {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let code = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Self::from_code(code).ok_or_else(|| format!("unknown period code: {code}").into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub period: Period,
}

/// Create payload. Enrollments are never updated or deleted through the
/// API, so this is the only write shape. `period` defaults to Morning.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EnrollmentDto {
    pub student_id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub period: Period,
}

/// One row of the by-student projection: the course's description text and
/// the period label, never raw references.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentEnrollmentRow {
    pub course: String,
    pub period: String,
}

/// One row of the by-course projection: just the student's name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseEnrollmentRow {
    pub student_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEnrollmentsResponse {
    pub data: Vec<Enrollment>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_codes_and_labels() {
        assert_eq!(Period::Morning.code(), "M");
        assert_eq!(Period::Afternoon.code(), "V");
        assert_eq!(Period::Evening.code(), "N");
        assert_eq!(Period::Evening.label(), "Evening");
        assert_eq!(Period::from_code("V"), Some(Period::Afternoon));
        assert_eq!(Period::from_code("X"), None);
    }

    #[test]
    fn test_period_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Period::Evening).unwrap(), "\"N\"");
        let period: Period = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(period, Period::Morning);
    }

    #[test]
    fn test_dto_defaults_period_to_morning() {
        let dto: EnrollmentDto =
            serde_json::from_str(r#"{"student_id":1,"course_id":2}"#).unwrap();
        assert_eq!(dto.period, Period::Morning);
    }
}
