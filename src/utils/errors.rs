use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;

/// Field-scoped validation messages, keyed by the offending field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(msg.into()))
    }

    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, anyhow::anyhow!(msg.into()))
    }

    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, anyhow::anyhow!(msg.into()))
    }

    /// A 422 carrying one message per failing field.
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: anyhow::anyhow!("Validation failed"),
            fields: Some(fields),
        }
    }

    /// A single field-scoped error with a chosen status, used for
    /// uniqueness conflicts and dangling references.
    pub fn field(status: StatusCode, field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        Self {
            status,
            error: anyhow::anyhow!(message),
            fields: Some(fields),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error.to_string()
        });
        if let Some(fields) = &self.fields {
            body["fields"] = json!(fields);
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_carries_field_map() {
        let err = AppError::field(StatusCode::BAD_REQUEST, "cpf", "CPF already registered");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let fields = err.fields.unwrap();
        assert_eq!(fields["cpf"], vec!["CPF already registered".to_string()]);
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let mut fields = FieldErrors::new();
        fields.insert("nome".into(), vec!["name may only contain letters".into()]);
        let err = AppError::validation(fields);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
