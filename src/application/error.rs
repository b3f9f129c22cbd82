use std::collections::BTreeMap;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl AppError {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Serialize)]
struct ValidationErrorResponse {
    message: &'static str,
    errors: BTreeMap<String, Vec<String>>,
}

const VALIDATION_MESSAGE: &str = "The given data was invalid.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                return validation_response(flatten_validation_errors(&errors));
            }
            AppError::InvalidInput { field, message } => {
                return validation_response(BTreeMap::from([(field, vec![message])]));
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            // Invalid state transitions are reported as 400, not 409
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => (StatusCode::BAD_REQUEST, format!("JSON error: {}", e)),
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File storage error".to_string(),
                )
            }
            AppError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication error".to_string(),
                )
            }
            AppError::Multipart(e) => (e.status(), e.body_text()),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

fn validation_response(errors: BTreeMap<String, Vec<String>>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationErrorResponse {
            message: VALIDATION_MESSAGE,
            errors,
        }),
    )
        .into_response()
}

/// Flatten nested validator errors into `field` / `list.0.field` keys
pub fn flatten_validation_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_errors(None, errors, &mut out);
    out
}

fn collect_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(key.clone()).or_default();
                for error in list {
                    messages.push(match &error.message {
                        Some(msg) => msg.to_string(),
                        None => format!("The {} field is invalid ({}).", key, error.code),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(Some(&key), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(Some(&format!("{}.{}", key, index)), inner, out);
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn get_response_body(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let body_str = String::from_utf8(bytes.to_vec()).unwrap();
        (status, body_str)
    }

    #[derive(Serialize, Validate)]
    struct Item {
        #[validate(length(min = 1, message = "The question field is required."))]
        question: String,
    }

    #[derive(Validate)]
    struct Batch {
        #[validate(length(min = 1), nested)]
        contents: Vec<Item>,
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let error = AppError::NotFound("Book not found".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Book not found"));
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let error = AppError::Unauthorized("Token expired".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token expired"));
    }

    #[tokio::test]
    async fn test_forbidden_error() {
        let error = AppError::Forbidden("Access denied".to_string());
        let (status, _) = get_response_body(error.into_response()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_conflict_maps_to_bad_request() {
        let error = AppError::Conflict("Account is not deleted".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Account is not deleted"));
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let error = AppError::Database(sea_orm::DbErr::Custom("secret table".to_string()));
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("secret table"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let error = AppError::Internal("Failed to hash password: bad cost".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["message"], "Internal server error");
        assert!(!body.contains("bad cost"));
    }

    #[tokio::test]
    async fn test_json_error_response_format() {
        let error = AppError::NotFound("Resource not found".to_string());
        let (_, body) = get_response_body(error.into_response()).await;

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["message"], "Resource not found");
    }

    #[tokio::test]
    async fn test_invalid_input_renders_field_map() {
        let error = AppError::invalid("email", "The email has already been taken.");
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["errors"]["email"][0], "The email has already been taken.");
    }

    #[test]
    fn test_nested_errors_are_flattened() {
        let batch = Batch {
            contents: vec![
                Item {
                    question: "ok".to_string(),
                },
                Item {
                    question: String::new(),
                },
            ],
        };
        let errors = batch.validate().unwrap_err();
        let flat = flatten_validation_errors(&errors);

        assert_eq!(
            flat.get("contents.1.question").unwrap(),
            &vec!["The question field is required.".to_string()]
        );
        assert!(!flat.contains_key("contents.0.question"));
    }

    #[test]
    fn test_error_display_impl() {
        assert_eq!(
            AppError::NotFound("test".to_string()).to_string(),
            "Not found: test"
        );
        assert_eq!(
            AppError::Conflict("test".to_string()).to_string(),
            "Conflict: test"
        );
        assert_eq!(
            AppError::invalid("title", "required").to_string(),
            "Invalid input for title: required"
        );
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_err.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }
}
