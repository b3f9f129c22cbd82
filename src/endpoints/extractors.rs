//! Request extractors that validate their payload before a handler runs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Multipart, Query, Request,
    },
    http::{header::CONTENT_TYPE, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::AppError;
use crate::schemas::{BookPayload, PdfUpload};
use crate::services::storage::is_pdf;

const PDF_FIELD: &str = "pdf_file";

/// JSON body that has passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::invalid("body", e.body_text()),
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Query string that has passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::invalid("query", rejection.body_text())
}

/// Book create/update body, sent either as JSON or as a multipart form
/// carrying an optional `pdf_file` part
#[derive(Debug, Clone)]
pub struct BookForm {
    pub payload: BookPayload,
    pub pdf: Option<PdfUpload>,
}

impl<S> FromRequest<S> for BookForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let ValidatedJson(payload) = ValidatedJson::<BookPayload>::from_request(req, state).await?;
            return Ok(Self { payload, pdf: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut fields = Map::new();
        let mut pdf = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PDF_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                if !is_pdf(content_type.as_deref(), file_name.as_deref()) {
                    return Err(AppError::invalid(
                        PDF_FIELD,
                        "The pdf file field must be a file of type: pdf.",
                    ));
                }
                pdf = Some(PdfUpload { file_name, bytes });
                continue;
            }

            let text = field.text().await?;
            if !text.is_empty() {
                fields.insert(name, Value::String(text));
            }
        }

        let payload: BookPayload = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::invalid("body", e.to_string()))?;
        payload.validate()?;

        Ok(Self { payload, pdf })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::models::book::BookType;

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request {
        let boundary = "XBOUNDARY";
        let mut body = String::new();
        for (name, file, value) in parts {
            body.push_str(&format!("--{}\r\n", boundary));
            match file {
                Some((file_name, content_type)) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    name, file_name, content_type
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", boundary));

        Request::builder()
            .method("POST")
            .uri("/books/create")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_book_form_reads_multipart_with_pdf() {
        let req = multipart_request(&[
            ("title", None, "Ibong Adarna"),
            ("description", None, "Epic"),
            ("status", None, "active"),
            ("book_type", None, "pdf"),
            ("pdf_file", Some(("adarna.pdf", "application/pdf")), "%PDF-1.4"),
        ]);

        let form = BookForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.payload.title, "Ibong Adarna");
        assert_eq!(form.payload.book_type, Some(BookType::Pdf));
        let pdf = form.pdf.unwrap();
        assert_eq!(pdf.file_name.as_deref(), Some("adarna.pdf"));
        assert_eq!(&pdf.bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_book_form_rejects_non_pdf_upload() {
        let req = multipart_request(&[
            ("title", None, "Cover"),
            ("description", None, "Image"),
            ("status", None, "active"),
            ("pdf_file", Some(("cover.png", "image/png")), "PNG"),
        ]);

        let err = BookForm::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_book_form_accepts_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/books/create")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"Florante","description":"Awit","status":"inactive"}"#,
            ))
            .unwrap();

        let form = BookForm::from_request(req, &()).await.unwrap();
        assert!(form.pdf.is_none());
        assert_eq!(form.payload.book_type, None);
    }

    #[tokio::test]
    async fn test_validated_json_reports_422_on_bad_enum() {
        let req = Request::builder()
            .method("POST")
            .uri("/books/create")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"Florante","description":"Awit","status":"draft"}"#,
            ))
            .unwrap();

        let err = ValidatedJson::<BookPayload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
