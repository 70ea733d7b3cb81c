//! Response envelope and builders shared by the JSON handlers

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use serde_repr::Serialize_repr;

use crate::errors::LinkStashError;

/// API error codes, serialized as numbers.
///
/// - 0: success
/// - 1000-1099: generic errors
/// - 3000-3099: link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    InternalServerError = 1005,

    LinkNotFound = 3000,
    LinkStorageError = 3005,
}

impl From<&LinkStashError> for ErrorCode {
    fn from(err: &LinkStashError) -> Self {
        match err {
            LinkStashError::Validation(_) => ErrorCode::BadRequest,
            LinkStashError::NotFound(_) => ErrorCode::LinkNotFound,
            LinkStashError::FileOperation(_) | LinkStashError::Serialization(_) => {
                ErrorCode::LinkStorageError
            }
            LinkStashError::Config(_) | LinkStashError::StorageBackendNotFound(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Maps a service error onto its HTTP status and error code
pub fn error_from_linkstash(err: &LinkStashError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 200 with the data on success, the mapped error otherwise
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<LinkStashError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_linkstash(&e.into()),
    }
}

/// Rejected JSON bodies answer with the envelope instead of actix's plain text
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_from_linkstash(&LinkStashError::validation(format!(
        "Invalid JSON body: {}",
        err
    )));
    InternalError::from_response(err, response).into()
}

/// HTML page with the given status
pub fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .body(body)
}
