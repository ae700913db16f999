use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    /// Diagnostic output of the external tool, when one failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(message: &str, detail: Option<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
            detail,
        }
    }
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

pub struct ApiError(pub String, pub StatusCode, pub Option<String>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status, detail) = (self.0, self.1, self.2);
        let response = ErrorBody::new(&message, detail);
        (status, Json(response)).into_response()
    }
}
