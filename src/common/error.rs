use crate::common::response::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid filename '{0}': expected <stem>.<extension>")]
    InvalidFilename(String),

    #[error("No video field found in multipart request")]
    UploadMissing,

    #[error("Path '{0}' escapes its storage root")]
    PathTraversal(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{program} failed with exit code {}", describe_exit(.exit_code))]
    ProcessFailure {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Could not parse quality metrics output: {0}")]
    ParseFailure(String),

    /// `context` names the operation, never the absolute host path.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidFilename(_)
            | AppError::UploadMissing
            | AppError::PathTraversal(_)
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ProcessFailure { .. } | AppError::ParseFailure(_) | AppError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let detail = match &self {
            AppError::ProcessFailure { stderr, .. } => Some(stderr.clone()),
            _ => None,
        };

        ApiError(self.to_string(), status, detail).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(
            AppError::PathTraversal("../x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UploadMissing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidFilename("clip".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn tool_failures_are_server_errors() {
        let failure = AppError::ProcessFailure {
            program: "ffmpeg".into(),
            exit_code: Some(1),
            stderr: "boom".into(),
        };
        assert_eq!(failure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.to_string(), "ffmpeg failed with exit code 1");
        assert_eq!(
            AppError::ParseFailure("eof".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn spawn_errors_have_no_exit_code() {
        let failure = AppError::ProcessFailure {
            program: "ffmpeg".into(),
            exit_code: None,
            stderr: "not found".into(),
        };
        assert_eq!(failure.to_string(), "ffmpeg failed with exit code none");
    }
}
