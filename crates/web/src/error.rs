use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use extractor::ExtractorError;
use serde_json::json;
use std::fmt;
use storage::error::StorageError;

use crate::views;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    /// The upload could not be read as a PDF.
    DocumentRead(ExtractorError),
    MissingApiKey,
    /// The engine or the report renderer failed during an audit.
    ExtractionFailed(ExtractorError),
    BadRequest(String),
    InternalServerError(String),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            Self::Storage(StorageError::UnknownModel(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DocumentRead(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingApiKey => StatusCode::PRECONDITION_FAILED,
            Self::ExtractionFailed(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user. Internal failures are not echoed back.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(StorageError::NotFound) => "Session not found".to_string(),
            Self::Storage(e @ (StorageError::InvalidTransition { .. } | StorageError::UnknownModel(_))) => {
                e.to_string()
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "An internal error occurred".to_string()
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Errors that end an audit run rather than reject the request.
    pub fn is_run_failure(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::ExtractionFailed(_))
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::DocumentRead(e) => write!(f, "Error reading PDF: {}", e),
            Self::MissingApiKey => write!(f, "Missing API Key."),
            Self::ExtractionFailed(e) => write!(f, "Extraction Failed: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.user_message()
        });

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ExtractorError> for WebError {
    fn from(error: ExtractorError) -> Self {
        match error {
            ExtractorError::MissingApiKey => Self::MissingApiKey,
            ExtractorError::PdfError(_) => Self::DocumentRead(error),
            other => Self::ExtractionFailed(other),
        }
    }
}

/// Renders a [`WebError`] as an HTML error page for the browser routes.
#[derive(Debug)]
pub struct HtmlError(pub WebError);

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        (status, Html(views::error_page(status, &self.0.user_message()))).into_response()
    }
}

impl From<WebError> for HtmlError {
    fn from(error: WebError) -> Self {
        Self(error)
    }
}

impl From<StorageError> for HtmlError {
    fn from(error: StorageError) -> Self {
        Self(error.into())
    }
}

pub type ApiResult<T> = Result<T, WebError>;
pub type PageResult<T> = Result<T, HtmlError>;

#[cfg(test)]
mod tests {
    use storage::models::SessionState;

    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(WebError::MissingApiKey.user_message(), "Missing API Key.");
        assert_eq!(
            WebError::from(ExtractorError::PdfError("EOF marker not found".into())).user_message(),
            "Error reading PDF: EOF marker not found"
        );
        assert_eq!(
            WebError::from(ExtractorError::EmptyResponse).user_message(),
            "Extraction Failed: Model returned no content"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(WebError::MissingApiKey.status_code(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(
            WebError::Storage(StorageError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::Storage(StorageError::InvalidTransition {
                from: SessionState::Running,
                action: "start an audit",
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            WebError::from(ExtractorError::ResolveError("x".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = WebError::Storage(StorageError::Io(std::io::Error::other("disk full")));
        assert_eq!(err.user_message(), "An internal error occurred");
    }
}
