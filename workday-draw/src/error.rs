//! Request-level errors and their HTTP mapping
//!
//! Clients only ever see a short plain-text message. Paths and underlying
//! causes go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::assignment::ExhaustedPoolError;
use crate::spreadsheet::SpreadsheetParseError;
use crate::storage::StorageError;

#[derive(Debug)]
pub enum AppError {
    /// No file part (or an empty one) in the form submission
    MissingUpload,
    ExhaustedPool(ExhaustedPoolError),
    SpreadsheetParse(SpreadsheetParseError),
    Storage(StorageError),
    /// Request body over the configured limit
    UploadTooLarge,
    /// Malformed multipart body or similar client error
    BadRequest(String),
    /// Background task failure (panicked or cancelled blocking work)
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUpload | AppError::ExhaustedPool(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SpreadsheetParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AppError::MissingUpload => "No file uploaded.".to_string(),
            AppError::ExhaustedPool(e) => format!(
                "Not enough values in the spreadsheet: {} workdays selected but only {} values available ({} short).",
                e.requested,
                e.available,
                e.shortfall()
            ),
            AppError::SpreadsheetParse(_) => {
                "The uploaded file could not be read as a spreadsheet.".to_string()
            }
            AppError::UploadTooLarge => "The uploaded file is too large.".to_string(),
            AppError::BadRequest(msg) => format!("Invalid upload request: {}", msg),
            AppError::Storage(_) | AppError::Internal(_) => {
                "The upload could not be processed.".to_string()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::MissingUpload => write!(f, "No file uploaded"),
            AppError::ExhaustedPool(e) => write!(f, "{}", e),
            AppError::SpreadsheetParse(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "{}", e),
            AppError::UploadTooLarge => write!(f, "Upload exceeds body limit"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::ExhaustedPool(e) => Some(e),
            AppError::SpreadsheetParse(e) => Some(e),
            AppError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExhaustedPoolError> for AppError {
    fn from(e: ExhaustedPoolError) -> Self {
        AppError::ExhaustedPool(e)
    }
}

impl From<SpreadsheetParseError> for AppError {
    fn from(e: SpreadsheetParseError) -> Self {
        AppError::SpreadsheetParse(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Upload failed: {}", self);
        } else {
            log::warn!("Rejected upload: {}", self);
        }

        (status, self.public_message()).into_response()
    }
}
