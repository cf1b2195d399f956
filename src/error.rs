//! Error types for the import flow.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

/// Failure while submitting a spreadsheet to the import API.
///
/// "No file selected" is not represented here: an empty selection is a
/// silent no-op, surfaced as `Ok(None)` by [`crate::upload::UploadForm::submit`].
#[derive(Error, Debug)]
pub enum ImportError {
    /// The configured API base URL could not be parsed.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Connection, timeout or body transfer failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body was not JSON.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The browser form submission could not be read.
    #[error("Invalid form submission: {0}")]
    InvalidForm(#[from] MultipartError),
}

impl ImportError {
    /// Status code returned to the browser for this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidForm(e) => e.status(),
            Self::InvalidBaseUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport(_) | Self::Api { .. } | Self::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
