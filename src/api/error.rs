//! Error types for the backend client
//!
//! Every failure is local to the request that caused it. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Longest stretch of an unparseable body quoted back in an error
pub const BODY_SNIPPET_LEN: usize = 500;

/// Error raised by a backend call
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("HTTP error! status: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, read as text
        body: String,
    },

    /// The backend could not be reached at all
    #[error(
        "Network error: Unable to connect to {url}. Please check if the backend server is running and accessible."
    )]
    Unreachable {
        /// URL of the failed request
        url: String,
    },

    /// The response body was not the JSON we expected
    #[error("Bad JSON response: {snippet}")]
    Decode {
        /// Leading part of the offending body
        snippet: String,
    },

    /// The request could not be built or the transfer failed midway
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A local file to upload could not be read
    #[error("File I/O error on {path:?}: {source}")]
    File {
        /// The path of the file that caused the error
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The configured base URL cannot carry endpoint paths
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a decode error quoting the start of `body`
    pub fn decode(body: &str) -> Self {
        ApiError::Decode {
            snippet: snippet(body),
        }
    }

    /// HTTP status of a rejected request, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Helper function to convert a std::io::Error on an upload file to ApiError
pub fn file_err(path: impl Into<PathBuf>, err: std::io::Error) -> ApiError {
    ApiError::File {
        path: path.into(),
        source: err,
    }
}

/// First `BODY_SNIPPET_LEN` characters of a body
fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}
