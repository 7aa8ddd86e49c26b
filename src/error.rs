//! Error types for gdoc2tex operations.

use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Recoverable problems (unknown elements, unknown CSS declarations, stray
/// sentinels) are never reported through this type; they are logged and
/// collected as [`Diagnostic`](crate::latex::Diagnostic)s instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not download {url} ({status}): {message}")]
    Remote {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Document {id} has no text/html export link")]
    MissingExport { id: String },

    #[error("No access token configured (use --access-token or GOOGLE_ACCESS_TOKEN)")]
    MissingAccessToken,
}

pub type Result<T> = std::result::Result<T, Error>;
