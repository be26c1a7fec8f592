use thiserror::Error;

/// Custom error type for the access module, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("HTTP Error: {0}")]
    HTTP(String),
    #[error("Bad HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Decoding statuses: {0}")]
    Decoding(String),
}
