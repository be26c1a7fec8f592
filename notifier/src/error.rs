use thiserror::Error;

/// Everything that can be wrong with the configuration, always naming the culprit.
///
/// Keys are given with their environment variable name, the file uses the same name in
/// lowercase.
///
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing configuration parameter {0}")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Bad address {0}")]
    BadAddress(String),
    #[error("Can not build message: {0}")]
    Message(String),
    #[error("SMTP error: {0}")]
    Smtp(String),
}
