use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl ScanError {
    /// True for failures that happened before or during the HTTP exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScanError::Transport(_) | ScanError::Status { .. })
    }
}

/// Markup a page was expected to carry but did not.
///
/// Extractors never let these escape; they degrade to null or empty values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("missing section: {0}")]
    MissingSection(&'static str),
}

pub type Result<T> = std::result::Result<T, ScanError>;
