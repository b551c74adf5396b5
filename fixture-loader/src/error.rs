use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture could not be retrieved. Network-level errors carry status 0.
    #[error("Failed to retrieve fixture at: {url} (status: {status})")]
    FetchFailure { url: String, status: u16 },

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid fixture options in {path}: {reason}")]
    Config { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FixtureError>;

/// Build the error raised when a fixture request does not succeed.
pub fn failure(url: &str, status: u16) -> FixtureError {
    FixtureError::FetchFailure {
        url: url.to_string(),
        status,
    }
}

impl FixtureError {
    /// HTTP status of a failed fetch, `None` for other errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FixtureError::FetchFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}
