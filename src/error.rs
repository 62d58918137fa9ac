use thiserror::Error;

/// Failure talking to the remote REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// HTTP 2xx carrying `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user. Server-supplied messages win; transport
    /// problems collapse to `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            ApiError::Server { message, .. } | ApiError::Rejected(message) if !message.is_empty() => {
                message.clone()
            }
            _ => generic.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Input rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_preferred_over_generic_text() {
        let err = ApiError::Rejected("Machine already assigned".to_string());
        assert_eq!(err.user_message("Submission failed"), "Machine already assigned");

        let err = ApiError::Server { status: 500, message: String::new() };
        assert_eq!(err.user_message("Submission failed"), "Submission failed");

        let err = ApiError::Decode("expected array".to_string());
        assert_eq!(err.user_message("Network error. Please try again."), "Network error. Please try again.");
    }
}
