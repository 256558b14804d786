use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApexError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unauthorized: the stats API rejected the key ({0}); check API_KEY")]
    Unauthorized(String),

    #[error("Rate limited by the stats API: {0}")]
    RateLimited(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Stats API returned an error: {0}")]
    Upstream(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApexError {
    /// Errors that will not go away by retrying with the same configuration.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ApexError::InvalidConfig(_) | ApexError::Unauthorized(_) | ApexError::PlayerNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ApexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_mentions_api_key() {
        let err = ApexError::Unauthorized("HTTP 403".to_string());
        assert!(err.to_string().contains("API_KEY"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_transient_errors_are_not_fatal() {
        assert!(!ApexError::RateLimited("slow down".into()).is_fatal());
        assert!(!ApexError::UnexpectedStatus {
            status: 502,
            body: String::new()
        }
        .is_fatal());
    }

    #[test]
    fn test_decode_error_converts() {
        let err: ApexError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ApexError::Decode(_)));
        assert!(!err.is_fatal());
    }
}
