use thiserror::Error;

/// mealtally error types
#[derive(Error, Debug)]
pub enum MealtallyError {
    /// Configuration error (missing or malformed environment variable)
    #[error("config error: {0}")]
    Config(String),

    /// Bitable API rejected a request (non-zero code in the response body)
    #[error("bitable error: {0}")]
    Source(String),

    /// WeCom webhook rejected a message (non-zero errcode in the response body)
    #[error("webhook error: {0}")]
    Notify(String),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for mealtally
pub type Result<T> = std::result::Result<T, MealtallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MealtallyError::Config("TIMEZONE is not a UTC offset".into());
        assert_eq!(
            err.to_string(),
            "config error: TIMEZONE is not a UTC offset"
        );
    }

    #[test]
    fn test_source_error_display() {
        let err = MealtallyError::Source("code 99991663 (app not found)".into());
        assert!(err.to_string().starts_with("bitable error"));
    }
}
