//! Place directory error types.

/// Errors that can occur when loading the place directory.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// HTTP request failed (unreachable, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlaceError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = PlaceError::Json {
            message: "missing field `places`".into(),
        };
        assert_eq!(err.to_string(), "JSON parse error: missing field `places`");
    }
}
