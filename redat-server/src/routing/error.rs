//! Route client error types.

/// Shown to riders for every failure that isn't the backend's own message.
pub const GENERIC_ROUTE_ERROR: &str = "Error fetching route data";

/// Errors from the route request client.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The backend rejected the request with a message meant for the rider
    /// (e.g. "No route found")
    #[error("{0}")]
    Validation(String),

    /// HTTP request failed (unreachable, timeout, etc.)
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned an error status without a structured message
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not JSON or not a valid route
    #[error("route parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl RouteError {
    /// The text to put in front of the rider.
    pub fn user_message(&self) -> &str {
        match self {
            RouteError::Validation(message) => message,
            _ => GENERIC_ROUTE_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RouteError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RouteError::Validation("No route found".into());
        assert_eq!(err.to_string(), "No route found");

        let err = RouteError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = RouteError::Parse {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(err.to_string(), "route parse error: expected value");
    }

    #[test]
    fn user_message_hides_internals() {
        let err = RouteError::Validation("No route found".into());
        assert_eq!(err.user_message(), "No route found");

        let err = RouteError::Api {
            status: 502,
            message: "upstream exploded".into(),
        };
        assert_eq!(err.user_message(), GENERIC_ROUTE_ERROR);
    }
}
