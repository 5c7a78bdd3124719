//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A coordinate axis is non-finite or out of range
    #[error("invalid {axis}: {value}")]
    InvalidCoordinate { axis: &'static str, value: f64 },

    /// A route document carried no stations
    #[error("route must have at least one station")]
    EmptyRoute,

    /// Leg count doesn't match the station count
    #[error("route has {stations} stations but {legs} legs")]
    LegCountMismatch { stations: usize, legs: usize },

    /// A leg's endpoints don't match the stations around it
    #[error("leg {index} runs {from} → {to}, expected {expected_from} → {expected_to}")]
    LegMismatch {
        index: usize,
        from: String,
        to: String,
        expected_from: String,
        expected_to: String,
    },

    /// A price is negative or not a number
    #[error("invalid price: {0}")]
    InvalidPrice(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidCoordinate {
            axis: "latitude",
            value: 91.0,
        };
        assert_eq!(err.to_string(), "invalid latitude: 91");

        let err = DomainError::EmptyRoute;
        assert_eq!(err.to_string(), "route must have at least one station");

        let err = DomainError::LegCountMismatch {
            stations: 3,
            legs: 1,
        };
        assert_eq!(err.to_string(), "route has 3 stations but 1 legs");

        let err = DomainError::LegMismatch {
            index: 0,
            from: "Piassa".into(),
            to: "Bole".into(),
            expected_from: "Mexico Square".into(),
            expected_to: "Piassa".into(),
        };
        assert_eq!(err.to_string(), "leg 0 runs Piassa → Bole, expected Mexico Square → Piassa");

        let err = DomainError::InvalidPrice(-2.0);
        assert_eq!(err.to_string(), "invalid price: -2");
    }
}
