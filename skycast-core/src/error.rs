use thiserror::Error;

/// Failures surfaced by the network-facing collaborators (weather, image and
/// geolocation services).
///
/// The aggregation pipeline itself never raises: empty input produces empty
/// output, and a redundant unit retarget is a pass-through. Provider errors
/// travel to the presentation layer unchanged; [`FetchError::user_message`]
/// is the one place they become user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("rate limited by the upstream service")]
    RateLimited,
    #[error("location not found")]
    NotFound,
    #[error("request timed out")]
    Timeout,
    #[error("network unavailable")]
    NetworkUnavailable,
    #[error("location access denied")]
    LocationDenied,
    #[error("current position unavailable")]
    LocationUnavailable,
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Transient failures are worth retrying; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::RateLimited | FetchError::Timeout)
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::RateLimited => "Rate limit exceeded. Please wait a moment and try again.",
            FetchError::NotFound => "City not found. Please check the spelling and try again.",
            FetchError::Timeout => {
                "Request timed out. Please check your connection and try again."
            }
            FetchError::NetworkUnavailable => {
                "Network error. Please check your internet connection."
            }
            FetchError::LocationDenied => {
                "Location access was denied. Please search for a city manually."
            }
            FetchError::LocationUnavailable => {
                "Could not determine your location. Please search for a city manually."
            }
            FetchError::Unknown(_) => "Failed to fetch weather data. Please try again.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::NetworkUnavailable
        } else {
            FetchError::Unknown(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limit_and_timeout_are_transient() {
        assert!(FetchError::RateLimited.is_transient());
        assert!(FetchError::Timeout.is_transient());
        assert!(!FetchError::NotFound.is_transient());
        assert!(!FetchError::NetworkUnavailable.is_transient());
        assert!(!FetchError::LocationDenied.is_transient());
        assert!(!FetchError::Unknown("boom".to_string()).is_transient());
    }

    #[test]
    fn user_messages_are_actionable() {
        assert!(FetchError::RateLimited.user_message().contains("Rate limit"));
        assert!(FetchError::NotFound.user_message().contains("City not found"));
        assert!(FetchError::Timeout.user_message().contains("timed out"));
        assert!(
            FetchError::NetworkUnavailable
                .user_message()
                .contains("internet connection")
        );
    }
}
