use reqwest::StatusCode;

/// Coarse failure class, for callers that want differentiated messages
/// ("no network" vs "city not found") without matching on payload details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The HTTP client could not be set up; nothing was sent.
    Setup,
    Network,
    Timeout,
    Status,
    Malformed,
    CityNotFound,
    NoInhabitedPlace,
}

/// Every way a weather lookup can fail.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {service} timed out")]
    Timeout { service: &'static str },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Malformed {service} response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },

    #[error("City not found: '{0}'")]
    CityNotFound(String),

    #[error("No inhabited place matches '{0}'")]
    NoInhabitedPlace(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Client(_) => ErrorKind::Setup,
            WeatherError::Transport { .. } => ErrorKind::Network,
            WeatherError::Timeout { .. } => ErrorKind::Timeout,
            WeatherError::Status { .. } => ErrorKind::Status,
            WeatherError::Malformed { .. } => ErrorKind::Malformed,
            WeatherError::CityNotFound(_) => ErrorKind::CityNotFound,
            WeatherError::NoInhabitedPlace(_) => ErrorKind::NoInhabitedPlace,
        }
    }

    /// Classify a reqwest failure, splitting out timeouts.
    pub(crate) fn from_request(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout { service }
        } else {
            WeatherError::Transport {
                service,
                source: err,
            }
        }
    }

    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        WeatherError::Malformed {
            service,
            reason: reason.into(),
        }
    }

    /// A short, user-facing hint for the failure class.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Setup => "Could not start the HTTP client for the weather service.",
            ErrorKind::Network => "No network connection to the weather service.",
            ErrorKind::Timeout => "The weather service took too long to answer.",
            ErrorKind::Status => "The weather service rejected the request.",
            ErrorKind::Malformed => "The weather service returned incomplete data.",
            ErrorKind::CityNotFound => "City not found.",
            ErrorKind::NoInhabitedPlace => "No city with that name; try a more specific query.",
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct_for_lookup_failures() {
        let not_found = WeatherError::CityNotFound("Atlantis".into());
        let no_city = WeatherError::NoInhabitedPlace("Alps".into());
        let malformed = WeatherError::malformed("forecast", "missing daily section");

        assert_eq!(not_found.kind(), ErrorKind::CityNotFound);
        assert_eq!(no_city.kind(), ErrorKind::NoInhabitedPlace);
        assert_eq!(malformed.kind(), ErrorKind::Malformed);
        assert_ne!(not_found.user_message(), malformed.user_message());
    }

    #[test]
    fn client_setup_failure_is_not_reported_as_offline() {
        let source = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = WeatherError::Client(source);

        assert_eq!(err.kind(), ErrorKind::Setup);
        assert!(!err.user_message().contains("network"));
    }

    #[test]
    fn display_mentions_query() {
        let err = WeatherError::CityNotFound("Nonexistent Place XYZ".into());
        assert!(err.to_string().contains("Nonexistent Place XYZ"));
    }

    #[test]
    fn truncate_body_limits_long_bodies() {
        let long = "x".repeat(500);
        let cut = truncate_body(&long);
        assert_eq!(cut.len(), 203);
        assert!(cut.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), 203);
    }
}
