/// Errors from outbound REST calls.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("{service} returned status {status}: {body}")]
    Status { service: String, status: u16, body: String },

    #[error("Failed to decode {service} response: {message}")]
    Decode { service: String, message: String },
}

impl ConnectError {
    /// Whether a retry could plausibly succeed (rate limits, server faults,
    /// transport hiccups). Client errors other than 429 are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidConfiguration(_) | Self::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        let rate_limited =
            ConnectError::Status { service: "x".into(), status: 429, body: String::new() };
        let server_fault =
            ConnectError::Status { service: "x".into(), status: 503, body: String::new() };
        let bad_request =
            ConnectError::Status { service: "x".into(), status: 400, body: String::new() };
        let network = ConnectError::Network { url: "u".into(), message: "m".into() };
        let decode = ConnectError::Decode { service: "x".into(), message: "m".into() };

        assert!(rate_limited.is_retryable());
        assert!(server_fault.is_retryable());
        assert!(network.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!decode.is_retryable());
    }
}
