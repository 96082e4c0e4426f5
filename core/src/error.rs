//! Error types for the YMM client.
//!
//! # Design
//! The client is a pass-through layer. Anything the remote service reports
//! (unknown id, rejected payload, 5xx) comes back as an `HttpResponse` and is
//! never turned into an error here. The only failures raised locally are a
//! request that could not be sent (`TransportError`) and bodies that could not
//! be encoded or, for the few decoding helpers, decoded.

use thiserror::Error;

/// The HTTP call itself could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service base URL plus route does not form an absolute URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// DNS, connect, TLS, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] ureq::Error),
}

/// Errors returned by `YmmClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A response body did not match the expected JSON shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The body parsed but its contents contradict themselves.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_is_transparent() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = ApiError::from(TransportError::from(parse_err));
        assert!(matches!(err, ApiError::Transport(TransportError::InvalidUrl(_))));
        assert!(err.to_string().starts_with("invalid request url"));
    }

    #[test]
    fn unexpected_response_message() {
        let err = ApiError::UnexpectedResponse("total is 1 but list is empty".to_string());
        assert_eq!(
            err.to_string(),
            "unexpected response: total is 1 but list is empty"
        );
    }
}
