//! Error types for ContentKit

use thiserror::Error;

/// Errors that can occur while pulling content
#[derive(Debug, Error)]
pub enum Error {
    /// Space id is missing
    #[error("Missing required configuration: space id")]
    MissingSpace,

    /// Access token is missing
    #[error("Missing required configuration: access token")]
    MissingToken,

    /// Access token cannot be sent as an HTTP header
    #[error("Invalid access token: not a valid HTTP header value")]
    InvalidToken,

    /// The locale filter matched nothing in the space
    #[error("Unknown locale '{code}': not defined in the space (locale codes are case-sensitive)")]
    UnknownLocale {
        /// The code that failed to resolve
        code: String,
    },

    /// The space marks no locale as default
    #[error("Space defines no default locale")]
    NoDefaultLocale,

    /// The space lists no locales at all
    #[error("Space defines no locales")]
    NoLocales,

    /// Provider-level API failure
    #[error("Contentful API error {id}: {message} (request {request_id}, status {status})")]
    Api {
        /// Machine-readable error id from the provider payload
        id: String,
        /// Human-readable message from the provider payload
        message: String,
        /// Request-correlation id for support diagnostics
        request_id: String,
        /// HTTP status the provider responded with
        status: u16,
    },

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Response body was not the expected JSON shape
    #[error("Failed to decode {context}: {detail}")]
    Decode {
        /// What was being decoded (e.g. "entries page")
        context: &'static str,
        /// Decoder message plus a body snippet
        detail: String,
    },
}

impl Error {
    /// Classify a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Connect(err)
        } else {
            Error::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::MissingSpace.to_string(),
            "Missing required configuration: space id"
        );
        assert_eq!(
            Error::MissingToken.to_string(),
            "Missing required configuration: access token"
        );
        assert_eq!(
            Error::NoDefaultLocale.to_string(),
            "Space defines no default locale"
        );
        assert_eq!(Error::NoLocales.to_string(), "Space defines no locales");
    }

    #[test]
    fn test_unknown_locale_names_code_and_case_sensitivity() {
        let err = Error::UnknownLocale {
            code: "en-us".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'en-us'"));
        assert!(msg.contains("case-sensitive"));
    }

    #[test]
    fn test_api_error_carries_correlation_id() {
        let err = Error::Api {
            id: "AccessTokenInvalid".to_string(),
            message: "The access token you sent could not be found or is invalid.".to_string(),
            request_id: "c0ffee".to_string(),
            status: 401,
        };
        let msg = err.to_string();
        assert!(msg.contains("AccessTokenInvalid"));
        assert!(msg.contains("request c0ffee"));
        assert!(msg.contains("status 401"));
    }
}
