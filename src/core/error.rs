//! Error taxonomy for the ingestion layer

use reqwest::StatusCode;
use serde_json::error::Category;

/// Errors raised while fetching and decoding marketplace data.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// A price value did not match any known upstream format
    #[error("malformed price: {raw:?}")]
    MalformedPrice { raw: String },

    /// A graph key was not an epoch-millisecond count
    #[error("malformed timestamp: {raw:?}")]
    MalformedTimestamp { raw: String },

    /// The request could not be sent or the body could not be read
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON document we expected
    #[error("failed to parse response from {url}: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A category anchor did not carry a numeric id
    #[error("malformed category link: {href:?}")]
    MalformedCategoryLink { href: String },

    /// Upstream answered with a non-success status
    #[error("upstream rejected {url} with status {status}")]
    UpstreamRejected { url: String, status: StatusCode },

    #[error("no such item: {0}")]
    NoSuchItem(i64),

    #[error("no such category: {0}")]
    NoSuchCategory(String),

    /// The retry ceiling was reached while the upstream kept failing
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ExchangeError>,
    },
}

impl ExchangeError {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Connection failures and truncated or syntactically broken bodies are
    /// transient. Status rejections, decode failures of well-formed payloads
    /// and not-found conditions are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ExchangeError::Transport { source, .. } => {
                source.is_connect()
                    || source.is_timeout()
                    || source.is_request()
                    || source.is_body()
                    || source.is_decode()
            }
            ExchangeError::MalformedBody { source, .. } => {
                matches!(source.classify(), Category::Syntax | Category::Eof)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn body_error(text: &str) -> ExchangeError {
        let source = serde_json::from_str::<serde_json::Value>(text).unwrap_err();
        ExchangeError::MalformedBody {
            url: "http://localhost/test".to_string(),
            source,
        }
    }

    #[test]
    fn test_truncated_body_is_transient() {
        assert!(body_error(r#"{"daily": {"#).is_transient());
        assert!(body_error("<html>busy</html>").is_transient());
    }

    #[test]
    fn test_domain_failures_are_not_transient() {
        let shape = serde_json::from_str::<Vec<i64>>(r#"{"a": 1}"#).unwrap_err();
        let shape = ExchangeError::MalformedBody {
            url: "http://localhost/test".to_string(),
            source: shape,
        };
        assert!(!shape.is_transient());

        assert!(
            !ExchangeError::MalformedPrice {
                raw: "34.5t".to_string()
            }
            .is_transient()
        );
        assert!(
            !ExchangeError::UpstreamRejected {
                url: "http://localhost/test".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            }
            .is_transient()
        );
        assert!(!ExchangeError::NoSuchItem(1).is_transient());
    }

    #[test]
    fn test_error_messages_name_the_raw_value() {
        let err = ExchangeError::MalformedTimestamp {
            raw: "not_an_epoch".to_string(),
        };
        assert_eq!(err.to_string(), r#"malformed timestamp: "not_an_epoch""#);
    }
}
