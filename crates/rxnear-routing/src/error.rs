use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by routing service (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("routing service returned server error {status} from {url}")]
    ServerError { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("routing service rejected the table request with code {code}")]
    NoRoute { code: String },

    #[error("invalid routing base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
