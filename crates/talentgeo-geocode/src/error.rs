use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for zip {zip}: {source}")]
    Deserialize {
        zip: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("zip {zip} not found by geocoding source")]
    NotFound { zip: String },

    #[error("unexpected HTTP status {status} geocoding zip {zip}")]
    UnexpectedStatus { status: u16, zip: String },

    #[error("malformed geocoding payload for zip {zip}: {reason}")]
    MalformedPayload { zip: String, reason: String },
}

impl GeocodeError {
    /// Whether this error is a definitive "this zip does not exist" answer.
    ///
    /// Definitive not-found results are cacheable negatives; everything
    /// else is transient and must stay retryable on the next call.
    #[must_use]
    pub fn is_definitive_not_found(&self) -> bool {
        matches!(self, GeocodeError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
