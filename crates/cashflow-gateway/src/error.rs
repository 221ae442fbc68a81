//! Error types for cashflow-gateway

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport failure: connection refused, timeout, TLS
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote answered with a non-2xx HTTP status
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// Remote answered 2xx but the envelope reports failure
    #[error("envelope {code} ({status}): {message}")]
    Envelope {
        code: u16,
        status: String,
        message: String,
    },

    /// Body could not be decoded into the expected shape
    #[error("decode: {0}")]
    Decode(String),

    /// Remote answered successfully without a payload where one is required
    #[error("empty response from {endpoint}")]
    Empty { endpoint: String },
}

impl GatewayError {
    /// Whether the failure happened below the envelope layer
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Server { .. })
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
