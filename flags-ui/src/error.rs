use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("browser API unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Network(String),

    #[error("{path} returned HTTP {status}")]
    Status { status: u16, path: String },

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<flag_registry::RegistryError> for ApiError {
    fn from(err: flag_registry::RegistryError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
