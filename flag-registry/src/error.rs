use crate::FlagKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("entry {index}: {reason}")]
    Entry { index: usize, reason: String },

    #[error("duplicate flag key {0}")]
    DuplicateKey(FlagKey),

    #[error("invalid flag payload: {0}")]
    Payload(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}
