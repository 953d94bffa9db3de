//! Error handling for drip

use thiserror::Error;


pub type DripResult<T> = Result<T, DripError>;


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DripError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Derivation error: {0}")]
    Derivation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl From<std::io::Error> for DripError {
    fn from(err: std::io::Error) -> Self {
        DripError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DripError {
    fn from(err: serde_json::Error) -> Self {
        DripError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<bip39::Error> for DripError {
    fn from(err: bip39::Error) -> Self {
        DripError::Config(format!("Invalid mnemonic: {}", err))
    }
}

impl From<bip32::Error> for DripError {
    fn from(err: bip32::Error) -> Self {
        DripError::Derivation(format!("BIP32 error: {}", err))
    }
}

impl From<reqwest::Error> for DripError {
    fn from(err: reqwest::Error) -> Self {
        DripError::Network(err.to_string())
    }
}
