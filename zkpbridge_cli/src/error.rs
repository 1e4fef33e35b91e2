use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] serde_yml::Error),
    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid proof JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Bridge(#[from] libzkpbridge::BridgeError),
}
