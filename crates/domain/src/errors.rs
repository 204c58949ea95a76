use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Resolver has been disposed")]
    Disposed,

    #[error("Operation canceled")]
    Canceled,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Address table error: {0}")]
    AddressTable(String),

    #[error("Network scanner error: {0}")]
    Scanner(String),
}

impl DomainError {
    /// True for `Canceled`, so callers can tell "I gave up" from "it failed".
    pub fn is_canceled(&self) -> bool {
        matches!(self, DomainError::Canceled)
    }
}
