use std::fmt;
use thiserror::Error;

/// Which input check rejected a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Direction,
    Protocol,
    IpAddress,
    Port,
    PortRange,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentKind::Direction => "direction",
            ArgumentKind::Protocol => "protocol",
            ArgumentKind::IpAddress => "ip address",
            ArgumentKind::Port => "port",
            ArgumentKind::PortRange => "port range",
        };
        f.write_str(name)
    }
}

/// Errors raised while building a filter expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A primitive was given a value that failed validation
    #[error("Invalid {kind} supplied: '{value}'")]
    InvalidArgument { kind: ArgumentKind, value: String },

    /// An operation was called while the buffer had nothing to work on
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

impl FilterError {
    pub(crate) fn argument(kind: ArgumentKind, value: impl Into<String>) -> Self {
        FilterError::InvalidArgument {
            kind,
            value: value.into(),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from libpcap while compiling a filter
    #[cfg(feature = "libpcap")]
    #[error("PCAP error: {0}")]
    PcapError(#[from] pcap::Error),

    /// Error from I/O operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from the expression builder
    #[error("Filter error: {0}")]
    FilterError(#[from] FilterError),

    /// Error in a capture plan
    #[error("Plan error: {0}")]
    PlanError(String),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;
