//! Error types for domain operations, following the panic-free policy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ErrorCode;

/// Errors that can occur while registering error kinds.
#[derive(Error, Debug)]
pub enum DomainError {
    /// An explicit code was requested that the domain already holds.
    ///
    /// Nothing is registered and the code generator is not consulted.
    #[error("Code \"{code}\" is already taken")]
    DuplicateCode { code: ErrorCode },

    /// A catalog document is structurally valid TOML but semantically wrong.
    #[error("Invalid catalog: {reason}")]
    InvalidConfig { reason: String },

    /// A catalog document could not be parsed.
    #[error("Failed to parse catalog: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A catalog file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DomainError {
    /// Returns the offending code for `DuplicateCode` errors.
    pub fn duplicate_code(&self) -> Option<&ErrorCode> {
        match self {
            Self::DuplicateCode { code } => Some(code),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
