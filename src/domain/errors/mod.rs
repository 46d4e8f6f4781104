// Domain errors - Error types shared by the domain layer and the ports

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid configuration value
    BadConfig(String),
    /// File not found
    FileNotFound(String),
    /// Prober could not read the file
    ProbeFail(String),
    /// Encoder could not be launched
    ExecFail(String),
    /// File system operation failed
    FsFail(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadConfig(msg) => write!(f, "Bad configuration: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::ExecFail(msg) => write!(f, "Execution failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
