//! Global error handling for classname-scan
//!
//! Only configuration problems travel as errors out of a scan. Per-file and
//! per-encoding failures are logged and counted where they happen.

use std::io;
use thiserror::Error;

/// Global error type for classname-scan operations
#[derive(Error, Debug)]
pub enum ScanError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// XML processing errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for classname-scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Creates a ScanError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ScanError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// main() returns io::Result, so fatal errors surface through this conversion
impl From<ScanError> for io::Error {
    fn from(err: ScanError) -> Self {
        let kind = match &err {
            ScanError::Io(e) => e.kind(),
            ScanError::PathNotFound(_) => io::ErrorKind::NotFound,
            ScanError::Config(_) | ScanError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
