//! Error types for Galaxy3D compute
//!
//! This module defines the error type shared by the buffer views, the
//! storage buffers, the buffer registry and the compute manager.

use std::fmt;

/// Result type for Galaxy3D compute operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D compute errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (device, poisoned lock, etc.)
    BackendError(String),

    /// Invalid resource (unknown program, wrong buffer state, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// Access of `length` bytes at `offset` does not fit in `size` bytes
    OutOfBounds {
        offset: usize,
        length: usize,
        size: usize,
    },

    /// The device could not map the buffer into host memory
    MappingFailed {
        buffer_id: u32,
    },

    /// Shader preprocessing failed (missing include, bad repeat count, ...)
    PreprocessFailed(String),

    /// Shader compilation or linking failed
    CompilationFailed(String),

    /// Several independent failures collected by a batch operation
    Aggregate(Vec<Error>),
}

impl Error {
    /// Turn a list of collected failures into a result
    ///
    /// An empty list is a success. Any failure, even a single one, is
    /// returned as `Error::Aggregate` so callers always inspect the
    /// complete set the same way.
    pub fn from_failures(failures: Vec<Error>) -> Result<()> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Aggregate(failures))
        }
    }

    /// Individual failures carried by this error
    ///
    /// For `Aggregate` this is the collected list, for any other variant
    /// it is the error itself.
    pub fn failures(&self) -> &[Error] {
        match self {
            Error::Aggregate(failures) => failures,
            other => std::slice::from_ref(other),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::OutOfBounds { offset, length, size } => write!(
                f,
                "Out of bounds: {} bytes at offset {} exceed buffer size {}",
                length, offset, size
            ),
            Error::MappingFailed { buffer_id } => write!(
                f,
                "Mapping failed: could not map storage buffer with id {}",
                buffer_id
            ),
            Error::PreprocessFailed(msg) => write!(f, "Preprocessing failed: {}", msg),
            Error::CompilationFailed(msg) => write!(f, "Compilation failed: {}", msg),
            Error::Aggregate(failures) => {
                write!(f, "{} operation(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "\n  - {}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_compute::engine_err;
/// let err = engine_err!("galaxy3d::Engine", "Device lock poisoned");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the
/// enclosing function
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_compute::engine_bail;
/// # fn f() -> Result<(), galaxy_3d_compute::galaxy3d::Error> {
/// engine_bail!("galaxy3d::Engine", "Device lock poisoned");
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
