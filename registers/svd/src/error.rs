// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while reading or validating an SVD descriptor.
///
/// Every variant is fatal for the descriptor being processed; callers move on
/// to the next file.
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor could not be read from disk.
    #[error("failed to read descriptor: {0}")]
    Io(#[from] std::io::Error),

    /// The descriptor is not well-formed XML.
    #[error("descriptor is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The CPU name has no entry in the architecture table.
    #[error("unsupported CPU {0:?}")]
    UnsupportedCpu(String),

    /// Two peripherals declare the same interrupt with different indices.
    #[error("interrupt {name} declared with index {found}, but was first declared with index {expected}")]
    InterruptIndexConflict {
        name: String,
        expected: u32,
        found: u32,
    },

    /// A required element is missing or holds an unusable value.
    #[error("malformed descriptor at {path}: {reason}")]
    MalformedDescriptor { path: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(path: impl ToString, reason: impl Into<String>) -> Self {
        Error::MalformedDescriptor {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, Error>;
