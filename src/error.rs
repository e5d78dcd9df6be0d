//! Error and diagnostic types for ICNS decoding.

use thiserror::Error;

use crate::icontype::OSType;

/// The error type for all decoding operations in this crate.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The container is structurally invalid: bad magic, truncated or
    /// overrunning headers, an inconsistent total length, or a payload whose
    /// length disagrees with its icon type.  Always aborts the whole decode.
    #[error("invalid icns data at offset {offset}: {reason}")]
    Format { offset: usize, reason: String },

    /// An element uses an encoding this decoder cannot handle, or its RLE
    /// data is malformed.
    #[error("unsupported encoding in '{ostype}' element at offset {offset}: {reason}")]
    UnsupportedEncoding {
        ostype: OSType,
        offset: usize,
        reason: String,
    },

    /// The embedded PNG or JPEG 2000 decoder rejected an element's payload.
    #[error("failed to decode embedded image in '{ostype}' element at offset {offset}: {reason}")]
    EmbeddedDecode {
        ostype: OSType,
        offset: usize,
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn format<S: Into<String>>(offset: usize, reason: S) -> DecodeError {
        DecodeError::Format {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns true if this error invalidates the whole container, regardless
    /// of the element policy in effect.
    pub fn is_fatal_to_container(&self) -> bool {
        matches!(self, DecodeError::Format { .. })
    }

    /// Returns the byte offset within the container at which the defect was
    /// found.
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::Format { offset, .. } |
            DecodeError::UnsupportedEncoding { offset, .. } |
            DecodeError::EmbeddedDecode { offset, .. } => offset,
        }
    }
}

/// A convenience `Result` type alias using the crate's `DecodeError` type.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A non-fatal finding recorded while decoding a container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Diagnostic {
    /// An element with an OSType this library does not recognize was
    /// skipped.
    UnknownElement { ostype: OSType, offset: usize },
    /// A recognized element failed to decode and was skipped.
    SkippedElement {
        ostype: OSType,
        offset: usize,
        error: DecodeError,
    },
}

impl Diagnostic {
    /// Returns the OSType of the skipped element.
    pub fn ostype(&self) -> OSType {
        match *self {
            Diagnostic::UnknownElement { ostype, .. } |
            Diagnostic::SkippedElement { ostype, .. } => ostype,
        }
    }

    /// Returns the byte offset of the skipped element's header.
    pub fn offset(&self) -> usize {
        match *self {
            Diagnostic::UnknownElement { offset, .. } |
            Diagnostic::SkippedElement { offset, .. } => offset,
        }
    }
}
