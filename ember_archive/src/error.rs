//! Archive error taxonomy.
//!
//! Every serialization or I/O failure is recoverable-reportable:
//! operations return these errors, never abort the process.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Raised when an archive operation cannot be completed.
#[derive(Debug, Error)]
pub enum ArchiveError
{
    /// Seek or read beyond the bytes available while loading.
    #[error("position {position} is out of bounds (archive size {size})")]
    OutOfBounds
    {
        /// Position that was asked for.
        position: u64,

        /// Total size of the archive.
        size: u64,
    },

    /// A declared length exceeds the bytes remaining in the archive.
    ///
    /// Rejected before any allocation, so corrupt or hostile counts
    /// cannot trigger unbounded allocation or out-of-bounds reads.
    #[error("declared length {declared} exceeds the {remaining} remaining bytes")]
    Truncated
    {
        /// Length announced by the length prefix.
        declared: u64,

        /// Bytes actually left in the archive.
        remaining: u64,
    },

    /// A value is too large for its 32-bit length prefix.
    #[error("length {0} does not fit in a 32-bit prefix")]
    LengthOverflow(u64),

    /// A string field did not contain valid UTF-8.
    #[error("serialized string is not valid UTF-8")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// The underlying file could not be opened, read, or written.
    #[error("archive I/O failed")]
    Io(#[from] std::io::Error),
}
