//! Unified error type for the demo core.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging when the
//! `defmt` feature is enabled.

use core::fmt;

/// Top-level error type used across the library and the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Buffers
    /// A fixed-capacity buffer was full; the new data was dropped.
    BufferOverflow,

    /// A transfer carried fewer bytes than the structure it encodes.
    ShortTransfer,

    // Control requests
    /// Line coding from the host used an unknown stop-bit, parity or
    /// data-bit value.
    InvalidLineCoding,

    /// The control request is not one this device answers.
    UnsupportedRequest,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::BufferOverflow => "buffer full, data dropped",
            Error::ShortTransfer => "transfer shorter than expected",
            Error::InvalidLineCoding => "invalid line coding",
            Error::UnsupportedRequest => "unsupported control request",
        };
        f.write_str(msg)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
