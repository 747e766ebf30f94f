use core::fmt;

use thiserror::Error;

/// A protocol violation that makes the byte stream undecodable.
///
/// Once one of these is raised no partial recovery is attempted; the
/// transport owning the connection is expected to close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    MalformedLength,
    MalformedString,
    UnsupportedPacketType,
    InvalidFlags,
    ReservedBits,
    InvalidQoS,
    InvalidLength,
    UnknownReturnCode,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseFailure::*;
        let msg = match self {
            MalformedLength => "Malformed variable byte integer",
            MalformedString => "Malformed length-prefixed string",
            UnsupportedPacketType => "Unsupported packet type",
            InvalidFlags => "Invalid fixed header flags",
            ReservedBits => "Nonzero reserved bits",
            InvalidQoS => "Invalid QoS value",
            InvalidLength => "Body length does not match packet layout",
            UnknownReturnCode => "Unknown connect return code",
        };
        write!(f, "{}", msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseFailure {}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The buffer does not yet hold a complete frame or length field.
    /// Not a violation; retry once more bytes have arrived.
    #[error("Frame is not complete")]
    FrameIncomplete,

    #[error("Protocol violation: {0}")]
    ParseFailure(#[from] ParseFailure),
}
