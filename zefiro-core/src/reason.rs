//! CONNACK return codes as defined in the MQTT 3.1 specification.

use core::fmt;

use bytes::Buf;

use crate::codec::Decoder;
use crate::error::ParseFailure;

/// Return code carried in the second byte of a CONNACK body, telling the
/// client whether its connection request was accepted and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectReturnCode {
    #[default]
    Accepted,
    UnacceptableProtocol,
    IdentifierRejected,
    ServerUnavailable,
    BadUserNameOrPassword,
    NotAuthorized,
}

impl fmt::Display for ConnectReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConnectReturnCode::*;
        let msg = match self {
            Accepted => "Connection accepted",
            UnacceptableProtocol => "Unacceptable protocol version",
            IdentifierRejected => "Client identifier rejected",
            ServerUnavailable => "Server unavailable",
            BadUserNameOrPassword => "Bad user name or password",
            NotAuthorized => "Not authorized",
        };
        write!(f, "{}", msg)
    }
}

impl ConnectReturnCode {
    pub fn code(&self) -> u8 {
        use ConnectReturnCode::*;

        match *self {
            Accepted => 0x00,
            UnacceptableProtocol => 0x01,
            IdentifierRejected => 0x02,
            ServerUnavailable => 0x03,
            BadUserNameOrPassword => 0x04,
            NotAuthorized => 0x05,
        }
    }
}

impl Decoder for ConnectReturnCode {
    fn decode<T: Buf>(buffer: &mut T) -> crate::Result<Self> {
        use ConnectReturnCode::*;

        if !buffer.has_remaining() {
            return Err(ParseFailure::InvalidLength.into());
        }

        // Values 6-255 are reserved for future use; a conformant receiver
        // rejects them rather than passing them through.
        let code = match buffer.get_u8() {
            0x00 => Accepted,
            0x01 => UnacceptableProtocol,
            0x02 => IdentifierRejected,
            0x03 => ServerUnavailable,
            0x04 => BadUserNameOrPassword,
            0x05 => NotAuthorized,
            _ => return Err(ParseFailure::UnknownReturnCode.into()),
        };

        Ok(code)
    }
}
