use bytes::Buf;

use zefiro_core::{codec::Decoder, error::ParseFailure, reason::ConnectReturnCode, Result};

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// The acknowledge-flags byte of the CONNACK variable header.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct ConnAckFlags {
    pub session_present: bool,
}

impl Decoder for ConnAckFlags {
    fn decode<T: Buf>(buffer: &mut T) -> zefiro_core::Result<Self> {
        let encoded = buffer.get_u8();

        // Bits 7-1 are reserved and must be zero.
        if (0b1111_1110 & encoded) != 0 {
            return Err(ParseFailure::ReservedBits.into());
        }

        Ok(ConnAckFlags {
            session_present: (0b0000_0001 & encoded) != 0,
        })
    }
}

/// The server's answer to a connection request.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct ConnAckPacket {
    pub flags: ConnAckFlags,
    pub return_code: ConnectReturnCode,
}

impl PacketDecoder for ConnAckPacket {
    fn decode<T: Buf>(flags: FixedHeaderFlags, body: &mut T) -> Result<Self> {
        if flags != FixedHeaderFlags::ZERO {
            return Err(ParseFailure::InvalidFlags.into());
        }

        if body.remaining() != 2 {
            return Err(ParseFailure::InvalidLength.into());
        }

        Ok(ConnAckPacket {
            flags: ConnAckFlags::decode(body)?,
            return_code: ConnectReturnCode::decode(body)?,
        })
    }
}
