use bytes::Buf;

use zefiro_core::{codec::Decoder, error::ParseFailure, Result};

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// Acknowledgement of a QoS 1 PUBLISH.
///
/// The flag nibble carries no data for acknowledgements and is not
/// validated here.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct PubAckPacket {
    pub packet_id: u16,
}

impl PacketDecoder for PubAckPacket {
    fn decode<T: Buf>(_flags: FixedHeaderFlags, body: &mut T) -> Result<Self> {
        if body.remaining() != 2 {
            return Err(ParseFailure::InvalidLength.into());
        }

        Ok(PubAckPacket {
            packet_id: u16::decode(body)?,
        })
    }
}
