use bytes::Buf;

use zefiro_core::Result;

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// The server's answer to a PINGREQ.
#[derive(PartialEq, Eq, Debug)]
pub struct PingRespPacket {}

impl PacketDecoder for PingRespPacket {
    fn decode<T: Buf>(_flags: FixedHeaderFlags, _body: &mut T) -> Result<Self> {
        Ok(Self {})
    }
}
