use bytes::Buf;

use zefiro_core::Result;

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// Keep-alive probe from the client; its arrival is the entire message.
#[derive(PartialEq, Eq, Debug)]
pub struct PingReqPacket {}

impl PacketDecoder for PingReqPacket {
    fn decode<T: Buf>(_flags: FixedHeaderFlags, _body: &mut T) -> Result<Self> {
        Ok(Self {})
    }
}
