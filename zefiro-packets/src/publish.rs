use bytes::{Buf, Bytes};

use zefiro_core::{codec::Decoder, error::ParseFailure, qos::QoS, Result};

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// An application message, in either direction.
#[derive(Debug, PartialEq, Eq)]
pub struct PublishPacket {
    pub duplicate: bool,
    pub qos: QoS,
    pub retain: bool,
    pub topic: String,
    /// Present exactly when `qos` is above [`QoS::AtMostOnce`].
    pub packet_id: Option<u16>,
    pub payload: Bytes,
}

impl PacketDecoder for PublishPacket {
    fn decode<T: Buf>(flags: FixedHeaderFlags, body: &mut T) -> Result<Self> {
        // PUBLISH is the one packet whose flag nibble carries data: bit 3
        // duplicate delivery, bits 2-1 QoS, bit 0 retain.
        let duplicate = flags.bit(0);
        let retain = flags.bit(3);

        let qos = QoS::from((flags.bit(1) as u8) << 1 | flags.bit(2) as u8);
        if qos == QoS::Invalid {
            // A PUBLISH packet MUST NOT have both QoS bits set to 1
            // [MQTT-3.3.1-4].
            return Err(ParseFailure::InvalidQoS.into());
        }

        let topic = String::decode(body)?;

        let packet_id = match qos {
            QoS::AtMostOnce => None,
            _ => Some(u16::decode(body)?),
        };

        let payload = body.copy_to_bytes(body.remaining());

        Ok(PublishPacket {
            duplicate,
            qos,
            retain,
            topic,
            packet_id,
            payload,
        })
    }
}
