pub mod connack;
pub mod connect;
pub mod frame;
pub mod pingreq;
pub mod pingresp;
pub mod puback;
pub mod publish;

use bytes::Buf;
use tracing::debug;

use zefiro_core::{error::ParseFailure, Result};

use crate::{
    connack::ConnAckPacket, connect::ConnectPacket, frame::FixedHeaderFlags, frame::Frame,
    pingreq::PingReqPacket, pingresp::PingRespPacket, puback::PubAckPacket,
    publish::PublishPacket,
};

/// Control packet type tag, the top nibble of a frame's fixed header.
///
/// The tag space covers every MQTT 3.1 packet type; only a subset has a
/// decoder registered in [`ControlPacket::decode`].
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PacketType {
    Connect = 0x01,
    ConnAck,
    Publish,
    PubAck,
    PubRec,
    PubRel,
    PubComp,
    Subscribe,
    SubAck,
    Unsubscribe,
    UnsubAck,
    PingReq,
    PingResp,
    Disconnect,
}

impl TryFrom<u8> for PacketType {
    type Error = ParseFailure;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        use PacketType::*;

        let res = match value {
            0x01 => Connect,
            0x02 => ConnAck,
            0x03 => Publish,
            0x04 => PubAck,
            0x05 => PubRec,
            0x06 => PubRel,
            0x07 => PubComp,
            0x08 => Subscribe,
            0x09 => SubAck,
            0x0a => Unsubscribe,
            0x0b => UnsubAck,
            0x0c => PingReq,
            0x0d => PingResp,
            0x0e => Disconnect,
            _ => return Err(ParseFailure::UnsupportedPacketType),
        };

        Ok(res)
    }
}

/// Decoder for one packet type's flags contract and body layout.
///
/// The flag nibble sits in the same position in every frame but its meaning
/// is packet-type specific, so each implementation interprets (or ignores)
/// the bits on its own terms; there is no shared flags validation.
pub trait PacketDecoder {
    fn decode<T: Buf>(flags: FixedHeaderFlags, body: &mut T) -> Result<Self>
    where
        Self: Sized;
}

#[repr(u8)]
#[derive(PartialEq, Eq, Debug)]
pub enum ControlPacket {
    Connect(ConnectPacket),
    ConnAck(ConnAckPacket),
    Publish(PublishPacket),
    PubAck(PubAckPacket),
    PingReq(PingReqPacket),
    PingResp(PingRespPacket),
}

impl ControlPacket {
    /// Decode a segmented frame's body into its typed packet.
    ///
    /// Decoding is a pure function of the frame's type tag, flags and body,
    /// so a frame may be decoded any number of times with an equal result.
    /// A tag without a registered decoder fails; it is never skipped.
    pub fn decode(frame: &Frame) -> Result<ControlPacket> {
        use ControlPacket::*;

        let mut body = frame.body.clone();

        let packet = match frame.packet_type {
            PacketType::Connect => Connect(ConnectPacket::decode(frame.flags, &mut body)?),
            PacketType::ConnAck => ConnAck(ConnAckPacket::decode(frame.flags, &mut body)?),
            PacketType::Publish => Publish(PublishPacket::decode(frame.flags, &mut body)?),
            PacketType::PubAck => PubAck(PubAckPacket::decode(frame.flags, &mut body)?),
            PacketType::PingReq => PingReq(PingReqPacket::decode(frame.flags, &mut body)?),
            PacketType::PingResp => PingResp(PingRespPacket::decode(frame.flags, &mut body)?),
            other => {
                debug!(packet_type = ?other, "no decoder registered for packet type");
                return Err(ParseFailure::UnsupportedPacketType.into());
            }
        };

        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use zefiro_core::{error::Error, error::ParseFailure, qos::QoS};

    use crate::frame::segment;
    use crate::{ControlPacket, PacketType};

    #[test]
    fn test_segment_then_decode_connect() -> zefiro_core::Result<()> {
        let input = Bytes::from_static(&[
            0x10, 0x25, 0x00, 0x06, 0x4d, 0x51, 0x49, 0x73, 0x64, 0x70, 0x03, 0x02, 0x00,
            0x3c, 0x00, 0x17, 0x6d, 0x6f, 0x73, 0x71, 0x73, 0x75, 0x62, 0x7c, 0x31, 0x38,
            0x32, 0x31, 0x35, 0x2d, 0x6d, 0x65, 0x64, 0x69, 0x6e, 0x61, 0x2e, 0x6c, 0x61,
        ]);

        let (frames, remainder) = segment(input)?;
        assert_eq!(frames.len(), 1);
        assert!(remainder.is_empty());

        match frames[0].decode()? {
            ControlPacket::Connect(p) => {
                assert_eq!(p.client_id, "mosqsub|18215-medina.la");
                assert_eq!(p.keepalive, 60);
            }
            _ => unreachable!(),
        }

        // Decoding is a pure derivation; a second pass yields an equal
        // packet.
        assert_eq!(frames[0].decode()?, frames[0].decode()?);

        Ok(())
    }

    #[test]
    fn test_segment_then_decode_pipeline() -> zefiro_core::Result<()> {
        // A QoS 0 PUBLISH followed by a PINGREQ, arriving in one chunk.
        let mut input = vec![0x30, 0x12, 0x00, 0x0b];
        input.extend_from_slice(b"mqttexample");
        input.extend_from_slice(b"test!");
        input.extend_from_slice(&[0xc0, 0x00]);

        let (frames, remainder) = segment(Bytes::from(input))?;
        assert_eq!(frames.len(), 2);
        assert!(remainder.is_empty());

        match frames[0].decode()? {
            ControlPacket::Publish(p) => {
                assert_eq!(p.topic, "mqttexample");
                assert_eq!(p.qos, QoS::AtMostOnce);
            }
            _ => unreachable!(),
        }

        assert!(matches!(frames[1].decode()?, ControlPacket::PingReq(_)));

        Ok(())
    }

    #[test]
    fn test_decode_unregistered_tag_fails() {
        // SUBSCRIBE sits in the tag space but has no decoder.
        let input = Bytes::from(vec![0x82, 0x00]);
        let (frames, _) = segment(input).unwrap();

        assert_eq!(frames[0].packet_type, PacketType::Subscribe);
        match frames[0].decode() {
            Err(Error::ParseFailure(e)) => assert_eq!(e, ParseFailure::UnsupportedPacketType),
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_packet_type_try_from_rejects_out_of_range() {
        assert!(PacketType::try_from(0x00).is_err());
        assert!(PacketType::try_from(0x0f).is_err());
        assert_eq!(PacketType::try_from(0x0e), Ok(PacketType::Disconnect));
    }
}
