use bytes::Buf;

use zefiro_core::{codec::Decoder, error::ParseFailure, qos::QoS, Result};

use crate::{frame::FixedHeaderFlags, PacketDecoder};

/// The connect-flags bitfield from the CONNECT variable header.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct ConnectFlags {
    pub user_name: bool,
    pub password: bool,
    pub will_retain: bool,
    pub will_qos: QoS,
    pub will_flag: bool,
    pub clean_session: bool,
}

impl Decoder for ConnectFlags {
    fn decode<T: Buf>(buffer: &mut T) -> zefiro_core::Result<Self> {
        if !buffer.has_remaining() {
            return Err(ParseFailure::InvalidLength.into());
        }

        let byte = buffer.get_u8();

        // The server MUST validate that the reserved flag is set to zero
        // and disconnect the client if it is not [MQTT-3.1.2-3].
        if (byte & 0b0000_0001) != 0 {
            return Err(ParseFailure::ReservedBits.into());
        }

        let mut flags = ConnectFlags {
            user_name: (byte & 0b1000_0000) != 0,
            password: (byte & 0b0100_0000) != 0,
            will_retain: (byte & 0b0010_0000) != 0,
            clean_session: (byte & 0b0000_0010) != 0,
            ..Default::default()
        };

        if (byte & 0b0000_0100) != 0 {
            flags.will_flag = true;
            flags.will_qos = ((byte >> 3) & 0b0000_0011).into();
        }

        if flags.will_qos == QoS::Invalid {
            return Err(ParseFailure::InvalidQoS.into());
        }

        Ok(flags)
    }
}

/// A client's request to open a session.
#[derive(Debug, PartialEq, Eq)]
pub struct ConnectPacket {
    pub protocol_name: String,
    pub protocol_level: u8,
    pub flags: ConnectFlags,
    pub keepalive: u16,
    pub client_id: String,
}

impl PacketDecoder for ConnectPacket {
    fn decode<T: Buf>(flags: FixedHeaderFlags, body: &mut T) -> Result<Self> {
        if flags != FixedHeaderFlags::ZERO {
            return Err(ParseFailure::InvalidFlags.into());
        }

        let protocol_name = String::decode(body)?;
        let protocol_level = u8::decode(body)?;
        let connect_flags = ConnectFlags::decode(body)?;
        let keepalive = u16::decode(body)?;
        let client_id = String::decode(body)?;

        // A will section must still be well formed, but acting on it is the
        // session layer's business; the decoded packet does not carry it.
        // Any user name / password payload bytes after it are ignored the
        // same way.
        if connect_flags.will_flag {
            String::decode(body)?;
            String::decode(body)?;
        }

        Ok(ConnectPacket {
            protocol_name,
            protocol_level,
            flags: connect_flags,
            keepalive,
            client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Bytes, BytesMut};

    use zefiro_core::{codec::Encoder, error::Error};

    use super::*;

    // Body of the mosquitto CONNECT capture: protocol "MQIsdp" level 3,
    // clean session, keep alive 60, client id "mosqsub|18215-medina.la".
    const CONNECT_BODY: &[u8] = &[
        0x00, 0x06, 0x4d, 0x51, 0x49, 0x73, 0x64, 0x70, 0x03, 0x02, 0x00, 0x3c, 0x00, 0x17,
        0x6d, 0x6f, 0x73, 0x71, 0x73, 0x75, 0x62, 0x7c, 0x31, 0x38, 0x32, 0x31, 0x35, 0x2d,
        0x6d, 0x65, 0x64, 0x69, 0x6e, 0x61, 0x2e, 0x6c, 0x61,
    ];

    #[test]
    fn test_connect_packet_decode() -> Result<()> {
        let mut body = Bytes::from_static(CONNECT_BODY);
        let packet = ConnectPacket::decode(FixedHeaderFlags::ZERO, &mut body)?;

        assert_eq!(packet.protocol_name, "MQIsdp");
        assert_eq!(packet.protocol_level, 3);
        assert!(packet.flags.clean_session);
        assert!(!packet.flags.will_flag);
        assert_eq!(packet.keepalive, 60);
        assert_eq!(packet.client_id, "mosqsub|18215-medina.la");

        Ok(())
    }

    #[test]
    fn test_connect_packet_rejects_nonzero_header_flags() {
        let mut body = Bytes::from_static(CONNECT_BODY);

        match ConnectPacket::decode(FixedHeaderFlags::from_nibble(0b0001), &mut body) {
            Err(Error::ParseFailure(e)) => assert_eq!(e, ParseFailure::InvalidFlags),
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_connect_packet_rejects_reserved_connect_flag() {
        // Same body with bit 0 of the connect flags set.
        let mut body = CONNECT_BODY.to_vec();
        body[9] = 0x03;

        match ConnectPacket::decode(FixedHeaderFlags::ZERO, &mut Bytes::from(body)) {
            Err(Error::ParseFailure(e)) => assert_eq!(e, ParseFailure::ReservedBits),
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_connect_packet_rejects_will_qos_3() {
        // Will flag set with both will QoS bits on.
        let mut body = CONNECT_BODY.to_vec();
        body[9] = 0b0001_1110;

        match ConnectPacket::decode(FixedHeaderFlags::ZERO, &mut Bytes::from(body)) {
            Err(Error::ParseFailure(e)) => assert_eq!(e, ParseFailure::InvalidQoS),
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_connect_packet_consumes_and_discards_will_fields() -> Result<()> {
        let mut body = BytesMut::new();
        "MQIsdp".encode(&mut body);
        0x03u8.encode(&mut body);
        0b0000_1110u8.encode(&mut body);
        60u16.encode(&mut body);
        "medina".encode(&mut body);
        "will/topic".encode(&mut body);
        "gone".encode(&mut body);

        let packet = ConnectPacket::decode(FixedHeaderFlags::ZERO, &mut body)?;

        assert!(packet.flags.will_flag);
        assert_eq!(packet.flags.will_qos, QoS::AtLeastOnce);
        assert_eq!(packet.client_id, "medina");

        Ok(())
    }

    #[test]
    fn test_connect_packet_rejects_truncated_will_section() {
        let mut body = BytesMut::new();
        "MQIsdp".encode(&mut body);
        0x03u8.encode(&mut body);
        0b0000_0110u8.encode(&mut body);
        60u16.encode(&mut body);
        "medina".encode(&mut body);
        // Will flag set but no will topic follows.

        match ConnectPacket::decode(FixedHeaderFlags::ZERO, &mut body) {
            Err(Error::ParseFailure(e)) => assert_eq!(e, ParseFailure::MalformedString),
            _ => unreachable!(),
        };
    }
}
