//! Frame segmentation: turning an unbounded, possibly partial byte stream
//! into whole frames plus an unconsumed remainder.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use zefiro_core::{
    codec::{Decoder, Encoder, VariableByteInteger},
    error::Error,
    Result,
};

use crate::{ControlPacket, PacketType};

/// The four flag bits from the fixed header's low nibble, most significant
/// bit first.
///
/// The bits occupy the same position in every frame but mean something
/// different per packet type, so the segmenter hands them to the variant
/// decoders uninterpreted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FixedHeaderFlags(pub [bool; 4]);

impl FixedHeaderFlags {
    pub const ZERO: FixedHeaderFlags = FixedHeaderFlags([false; 4]);

    pub fn from_nibble(nibble: u8) -> Self {
        FixedHeaderFlags([
            (nibble & 0b1000) != 0,
            (nibble & 0b0100) != 0,
            (nibble & 0b0010) != 0,
            (nibble & 0b0001) != 0,
        ])
    }

    pub fn as_nibble(&self) -> u8 {
        (self.0[0] as u8) << 3
            | (self.0[1] as u8) << 2
            | (self.0[2] as u8) << 1
            | self.0[3] as u8
    }

    /// Bit by position, 0 being the most significant bit of the nibble.
    pub fn bit(&self, index: usize) -> bool {
        self.0[index]
    }
}

/// A type-tagged, length-delimited unit extracted from the stream, its body
/// still undecoded.
///
/// The body is an owned slice of exactly `remaining_length` bytes; it stays
/// valid however the caller reuses its own buffer afterwards.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    pub packet_type: PacketType,
    pub flags: FixedHeaderFlags,
    pub body: Bytes,
}

impl Frame {
    /// Decode the body into a typed packet. See [`ControlPacket::decode`].
    pub fn decode(&self) -> Result<ControlPacket> {
        ControlPacket::decode(self)
    }

    /// Reconstruct the exact wire bytes this frame was segmented from.
    pub fn to_bytes(&self) -> Bytes {
        let len = VariableByteInteger(self.body.len() as u32);
        let mut buffer = BytesMut::with_capacity(1 + len.encoded_size() + self.body.len());

        buffer.put_u8((self.packet_type as u8) << 4 | self.flags.as_nibble());
        len.encode(&mut buffer);
        buffer.extend_from_slice(&self.body);

        buffer.freeze()
    }
}

/// Extract every complete frame from `src`, in encounter order.
///
/// Returns the frames together with the unconsumed remainder. The caller
/// keeps the remainder and prepends it to the next arriving chunk;
/// segmenting `remainder + more` picks up exactly where this call stopped,
/// with no byte dropped or duplicated. Insufficient data is never an error.
/// A malformed length field or an out-of-range type tag fails the call, and
/// with it the stream.
pub fn segment(mut src: Bytes) -> Result<(Vec<Frame>, Bytes)> {
    let mut frames = Vec::new();

    loop {
        if src.len() < 2 {
            return Ok((frames, src));
        }

        let header = src[0];

        let avail = src.len() - 1;
        let mut peeker: &[u8] = &src[1..];
        let remaining_len = match VariableByteInteger::decode(&mut peeker) {
            Ok(len) => len.0 as usize,
            // The length chain runs past the available bytes; retry from
            // the start of this frame once more have arrived.
            Err(Error::FrameIncomplete) => return Ok((frames, src)),
            Err(e) => return Err(e),
        };

        // Bytes the length field occupied, read off the cursor rather than
        // recomputed from the value, so a non-canonical encoding cannot
        // desync the stream.
        let len_bytes = avail - peeker.len();

        let frame_len = 1 + len_bytes + remaining_len;
        if src.len() < frame_len {
            return Ok((frames, src));
        }

        let packet_type = PacketType::try_from(header >> 4)?;
        let flags = FixedHeaderFlags::from_nibble(header & 0x0f);
        let body = src.slice(1 + len_bytes..frame_len);

        trace!(?packet_type, remaining_len, "segmented frame");

        frames.push(Frame {
            packet_type,
            flags,
            body,
        });
        src.advance(frame_len);
    }
}
