//! Packet framing for the console/relay serial link.
//!
//! Frame format:
//! - COBS-encoded message bytes (never contain 0x00)
//! - DELIMITER (1 byte): 0x00 marks the end of a packet
//!
//! A receiver that joins mid-stream or sees line noise resynchronizes at the
//! next delimiter; nothing before it is ever handed to the decoder.

use heapless::Vec;

use crate::messages::MAX_MESSAGE_SIZE;

/// Packet delimiter byte
pub const FRAME_DELIMITER: u8 = 0x00;

/// Maximum COBS-encoded size of a message (without delimiter)
pub const MAX_ENCODED_SIZE: usize = MAX_MESSAGE_SIZE + MAX_MESSAGE_SIZE / 254 + 1;

/// Maximum bytes a packet occupies on the wire (encoded message + delimiter)
pub const MAX_PACKET_SIZE: usize = MAX_ENCODED_SIZE + 1;

/// A complete, de-framed message buffer
pub type Packet = Vec<u8, MAX_MESSAGE_SIZE>;

/// Errors that can occur during packet framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum message size
    PayloadTooLarge,
    /// Bytes between delimiters are not valid COBS
    InvalidEncoding,
    /// Too many bytes arrived without a delimiter
    Overflow,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// Encode `payload` into `buffer` as a delimited packet
///
/// Returns the number of bytes written, including the trailing delimiter.
pub fn encode_packet(payload: &[u8], buffer: &mut [u8]) -> Result<usize, FrameError> {
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }

    let encoded_len = cobs::max_encoding_length(payload.len());
    if buffer.len() < encoded_len + 1 {
        return Err(FrameError::BufferTooSmall);
    }

    let written = cobs::encode(payload, &mut buffer[..encoded_len]);
    buffer[written] = FRAME_DELIMITER;
    Ok(written + 1)
}

/// Encode `payload` into a heapless Vec
pub fn encode_packet_to_vec(payload: &[u8]) -> Result<Vec<u8, MAX_PACKET_SIZE>, FrameError> {
    let mut buffer = [0u8; MAX_PACKET_SIZE];
    let len = encode_packet(payload, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(vec)
}

/// Decode the bytes found between two delimiters
fn decode_packet(encoded: &[u8]) -> Result<Packet, FrameError> {
    if encoded.len() > MAX_ENCODED_SIZE {
        return Err(FrameError::Overflow);
    }

    // Decoded output is never longer than its encoding
    let mut scratch = [0u8; MAX_ENCODED_SIZE];
    let len = cobs::decode(encoded, &mut scratch[..encoded.len()])
        .map_err(|_| FrameError::InvalidEncoding)?;

    let mut packet = Packet::new();
    packet
        .extend_from_slice(&scratch[..len])
        .map_err(|_| FrameError::PayloadTooLarge)?;
    Ok(packet)
}

/// Byte-fed packet parser
///
/// Accumulates bytes until a delimiter and yields whole packets only.
#[derive(Debug, Clone)]
pub struct PacketParser {
    buffer: Vec<u8, MAX_ENCODED_SIZE>,
    /// Set after an overflow; bytes are dropped until the next delimiter
    discarding: bool,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete valid packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on a framing error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, FrameError> {
        if byte == FRAME_DELIMITER {
            if self.discarding {
                self.reset();
                return Ok(None);
            }
            if self.buffer.is_empty() {
                // Back-to-back delimiters carry nothing
                return Ok(None);
            }
            let result = decode_packet(&self.buffer);
            self.buffer.clear();
            return result.map(Some);
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(FrameError::Overflow);
        }

        Ok(None)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete packet found, if any.
    /// Remaining bytes after a complete packet are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Packet>, FrameError> {
        for &byte in bytes {
            if let Some(packet) = self.feed(byte)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }
}
