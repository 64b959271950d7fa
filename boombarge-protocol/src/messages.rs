//! Message types for the console/relay protocol
//!
//! Message types are divided into two categories:
//! - Console → Relay: commands
//! - Relay → Console: replies
//!
//! Every message is one tag byte followed by a fixed-size payload.
//! Multi-byte integers are little-endian. A buffer decodes only if its
//! length matches the tag exactly and every field is in its domain.

use heapless::Vec;

// Message type IDs: Console → Relay
pub const MSG_PING: u8 = 0x01;
pub const MSG_GET_ARMED: u8 = 0x02;
pub const MSG_SET_ARMED: u8 = 0x03;
pub const MSG_IGNITE: u8 = 0x04;

// Message type IDs: Relay → Console
pub const MSG_PING_REPLY: u8 = 0x81;
pub const MSG_ARMED_REPLY: u8 = 0x82;
pub const MSG_IGNITE_ACK: u8 = 0x84;

/// Number of relay channels on a relay node
pub const RELAY_COUNT: u8 = 16;

/// Maximum encoded message size (the framing buffer limit)
pub const MAX_MESSAGE_SIZE: usize = 255;

/// Encoded message bytes
pub type MessageBuf = Vec<u8, MAX_MESSAGE_SIZE>;

/// Errors that can occur while decoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Unknown tag, wrong length, or a field outside its domain
    Malformed,
}

/// Commands sent from the console to a relay node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Liveness probe, echoed back in a `PingReply`
    Ping { iteration: u32 },
    /// Query the node's arm flag
    GetArmed,
    /// Overwrite the node's arm flag (no reply)
    SetArmed { armed: bool },
    /// Close the relay for `channel_id` for one close period
    Ignite { channel_id: u8 },
}

/// Replies sent from a relay node to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Echo of a `Ping`
    PingReply { iteration: u32 },
    /// Current arm flag
    ArmedReply { armed: bool },
    /// Receipt of an `Ignite`, not proof that the relay closed
    IgniteAck { channel_id: u8 },
}

fn encode_bool(value: bool) -> u8 {
    value as u8
}

fn decode_bool(byte: u8) -> Result<bool, DecodeError> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::Malformed),
    }
}

fn encode_with(tag: u8, payload: &[u8]) -> MessageBuf {
    let mut buf = MessageBuf::new();
    // At most 5 bytes, always fits
    let _ = buf.push(tag);
    let _ = buf.extend_from_slice(payload);
    buf
}

impl Command {
    /// Wire tag of this command
    pub fn tag(&self) -> u8 {
        match self {
            Command::Ping { .. } => MSG_PING,
            Command::GetArmed => MSG_GET_ARMED,
            Command::SetArmed { .. } => MSG_SET_ARMED,
            Command::Ignite { .. } => MSG_IGNITE,
        }
    }

    /// Whether the relay node answers this command
    pub fn expects_reply(&self) -> bool {
        !matches!(self, Command::SetArmed { .. })
    }

    /// Encode this command
    ///
    /// # Panics
    /// If an `Ignite` names a channel outside `0..RELAY_COUNT`. The console
    /// only ignites channels from validated configuration, so this is a bug.
    pub fn encode(&self) -> MessageBuf {
        match *self {
            Command::Ping { iteration } => encode_with(MSG_PING, &iteration.to_le_bytes()),
            Command::GetArmed => encode_with(MSG_GET_ARMED, &[]),
            Command::SetArmed { armed } => encode_with(MSG_SET_ARMED, &[encode_bool(armed)]),
            Command::Ignite { channel_id } => {
                assert!(channel_id < RELAY_COUNT, "ignite channel out of range");
                encode_with(MSG_IGNITE, &[channel_id])
            }
        }
    }

    /// Decode a command from a de-framed buffer
    ///
    /// The channel of an `Ignite` is not range checked here: the relay node
    /// gates it, so a bad channel is a refused request rather than noise.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let (&tag, payload) = buf.split_first().ok_or(DecodeError::Malformed)?;
        match (tag, payload) {
            (MSG_PING, &[a, b, c, d]) => Ok(Command::Ping {
                iteration: u32::from_le_bytes([a, b, c, d]),
            }),
            (MSG_GET_ARMED, &[]) => Ok(Command::GetArmed),
            (MSG_SET_ARMED, &[armed]) => Ok(Command::SetArmed {
                armed: decode_bool(armed)?,
            }),
            (MSG_IGNITE, &[channel_id]) => Ok(Command::Ignite { channel_id }),
            _ => Err(DecodeError::Malformed),
        }
    }
}

impl Reply {
    /// Wire tag of this reply
    pub fn tag(&self) -> u8 {
        match self {
            Reply::PingReply { .. } => MSG_PING_REPLY,
            Reply::ArmedReply { .. } => MSG_ARMED_REPLY,
            Reply::IgniteAck { .. } => MSG_IGNITE_ACK,
        }
    }

    /// Encode this reply
    ///
    /// An `IgniteAck` echoes whatever channel was requested, in range or not.
    pub fn encode(&self) -> MessageBuf {
        match *self {
            Reply::PingReply { iteration } => {
                encode_with(MSG_PING_REPLY, &iteration.to_le_bytes())
            }
            Reply::ArmedReply { armed } => encode_with(MSG_ARMED_REPLY, &[encode_bool(armed)]),
            Reply::IgniteAck { channel_id } => encode_with(MSG_IGNITE_ACK, &[channel_id]),
        }
    }

    /// Decode a reply from a de-framed buffer
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let (&tag, payload) = buf.split_first().ok_or(DecodeError::Malformed)?;
        match (tag, payload) {
            (MSG_PING_REPLY, &[a, b, c, d]) => Ok(Reply::PingReply {
                iteration: u32::from_le_bytes([a, b, c, d]),
            }),
            (MSG_ARMED_REPLY, &[armed]) => Ok(Reply::ArmedReply {
                armed: decode_bool(armed)?,
            }),
            (MSG_IGNITE_ACK, &[channel_id]) => Ok(Reply::IgniteAck { channel_id }),
            _ => Err(DecodeError::Malformed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ping_layout() {
        let buf = Command::Ping {
            iteration: 0x0403_0201,
        }
        .encode();
        assert_eq!(&buf[..], &[MSG_PING, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_get_armed_has_no_payload() {
        assert_eq!(&Command::GetArmed.encode()[..], &[MSG_GET_ARMED]);
    }

    #[test]
    fn test_boundary_channels_roundtrip() {
        for channel_id in [0, RELAY_COUNT - 1] {
            let cmd = Command::Ignite { channel_id };
            assert_eq!(Command::decode(&cmd.encode()), Ok(cmd));

            let reply = Reply::IgniteAck { channel_id };
            assert_eq!(Reply::decode(&reply.encode()), Ok(reply));
        }
    }

    #[test]
    fn test_decode_accepts_out_of_range_channel() {
        // Range gating belongs to the relay engine
        assert_eq!(
            Command::decode(&[MSG_IGNITE, 200]),
            Ok(Command::Ignite { channel_id: 200 })
        );
    }

    #[test]
    #[should_panic(expected = "ignite channel out of range")]
    fn test_encode_out_of_range_channel_panics() {
        let _ = Command::Ignite {
            channel_id: RELAY_COUNT,
        }
        .encode();
    }

    #[test]
    fn test_ack_for_out_of_range_channel_encodes() {
        let reply = Reply::IgniteAck { channel_id: 99 };
        assert_eq!(Reply::decode(&reply.encode()), Ok(reply));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert_eq!(Command::decode(&[]), Err(DecodeError::Malformed));
        assert_eq!(Reply::decode(&[]), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_bad_bool_rejected() {
        assert_eq!(
            Command::decode(&[MSG_SET_ARMED, 2]),
            Err(DecodeError::Malformed)
        );
        assert_eq!(
            Reply::decode(&[MSG_ARMED_REPLY, 0xFF]),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        assert_eq!(
            Command::decode(&[MSG_GET_ARMED, 0]),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_reply_tag_not_a_command() {
        let buf = Reply::ArmedReply { armed: true }.encode();
        assert_eq!(Command::decode(&buf), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_set_armed_expects_no_reply() {
        assert!(!Command::SetArmed { armed: true }.expects_reply());
        assert!(Command::GetArmed.expects_reply());
        assert!(Command::Ping { iteration: 1 }.expects_reply());
        assert!(Command::Ignite { channel_id: 0 }.expects_reply());
    }

    fn any_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            any::<u32>().prop_map(|iteration| Command::Ping { iteration }),
            Just(Command::GetArmed),
            any::<bool>().prop_map(|armed| Command::SetArmed { armed }),
            (0..RELAY_COUNT).prop_map(|channel_id| Command::Ignite { channel_id }),
        ]
    }

    fn any_reply() -> impl Strategy<Value = Reply> {
        prop_oneof![
            any::<u32>().prop_map(|iteration| Reply::PingReply { iteration }),
            any::<bool>().prop_map(|armed| Reply::ArmedReply { armed }),
            any::<u8>().prop_map(|channel_id| Reply::IgniteAck { channel_id }),
        ]
    }

    fn is_command_tag(tag: u8) -> bool {
        matches!(tag, MSG_PING | MSG_GET_ARMED | MSG_SET_ARMED | MSG_IGNITE)
    }

    fn is_reply_tag(tag: u8) -> bool {
        matches!(tag, MSG_PING_REPLY | MSG_ARMED_REPLY | MSG_IGNITE_ACK)
    }

    proptest! {
        #[test]
        fn command_roundtrip(cmd in any_command()) {
            let buf = cmd.encode();
            prop_assert!(buf.len() <= MAX_MESSAGE_SIZE);
            prop_assert_eq!(Command::decode(&buf), Ok(cmd));
        }

        #[test]
        fn reply_roundtrip(reply in any_reply()) {
            prop_assert_eq!(Reply::decode(&reply.encode()), Ok(reply));
        }

        #[test]
        fn truncated_command_rejected(cmd in any_command(), cut in 1usize..8) {
            let buf = cmd.encode();
            let keep = buf.len().saturating_sub(cut);
            prop_assert_eq!(Command::decode(&buf[..keep]), Err(DecodeError::Malformed));
        }

        #[test]
        fn truncated_reply_rejected(reply in any_reply(), cut in 1usize..8) {
            let buf = reply.encode();
            let keep = buf.len().saturating_sub(cut);
            prop_assert_eq!(Reply::decode(&buf[..keep]), Err(DecodeError::Malformed));
        }

        #[test]
        fn unused_command_tag_rejected(cmd in any_command(), tag in any::<u8>()) {
            prop_assume!(!is_command_tag(tag));
            let mut buf = cmd.encode();
            buf[0] = tag;
            prop_assert_eq!(Command::decode(&buf), Err(DecodeError::Malformed));
        }

        #[test]
        fn unused_reply_tag_rejected(reply in any_reply(), tag in any::<u8>()) {
            prop_assume!(!is_reply_tag(tag));
            let mut buf = reply.encode();
            buf[0] = tag;
            prop_assert_eq!(Reply::decode(&buf), Err(DecodeError::Malformed));
        }
    }
}
