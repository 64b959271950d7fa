//! Command handling and the self-timeout release loop

use boombarge_hal::OutputPin;
use boombarge_protocol::{Command, DecodeError, Reply};

use super::channel::RelayChannel;
use crate::config::RelayConfig;

/// What an `Ignite` did to the relay bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgniteOutcome {
    /// Channel was open and is now closed
    Closed,
    /// Channel was already closed; its deadline moved
    Extended,
    /// Node is disarmed; nothing actuated
    Disarmed,
    /// Channel id outside the bank; nothing actuated
    InvalidChannel,
}

/// Relay bank of `N` channels behind the arm gate
///
/// Owned by a single task. Call [`RelayEngine::sweep`] every loop iteration
/// before handling any request.
#[derive(Debug)]
pub struct RelayEngine<P, const N: usize> {
    channels: [RelayChannel<P>; N],
    armed: bool,
    close_period_ms: u32,
}

impl<P: OutputPin, const N: usize> RelayEngine<P, N> {
    /// Build the engine; every pin is driven open and the node starts disarmed
    pub fn new(pins: [P; N], config: &RelayConfig) -> Self {
        Self {
            channels: pins.map(|pin| RelayChannel::new(pin, config.close_level)),
            armed: false,
            close_period_ms: config.close_period_ms,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn channel(&self, id: u8) -> Option<&RelayChannel<P>> {
        self.channels.get(id as usize)
    }

    /// Number of channels currently closed
    pub fn closed_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_closed()).count()
    }

    /// Release every channel whose close period has passed
    ///
    /// Returns the number of channels opened.
    pub fn sweep(&mut self, now: u32) -> usize {
        self.channels
            .iter_mut()
            .map(|c| c.release_if_due(now))
            .filter(|&opened| opened)
            .count()
    }

    /// Close `channel_id` if armed and in range
    pub fn ignite(&mut self, channel_id: u8, now: u32) -> IgniteOutcome {
        if !self.armed {
            return IgniteOutcome::Disarmed;
        }
        let period = self.close_period_ms;
        match self.channels.get_mut(channel_id as usize) {
            Some(channel) => {
                let was_closed = channel.is_closed();
                channel.close(now, period);
                if was_closed {
                    IgniteOutcome::Extended
                } else {
                    IgniteOutcome::Closed
                }
            }
            None => IgniteOutcome::InvalidChannel,
        }
    }

    /// Apply a decoded command and produce its reply, if any
    pub fn handle(&mut self, command: Command, now: u32) -> Option<Reply> {
        match command {
            Command::Ping { iteration } => Some(Reply::PingReply { iteration }),
            Command::GetArmed => Some(Reply::ArmedReply { armed: self.armed }),
            Command::SetArmed { armed } => {
                // Disarming leaves closed channels to their own deadlines
                self.armed = armed;
                None
            }
            Command::Ignite { channel_id } => {
                self.ignite(channel_id, now);
                Some(Reply::IgniteAck { channel_id })
            }
        }
    }

    /// Decode and apply one de-framed packet
    ///
    /// A malformed packet changes nothing and gets no reply.
    pub fn handle_packet(&mut self, packet: &[u8], now: u32) -> Result<Option<Reply>, DecodeError> {
        let command = Command::decode(packet)?;
        Ok(self.handle(command, now))
    }

    /// One loop iteration: sweep, then handle `packet` if one arrived
    pub fn poll(&mut self, now: u32, packet: Option<&[u8]>) -> Result<Option<Reply>, DecodeError> {
        self.sweep(now);
        match packet {
            Some(packet) => self.handle_packet(packet, now),
            None => Ok(None),
        }
    }
}
