//! Link liveness: per-node monitors, the multi-node tracker and the pinger

use crate::timing::{elapsed_ms, has_elapsed};

/// Liveness of one relay node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No reply seen since boot
    #[default]
    NeverConnected,
    Connected,
    /// Was connected, then went quiet for longer than the liveness window
    Lost,
}

/// Transition reported by a monitor or the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkChange {
    Connected,
    Lost,
}

/// Tracks replies from a single node
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkMonitor {
    state: LinkState,
    last_reply_at: Option<u32>,
}

impl LinkMonitor {
    pub const fn new() -> Self {
        Self {
            state: LinkState::NeverConnected,
            last_reply_at: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn last_reply_at(&self) -> Option<u32> {
        self.last_reply_at
    }

    /// Any reply counts as proof of life
    pub fn reply_received(&mut self, now: u32) -> Option<LinkChange> {
        self.last_reply_at = Some(now);
        if self.state == LinkState::Connected {
            return None;
        }
        self.state = LinkState::Connected;
        Some(LinkChange::Connected)
    }

    /// Mark the link lost once the window passes without a reply
    pub fn update(&mut self, now: u32, window_ms: u32) -> Option<LinkChange> {
        match (self.state, self.last_reply_at) {
            (LinkState::Connected, Some(at)) if elapsed_ms(now, at) > window_ms => {
                self.state = LinkState::Lost;
                Some(LinkChange::Lost)
            }
            _ => None,
        }
    }
}

/// Liveness of `N` relay nodes with all-connected / any-lost aggregates
#[derive(Debug, Clone)]
pub struct ConnectionTracker<const N: usize> {
    nodes: [LinkMonitor; N],
    window_ms: u32,
}

impl<const N: usize> ConnectionTracker<N> {
    pub fn new(window_ms: u32) -> Self {
        Self {
            nodes: [LinkMonitor::new(); N],
            window_ms,
        }
    }

    pub fn node(&self, index: usize) -> Option<&LinkMonitor> {
        self.nodes.get(index)
    }

    /// Every node has replied within the window
    pub fn is_connected(&self) -> bool {
        self.nodes.iter().all(|n| n.state() == LinkState::Connected)
    }

    /// At least one node that was connected has gone quiet
    pub fn is_lost(&self) -> bool {
        self.nodes.iter().any(|n| n.state() == LinkState::Lost)
    }

    /// Most recent reply from any node
    pub fn last_reply_at(&self, now: u32) -> Option<u32> {
        self.nodes
            .iter()
            .filter_map(|n| n.last_reply_at())
            .min_by_key(|&at| elapsed_ms(now, at))
    }

    /// Record a reply from `node`; returns an aggregate change
    pub fn reply_received(&mut self, node: usize, now: u32) -> Option<LinkChange> {
        let before = self.is_connected();
        self.nodes.get_mut(node)?.reply_received(now);
        (!before && self.is_connected()).then_some(LinkChange::Connected)
    }

    /// Age every node; returns an aggregate change
    pub fn update(&mut self, now: u32) -> Option<LinkChange> {
        let before = self.is_lost();
        for node in &mut self.nodes {
            node.update(now, self.window_ms);
        }
        (!before && self.is_lost()).then_some(LinkChange::Lost)
    }
}

/// Periodic `Ping` scheduler with round-trip measurement
#[derive(Debug, Clone)]
pub struct Pinger {
    interval_ms: u32,
    iteration: u32,
    last_sent_at: Option<u32>,
    last_roundtrip_ms: Option<u32>,
}

impl Pinger {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            iteration: 0,
            last_sent_at: None,
            last_roundtrip_ms: None,
        }
    }

    /// Iteration of the most recent ping; 0 before the first
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn last_roundtrip_ms(&self) -> Option<u32> {
        self.last_roundtrip_ms
    }

    /// Returns the iteration to send when a ping is due
    pub fn poll(&mut self, now: u32) -> Option<u32> {
        if let Some(sent) = self.last_sent_at {
            if !has_elapsed(now, sent, self.interval_ms) {
                return None;
            }
        }
        self.iteration = self.iteration.wrapping_add(1);
        self.last_sent_at = Some(now);
        Some(self.iteration)
    }

    /// Record a `PingReply`; returns the round trip if it answers the latest ping
    pub fn reply_received(&mut self, iteration: u32, now: u32) -> Option<u32> {
        let sent = self.last_sent_at?;
        if iteration != self.iteration {
            return None;
        }
        let roundtrip = elapsed_ms(now, sent);
        self.last_roundtrip_ms = Some(roundtrip);
        Some(roundtrip)
    }
}
