//! Peer synchronization over a relay.
//!
//! ## Outbound
//!
//! Every local action is wrapped in an `Envelope` with the next sequence
//! number, encoded, and sent to the paired peer.
//!
//! ## Inbound
//!
//! Envelopes are decoded and their sequence numbers tracked. A gap or a
//! regression is counted as a desync and logged; the action is still handed
//! on in arrival order. There is no recovery: the peer is trusted.

use tracing::{debug, warn};

use crate::core::{Action, GameError, Result, WireFormat};

use super::codec::{self, Envelope};
use super::transport::{PeerId, Relay, RelayEvent};

/// Sends local actions and receives the peer's.
pub struct SyncProtocol {
    relay: Box<dyn Relay>,
    format: WireFormat,
    peer: Option<PeerId>,
    next_seq: u64,
    last_inbound: Option<u64>,
    desyncs: u32,
    peer_lost: bool,
}

impl std::fmt::Debug for SyncProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncProtocol")
            .field("local", self.relay.local_id())
            .field("peer", &self.peer)
            .field("format", &self.format)
            .field("next_seq", &self.next_seq)
            .field("desyncs", &self.desyncs)
            .finish_non_exhaustive()
    }
}

impl SyncProtocol {
    /// Wrap a relay connection.
    #[must_use]
    pub fn new(relay: impl Relay + 'static, format: WireFormat) -> Self {
        Self {
            relay: Box::new(relay),
            format,
            peer: None,
            next_seq: 1,
            last_inbound: None,
            desyncs: 0,
            peer_lost: false,
        }
    }

    /// The paired peer, once matched.
    #[must_use]
    pub fn peer(&self) -> Option<&PeerId> {
        self.peer.as_ref()
    }

    /// Record the pairing announced by the relay.
    pub fn set_peer(&mut self, peer: PeerId) {
        debug!(local = %self.relay.local_id(), %peer, "paired");
        self.peer = Some(peer);
    }

    /// Number of inbound sequence anomalies seen so far.
    #[must_use]
    pub fn desync_count(&self) -> u32 {
        self.desyncs
    }

    /// Send a local action to the peer.
    pub fn publish(&mut self, action: &Action) -> Result<()> {
        if self.peer_lost {
            return Err(GameError::PeerLost);
        }
        let peer = self.peer.as_ref().ok_or(GameError::NoMatch)?;

        let envelope = Envelope::new(self.next_seq, action.clone());
        let bytes = codec::encode(&envelope, self.format)?;
        self.next_seq += 1;

        debug!(seq = envelope.seq, action = action.name(), %peer, "publishing");
        self.relay.send_action(peer, bytes)
    }

    /// Decode an inbound envelope and track its sequence number.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<Action> {
        let envelope = codec::decode(bytes, self.format)?;
        let expected = self.last_inbound.map_or(1, |last| last + 1);

        if envelope.seq != expected {
            self.desyncs += 1;
            warn!(
                expected,
                got = envelope.seq,
                desyncs = self.desyncs,
                "peer sequence mismatch; applying in arrival order"
            );
        }
        self.last_inbound = Some(
            self.last_inbound
                .map_or(envelope.seq, |last| last.max(envelope.seq)),
        );
        Ok(envelope.action)
    }

    /// Next event from the relay, if any.
    pub fn poll(&mut self) -> Option<RelayEvent> {
        self.relay.poll_event()
    }

    /// Mark the peer as gone. Returns false if it already was.
    pub fn mark_peer_lost(&mut self) -> bool {
        !std::mem::replace(&mut self.peer_lost, true)
    }
}
