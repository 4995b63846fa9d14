//! Relay transport.
//!
//! The relay is a dumb pipe: best-effort, unacknowledged, no validation.
//! `ChannelRelay` implements it in-process over unbounded tokio channels and
//! `Lobby` pairs two waiting clients, which is all tests and the demo binary
//! need. A networked relay plugs in behind the same `Relay` trait.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::core::{GameError, Result, Seat};

/// Relay-assigned identity of a client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub String);

impl PeerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of asking the lobby for an opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    WaitingForOpponent,
    MatchFound { peer_id: PeerId, starting: Seat },
}

/// Something the relay delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayEvent {
    /// Paired with a peer. `starting` is relative to the receiver.
    MatchFound { peer_id: PeerId, starting: Seat },
    /// One encoded envelope from the peer.
    Action(Vec<u8>),
    /// The peer is gone. Delivered at most once.
    PeerDisconnected,
}

/// Connection to the relay.
pub trait Relay: Send {
    /// This client's id.
    fn local_id(&self) -> &PeerId;

    /// Fire-and-forget delivery to `peer`.
    fn send_action(&mut self, peer: &PeerId, bytes: Vec<u8>) -> Result<()>;

    /// Next delivered event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<RelayEvent>;
}

/// What actually travels on a client's inbound channel.
#[derive(Debug)]
enum Inbound {
    Matched {
        peer_id: PeerId,
        starting: Seat,
        link: UnboundedSender<Inbound>,
    },
    Action(Vec<u8>),
    Disconnected,
}

/// In-process relay endpoint.
#[derive(Debug)]
pub struct ChannelRelay {
    id: PeerId,
    inbox: UnboundedReceiver<Inbound>,
    /// Handed to the lobby so a peer can reach us.
    inbox_tx: UnboundedSender<Inbound>,
    peer: Option<(PeerId, UnboundedSender<Inbound>)>,
    disconnect_seen: bool,
}

impl ChannelRelay {
    /// Create an unpaired endpoint.
    #[must_use]
    pub fn new(id: PeerId) -> Self {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        Self {
            id,
            inbox,
            inbox_tx,
            peer: None,
            disconnect_seen: false,
        }
    }

    /// Create two endpoints already paired with each other.
    ///
    /// Each side receives its `MatchFound` on the first poll; `a` starts.
    #[must_use]
    pub fn pair(a: PeerId, b: PeerId) -> (Self, Self) {
        let mut lobby = Lobby::new();
        let mut first = Self::new(a);
        let mut second = Self::new(b);
        lobby.find_match(&mut first);
        lobby.find_match(&mut second);
        (first, second)
    }

    /// The paired peer, once matched.
    #[must_use]
    pub fn peer(&self) -> Option<&PeerId> {
        self.peer.as_ref().map(|(id, _)| id)
    }

    /// Leave the session and tell the peer.
    pub fn close(&mut self) {
        if let Some((peer, link)) = self.peer.take() {
            debug!(local = %self.id, %peer, "closing relay link");
            // The peer may already be gone.
            let _ = link.send(Inbound::Disconnected);
        }
    }

    fn link(&mut self, peer_id: PeerId, link: UnboundedSender<Inbound>) {
        self.peer = Some((peer_id, link));
    }
}

impl Drop for ChannelRelay {
    fn drop(&mut self) {
        self.close();
    }
}

impl Relay for ChannelRelay {
    fn local_id(&self) -> &PeerId {
        &self.id
    }

    fn send_action(&mut self, peer: &PeerId, bytes: Vec<u8>) -> Result<()> {
        let Some((paired, link)) = &self.peer else {
            return Err(GameError::Relay(format!("{} is not paired", self.id)));
        };
        if paired != peer {
            return Err(GameError::Relay(format!("{peer} is not the paired peer")));
        }
        link.send(Inbound::Action(bytes))
            .map_err(|_| GameError::Relay(format!("{peer} is unreachable")))
    }

    fn poll_event(&mut self) -> Option<RelayEvent> {
        if self.disconnect_seen {
            return None;
        }
        // `inbox_tx` keeps the channel open, so `Disconnected` never shows
        // up here; a vanished peer is reported by its `Drop` instead.
        match self.inbox.try_recv() {
            Ok(Inbound::Matched {
                peer_id,
                starting,
                link,
            }) => {
                self.link(peer_id.clone(), link);
                Some(RelayEvent::MatchFound { peer_id, starting })
            }
            Ok(Inbound::Action(bytes)) => Some(RelayEvent::Action(bytes)),
            Ok(Inbound::Disconnected) => {
                self.disconnect_seen = true;
                self.peer = None;
                Some(RelayEvent::PeerDisconnected)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// In-process matchmaking: pairs clients two at a time.
///
/// The client that waited takes the first turn.
#[derive(Debug, Default)]
pub struct Lobby {
    waiting: Option<(PeerId, UnboundedSender<Inbound>)>,
}

impl Lobby {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `relay` for a match, or pair it with the waiting client.
    ///
    /// Both sides learn of the pairing through `RelayEvent::MatchFound`.
    pub fn find_match(&mut self, relay: &mut ChannelRelay) -> MatchStatus {
        // A waiting client whose endpoint was dropped cannot be matched.
        if self.waiting.as_ref().is_some_and(|(_, tx)| tx.is_closed()) {
            self.waiting = None;
        }

        let Some((waiting_id, waiting_tx)) = self.waiting.take() else {
            debug!(client = %relay.id, "waiting for opponent");
            self.waiting = Some((relay.id.clone(), relay.inbox_tx.clone()));
            return MatchStatus::WaitingForOpponent;
        };

        info!(first = %waiting_id, second = %relay.id, "match found");
        let _ = waiting_tx.send(Inbound::Matched {
            peer_id: relay.id.clone(),
            starting: Seat::Me,
            link: relay.inbox_tx.clone(),
        });
        let _ = relay.inbox_tx.send(Inbound::Matched {
            peer_id: waiting_id.clone(),
            starting: Seat::Opponent,
            link: waiting_tx,
        });
        MatchStatus::MatchFound {
            peer_id: waiting_id,
            starting: Seat::Opponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(relay: &mut ChannelRelay) -> (PeerId, Seat) {
        match relay.poll_event() {
            Some(RelayEvent::MatchFound { peer_id, starting }) => (peer_id, starting),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_lobby_pairs_two_clients() {
        let mut lobby = Lobby::new();
        let mut alice = ChannelRelay::new(PeerId::new("alice"));
        let mut bob = ChannelRelay::new(PeerId::new("bob"));

        assert_eq!(lobby.find_match(&mut alice), MatchStatus::WaitingForOpponent);
        assert_eq!(
            lobby.find_match(&mut bob),
            MatchStatus::MatchFound {
                peer_id: PeerId::new("alice"),
                starting: Seat::Opponent
            }
        );

        assert_eq!(matched(&mut alice), (PeerId::new("bob"), Seat::Me));
        assert_eq!(matched(&mut bob), (PeerId::new("alice"), Seat::Opponent));

        // The pair left the lobby; the next client waits.
        let mut carol = ChannelRelay::new(PeerId::new("carol"));
        assert_eq!(lobby.find_match(&mut carol), MatchStatus::WaitingForOpponent);
    }

    #[test]
    fn test_actions_flow_both_ways() {
        let (mut a, mut b) = ChannelRelay::pair(PeerId::new("a"), PeerId::new("b"));
        matched(&mut a);
        matched(&mut b);

        a.send_action(&PeerId::new("b"), vec![1, 2, 3]).unwrap();
        b.send_action(&PeerId::new("a"), vec![9]).unwrap();

        assert_eq!(b.poll_event(), Some(RelayEvent::Action(vec![1, 2, 3])));
        assert_eq!(a.poll_event(), Some(RelayEvent::Action(vec![9])));
        assert_eq!(a.poll_event(), None);
    }

    #[test]
    fn test_send_requires_pairing() {
        let mut lone = ChannelRelay::new(PeerId::new("lone"));
        assert!(matches!(
            lone.send_action(&PeerId::new("x"), vec![]),
            Err(GameError::Relay(_))
        ));

        let (mut a, mut b) = ChannelRelay::pair(PeerId::new("a"), PeerId::new("b"));
        matched(&mut a);
        matched(&mut b);
        assert!(a.send_action(&PeerId::new("c"), vec![]).is_err());
    }

    #[test]
    fn test_drop_reports_disconnect_once() {
        let (mut a, mut b) = ChannelRelay::pair(PeerId::new("a"), PeerId::new("b"));
        matched(&mut a);
        matched(&mut b);

        drop(b);
        assert_eq!(a.poll_event(), Some(RelayEvent::PeerDisconnected));
        assert_eq!(a.poll_event(), None);
        assert!(a.peer().is_none());
        assert!(matches!(
            a.send_action(&PeerId::new("b"), vec![]),
            Err(GameError::Relay(_))
        ));
    }

    #[test]
    fn test_dropped_waiting_client_is_skipped() {
        let mut lobby = Lobby::new();
        let mut ghost = ChannelRelay::new(PeerId::new("ghost"));
        lobby.find_match(&mut ghost);
        drop(ghost);

        let mut late = ChannelRelay::new(PeerId::new("late"));
        assert_eq!(lobby.find_match(&mut late), MatchStatus::WaitingForOpponent);
    }
}
