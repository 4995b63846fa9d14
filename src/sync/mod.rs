//! Multiplayer synchronization: wire codec, relay transport and the
//! sequence-tracking protocol on top of them.

pub mod codec;
pub mod protocol;
pub mod transport;

pub use codec::{decode, encode, Envelope};
pub use protocol::SyncProtocol;
pub use transport::{ChannelRelay, Lobby, MatchStatus, PeerId, Relay, RelayEvent};
