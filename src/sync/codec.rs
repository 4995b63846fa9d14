//! Envelope wire encoding.
//!
//! JSON keeps the `{type, payload}` action shape peers expect:
//!
//! ```text
//! {"seq":4,"action":{"type":"keep","payload":{"index":2,"kept":true}}}
//! ```
//!
//! The binary format is bincode over a compact, externally tagged mirror of
//! `Action`; bincode cannot decode adjacently tagged enums.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Category, Face, Result, WireFormat, DICE_COUNT};

/// One action on the wire, numbered per sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender-local sequence number, starting at 1.
    pub seq: u64,
    pub action: Action,
}

impl Envelope {
    #[must_use]
    pub fn new(seq: u64, action: Action) -> Self {
        Self { seq, action }
    }
}

#[derive(Serialize, Deserialize)]
struct CompactEnvelope {
    seq: u64,
    action: CompactAction,
}

#[derive(Serialize, Deserialize)]
enum CompactAction {
    Roll([Face; DICE_COUNT]),
    Keep(u8, bool),
    Score(Category, u32),
}

impl From<&Envelope> for CompactEnvelope {
    fn from(envelope: &Envelope) -> Self {
        let action = match envelope.action {
            Action::Roll { dice } => CompactAction::Roll(dice),
            // Out-of-range indices saturate; the receiver drops them anyway.
            Action::Keep { index, kept } => {
                CompactAction::Keep(u8::try_from(index).unwrap_or(u8::MAX), kept)
            }
            Action::Score { category, score } => CompactAction::Score(category, score),
        };
        Self {
            seq: envelope.seq,
            action,
        }
    }
}

impl From<CompactEnvelope> for Envelope {
    fn from(compact: CompactEnvelope) -> Self {
        let action = match compact.action {
            CompactAction::Roll(dice) => Action::Roll { dice },
            CompactAction::Keep(index, kept) => Action::Keep {
                index: usize::from(index),
                kept,
            },
            CompactAction::Score(category, score) => Action::Score { category, score },
        };
        Self {
            seq: compact.seq,
            action,
        }
    }
}

/// Encode an envelope in the given format.
pub fn encode(envelope: &Envelope, format: WireFormat) -> Result<Vec<u8>> {
    match format {
        WireFormat::Json => Ok(serde_json::to_vec(envelope)?),
        WireFormat::Binary => Ok(bincode::serialize(&CompactEnvelope::from(envelope))?),
    }
}

/// Decode an envelope in the given format.
pub fn decode(bytes: &[u8], format: WireFormat) -> Result<Envelope> {
    match format {
        WireFormat::Json => Ok(serde_json::from_slice(bytes)?),
        WireFormat::Binary => {
            let compact: CompactEnvelope = bincode::deserialize(bytes)?;
            Ok(compact.into())
        }
    }
}
