//! Display sink.
//!
//! The controller pushes dice state to a `Renderer` after every change. A
//! renderer never feeds back into game state; clicks come back in through
//! `GameController::die_clicked`.

use crate::core::{Outcome, DICE_COUNT};

/// User-visible notices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The opponent disconnected; the session is over.
    PeerLost,
    /// Both scorecards are full.
    GameOver(Outcome),
}

/// Passive dice display.
pub trait Renderer {
    fn init_display(&mut self, width: u32, height: u32);

    fn set_dice_values(&mut self, values: [u8; DICE_COUNT]);

    fn set_kept_mask(&mut self, mask: [bool; DICE_COUNT]);

    fn notify(&mut self, _notice: &Notice) {}
}

/// Renderer that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn init_display(&mut self, _width: u32, _height: u32) {}

    fn set_dice_values(&mut self, _values: [u8; DICE_COUNT]) {}

    fn set_kept_mask(&mut self, _mask: [bool; DICE_COUNT]) {}
}

/// Renderer that remembers what it was told. Useful in tests and for
/// headless clients that poll the display state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingRenderer {
    pub size: Option<(u32, u32)>,
    pub values: [u8; DICE_COUNT],
    pub kept: [bool; DICE_COUNT],
    pub notices: Vec<Notice>,
    /// Number of dice updates received.
    pub frames: usize,
}

impl Renderer for RecordingRenderer {
    fn init_display(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn set_dice_values(&mut self, values: [u8; DICE_COUNT]) {
        self.values = values;
        self.frames += 1;
    }

    fn set_kept_mask(&mut self, mask: [bool; DICE_COUNT]) {
        self.kept = mask;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
