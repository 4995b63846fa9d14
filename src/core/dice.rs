//! Dice: faces, single dice, and the ordered five-die set.
//!
//! Position within a [`DiceSet`] is irrelevant to scoring but must round-trip,
//! since keep-toggling addresses dice by index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of dice in a roll.
pub const DICE_COUNT: usize = 5;

/// A die face, always in 1..=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    /// The lowest face; every turn starts with all dice showing it.
    pub const ONE: Face = Face(1);

    /// Create a face, rejecting values outside 1..=6.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 6 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a face, clamping into 1..=6.
    #[must_use]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(1, 6))
    }

    /// Get the pip count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Face {
    type Error = InvalidFace;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value).ok_or(InvalidFace(value))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A face value outside 1..=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("die face {0} is outside 1..=6")]
pub struct InvalidFace(pub u8);

/// A single die: its face and whether it is held back from the next roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub face: Face,
    pub kept: bool,
}

impl Default for Die {
    fn default() -> Self {
        Self {
            face: Face::ONE,
            kept: false,
        }
    }
}

/// Five ordered dice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSet {
    dice: [Die; DICE_COUNT],
}

impl DiceSet {
    /// The start-of-turn dice: all ones, none kept.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// Build an unkept set from face values. Values are clamped into 1..=6.
    ///
    /// ```
    /// use yacht_duel::core::DiceSet;
    ///
    /// let dice = DiceSet::from_values([2, 2, 3, 3, 3]);
    /// assert_eq!(dice.sum(), 13);
    /// ```
    #[must_use]
    pub fn from_values(values: [u8; DICE_COUNT]) -> Self {
        Self::from_faces(values.map(Face::clamped))
    }

    /// Build an unkept set from faces.
    #[must_use]
    pub fn from_faces(faces: [Face; DICE_COUNT]) -> Self {
        Self {
            dice: faces.map(|face| Die { face, kept: false }),
        }
    }

    /// Get a die by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Die> {
        self.dice.get(index)
    }

    /// Iterate the dice in order.
    pub fn iter(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter()
    }

    /// Face values in order.
    #[must_use]
    pub fn values(&self) -> [u8; DICE_COUNT] {
        self.dice.map(|d| d.face.value())
    }

    /// Faces in order.
    #[must_use]
    pub fn faces(&self) -> [Face; DICE_COUNT] {
        self.dice.map(|d| d.face)
    }

    /// Kept flags in order.
    #[must_use]
    pub fn kept_mask(&self) -> [bool; DICE_COUNT] {
        self.dice.map(|d| d.kept)
    }

    /// Sum of all five faces.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.dice.iter().map(|d| u32::from(d.face.value())).sum()
    }

    /// Per-face counts, indexed by face value (index 0 unused).
    #[must_use]
    pub fn face_counts(&self) -> [u8; 7] {
        let mut counts = [0u8; 7];
        for die in &self.dice {
            counts[die.face.value() as usize] += 1;
        }
        counts
    }

    /// Replace every face, keeping the kept flags.
    pub fn set_faces(&mut self, faces: [Face; DICE_COUNT]) {
        for (die, face) in self.dice.iter_mut().zip(faces) {
            die.face = face;
        }
    }

    /// Set the kept flag of a die. Returns false if the index is out of range.
    pub fn set_kept(&mut self, index: usize, kept: bool) -> bool {
        match self.dice.get_mut(index) {
            Some(die) => {
                die.kept = kept;
                true
            }
            None => false,
        }
    }

    /// Replace every kept flag.
    pub fn set_kept_mask(&mut self, mask: [bool; DICE_COUNT]) {
        for (die, kept) in self.dice.iter_mut().zip(mask) {
            die.kept = kept;
        }
    }

    /// Mark every die as kept.
    pub fn keep_all(&mut self) {
        self.set_kept_mask([true; DICE_COUNT]);
    }

    /// Re-roll every unkept die with the given face source.
    pub fn roll_unkept(&mut self, mut roll: impl FnMut() -> Face) {
        for die in self.dice.iter_mut().filter(|d| !d.kept) {
            die.face = roll();
        }
    }
}

impl fmt::Display for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, die) in self.dice.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if die.kept {
                write!(f, "({})", die.face)?;
            } else {
                write!(f, "{}", die.face)?;
            }
        }
        write!(f, "]")
    }
}
