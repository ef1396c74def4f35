//! Edge-state classification for boolean controls.
//!
//! Every tracker in this crate reduces "is it held now?" and "was it held last
//! frame?" to one of four states:
//!
//! | previous | current | state      |
//! |----------|---------|------------|
//! | up       | up      | `Up`       |
//! | down     | down    | `Held`     |
//! | down     | up      | `Released` |
//! | up       | down    | `Pressed`  |
//!
//! `Pressed` and `Released` only last for the frame in which the transition was
//! observed; `Up` and `Held` persist.

use serde::{Deserialize, Serialize};

/// Per-frame state of a single button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ButtonState {
    #[default]
    Up = 0b00,
    Held = 0b01,
    Released = 0b10,
    Pressed = 0b11,
}

impl ButtonState {
    /// bit0 = current, bit1 = current XOR previous.
    #[inline]
    pub fn classify(current: bool, previous: bool) -> Self {
        match (current as u8) | (((current ^ previous) as u8) << 1) {
            0b00 => ButtonState::Up,
            0b01 => ButtonState::Held,
            0b10 => ButtonState::Released,
            _ => ButtonState::Pressed,
        }
    }

    /// Down this frame (`Held` or `Pressed`).
    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Held | ButtonState::Pressed)
    }

    /// Down in the previous frame (`Held` or `Released`).
    #[inline]
    pub fn was_down(self) -> bool {
        matches!(self, ButtonState::Held | ButtonState::Released)
    }

    #[inline]
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }

    #[inline]
    pub fn is_released(self) -> bool {
        self == ButtonState::Released
    }
}
