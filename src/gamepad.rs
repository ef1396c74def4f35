//! Gamepad snapshots and per-frame button tracking.
//!
//! # Conventions
//! - Sticks are in `[-1.0, 1.0]`, +Y is up.
//! - Triggers are in `[0.0, 1.0]`.
//! - Face buttons use Xbox names as canonical fields. PlayStation and newer Xbox
//!   names are aliases exposed as methods ([`Buttons::cross`], [`Buttons::view`], ...),
//!   never as separate storage.
//! - `packet` changes whenever the hardware reading changes. It is passed through
//!   from the backend untouched; nothing here deduplicates reads.
//!
//! A disconnected or unknown controller is represented by
//! [`GamepadState::default()`] (`connected == false`, everything zero).

use crate::button::ButtonState;
use crate::deadzone::{apply_stick_dead_zone, apply_trigger_dead_zone, DeadZone};
use serde::{Deserialize, Serialize};

/// Threshold used by the stick-direction and trigger predicates.
pub const DIGITAL_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buttons {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub left_stick: bool,
    pub right_stick: bool,
    pub left_shoulder: bool,
    pub right_shoulder: bool,
    pub back: bool,
    pub start: bool,
}

impl Buttons {
    #[inline]
    pub fn cross(&self) -> bool {
        self.a
    }
    #[inline]
    pub fn circle(&self) -> bool {
        self.b
    }
    #[inline]
    pub fn square(&self) -> bool {
        self.x
    }
    #[inline]
    pub fn triangle(&self) -> bool {
        self.y
    }
    #[inline]
    pub fn view(&self) -> bool {
        self.back
    }
    #[inline]
    pub fn menu(&self) -> bool {
        self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DPad {
    pub up: bool,
    pub down: bool,
    pub right: bool,
    pub left: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThumbSticks {
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triggers {
    pub left: f32,
    pub right: f32,
}

/// Unshaped reading delivered by a [`GamepadBackend`](crate::backends::GamepadBackend).
///
/// Sticks are normalized but not yet deadzoned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawGamepadReading {
    pub packet: u64,
    pub buttons: Buttons,
    pub dpad: DPad,
    pub thumb_sticks: ThumbSticks,
    pub triggers: Triggers,
}

/// Snapshot of one controller for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GamepadState {
    pub connected: bool,
    pub packet: u64,
    pub buttons: Buttons,
    pub dpad: DPad,
    pub thumb_sticks: ThumbSticks,
    pub triggers: Triggers,
}

impl GamepadState {
    /// Build a connected snapshot from a raw reading, shaping both sticks.
    pub fn from_reading(
        reading: &RawGamepadReading,
        dead_zone_mode: DeadZone,
        thumb_dead_zone: f32,
        trigger_dead_zone: f32,
    ) -> Self {
        let raw = &reading.thumb_sticks;
        let (left_x, left_y) =
            apply_stick_dead_zone(raw.left_x, raw.left_y, dead_zone_mode, 1.0, thumb_dead_zone);
        let (right_x, right_y) =
            apply_stick_dead_zone(raw.right_x, raw.right_y, dead_zone_mode, 1.0, thumb_dead_zone);

        Self {
            connected: true,
            packet: reading.packet,
            buttons: reading.buttons,
            dpad: reading.dpad,
            thumb_sticks: ThumbSticks {
                left_x,
                left_y,
                right_x,
                right_y,
            },
            triggers: Triggers {
                left: apply_trigger_dead_zone(reading.triggers.left, trigger_dead_zone),
                right: apply_trigger_dead_zone(reading.triggers.right, trigger_dead_zone),
            },
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_left_thumb_stick_up(&self) -> bool {
        self.thumb_sticks.left_y > DIGITAL_THRESHOLD
    }
    pub fn is_left_thumb_stick_down(&self) -> bool {
        self.thumb_sticks.left_y < -DIGITAL_THRESHOLD
    }
    pub fn is_left_thumb_stick_left(&self) -> bool {
        self.thumb_sticks.left_x < -DIGITAL_THRESHOLD
    }
    pub fn is_left_thumb_stick_right(&self) -> bool {
        self.thumb_sticks.left_x > DIGITAL_THRESHOLD
    }
    pub fn is_right_thumb_stick_up(&self) -> bool {
        self.thumb_sticks.right_y > DIGITAL_THRESHOLD
    }
    pub fn is_right_thumb_stick_down(&self) -> bool {
        self.thumb_sticks.right_y < -DIGITAL_THRESHOLD
    }
    pub fn is_right_thumb_stick_left(&self) -> bool {
        self.thumb_sticks.right_x < -DIGITAL_THRESHOLD
    }
    pub fn is_right_thumb_stick_right(&self) -> bool {
        self.thumb_sticks.right_x > DIGITAL_THRESHOLD
    }
    pub fn is_left_trigger_pressed(&self) -> bool {
        self.triggers.left > DIGITAL_THRESHOLD
    }
    pub fn is_right_trigger_pressed(&self) -> bool {
        self.triggers.right > DIGITAL_THRESHOLD
    }

    /// Digital view of any boolean-classifiable control.
    pub fn is_down(&self, button: GamepadButton) -> bool {
        use GamepadButton as G;
        let b = &self.buttons;
        match button {
            G::A => b.a,
            G::B => b.b,
            G::X => b.x,
            G::Y => b.y,
            G::LeftStick => b.left_stick,
            G::RightStick => b.right_stick,
            G::LeftShoulder => b.left_shoulder,
            G::RightShoulder => b.right_shoulder,
            G::Back => b.back,
            G::Start => b.start,
            G::DPadUp => self.dpad.up,
            G::DPadDown => self.dpad.down,
            G::DPadLeft => self.dpad.left,
            G::DPadRight => self.dpad.right,
            G::LeftStickUp => self.is_left_thumb_stick_up(),
            G::LeftStickDown => self.is_left_thumb_stick_down(),
            G::LeftStickLeft => self.is_left_thumb_stick_left(),
            G::LeftStickRight => self.is_left_thumb_stick_right(),
            G::RightStickUp => self.is_right_thumb_stick_up(),
            G::RightStickDown => self.is_right_thumb_stick_down(),
            G::RightStickLeft => self.is_right_thumb_stick_left(),
            G::RightStickRight => self.is_right_thumb_stick_right(),
            G::LeftTrigger => self.is_left_trigger_pressed(),
            G::RightTrigger => self.is_right_trigger_pressed(),
        }
    }

    /// Analog value of `axis`.
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        match axis {
            GamepadAxis::LeftX => self.thumb_sticks.left_x,
            GamepadAxis::LeftY => self.thumb_sticks.left_y,
            GamepadAxis::RightX => self.thumb_sticks.right_x,
            GamepadAxis::RightY => self.thumb_sticks.right_y,
            GamepadAxis::LeftTrigger => self.triggers.left,
            GamepadAxis::RightTrigger => self.triggers.right,
        }
    }
}

/// Every gamepad control that can be classified as a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    Back,
    Start,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftStickUp,
    LeftStickDown,
    LeftStickLeft,
    LeftStickRight,
    RightStickUp,
    RightStickDown,
    RightStickLeft,
    RightStickRight,
    LeftTrigger,
    RightTrigger,
}

impl GamepadButton {
    pub const COUNT: usize = 24;

    pub const ALL: [GamepadButton; Self::COUNT] = [
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::LeftStick,
        GamepadButton::RightStick,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::Back,
        GamepadButton::Start,
        GamepadButton::DPadUp,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
        GamepadButton::DPadRight,
        GamepadButton::LeftStickUp,
        GamepadButton::LeftStickDown,
        GamepadButton::LeftStickLeft,
        GamepadButton::LeftStickRight,
        GamepadButton::RightStickUp,
        GamepadButton::RightStickDown,
        GamepadButton::RightStickLeft,
        GamepadButton::RightStickRight,
        GamepadButton::LeftTrigger,
        GamepadButton::RightTrigger,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Analog gamepad channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// Slot selector for gamepad queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerIndex {
    Slot(usize),
    /// Whichever slot most recently transitioned to connected.
    #[default]
    MostRecent,
}

impl From<usize> for PlayerIndex {
    fn from(slot: usize) -> Self {
        PlayerIndex::Slot(slot)
    }
}

/// Rumble request. Each motor is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vibration {
    pub left_motor: f32,
    pub right_motor: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl Vibration {
    pub const OFF: Vibration = Vibration {
        left_motor: 0.0,
        right_motor: 0.0,
        left_trigger: 0.0,
        right_trigger: 0.0,
    };

    pub fn new(left_motor: f32, right_motor: f32, left_trigger: f32, right_trigger: f32) -> Self {
        Self {
            left_motor,
            right_motor,
            left_trigger,
            right_trigger,
        }
    }

    /// Same request with every motor clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            left_motor: c(self.left_motor),
            right_motor: c(self.right_motor),
            left_trigger: c(self.left_trigger),
            right_trigger: c(self.right_trigger),
        }
    }

    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

/// Per-frame edges for every [`GamepadButton`].
#[derive(Debug, Clone, Default)]
pub struct GamepadStateTracker {
    states: [ButtonState; GamepadButton::COUNT],
    last_state: GamepadState,
}

impl GamepadStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the newest snapshot. Call once per frame before querying.
    ///
    /// When the controller disconnects, the baseline is dropped so a reconnect
    /// starts from "all up".
    pub fn update(&mut self, state: &GamepadState) {
        for button in GamepadButton::ALL {
            self.states[button.index()] =
                ButtonState::classify(state.is_down(button), self.last_state.is_down(button));
        }
        self.last_state = if state.connected {
            *state
        } else {
            GamepadState::default()
        };
    }

    #[inline]
    pub fn get(&self, button: GamepadButton) -> ButtonState {
        self.states[button.index()]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_state(&self) -> GamepadState {
        self.last_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadzone::THUMB_DEAD_ZONE;

    fn reading_with(f: impl FnOnce(&mut RawGamepadReading)) -> RawGamepadReading {
        let mut r = RawGamepadReading::default();
        f(&mut r);
        r
    }

    #[test]
    fn default_is_disconnected_and_zeroed() {
        let s = GamepadState::default();
        assert!(!s.connected);
        assert_eq!(s.packet, 0);
        assert_eq!(s.buttons, Buttons::default());
        assert_eq!(s.thumb_sticks, ThumbSticks::default());
        assert_eq!(s.triggers, Triggers::default());
    }

    #[test]
    fn aliases_read_canonical_fields() {
        let b = Buttons {
            a: true,
            back: true,
            ..Buttons::default()
        };
        assert!(b.cross());
        assert!(b.view());
        assert!(!b.menu());
        assert!(!b.triangle());
    }

    #[test]
    fn from_reading_applies_dead_zone() {
        let r = reading_with(|r| {
            r.packet = 42;
            r.thumb_sticks.left_x = 0.1;
            r.thumb_sticks.right_y = 1.0;
            r.triggers.left = 0.75;
        });
        let s = GamepadState::from_reading(&r, DeadZone::IndependentAxis, THUMB_DEAD_ZONE, 0.0);
        assert!(s.connected);
        assert_eq!(s.packet, 42);
        assert_eq!(s.thumb_sticks.left_x, 0.0);
        assert!((s.thumb_sticks.right_y - 1.0).abs() < 1e-5);
        assert_eq!(s.triggers.left, 0.75);

        let s = GamepadState::from_reading(&r, DeadZone::None, THUMB_DEAD_ZONE, 0.0);
        assert_eq!(s.thumb_sticks.left_x, 0.1);
    }

    #[test]
    fn stick_and_trigger_predicates() {
        let s = GamepadState {
            thumb_sticks: ThumbSticks {
                left_x: -0.6,
                left_y: 0.7,
                right_x: 0.2,
                right_y: -0.9,
            },
            triggers: Triggers { left: 0.6, right: 0.5 },
            ..GamepadState::default()
        };
        assert!(s.is_left_thumb_stick_left());
        assert!(s.is_left_thumb_stick_up());
        assert!(!s.is_right_thumb_stick_right());
        assert!(s.is_right_thumb_stick_down());
        assert!(s.is_left_trigger_pressed());
        assert!(!s.is_right_trigger_pressed());
    }

    #[test]
    fn vibration_clamps() {
        let v = Vibration::new(1.5, -0.2, f32::NAN, 0.5).clamped();
        assert_eq!(v, Vibration::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn tracker_classifies_dpad_and_buttons() {
        let mut tracker = GamepadStateTracker::new();
        let mut s = GamepadState {
            connected: true,
            ..GamepadState::default()
        };
        s.buttons.a = true;
        s.dpad.left = true;

        tracker.update(&s);
        assert_eq!(tracker.get(GamepadButton::A), ButtonState::Pressed);
        assert_eq!(tracker.get(GamepadButton::DPadLeft), ButtonState::Pressed);
        assert_eq!(tracker.get(GamepadButton::B), ButtonState::Up);

        s.dpad.left = false;
        tracker.update(&s);
        assert_eq!(tracker.get(GamepadButton::A), ButtonState::Held);
        assert_eq!(tracker.get(GamepadButton::DPadLeft), ButtonState::Released);
    }

    #[test]
    fn tracker_drops_baseline_on_disconnect() {
        let mut tracker = GamepadStateTracker::new();
        let mut s = GamepadState {
            connected: true,
            ..GamepadState::default()
        };
        s.buttons.start = true;
        tracker.update(&s);
        tracker.update(&GamepadState::default());
        assert_eq!(tracker.get(GamepadButton::Start), ButtonState::Released);

        tracker.update(&s);
        assert_eq!(tracker.get(GamepadButton::Start), ButtonState::Pressed);
    }

    #[test]
    fn button_table_is_complete() {
        for (i, b) in GamepadButton::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }
}
