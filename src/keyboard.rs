//! Keyboard state.
//!
//! Keys are identified by their virtual-key code ([`Key`]), using the Win32
//! numbering on every platform. Backends for other windowing systems translate
//! their key codes into this space before calling [`Keyboard::key_down`].
//!
//! - [`KeyboardState`] is a 256-bit snapshot with O(1) set/test.
//! - [`Keyboard`] is the shared, thread-safe service that platform code writes into.
//! - [`KeyboardStateTracker`] derives per-frame pressed/released edges.

use crate::button::ButtonState;
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub u8);

#[allow(missing_docs)]
impl Key {
    pub const BACK: Key = Key(0x08);
    pub const TAB: Key = Key(0x09);
    pub const ENTER: Key = Key(0x0D);
    pub const SHIFT: Key = Key(0x10);
    pub const CONTROL: Key = Key(0x11);
    pub const ALT: Key = Key(0x12);
    pub const PAUSE: Key = Key(0x13);
    pub const CAPS_LOCK: Key = Key(0x14);
    pub const ESCAPE: Key = Key(0x1B);
    pub const SPACE: Key = Key(0x20);
    pub const PAGE_UP: Key = Key(0x21);
    pub const PAGE_DOWN: Key = Key(0x22);
    pub const END: Key = Key(0x23);
    pub const HOME: Key = Key(0x24);
    pub const LEFT: Key = Key(0x25);
    pub const UP: Key = Key(0x26);
    pub const RIGHT: Key = Key(0x27);
    pub const DOWN: Key = Key(0x28);
    pub const INSERT: Key = Key(0x2D);
    pub const DELETE: Key = Key(0x2E);
    pub const D0: Key = Key(0x30);
    pub const A: Key = Key(0x41);
    pub const LEFT_WINDOWS: Key = Key(0x5B);
    pub const RIGHT_WINDOWS: Key = Key(0x5C);
    pub const APPS: Key = Key(0x5D);
    pub const NUMPAD0: Key = Key(0x60);
    pub const MULTIPLY: Key = Key(0x6A);
    pub const ADD: Key = Key(0x6B);
    pub const SEPARATOR: Key = Key(0x6C);
    pub const SUBTRACT: Key = Key(0x6D);
    pub const DECIMAL: Key = Key(0x6E);
    pub const DIVIDE: Key = Key(0x6F);
    pub const F1: Key = Key(0x70);
    pub const NUM_LOCK: Key = Key(0x90);
    pub const NUMPAD_EQUAL: Key = Key(0x92);
    pub const LEFT_SHIFT: Key = Key(0xA0);
    pub const RIGHT_SHIFT: Key = Key(0xA1);
    pub const LEFT_CONTROL: Key = Key(0xA2);
    pub const RIGHT_CONTROL: Key = Key(0xA3);
    pub const LEFT_ALT: Key = Key(0xA4);
    pub const RIGHT_ALT: Key = Key(0xA5);
    pub const OEM_SEMICOLON: Key = Key(0xBA);
    pub const OEM_PLUS: Key = Key(0xBB);
    pub const OEM_COMMA: Key = Key(0xBC);
    pub const OEM_MINUS: Key = Key(0xBD);
    pub const OEM_PERIOD: Key = Key(0xBE);
    pub const OEM_QUESTION: Key = Key(0xBF);
    pub const OEM_TILDE: Key = Key(0xC0);
    pub const OEM_OPEN_BRACKETS: Key = Key(0xDB);
    pub const OEM_PIPE: Key = Key(0xDC);
    pub const OEM_CLOSE_BRACKETS: Key = Key(0xDD);
    pub const OEM_QUOTES: Key = Key(0xDE);

    /// Letter key `'a'..='z'` (case-insensitive).
    pub fn letter(c: char) -> Option<Key> {
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase().then(|| Key(c as u8))
    }

    /// Top-row digit `0..=9`.
    pub fn digit(n: u8) -> Option<Key> {
        (n <= 9).then(|| Key(Self::D0.0 + n))
    }

    /// Keypad digit `0..=9`.
    pub fn numpad(n: u8) -> Option<Key> {
        (n <= 9).then(|| Key(Self::NUMPAD0.0 + n))
    }

    /// Function key `F1..=F24`.
    pub fn function(n: u8) -> Option<Key> {
        (1..=24).contains(&n).then(|| Key(Self::F1.0 + n - 1))
    }
}

/// Snapshot of all 256 virtual keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardState {
    bits: [u64; 4],
}

impl KeyboardState {
    #[inline]
    fn slot(key: Key) -> (usize, u64) {
        ((key.0 >> 6) as usize, 1u64 << (key.0 & 0x3F))
    }

    #[inline]
    pub fn is_key_down(&self, key: Key) -> bool {
        let (word, mask) = Self::slot(key);
        self.bits[word] & mask != 0
    }

    #[inline]
    pub fn is_key_up(&self, key: Key) -> bool {
        !self.is_key_down(key)
    }

    /// Mark `key` as held. Code `0xFF` is reserved and ignored.
    #[inline]
    pub fn set(&mut self, key: Key) {
        if key.0 == 0xFF {
            return;
        }
        let (word, mask) = Self::slot(key);
        self.bits[word] |= mask;
    }

    #[inline]
    pub fn clear(&mut self, key: Key) {
        if key.0 == 0xFF {
            return;
        }
        let (word, mask) = Self::slot(key);
        self.bits[word] &= !mask;
    }

    pub fn shift(&self) -> bool {
        self.is_key_down(Key::LEFT_SHIFT) || self.is_key_down(Key::RIGHT_SHIFT)
    }

    pub fn control(&self) -> bool {
        self.is_key_down(Key::LEFT_CONTROL) || self.is_key_down(Key::RIGHT_CONTROL)
    }

    pub fn alt(&self) -> bool {
        self.is_key_down(Key::LEFT_ALT) || self.is_key_down(Key::RIGHT_ALT)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Iterate held keys in ascending code order.
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        (0u8..=0xFE).map(Key).filter(|k| self.is_key_down(*k))
    }

    /// Keys set in `self` but not in `other`.
    fn difference(&self, other: &KeyboardState) -> KeyboardState {
        let mut bits = [0u64; 4];
        for (i, out) in bits.iter_mut().enumerate() {
            *out = self.bits[i] & !other.bits[i];
        }
        KeyboardState { bits }
    }
}

/// Shared keyboard service.
///
/// Platform code calls [`key_down`](Self::key_down)/[`key_up`](Self::key_up) from
/// whatever thread delivers key messages; the frame loop reads a consistent copy via
/// [`get_state`](Self::get_state).
#[derive(Debug, Default)]
pub struct Keyboard {
    state: Mutex<KeyboardState>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_state(&self) -> KeyboardState {
        *self.state.lock()
    }

    pub fn key_down(&self, key: Key) {
        self.state.lock().set(key);
    }

    /// Release `key`.
    ///
    /// Releasing the generic [`Key::SHIFT`] also clears both sided shift keys: when
    /// both shifts were held together, only one release is delivered.
    pub fn key_up(&self, key: Key) {
        let mut state = self.state.lock();
        if key == Key::SHIFT {
            state.clear(Key::LEFT_SHIFT);
            state.clear(Key::RIGHT_SHIFT);
        }
        state.clear(key);
    }

    /// Replace the whole bitset (poll-driven backends).
    pub fn set_state(&self, new_state: KeyboardState) {
        *self.state.lock() = new_state;
    }

    /// Release every key. Called on focus changes.
    pub fn reset(&self) {
        debug!("keyboard state reset");
        *self.state.lock() = KeyboardState::default();
    }

    pub fn is_connected(&self) -> bool {
        true
    }
}

/// Per-frame key edges.
#[derive(Debug, Clone, Default)]
pub struct KeyboardStateTracker {
    /// Keys that went down this frame.
    pub pressed: KeyboardState,
    /// Keys that went up this frame.
    pub released: KeyboardState,
    last_state: KeyboardState,
}

impl KeyboardStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the newest snapshot. Call once per frame before querying.
    pub fn update(&mut self, state: &KeyboardState) {
        self.pressed = state.difference(&self.last_state);
        self.released = self.last_state.difference(state);
        self.last_state = *state;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.is_key_down(key)
    }

    #[inline]
    pub fn is_key_released(&self, key: Key) -> bool {
        self.released.is_key_down(key)
    }

    /// Whether `key` was held in the frame before the last update.
    pub fn was_key_down(&self, key: Key) -> bool {
        let current = self.last_state.is_key_down(key);
        let transitioned = self.pressed.is_key_down(key) || self.released.is_key_down(key);
        current ^ transitioned
    }

    /// Full four-state classification of `key` for this frame.
    pub fn key_state(&self, key: Key) -> ButtonState {
        ButtonState::classify(self.last_state.is_key_down(key), self.was_key_down(key))
    }

    pub fn last_state(&self) -> KeyboardState {
        self.last_state
    }
}
