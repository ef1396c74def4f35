//! frameinput: per-frame keyboard, mouse, gamepad and touch state.
//!
//! Platform code pushes raw input into explicitly constructed services
//! ([`Keyboard`], [`Mouse`], [`Touch`], [`GamepadManager`]). Once per frame the
//! application takes stable snapshots and derives edges from them, either by
//! hand with the `*StateTracker` types or through the name-based [`Input`]
//! facade.
//!
//! - Button edges are four-state ([`ButtonState`]): `Up`, `Pressed`, `Held`,
//!   `Released`.
//! - Sticks are shaped by a [`DeadZone`] policy.
//! - The mouse switches between absolute positions and accumulated relative
//!   motion; relative motion is cleared by an explicit end of frame.
//! - Gamepads keep their player slot across reconnects.
//!
//! # Logging
//! Uses the [`log`] facade. Hot-plug and mode changes are logged at `debug`,
//! absorbed failures at `warn`. Pick any logger in the host.

pub mod backends;
pub mod button;
pub mod config;
pub mod deadzone;
pub mod error;
pub mod gamepad;
pub mod input;
pub mod keyboard;
pub mod mouse;
pub mod names;
pub mod slots;
pub mod touch;

pub use backends::{DeviceId, GamepadBackend, InputSource};
pub use button::ButtonState;
pub use config::{AxisBinding, InputConfig};
pub use deadzone::{apply_stick_dead_zone, apply_trigger_dead_zone, DeadZone, THUMB_DEAD_ZONE};
pub use error::{BackendError, InputError, Result};
pub use gamepad::{
    GamepadAxis, GamepadButton, GamepadState, GamepadStateTracker, PlayerIndex, Vibration,
};
pub use input::Input;
pub use keyboard::{Key, Keyboard, KeyboardState, KeyboardStateTracker};
pub use mouse::{
    CursorControl, Mouse, MouseAxis, MouseButton, MouseConfig, MouseEvent, MouseMode, MouseState,
    MouseStateTracker, NullCursor, WindowHandle, WHEEL_DELTA,
};
pub use slots::GamepadManager;
pub use touch::{Touch, TouchPhase, TouchPoint, TouchState, STALE_TOUCH_TIMEOUT};
