//! Input backends for `frameinput`.
//!
//! Platform bindings are producers of raw samples. They plug into the services
//! through three contracts:
//!
//! - [`GamepadBackend`]: slot-agnostic controller enumeration, reads and rumble.
//!   Owned by [`GamepadManager`](crate::slots::GamepadManager).
//! - [`CursorControl`](crate::mouse::CursorControl): cursor visibility, clipping and
//!   warping. Owned by [`Mouse`](crate::mouse::Mouse).
//! - [`InputSource`]: poll-driven keyboard/mouse/touch producers pumped once per
//!   frame by [`Input::update`](crate::input::Input::update).
//!
//! Event-driven hosts skip `InputSource` and call the service entry points
//! (`Keyboard::key_down`, `Mouse::process`, `Touch::touch_began`, ...) directly
//! from their message loop.
//!
//! # Feature flags
//! - **`win32`**: enables the Windows Raw Input / XInput backend (default).

use crate::error::BackendError;
use crate::gamepad::{RawGamepadReading, Vibration};
use crate::keyboard::Keyboard;
use crate::mouse::Mouse;
use crate::touch::Touch;
use std::fmt;

pub mod virtual_input;

#[cfg(all(feature = "win32", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "win32", target_os = "windows"))))]
pub mod windows;

/// Stable identity of a physical controller as reported by its backend.
///
/// Backends must hand out the same id for the same device across reconnects;
/// slot reuse depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        DeviceId(s.to_string())
    }
}

/// Controller access for one platform API.
pub trait GamepadBackend: Send {
    /// Number of player slots this platform supports.
    fn max_players(&self) -> usize;

    /// Devices currently attached, in the platform's preferred order.
    fn enumerate(&mut self) -> Vec<DeviceId>;

    /// Latest reading for `id`.
    ///
    /// `Ok(None)` means the device is gone. Transient errors let the caller fall
    /// back to the previous reading.
    fn read(&mut self, id: &DeviceId) -> Result<Option<RawGamepadReading>, BackendError>;

    /// Apply a rumble request. Values are already clamped to `[0, 1]`.
    fn set_vibration(&mut self, id: &DeviceId, vibration: Vibration) -> bool;

    fn supports_vibration(&self) -> bool {
        true
    }
}

/// Poll-driven producer of keyboard, mouse and touch input.
pub trait InputSource: Send {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Push everything observed since the last call into the services.
    fn pump(&mut self, keyboard: &Keyboard, mouse: &Mouse, touch: &Touch) -> Result<(), BackendError>;
}

impl<B: GamepadBackend + ?Sized> GamepadBackend for Box<B> {
    fn max_players(&self) -> usize {
        (**self).max_players()
    }
    fn enumerate(&mut self) -> Vec<DeviceId> {
        (**self).enumerate()
    }
    fn read(&mut self, id: &DeviceId) -> Result<Option<RawGamepadReading>, BackendError> {
        (**self).read(id)
    }
    fn set_vibration(&mut self, id: &DeviceId, vibration: Vibration) -> bool {
        (**self).set_vibration(id, vibration)
    }
    fn supports_vibration(&self) -> bool {
        (**self).supports_vibration()
    }
}
