//! In-memory backends.
//!
//! Every type here is a cheap `Clone` handle around shared state: hand one clone
//! to the service that owns the backend and keep another to script input or
//! inspect what the service did. Used by the test suite and by headless hosts
//! (replays, servers, bots).

use crate::backends::{DeviceId, GamepadBackend, InputSource};
use crate::error::BackendError;
use crate::gamepad::{RawGamepadReading, Vibration};
use crate::keyboard::{Key, Keyboard, KeyboardState};
use crate::mouse::{CursorControl, Mouse, MouseEvent, WindowHandle};
use crate::touch::Touch;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Screen offset applied by [`VirtualCursor::client_to_screen`].
pub const VIRTUAL_CLIENT_ORIGIN: (f32, f32) = (100.0, 200.0);

/// A side effect requested through [`CursorControl`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorCall {
    SetVisible(bool),
    Confine(WindowHandle),
    Release,
    SetPosition(f32, f32),
}

#[derive(Debug)]
struct CursorLog {
    visible: bool,
    calls: Vec<CursorCall>,
}

/// Cursor that records every request instead of touching the OS.
///
/// Every window's client area is placed at [`VIRTUAL_CLIENT_ORIGIN`] on screen.
#[derive(Debug, Clone)]
pub struct VirtualCursor {
    log: Arc<Mutex<CursorLog>>,
}

impl Default for VirtualCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualCursor {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(CursorLog {
                visible: true,
                calls: Vec::new(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<CursorCall> {
        self.log.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().calls.clear();
    }
}

impl CursorControl for VirtualCursor {
    fn set_visible(&mut self, visible: bool) {
        let mut log = self.log.lock();
        log.visible = visible;
        log.calls.push(CursorCall::SetVisible(visible));
    }

    fn is_visible(&self) -> bool {
        self.log.lock().visible
    }

    fn confine(&mut self, window: WindowHandle) {
        self.log.lock().calls.push(CursorCall::Confine(window));
    }

    fn release(&mut self) {
        self.log.lock().calls.push(CursorCall::Release);
    }

    fn client_to_screen(&self, _window: WindowHandle, x: f32, y: f32) -> Option<(f32, f32)> {
        Some((x + VIRTUAL_CLIENT_ORIGIN.0, y + VIRTUAL_CLIENT_ORIGIN.1))
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.log.lock().calls.push(CursorCall::SetPosition(x, y));
    }
}

#[derive(Debug)]
struct PadsInner {
    max_players: usize,
    rumble: bool,
    attached: Vec<DeviceId>,
    readings: HashMap<DeviceId, RawGamepadReading>,
    failures: HashMap<DeviceId, BackendError>,
    vibrations: Vec<(DeviceId, Vibration)>,
}

/// Scriptable [`GamepadBackend`].
///
/// Readings are whatever was last set; [`VirtualGamepads::update`] bumps the
/// packet id the way real hardware does when state changes.
#[derive(Debug, Clone)]
pub struct VirtualGamepads {
    inner: Arc<Mutex<PadsInner>>,
}

impl VirtualGamepads {
    pub fn new(max_players: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PadsInner {
                max_players,
                rumble: true,
                attached: Vec::new(),
                readings: HashMap::new(),
                failures: HashMap::new(),
                vibrations: Vec::new(),
            })),
        }
    }

    /// Report `supports_vibration() == false`.
    pub fn without_vibration(self) -> Self {
        self.inner.lock().rumble = false;
        self
    }

    /// Attach a controller. Its reading starts neutral.
    pub fn plug(&self, id: DeviceId) {
        let mut inner = self.inner.lock();
        if !inner.attached.contains(&id) {
            inner.readings.insert(id.clone(), RawGamepadReading::default());
            inner.attached.push(id);
        }
    }

    pub fn unplug(&self, id: &DeviceId) {
        let mut inner = self.inner.lock();
        inner.attached.retain(|d| d != id);
        inner.readings.remove(id);
    }

    /// Replace the reading verbatim, packet id included.
    pub fn set_reading(&self, id: &DeviceId, reading: RawGamepadReading) {
        let mut inner = self.inner.lock();
        if let Some(slot) = inner.readings.get_mut(id) {
            *slot = reading;
        }
    }

    /// Edit the reading in place and advance its packet id.
    pub fn update(&self, id: &DeviceId, f: impl FnOnce(&mut RawGamepadReading)) {
        let mut inner = self.inner.lock();
        if let Some(reading) = inner.readings.get_mut(id) {
            f(reading);
            reading.packet = reading.packet.wrapping_add(1);
        }
    }

    /// Make the next `read` of `id` fail with `err`.
    pub fn fail_next_read(&self, id: &DeviceId, err: BackendError) {
        self.inner.lock().failures.insert(id.clone(), err);
    }

    /// Every rumble request received, oldest first.
    pub fn vibrations(&self) -> Vec<(DeviceId, Vibration)> {
        self.inner.lock().vibrations.clone()
    }

    pub fn last_vibration(&self, id: &DeviceId) -> Option<Vibration> {
        self.inner
            .lock()
            .vibrations
            .iter()
            .rev()
            .find(|(d, _)| d == id)
            .map(|(_, v)| *v)
    }
}

impl GamepadBackend for VirtualGamepads {
    fn max_players(&self) -> usize {
        self.inner.lock().max_players
    }

    fn enumerate(&mut self) -> Vec<DeviceId> {
        self.inner.lock().attached.clone()
    }

    fn read(&mut self, id: &DeviceId) -> Result<Option<RawGamepadReading>, BackendError> {
        let mut inner = self.inner.lock();
        if let Some(err) = inner.failures.remove(id) {
            if !err.is_transient() {
                inner.attached.retain(|d| d != id);
                inner.readings.remove(id);
            }
            return Err(err);
        }
        Ok(inner.readings.get(id).copied())
    }

    fn set_vibration(&mut self, id: &DeviceId, vibration: Vibration) -> bool {
        let mut inner = self.inner.lock();
        if !inner.rumble || !inner.attached.contains(id) {
            return false;
        }
        inner.vibrations.push((id.clone(), vibration));
        true
    }

    fn supports_vibration(&self) -> bool {
        self.inner.lock().rumble
    }
}

/// One scripted input action.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Poll-style full keyboard sample.
    Keyboard(KeyboardState),
    Mouse(MouseEvent),
    TouchBegan { id: u64, x: f32, y: f32 },
    TouchMoved { id: u64, x: f32, y: f32 },
    TouchEnded { id: u64, x: f32, y: f32 },
    /// Stop applying this frame and report `pump` failure.
    Fail(BackendError),
}

/// Frame-by-frame [`InputSource`]. Each `pump` applies exactly one queued frame;
/// with nothing queued it is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: Arc<Mutex<VecDeque<Vec<ScriptedEvent>>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&self, events: impl IntoIterator<Item = ScriptedEvent>) {
        self.frames.lock().push_back(events.into_iter().collect());
    }

    /// Queue `count` frames that each sample `state`.
    pub fn hold_keyboard(&self, state: KeyboardState, count: usize) {
        let mut frames = self.frames.lock();
        for _ in 0..count {
            frames.push_back(vec![ScriptedEvent::Keyboard(state)]);
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.lock().len()
    }
}

impl InputSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn pump(&mut self, keyboard: &Keyboard, mouse: &Mouse, touch: &Touch) -> Result<(), BackendError> {
        let Some(frame) = self.frames.lock().pop_front() else {
            return Ok(());
        };
        for event in frame {
            match event {
                ScriptedEvent::KeyDown(key) => keyboard.key_down(key),
                ScriptedEvent::KeyUp(key) => keyboard.key_up(key),
                ScriptedEvent::Keyboard(state) => keyboard.set_state(state),
                ScriptedEvent::Mouse(event) => mouse.process(event),
                ScriptedEvent::TouchBegan { id, x, y } => touch.touch_began(id, x, y, 1.0),
                ScriptedEvent::TouchMoved { id, x, y } => touch.touch_moved(id, x, y, 1.0),
                ScriptedEvent::TouchEnded { id, x, y } => touch.touch_ended(id, x, y),
                ScriptedEvent::Fail(err) => return Err(err),
            }
        }
        Ok(())
    }
}
