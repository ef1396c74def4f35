//! Mouse state and the absolute/relative mode state machine.
//!
//! # Modes
//! - **Absolute**: `x`/`y` are the cursor position in window client coordinates.
//! - **Relative**: the cursor is hidden and confined to the registered window, and
//!   `x`/`y` report motion accumulated since the last
//!   [`end_of_input_frame`](Mouse::end_of_input_frame).
//!
//! # Frame contract
//! The relative accumulator is never cleared implicitly. The application must call
//! [`Mouse::end_of_input_frame`] once per frame, after it has read input for that
//! frame. Skipping the call makes relative motion grow without bound; that is an
//! application bug, not something this type papers over.
//!
//! The scroll wheel counter is independent: it only returns to zero through
//! [`Mouse::reset_scroll_wheel_value`].
//!
//! # Threading
//! Platform code feeds [`MouseEvent`]s from its own thread via [`Mouse::process`].
//! All state, including the [`CursorControl`] side effects, lives behind one lock.

use crate::button::ButtonState;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Scroll units per wheel notch.
pub const WHEEL_DELTA: i32 = 120;

/// Positioning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseMode {
    #[default]
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::X1,
        MouseButton::X2,
    ];
}

/// Analog mouse channels as seen by a [`MouseStateTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAxis {
    /// Horizontal motion, right is positive.
    X,
    /// Vertical motion, up is positive.
    Y,
    /// Wheel notches turned this frame.
    ScrollWheel,
}

/// Snapshot of the mouse for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseState {
    pub left_button: bool,
    pub middle_button: bool,
    pub right_button: bool,
    pub x_button1: bool,
    pub x_button2: bool,
    /// Client x in absolute mode; accumulated delta x in relative mode.
    pub x: f32,
    /// Client y in absolute mode; accumulated delta y in relative mode.
    pub y: f32,
    /// Accumulated wheel value, [`WHEEL_DELTA`] per notch.
    pub scroll_wheel_value: i32,
    pub position_mode: MouseMode,
}

impl MouseState {
    pub fn is_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left_button,
            MouseButton::Middle => self.middle_button,
            MouseButton::Right => self.right_button,
            MouseButton::X1 => self.x_button1,
            MouseButton::X2 => self.x_button2,
        }
    }

    fn set(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.left_button = down,
            MouseButton::Middle => self.middle_button = down,
            MouseButton::Right => self.right_button = down,
            MouseButton::X1 => self.x_button1 = down,
            MouseButton::X2 => self.x_button2 = down,
        }
    }
}

/// Opaque native window handle (HWND, `GLFWwindow*`, `SDL_Window*`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// Platform cursor operations used by mode transitions.
///
/// Implementations must not block. Every method is called with the mouse lock held.
pub trait CursorControl: Send {
    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Clip the cursor to `window`'s client rectangle.
    fn confine(&mut self, window: WindowHandle);

    /// Remove any clipping.
    fn release(&mut self);

    /// Map a client-space point to screen space. `None` if the platform can't.
    fn client_to_screen(&self, window: WindowHandle, x: f32, y: f32) -> Option<(f32, f32)>;

    /// Move the system cursor to a screen position.
    fn set_position(&mut self, x: f32, y: f32);

    fn mouse_present(&self) -> bool {
        true
    }
}

/// Cursor control for hosts without a cursor (headless runs, consoles).
#[derive(Debug, Clone)]
pub struct NullCursor {
    visible: bool,
}

impl Default for NullCursor {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl CursorControl for NullCursor {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn confine(&mut self, _window: WindowHandle) {}

    fn release(&mut self) {}

    fn client_to_screen(&self, _window: WindowHandle, _x: f32, _y: f32) -> Option<(f32, f32)> {
        None
    }

    fn set_position(&mut self, _x: f32, _y: f32) {}
}

/// Where relative motion comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeMotionSource {
    /// Raw device deltas ([`MouseEvent::RawMotion`], e.g. `WM_INPUT`).
    #[default]
    RawMotion,
    /// Differences between successive [`MouseEvent::CursorMoved`] positions
    /// (windowing systems that only report a virtual cursor position).
    CursorDelta,
}

/// Mouse behaviour knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    pub relative_source: RelativeMotionSource,
    /// Clear the relative accumulator on every read until the application calls
    /// [`Mouse::end_of_input_frame`] for the first time.
    pub auto_reset: bool,
    /// Scale applied to mouse motion by the `"Mouse X"`/`"Mouse Y"` axes.
    pub sensitivity: f32,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            relative_source: RelativeMotionSource::RawMotion,
            auto_reset: false,
            sensitivity: 0.1,
        }
    }
}

/// Raw mouse input delivered by a platform backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    /// Cursor position in client coordinates.
    CursorMoved { x: f32, y: f32 },
    /// Raw device motion.
    RawMotion { dx: f32, dy: f32 },
    Button { button: MouseButton, pressed: bool },
    /// Vertical wheel motion in notches (fractional for high-resolution wheels).
    Wheel { notches: f32 },
    /// Window gained (`true`) or lost (`false`) focus.
    FocusChanged(bool),
}

struct MouseInner {
    state: MouseState,
    mode: MouseMode,
    relative: (f32, f32),
    last_absolute: (f32, f32),
    last_cursor: Option<(f32, f32)>,
    window: Option<WindowHandle>,
    in_focus: bool,
    auto_reset: bool,
    relative_source: RelativeMotionSource,
    cursor: Box<dyn CursorControl>,
}

impl MouseInner {
    fn enter_relative(&mut self) {
        self.relative = (0.0, 0.0);
        self.cursor.set_visible(false);
        match self.window {
            Some(window) => self.cursor.confine(window),
            None => warn!("relative mouse mode without a registered window; cursor is not confined"),
        }
    }

    fn leave_relative(&mut self) {
        self.relative = (0.0, 0.0);
        self.cursor.release();
        self.cursor.set_visible(true);

        let (x, y) = self.last_absolute;
        if let Some(window) = self.window {
            if let Some((sx, sy)) = self.cursor.client_to_screen(window, x, y) {
                self.cursor.set_position(sx, sy);
            }
        }
        self.state.x = x;
        self.state.y = y;
    }
}

/// Mouse service: current state plus the mode state machine.
pub struct Mouse {
    inner: Mutex<MouseInner>,
}

impl std::fmt::Debug for Mouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Mouse")
            .field("mode", &inner.mode)
            .field("state", &inner.state)
            .field("relative", &inner.relative)
            .field("window", &inner.window)
            .finish()
    }
}

impl Mouse {
    pub fn new(cursor: impl CursorControl + 'static, config: &MouseConfig) -> Self {
        Self {
            inner: Mutex::new(MouseInner {
                state: MouseState::default(),
                mode: MouseMode::Absolute,
                relative: (0.0, 0.0),
                last_absolute: (0.0, 0.0),
                last_cursor: None,
                window: None,
                in_focus: true,
                auto_reset: config.auto_reset,
                relative_source: config.relative_source,
                cursor: Box::new(cursor),
            }),
        }
    }

    /// Mouse without a real cursor, default configuration.
    pub fn headless() -> Self {
        Self::new(NullCursor::default(), &MouseConfig::default())
    }

    /// Snapshot for this frame.
    ///
    /// In relative mode `x`/`y` carry the delta accumulated since the last
    /// [`end_of_input_frame`](Self::end_of_input_frame).
    pub fn get_state(&self) -> MouseState {
        let mut inner = self.inner.lock();
        let mut state = inner.state;
        state.position_mode = inner.mode;
        if inner.mode == MouseMode::Relative {
            (state.x, state.y) = inner.relative;
            if inner.auto_reset {
                inner.relative = (0.0, 0.0);
            }
        }
        state
    }

    pub fn mode(&self) -> MouseMode {
        self.inner.lock().mode
    }

    /// Switch positioning mode. Setting the current mode is a no-op.
    pub fn set_mode(&self, mode: MouseMode) {
        let mut inner = self.inner.lock();
        if inner.mode == mode {
            return;
        }
        debug!("mouse mode {:?} -> {:?}", inner.mode, mode);
        inner.mode = mode;
        match mode {
            MouseMode::Relative => inner.enter_relative(),
            MouseMode::Absolute => inner.leave_relative(),
        }
    }

    /// Mark the end of the frame's input consumption.
    ///
    /// Relative motion reported so far becomes the baseline; the next frame starts
    /// from zero.
    pub fn end_of_input_frame(&self) {
        let mut inner = self.inner.lock();
        inner.auto_reset = false;
        if inner.mode == MouseMode::Relative {
            inner.relative = (0.0, 0.0);
        }
    }

    /// Same as [`end_of_input_frame`](Self::end_of_input_frame).
    pub fn reset_relative_motion(&self) {
        self.end_of_input_frame();
    }

    pub fn reset_scroll_wheel_value(&self) {
        self.inner.lock().state.scroll_wheel_value = 0;
    }

    /// Register the window used for confinement and coordinate mapping.
    pub fn set_window(&self, window: WindowHandle) {
        let mut inner = self.inner.lock();
        if inner.window == Some(window) {
            return;
        }
        debug!("mouse window set to {:#x}", window.0);
        inner.window = Some(window);
        if inner.mode == MouseMode::Relative && inner.in_focus {
            inner.cursor.confine(window);
        }
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.inner.lock().window
    }

    /// Always `false` in relative mode.
    pub fn is_visible(&self) -> bool {
        let inner = self.inner.lock();
        inner.mode == MouseMode::Absolute && inner.cursor.is_visible()
    }

    /// Show or hide the cursor. Ignored in relative mode.
    pub fn set_visible(&self, visible: bool) {
        let mut inner = self.inner.lock();
        if inner.mode == MouseMode::Relative {
            return;
        }
        if inner.cursor.is_visible() != visible {
            inner.cursor.set_visible(visible);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().cursor.mouse_present()
    }

    /// Apply one raw platform event.
    pub fn process(&self, event: MouseEvent) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match event {
            MouseEvent::CursorMoved { x, y } => {
                match inner.mode {
                    MouseMode::Absolute => {
                        inner.last_absolute = (x, y);
                        inner.state.x = x;
                        inner.state.y = y;
                    }
                    MouseMode::Relative => {
                        if inner.in_focus
                            && inner.relative_source == RelativeMotionSource::CursorDelta
                        {
                            if let Some((px, py)) = inner.last_cursor {
                                inner.relative.0 += x - px;
                                inner.relative.1 += y - py;
                            }
                        }
                    }
                }
                inner.last_cursor = Some((x, y));
            }
            MouseEvent::RawMotion { dx, dy } => {
                if inner.mode == MouseMode::Relative
                    && inner.in_focus
                    && inner.relative_source == RelativeMotionSource::RawMotion
                {
                    inner.relative.0 += dx;
                    inner.relative.1 += dy;
                }
            }
            MouseEvent::Button { button, pressed } => inner.state.set(button, pressed),
            MouseEvent::Wheel { notches } => {
                let delta = (notches * WHEEL_DELTA as f32).round() as i32;
                inner.state.scroll_wheel_value = inner.state.scroll_wheel_value.saturating_add(delta);
            }
            MouseEvent::FocusChanged(true) => {
                inner.in_focus = true;
                if inner.mode == MouseMode::Relative {
                    inner.relative = (0.0, 0.0);
                    inner.cursor.set_visible(false);
                    if let Some(window) = inner.window {
                        inner.cursor.confine(window);
                    }
                }
            }
            MouseEvent::FocusChanged(false) => {
                let scroll = inner.state.scroll_wheel_value;
                inner.state = MouseState {
                    scroll_wheel_value: scroll,
                    ..MouseState::default()
                };
                inner.relative = (0.0, 0.0);
                if inner.mode == MouseMode::Relative {
                    inner.cursor.release();
                }
                inner.in_focus = false;
            }
        }
    }
}

/// Per-frame mouse button edges.
#[derive(Debug, Clone, Default)]
pub struct MouseStateTracker {
    pub left_button: ButtonState,
    pub middle_button: ButtonState,
    pub right_button: ButtonState,
    pub x_button1: ButtonState,
    pub x_button2: ButtonState,
    /// Wheel change since the previous update.
    pub scroll_wheel_delta: i32,
    /// Pointer motion this frame: the reported delta in relative mode, the
    /// position difference in absolute mode.
    pub motion: (f32, f32),
    last_state: MouseState,
}

impl MouseStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the newest snapshot. Call once per frame before querying.
    pub fn update(&mut self, state: &MouseState) {
        let last = &self.last_state;
        self.left_button = ButtonState::classify(state.left_button, last.left_button);
        self.middle_button = ButtonState::classify(state.middle_button, last.middle_button);
        self.right_button = ButtonState::classify(state.right_button, last.right_button);
        self.x_button1 = ButtonState::classify(state.x_button1, last.x_button1);
        self.x_button2 = ButtonState::classify(state.x_button2, last.x_button2);

        self.scroll_wheel_delta = state.scroll_wheel_value.wrapping_sub(last.scroll_wheel_value);
        self.motion = match (state.position_mode, last.position_mode) {
            (MouseMode::Relative, _) => (state.x, state.y),
            (MouseMode::Absolute, MouseMode::Absolute) => (state.x - last.x, state.y - last.y),
            (MouseMode::Absolute, MouseMode::Relative) => (0.0, 0.0),
        };

        self.last_state = *state;
    }

    pub fn get(&self, button: MouseButton) -> ButtonState {
        match button {
            MouseButton::Left => self.left_button,
            MouseButton::Middle => self.middle_button,
            MouseButton::Right => self.right_button,
            MouseButton::X1 => self.x_button1,
            MouseButton::X2 => self.x_button2,
        }
    }

    /// Raw value of `axis` for this frame, before any sensitivity scaling.
    pub fn axis(&self, axis: MouseAxis) -> f32 {
        match axis {
            MouseAxis::X => self.motion.0,
            MouseAxis::Y => -self.motion.1,
            MouseAxis::ScrollWheel => self.scroll_wheel_delta as f32 / WHEEL_DELTA as f32,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_state(&self) -> MouseState {
        self.last_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{CursorCall, VirtualCursor};

    fn relative_mouse() -> (Mouse, VirtualCursor) {
        let cursor = VirtualCursor::new();
        let mouse = Mouse::new(cursor.clone(), &MouseConfig::default());
        mouse.set_window(WindowHandle(0x10));
        (mouse, cursor)
    }

    #[test]
    fn starts_absolute() {
        let mouse = Mouse::headless();
        assert_eq!(mouse.mode(), MouseMode::Absolute);
        assert_eq!(mouse.get_state().position_mode, MouseMode::Absolute);
    }

    #[test]
    fn absolute_reports_cursor_position() {
        let mouse = Mouse::headless();
        mouse.process(MouseEvent::CursorMoved { x: 12.0, y: 40.5 });
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (12.0, 40.5));
    }

    #[test]
    fn raw_motion_is_ignored_in_absolute_mode() {
        let mouse = Mouse::headless();
        mouse.process(MouseEvent::RawMotion { dx: 3.0, dy: 3.0 });
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (0.0, 0.0));
    }

    #[test]
    fn relative_accumulates_until_end_of_frame() {
        let (mouse, _) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: 2.0, dy: 1.0 });
        mouse.process(MouseEvent::RawMotion { dx: 3.0, dy: 2.0 });
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (5.0, 3.0));

        // No implicit reset between reads.
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (5.0, 3.0));

        mouse.end_of_input_frame();
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (0.0, 0.0));
    }

    #[test]
    fn mode_round_trip_resets_accumulator() {
        let (mouse, _) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: 5.0, dy: 3.0 });
        mouse.set_mode(MouseMode::Absolute);
        mouse.set_mode(MouseMode::Relative);
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (0.0, 0.0));
    }

    #[test]
    fn set_mode_is_idempotent() {
        let (mouse, cursor) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: 1.0, dy: 1.0 });
        let calls_before = cursor.calls().len();
        mouse.set_mode(MouseMode::Relative);
        assert_eq!(cursor.calls().len(), calls_before);
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (1.0, 1.0));
    }

    #[test]
    fn entering_relative_hides_and_confines() {
        let (mouse, cursor) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        assert_eq!(
            cursor.calls(),
            vec![CursorCall::SetVisible(false), CursorCall::Confine(WindowHandle(0x10))]
        );
        assert!(!mouse.is_visible());
    }

    #[test]
    fn leaving_relative_restores_cursor_position() {
        let (mouse, cursor) = relative_mouse();
        mouse.process(MouseEvent::CursorMoved { x: 30.0, y: 20.0 });
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: 9.0, dy: 9.0 });
        cursor.clear_calls();

        mouse.set_mode(MouseMode::Absolute);
        assert_eq!(
            cursor.calls(),
            vec![
                CursorCall::Release,
                CursorCall::SetVisible(true),
                CursorCall::SetPosition(130.0, 220.0),
            ]
        );
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (30.0, 20.0));
        assert!(mouse.is_visible());
    }

    #[test]
    fn no_confinement_without_window() {
        let cursor = VirtualCursor::new();
        let mouse = Mouse::new(cursor.clone(), &MouseConfig::default());
        mouse.set_mode(MouseMode::Relative);
        assert_eq!(cursor.calls(), vec![CursorCall::SetVisible(false)]);

        mouse.set_window(WindowHandle(7));
        assert_eq!(cursor.calls().last(), Some(&CursorCall::Confine(WindowHandle(7))));
    }

    #[test]
    fn scroll_and_frame_reset_are_independent() {
        let (mouse, _) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::Wheel { notches: 2.0 });
        mouse.process(MouseEvent::RawMotion { dx: 4.0, dy: -1.0 });

        mouse.reset_scroll_wheel_value();
        let s = mouse.get_state();
        assert_eq!(s.scroll_wheel_value, 0);
        assert_eq!((s.x, s.y), (4.0, -1.0));

        mouse.process(MouseEvent::Wheel { notches: -1.0 });
        mouse.end_of_input_frame();
        let s = mouse.get_state();
        assert_eq!(s.scroll_wheel_value, -WHEEL_DELTA);
        assert_eq!((s.x, s.y), (0.0, 0.0));
    }

    #[test]
    fn scroll_counts_in_absolute_mode() {
        let mouse = Mouse::headless();
        mouse.process(MouseEvent::Wheel { notches: 1.0 });
        mouse.process(MouseEvent::Wheel { notches: 1.0 });
        assert_eq!(mouse.get_state().scroll_wheel_value, 2 * WHEEL_DELTA);
    }

    #[test]
    fn cursor_delta_source_accumulates_position_differences() {
        let config = MouseConfig {
            relative_source: RelativeMotionSource::CursorDelta,
            ..MouseConfig::default()
        };
        let mouse = Mouse::new(NullCursor::default(), &config);
        mouse.process(MouseEvent::CursorMoved { x: 100.0, y: 100.0 });
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::CursorMoved { x: 104.0, y: 98.0 });
        mouse.process(MouseEvent::CursorMoved { x: 110.0, y: 99.0 });
        // Raw deltas are not this mouse's source.
        mouse.process(MouseEvent::RawMotion { dx: 50.0, dy: 50.0 });
        let s = mouse.get_state();
        assert_eq!((s.x, s.y), (10.0, -1.0));
    }

    #[test]
    fn auto_reset_clears_on_read_until_first_end_of_frame() {
        let config = MouseConfig {
            auto_reset: true,
            ..MouseConfig::default()
        };
        let mouse = Mouse::new(NullCursor::default(), &config);
        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: 1.0, dy: 2.0 });
        assert_eq!(mouse.get_state().x, 1.0);
        assert_eq!(mouse.get_state().x, 0.0);

        mouse.end_of_input_frame();
        mouse.process(MouseEvent::RawMotion { dx: 1.0, dy: 2.0 });
        assert_eq!(mouse.get_state().x, 1.0);
        assert_eq!(mouse.get_state().x, 1.0);
    }

    #[test]
    fn focus_loss_keeps_scroll_and_drops_buttons() {
        let (mouse, cursor) = relative_mouse();
        mouse.process(MouseEvent::Button { button: MouseButton::Left, pressed: true });
        mouse.process(MouseEvent::Wheel { notches: 1.0 });
        mouse.set_mode(MouseMode::Relative);
        cursor.clear_calls();

        mouse.process(MouseEvent::FocusChanged(false));
        assert_eq!(cursor.calls(), vec![CursorCall::Release]);
        mouse.process(MouseEvent::RawMotion { dx: 5.0, dy: 5.0 });
        let s = mouse.get_state();
        assert!(!s.left_button);
        assert_eq!(s.scroll_wheel_value, WHEEL_DELTA);
        assert_eq!((s.x, s.y), (0.0, 0.0));

        cursor.clear_calls();
        mouse.process(MouseEvent::FocusChanged(true));
        assert_eq!(
            cursor.calls(),
            vec![CursorCall::SetVisible(false), CursorCall::Confine(WindowHandle(0x10))]
        );
    }

    #[test]
    fn set_visible_is_ignored_in_relative_mode() {
        let (mouse, cursor) = relative_mouse();
        mouse.set_mode(MouseMode::Relative);
        cursor.clear_calls();
        mouse.set_visible(true);
        assert!(cursor.calls().is_empty());
        assert!(!mouse.is_visible());
    }

    #[test]
    fn tracker_reports_button_edges_and_wheel_delta() {
        let mouse = Mouse::headless();
        let mut tracker = MouseStateTracker::new();

        mouse.process(MouseEvent::Button { button: MouseButton::Right, pressed: true });
        mouse.process(MouseEvent::Wheel { notches: 1.0 });
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.right_button, ButtonState::Pressed);
        assert_eq!(tracker.left_button, ButtonState::Up);
        assert_eq!(tracker.scroll_wheel_delta, WHEEL_DELTA);
        assert_eq!(tracker.axis(MouseAxis::ScrollWheel), 1.0);

        tracker.update(&mouse.get_state());
        assert_eq!(tracker.get(MouseButton::Right), ButtonState::Held);
        assert_eq!(tracker.scroll_wheel_delta, 0);

        mouse.process(MouseEvent::Button { button: MouseButton::Right, pressed: false });
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.right_button, ButtonState::Released);
    }

    #[test]
    fn tracker_motion_in_both_modes() {
        let mouse = Mouse::headless();
        let mut tracker = MouseStateTracker::new();
        mouse.process(MouseEvent::CursorMoved { x: 10.0, y: 10.0 });
        tracker.update(&mouse.get_state());
        mouse.process(MouseEvent::CursorMoved { x: 13.0, y: 8.0 });
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.motion, (3.0, -2.0));
        assert_eq!(tracker.axis(MouseAxis::X), 3.0);
        assert_eq!(tracker.axis(MouseAxis::Y), 2.0);

        mouse.set_mode(MouseMode::Relative);
        mouse.process(MouseEvent::RawMotion { dx: -4.0, dy: 6.0 });
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.motion, (-4.0, 6.0));
    }
}
