//! Frame-level facade over every input service.
//!
//! [`Input`] owns the keyboard, mouse, touch and gamepad services (behind `Arc`s so
//! platform callbacks can hold their own handles), one tracker per device kind and
//! the resolved axis table. A frame looks like:
//!
//! ```no_run
//! # use frameinput::{Input, InputConfig, NullCursor};
//! # use frameinput::backends::virtual_input::VirtualGamepads;
//! # fn main() -> frameinput::Result<()> {
//! let mut input = Input::new(&InputConfig::default(), VirtualGamepads::new(4), NullCursor::default())?;
//! loop {
//!     input.update()?;
//!     if input.get_key_down("space") {
//!         // jump
//!     }
//!     let steer = input.get_axis("Horizontal");
//!     # let _ = steer;
//!     input.end_frame();
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```

use crate::backends::{GamepadBackend, InputSource};
use crate::button::ButtonState;
use crate::config::{InputConfig, ResolvedAxis};
use crate::deadzone::DeadZone;
use crate::error::Result;
use crate::gamepad::{GamepadState, GamepadStateTracker, PlayerIndex};
use crate::keyboard::{Keyboard, KeyboardStateTracker};
use crate::mouse::{CursorControl, Mouse, MouseStateTracker};
use crate::names::{self, Binding, Control};
use crate::slots::GamepadManager;
use crate::touch::{Touch, TouchState};
use log::warn;
use std::sync::Arc;

pub struct Input<B> {
    keyboard: Arc<Keyboard>,
    mouse: Arc<Mouse>,
    touch: Arc<Touch>,
    gamepads: Arc<GamepadManager<B>>,

    keys: KeyboardStateTracker,
    buttons: MouseStateTracker,
    pad: GamepadStateTracker,
    gamepad_state: GamepadState,
    touch_state: TouchState,

    source: Option<Box<dyn InputSource>>,
    axes: Vec<ResolvedAxis>,
    dead_zone: DeadZone,
}

impl<B: GamepadBackend> Input<B> {
    /// Build every service from `config`. Fails only if the config does not validate.
    pub fn new(
        config: &InputConfig,
        gamepad_backend: B,
        cursor: impl CursorControl + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let gamepads = GamepadManager::with_thresholds(
            gamepad_backend,
            config.thumb_dead_zone,
            config.trigger_dead_zone,
        );
        Ok(Self {
            keyboard: Arc::new(Keyboard::new()),
            mouse: Arc::new(Mouse::new(cursor, &config.mouse)),
            touch: Arc::new(Touch::new()),
            gamepads: Arc::new(gamepads),
            keys: KeyboardStateTracker::new(),
            buttons: MouseStateTracker::new(),
            pad: GamepadStateTracker::new(),
            gamepad_state: GamepadState::default(),
            touch_state: TouchState::default(),
            source: None,
            axes: config.resolve_axes()?,
            dead_zone: config.dead_zone,
        })
    }

    /// Attach a poll-driven source, pumped at the start of every [`update`](Self::update).
    pub fn with_source(mut self, source: impl InputSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn set_source(&mut self, source: Option<Box<dyn InputSource>>) {
        self.source = source;
    }

    /// Advance one frame: pump the source, snapshot every device and feed the
    /// trackers. Call once per frame before any query.
    ///
    /// Transient source failures are logged and the frame proceeds with whatever
    /// the services already hold. An unrecoverable failure is returned before any
    /// tracker is touched.
    pub fn update(&mut self) -> Result<()> {
        if let Some(source) = self.source.as_mut() {
            if let Err(err) = source.pump(&self.keyboard, &self.mouse, &self.touch) {
                if !err.is_transient() {
                    return Err(err.into());
                }
                warn!("{}: {err}", source.name());
            }
        }

        self.keys.update(&self.keyboard.get_state());
        self.buttons.update(&self.mouse.get_state());
        self.gamepad_state = self.gamepads.get_state(PlayerIndex::MostRecent, self.dead_zone);
        self.pad.update(&self.gamepad_state);
        self.touch_state = self.touch.get_state();
        Ok(())
    }

    /// Close the frame: clears relative mouse motion and settles touch phases.
    pub fn end_frame(&self) {
        self.mouse.end_of_input_frame();
        self.touch.end_frame();
    }

    fn control_state(&self, control: Control) -> ButtonState {
        match control {
            Control::Key(key) => self.keys.key_state(key),
            Control::Mouse(button) => self.buttons.get(button),
            Control::Gamepad(button) => self.pad.get(button),
        }
    }

    fn binding_state(&self, binding: &Binding) -> ButtonState {
        match *binding {
            Binding::One(control) => self.control_state(control),
            Binding::Either(a, b) => {
                let (a, b) = (self.control_state(a), self.control_state(b));
                ButtonState::classify(a.is_down() || b.is_down(), a.was_down() || b.was_down())
            }
        }
    }

    fn key_state(&self, name: &str) -> ButtonState {
        names::key_binding(name)
            .map(|b| self.binding_state(&b))
            .unwrap_or_default()
    }

    fn button_state(&self, name: &str) -> ButtonState {
        names::button_binding(name)
            .map(|b| self.binding_state(&b))
            .unwrap_or_default()
    }

    /// Key held this frame.
    pub fn get_key(&self, name: &str) -> bool {
        self.key_state(name).is_down()
    }

    /// Key went down this frame.
    pub fn get_key_down(&self, name: &str) -> bool {
        self.key_state(name).is_pressed()
    }

    /// Key went up this frame.
    pub fn get_key_up(&self, name: &str) -> bool {
        self.key_state(name).is_released()
    }

    pub fn get_button(&self, name: &str) -> bool {
        self.button_state(name).is_down()
    }

    pub fn get_button_down(&self, name: &str) -> bool {
        self.button_state(name).is_pressed()
    }

    pub fn get_button_up(&self, name: &str) -> bool {
        self.button_state(name).is_released()
    }

    /// Value of a configured axis, or `0.0` for an unknown name.
    pub fn get_axis(&self, name: &str) -> f32 {
        let Some(axis) = self.axes.iter().find(|a| a.name.eq_ignore_ascii_case(name)) else {
            return 0.0;
        };

        let any_down = |bindings: &[Binding]| bindings.iter().any(|b| self.binding_state(b).is_down());
        let held = |down: bool| if down { 1.0 } else { 0.0 };

        let contributions = [
            held(any_down(&axis.positive)) - held(any_down(&axis.negative)),
            held(any_down(&axis.buttons)),
            axis.gamepad_axis.map_or(0.0, |a| self.gamepad_state.axis(a)),
            axis.mouse_axis.map_or(0.0, |a| self.buttons.axis(a) * axis.sensitivity),
        ];
        let mut value = contributions
            .into_iter()
            .fold(0.0f32, |best, v| if v.abs() > best.abs() { v } else { best });

        if axis.invert {
            value = -value;
        }
        if value.abs() < axis.dead_zone {
            0.0
        } else {
            value
        }
    }

    /// Names of the configured axes, in table order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|a| a.name.as_str())
    }

    pub fn keyboard(&self) -> &Arc<Keyboard> {
        &self.keyboard
    }

    pub fn mouse(&self) -> &Arc<Mouse> {
        &self.mouse
    }

    pub fn touch(&self) -> &Arc<Touch> {
        &self.touch
    }

    pub fn gamepads(&self) -> &Arc<GamepadManager<B>> {
        &self.gamepads
    }

    pub fn keyboard_tracker(&self) -> &KeyboardStateTracker {
        &self.keys
    }

    pub fn mouse_tracker(&self) -> &MouseStateTracker {
        &self.buttons
    }

    pub fn gamepad_tracker(&self) -> &GamepadStateTracker {
        &self.pad
    }

    /// Most-recent gamepad as of the last [`update`](Self::update).
    pub fn gamepad_state(&self) -> &GamepadState {
        &self.gamepad_state
    }

    /// Touch points as of the last [`update`](Self::update).
    pub fn touch_state(&self) -> &TouchState {
        &self.touch_state
    }
}
