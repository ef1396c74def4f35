//! Input configuration.
//!
//! An [`InputConfig`] carries the stick shaping thresholds, mouse behavior and the
//! named axis table used by [`Input::get_axis`](crate::input::Input::get_axis).
//! Every field has a default, so a config file only needs to list what it changes:
//!
//! ```toml
//! dead_zone = "circular"
//! thumb_dead_zone = 0.2
//!
//! [mouse]
//! relative_source = "cursor_delta"
//! sensitivity = 0.25
//!
//! [[axes]]
//! name = "Throttle"
//! negative = "s"
//! positive = "w"
//! gamepad_axis = "right trigger"
//! ```
//!
//! Listing `[[axes]]` replaces the built-in table rather than extending it.
//! Names are checked against the tables in [`names`](crate::names) at load time.

use crate::deadzone::{DeadZone, THUMB_DEAD_ZONE};
use crate::error::{InputError, NameKind, Result};
use crate::gamepad::GamepadAxis;
use crate::mouse::{MouseAxis, MouseConfig};
use crate::names::{self, Binding};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named virtual axis.
///
/// The axis value is the largest-magnitude contribution among:
/// - the key pair (`positive` minus `negative`, either of each pair counts),
/// - `buttons` (1.0 while any is held),
/// - `gamepad_axis`,
/// - `mouse_axis` scaled by `sensitivity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_negative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_positive: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamepad_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_axis: Option<String>,
    /// Mouse scale. Falls back to [`MouseConfig::sensitivity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f32>,
    #[serde(default)]
    pub invert: bool,
    /// Results with a smaller magnitude read as zero.
    #[serde(default)]
    pub dead_zone: f32,
}

impl AxisBinding {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            negative: None,
            positive: None,
            alt_negative: None,
            alt_positive: None,
            buttons: Vec::new(),
            gamepad_axis: None,
            mouse_axis: None,
            sensitivity: None,
            invert: false,
            dead_zone: 0.0,
        }
    }

    fn keys(mut self, negative: &str, positive: &str) -> Self {
        self.negative = Some(negative.to_string());
        self.positive = Some(positive.to_string());
        self
    }

    fn alt_keys(mut self, negative: &str, positive: &str) -> Self {
        self.alt_negative = Some(negative.to_string());
        self.alt_positive = Some(positive.to_string());
        self
    }

    fn buttons(mut self, buttons: &[&str]) -> Self {
        self.buttons = buttons.iter().map(|b| b.to_string()).collect();
        self
    }

    fn gamepad(mut self, axis: &str) -> Self {
        self.gamepad_axis = Some(axis.to_string());
        self
    }

    fn mouse(mut self, axis: &str) -> Self {
        self.mouse_axis = Some(axis.to_string());
        self
    }
}

/// The built-in axis table.
pub fn default_axes() -> Vec<AxisBinding> {
    vec![
        AxisBinding::named("Horizontal")
            .keys("left", "right")
            .alt_keys("a", "d")
            .gamepad("left x"),
        AxisBinding::named("Vertical")
            .keys("down", "up")
            .alt_keys("s", "w")
            .gamepad("left y"),
        AxisBinding::named("Fire1").buttons(&["left ctrl", "mouse 0", "joystick button 1"]),
        AxisBinding::named("Fire2").buttons(&["left alt", "mouse 1", "joystick button 2"]),
        AxisBinding::named("Fire3").buttons(&["left shift", "mouse 2", "joystick button 3"]),
        AxisBinding::named("Jump").buttons(&["space", "joystick button 4"]),
        AxisBinding::named("Submit").buttons(&["enter", "joystick button 1"]),
        AxisBinding::named("Cancel").buttons(&["esc", "joystick button 2"]),
        AxisBinding::named("Mouse X").mouse("x"),
        AxisBinding::named("Mouse Y").mouse("y"),
        AxisBinding::named("Mouse ScrollWheel").mouse("scroll wheel"),
    ]
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Shaping applied to the gamepad read during `Input::update`.
    pub dead_zone: DeadZone,
    pub thumb_dead_zone: f32,
    pub trigger_dead_zone: f32,
    pub mouse: MouseConfig,
    pub axes: Vec<AxisBinding>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dead_zone: DeadZone::IndependentAxis,
            thumb_dead_zone: THUMB_DEAD_ZONE,
            trigger_dead_zone: 0.0,
            mouse: MouseConfig::default(),
            axes: default_axes(),
        }
    }
}

/// An [`AxisBinding`] with every name looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAxis {
    pub name: String,
    pub negative: Vec<Binding>,
    pub positive: Vec<Binding>,
    pub buttons: Vec<Binding>,
    pub gamepad_axis: Option<GamepadAxis>,
    pub mouse_axis: Option<MouseAxis>,
    pub sensitivity: f32,
    pub invert: bool,
    pub dead_zone: f32,
}

fn lookup_control(name: &str) -> Result<Binding> {
    names::control_binding(name).ok_or_else(|| {
        let kind = if names::button_binding(name).is_none() && !name.trim().contains(' ') {
            NameKind::Key
        } else {
            NameKind::Button
        };
        InputError::unknown_name(kind, name)
    })
}

fn lookup_all<'a>(names: impl IntoIterator<Item = &'a Option<String>>) -> Result<Vec<Binding>> {
    names
        .into_iter()
        .flatten()
        .map(|n| lookup_control(n))
        .collect()
}

impl InputConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| InputError::Config {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| InputError::Config {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        };
        parsed.map_err(|err| match err {
            InputError::Config { path: None, message } => InputError::Config {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| InputError::Config {
            path: None,
            message: e.to_string(),
        })
    }

    /// Check thresholds and every name in the axis table.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("thumb_dead_zone", self.thumb_dead_zone),
            ("trigger_dead_zone", self.trigger_dead_zone),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(InputError::Config {
                    path: None,
                    message: format!("{field} must be in [0, 1), got {value}"),
                });
            }
        }
        self.resolve_axes().map(|_| ())
    }

    /// Look up every axis name. Fails on the first unknown name.
    pub fn resolve_axes(&self) -> Result<Vec<ResolvedAxis>> {
        self.axes
            .iter()
            .map(|axis| {
                let gamepad_axis = axis
                    .gamepad_axis
                    .as_deref()
                    .map(|n| {
                        names::gamepad_axis(n)
                            .ok_or_else(|| InputError::unknown_name(NameKind::GamepadAxis, n))
                    })
                    .transpose()?;
                let mouse_axis = axis
                    .mouse_axis
                    .as_deref()
                    .map(|n| {
                        names::mouse_axis(n)
                            .ok_or_else(|| InputError::unknown_name(NameKind::MouseAxis, n))
                    })
                    .transpose()?;

                Ok(ResolvedAxis {
                    name: axis.name.clone(),
                    negative: lookup_all([&axis.negative, &axis.alt_negative])?,
                    positive: lookup_all([&axis.positive, &axis.alt_positive])?,
                    buttons: axis
                        .buttons
                        .iter()
                        .map(|n| lookup_control(n))
                        .collect::<Result<_>>()?,
                    gamepad_axis,
                    mouse_axis,
                    sensitivity: axis.sensitivity.unwrap_or(self.mouse.sensitivity),
                    invert: axis.invert,
                    dead_zone: axis.dead_zone,
                })
            })
            .collect()
    }
}
