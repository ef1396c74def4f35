//! Analog stick deadzone shaping.
//!
//! A deadzone suppresses mechanical drift around the stick's rest position. Values
//! past the threshold are rescaled so the usable range still reaches full deflection.
//!
//! All functions here are pure and backend-independent.

use serde::{Deserialize, Serialize};

/// Recommended thumbstick deadzone for Xbox-style controllers.
pub const THUMB_DEAD_ZONE: f32 = 0.24;

/// Deadzone policy applied to a stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadZone {
    /// Each axis is thresholded and rescaled on its own.
    #[default]
    IndependentAxis,
    /// The stick vector's magnitude is thresholded and rescaled.
    Circular,
    /// Raw values pass through untouched.
    None,
}

#[inline]
fn apply_linear(value: f32, dead_zone: f32, max_value: f32) -> f32 {
    let magnitude = value.abs();
    if magnitude < dead_zone {
        return 0.0;
    }
    let scaled = ((magnitude - dead_zone) / (max_value - dead_zone)).min(max_value);
    scaled.copysign(value)
}

/// Shape a raw stick vector `(x, y)` under `mode`.
///
/// `max_value` is the largest magnitude the hardware reports (1.0 for normalized
/// sticks). The result is always within `[-1, 1]` per axis.
pub fn apply_stick_dead_zone(
    x: f32,
    y: f32,
    mode: DeadZone,
    max_value: f32,
    dead_zone: f32,
) -> (f32, f32) {
    let (out_x, out_y) = match mode {
        DeadZone::None => (x, y),
        DeadZone::IndependentAxis => (
            apply_linear(x, dead_zone, max_value),
            apply_linear(y, dead_zone, max_value),
        ),
        DeadZone::Circular => {
            let magnitude = (x * x + y * y).sqrt();
            if magnitude < dead_zone || magnitude == 0.0 {
                (0.0, 0.0)
            } else {
                let scaled = ((magnitude - dead_zone) / (max_value - dead_zone)).min(max_value);
                (x / magnitude * scaled, y / magnitude * scaled)
            }
        }
    };
    (out_x.clamp(-1.0, 1.0), out_y.clamp(-1.0, 1.0))
}

/// Threshold a trigger value in `[0, 1]`.
///
/// A `dead_zone` of zero is a pass-through.
pub fn apply_trigger_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if dead_zone <= 0.0 {
        return value.clamp(0.0, 1.0);
    }
    if value < dead_zone {
        0.0
    } else {
        ((value - dead_zone) / (1.0 - dead_zone)).clamp(0.0, 1.0)
    }
}
