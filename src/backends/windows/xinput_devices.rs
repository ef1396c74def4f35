#![cfg(target_os = "windows")]

//! Windows XInput gamepad backend.
//!
//! XInput exposes four fixed user slots (0–3). Each slot is reported as the
//! device id `xinput:{slot}`, so a controller keeps its id as long as Windows
//! keeps it in the same user slot.
//!
//! # Channel conventions
//! - Sticks are normalized to `[-1.0, 1.0]` with +Y up (XInput's native sign).
//! - Triggers are normalized to `[0.0, 1.0]`.
//! - `dwPacketNumber` is passed through as the packet id.
//!
//! # Vibration
//! XInput drives the two body motors only; trigger motor values are dropped.

use crate::backends::{DeviceId, GamepadBackend};
use crate::error::BackendError;
use crate::gamepad::{Buttons, DPad, RawGamepadReading, ThumbSticks, Triggers, Vibration};
use windows_sys::Win32::UI::Input::XboxController::*;

/// Number of XInput user slots.
pub const XUSER_MAX_COUNT: usize = 4;

// Local constants (avoid relying on module exports that vary by windows-sys version)
const ERROR_SUCCESS: u32 = 0;
const ERROR_DEVICE_NOT_CONNECTED: u32 = 1167;

#[inline]
/// Normalize a signed thumbstick axis into `[-1, 1]`.
fn normalize_thumb(v: i16) -> f32 {
    // Map [-32768, 32767] -> [-1, 1]
    if v >= 0 {
        (v as f32) / 32767.0
    } else {
        (v as f32) / 32768.0
    }
}

#[inline]
fn normalize_trigger(v: u8) -> f32 {
    (v as f32) / 255.0
}

fn slot_of(id: &DeviceId) -> Option<u32> {
    let slot: u32 = id.as_str().strip_prefix("xinput:")?.parse().ok()?;
    ((slot as usize) < XUSER_MAX_COUNT).then_some(slot)
}

fn id_of(slot: u32) -> DeviceId {
    DeviceId(format!("xinput:{slot}"))
}

fn query(slot: u32) -> std::result::Result<XINPUT_STATE, u32> {
    // FFI struct: must be manually zeroed
    let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
    let res = unsafe { XInputGetState(slot, &mut state) };
    if res == ERROR_SUCCESS {
        Ok(state)
    } else {
        Err(res)
    }
}

fn reading_from(state: &XINPUT_STATE) -> RawGamepadReading {
    let gp = state.Gamepad;
    let b: u16 = gp.wButtons;
    let has = |mask: u16| b & mask != 0;

    RawGamepadReading {
        packet: state.dwPacketNumber as u64,
        buttons: Buttons {
            a: has(XINPUT_GAMEPAD_A),
            b: has(XINPUT_GAMEPAD_B),
            x: has(XINPUT_GAMEPAD_X),
            y: has(XINPUT_GAMEPAD_Y),
            left_stick: has(XINPUT_GAMEPAD_LEFT_THUMB),
            right_stick: has(XINPUT_GAMEPAD_RIGHT_THUMB),
            left_shoulder: has(XINPUT_GAMEPAD_LEFT_SHOULDER),
            right_shoulder: has(XINPUT_GAMEPAD_RIGHT_SHOULDER),
            back: has(XINPUT_GAMEPAD_BACK),
            start: has(XINPUT_GAMEPAD_START),
        },
        dpad: DPad {
            up: has(XINPUT_GAMEPAD_DPAD_UP),
            down: has(XINPUT_GAMEPAD_DPAD_DOWN),
            right: has(XINPUT_GAMEPAD_DPAD_RIGHT),
            left: has(XINPUT_GAMEPAD_DPAD_LEFT),
        },
        thumb_sticks: ThumbSticks {
            left_x: normalize_thumb(gp.sThumbLX),
            left_y: normalize_thumb(gp.sThumbLY),
            right_x: normalize_thumb(gp.sThumbRX),
            right_y: normalize_thumb(gp.sThumbRY),
        },
        triggers: Triggers {
            left: normalize_trigger(gp.bLeftTrigger),
            right: normalize_trigger(gp.bRightTrigger),
        },
    }
}

/// [`GamepadBackend`] over the XInput user slots.
#[derive(Debug, Default)]
pub struct XInputGamepads;

impl XInputGamepads {
    pub fn new() -> Self {
        XInputGamepads
    }
}

impl GamepadBackend for XInputGamepads {
    fn max_players(&self) -> usize {
        XUSER_MAX_COUNT
    }

    fn enumerate(&mut self) -> Vec<DeviceId> {
        (0..XUSER_MAX_COUNT as u32)
            .filter(|slot| query(*slot).is_ok())
            .map(id_of)
            .collect()
    }

    fn read(&mut self, id: &DeviceId) -> Result<Option<RawGamepadReading>, BackendError> {
        let Some(slot) = slot_of(id) else {
            return Ok(None);
        };
        match query(slot) {
            Ok(state) => Ok(Some(reading_from(&state))),
            Err(ERROR_DEVICE_NOT_CONNECTED) => Ok(None),
            Err(code) => Err(BackendError::transient(
                "xinput",
                format!("XInputGetState({slot}) returned {code}"),
            )),
        }
    }

    fn set_vibration(&mut self, id: &DeviceId, vibration: Vibration) -> bool {
        let Some(slot) = slot_of(id) else {
            return false;
        };
        let mut motors = XINPUT_VIBRATION {
            wLeftMotorSpeed: (vibration.left_motor * 65535.0) as u16,
            wRightMotorSpeed: (vibration.right_motor * 65535.0) as u16,
        };
        unsafe { XInputSetState(slot, &mut motors) == ERROR_SUCCESS }
    }
}
