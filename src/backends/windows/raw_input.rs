//! Windows Raw Input helpers (mouse).
//!
//! Only relative mouse motion is taken from `WM_INPUT`; keys, buttons and the
//! cursor position come from the regular window messages (see
//! [`messages`](super::messages)).
//!
//! ## Conventions
//! - Deltas are reported in raw OS units (counts), unscaled.
//! - Packets flagged `MOUSE_MOVE_ABSOLUTE` (remote desktop, tablets) carry no
//!   relative motion and are dropped.

#![cfg(target_os = "windows")]

use crate::error::{InputError, Result};
use crate::mouse::WindowHandle;
use core::ffi::c_void;
use windows_sys::Win32::Foundation::HWND;
use windows_sys::Win32::UI::Input::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawMousePacket {
    /// Relative delta X (raw counts).
    pub dx: i32,
    /// Relative delta Y (raw counts).
    pub dy: i32,
}

// Local constants (avoid relying on module exports that vary by windows-sys version)
const MOUSE_MOVE_ABSOLUTE: u16 = 0x0001;
const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_MOUSE: u16 = 0x02;

/// Ask Windows to deliver raw mouse packets to `window`.
pub fn register_raw_mouse(window: WindowHandle) -> Result<()> {
    let device = RAWINPUTDEVICE {
        usUsagePage: HID_USAGE_PAGE_GENERIC,
        usUsage: HID_USAGE_GENERIC_MOUSE,
        dwFlags: 0,
        hwndTarget: window.0 as HWND,
    };
    let ok = unsafe {
        RegisterRawInputDevices(&device, 1, core::mem::size_of::<RAWINPUTDEVICE>() as u32)
    };
    if ok == 0 {
        return Err(InputError::platform_unavailable(
            "raw input",
            std::io::Error::last_os_error().to_string(),
        ));
    }
    Ok(())
}

/// Parse a `WM_INPUT` lparam into a mouse packet (if applicable).
pub(crate) fn read_wm_input(lparam: isize) -> Option<RawMousePacket> {
    unsafe {
        // Query size
        let mut size: u32 = 0;
        let r0 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            core::ptr::null_mut(),
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r1 == u32::MAX {
            return None;
        }

        read_raw_input_bytes(&buf)
    }
}

/// Parse a raw `RID_INPUT` payload (bytes returned by `GetRawInputData`).
pub(crate) fn read_raw_input_bytes(buf: &[u8]) -> Option<RawMousePacket> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
    if buf.len() < hdr_sz + core::mem::size_of::<RAWMOUSE>() {
        return None;
    }

    unsafe {
        let hdr: RAWINPUTHEADER = core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        if hdr.dwType != RIM_TYPEMOUSE {
            return None;
        }
        let m: RAWMOUSE = core::ptr::read_unaligned(buf.as_ptr().add(hdr_sz) as *const RAWMOUSE);
        if (m.usFlags as u16 & MOUSE_MOVE_ABSOLUTE) != 0 {
            return None;
        }
        Some(RawMousePacket {
            dx: m.lLastX,
            dy: m.lLastY,
        })
    }
}
