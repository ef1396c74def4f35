//! Win32 cursor control.

#![cfg(target_os = "windows")]

use crate::mouse::{CursorControl, WindowHandle};
use log::warn;
use windows_sys::Win32::Foundation::{HWND, POINT, RECT};
use windows_sys::Win32::Graphics::Gdi::ClientToScreen;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    ClipCursor, GetClientRect, GetSystemMetrics, SetCursorPos, ShowCursor, SM_MOUSEPRESENT,
};

/// [`CursorControl`] backed by the system cursor.
///
/// `ShowCursor` keeps a display counter; visibility changes drive it across zero
/// instead of assuming balanced calls.
#[derive(Debug)]
pub struct Win32Cursor {
    visible: bool,
}

impl Default for Win32Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Cursor {
    pub fn new() -> Self {
        Self { visible: true }
    }
}

impl CursorControl for Win32Cursor {
    fn set_visible(&mut self, visible: bool) {
        unsafe {
            if visible {
                while ShowCursor(1) < 0 {}
            } else {
                while ShowCursor(0) >= 0 {}
            }
        }
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn confine(&mut self, window: WindowHandle) {
        let hwnd = window.0 as HWND;
        unsafe {
            let mut rect: RECT = core::mem::zeroed();
            if GetClientRect(hwnd, &mut rect) == 0 {
                warn!("GetClientRect failed for {:#x}; cursor not confined", window.0);
                return;
            }
            let mut top_left = POINT {
                x: rect.left,
                y: rect.top,
            };
            let mut bottom_right = POINT {
                x: rect.right,
                y: rect.bottom,
            };
            ClientToScreen(hwnd, &mut top_left);
            ClientToScreen(hwnd, &mut bottom_right);
            let screen = RECT {
                left: top_left.x,
                top: top_left.y,
                right: bottom_right.x,
                bottom: bottom_right.y,
            };
            ClipCursor(&screen);
        }
    }

    fn release(&mut self) {
        unsafe {
            ClipCursor(core::ptr::null());
        }
    }

    fn client_to_screen(&self, window: WindowHandle, x: f32, y: f32) -> Option<(f32, f32)> {
        let mut point = POINT {
            x: x as i32,
            y: y as i32,
        };
        let ok = unsafe { ClientToScreen(window.0 as HWND, &mut point) };
        (ok != 0).then_some((point.x as f32, point.y as f32))
    }

    fn set_position(&mut self, x: f32, y: f32) {
        unsafe {
            SetCursorPos(x as i32, y as i32);
        }
    }

    fn mouse_present(&self) -> bool {
        unsafe { GetSystemMetrics(SM_MOUSEPRESENT) != 0 }
    }
}
