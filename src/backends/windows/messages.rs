//! Window-message routing into the keyboard and mouse services.
//!
//! Call [`process_message`] from the window procedure for every message; it
//! returns `true` when the message was input the services consumed. The window
//! procedure should still pass the message on to `DefWindowProcW`.

#![cfg(target_os = "windows")]

use super::raw_input::read_wm_input;
use crate::keyboard::{Key, Keyboard};
use crate::mouse::{Mouse, MouseButton, MouseEvent};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{MapVirtualKeyW, MAPVK_VSC_TO_VK_EX};

// Local constants (avoid relying on module exports that vary by windows-sys version)
const WM_ACTIVATE: u32 = 0x0006;
const WM_ACTIVATEAPP: u32 = 0x001C;
const WM_INPUT: u32 = 0x00FF;
const WM_KEYDOWN: u32 = 0x0100;
const WM_KEYUP: u32 = 0x0101;
const WM_SYSKEYDOWN: u32 = 0x0104;
const WM_SYSKEYUP: u32 = 0x0105;
const WM_MOUSEMOVE: u32 = 0x0200;
const WM_LBUTTONDOWN: u32 = 0x0201;
const WM_LBUTTONUP: u32 = 0x0202;
const WM_RBUTTONDOWN: u32 = 0x0204;
const WM_RBUTTONUP: u32 = 0x0205;
const WM_MBUTTONDOWN: u32 = 0x0207;
const WM_MBUTTONUP: u32 = 0x0208;
const WM_MOUSEWHEEL: u32 = 0x020A;
const WM_XBUTTONDOWN: u32 = 0x020B;
const WM_XBUTTONUP: u32 = 0x020C;
const WA_INACTIVE: usize = 0;
const XBUTTON1: u16 = 0x0001;
const KF_EXTENDED_BIT: isize = 0x0100_0000;
const WHEEL_DELTA: f32 = 120.0;

#[inline]
fn loword(v: usize) -> u16 {
    (v & 0xFFFF) as u16
}

#[inline]
fn hiword(v: usize) -> u16 {
    ((v >> 16) & 0xFFFF) as u16
}

/// Signed client coordinates packed into a mouse message's lparam.
#[inline]
fn cursor_position(lparam: isize) -> (f32, f32) {
    let x = (lparam & 0xFFFF) as u16 as i16;
    let y = ((lparam >> 16) & 0xFFFF) as u16 as i16;
    (x as f32, y as f32)
}

/// Resolve the generic modifier codes Windows reports into sided keys.
fn sided_key(vk: u8, lparam: isize) -> Key {
    let extended = lparam & KF_EXTENDED_BIT != 0;
    match Key(vk) {
        Key::SHIFT => {
            let scancode = ((lparam >> 16) & 0xFF) as u32;
            let mapped = unsafe { MapVirtualKeyW(scancode, MAPVK_VSC_TO_VK_EX) };
            if mapped == Key::RIGHT_SHIFT.0 as u32 {
                Key::RIGHT_SHIFT
            } else {
                Key::LEFT_SHIFT
            }
        }
        Key::CONTROL if extended => Key::RIGHT_CONTROL,
        Key::CONTROL => Key::LEFT_CONTROL,
        Key::ALT if extended => Key::RIGHT_ALT,
        Key::ALT => Key::LEFT_ALT,
        key => key,
    }
}

fn focus_changed(msg: u32, wparam: usize) -> Option<bool> {
    match msg {
        WM_ACTIVATE => Some(loword(wparam) as usize != WA_INACTIVE),
        WM_ACTIVATEAPP => Some(wparam != 0),
        _ => None,
    }
}

/// Feed a keyboard-related message to `keyboard`.
pub fn process_keyboard_message(keyboard: &Keyboard, msg: u32, wparam: usize, lparam: isize) -> bool {
    if focus_changed(msg, wparam).is_some() {
        keyboard.reset();
        return true;
    }

    let down = match msg {
        WM_KEYDOWN | WM_SYSKEYDOWN => true,
        WM_KEYUP | WM_SYSKEYUP => false,
        _ => return false,
    };

    let vk = (wparam & 0xFF) as u8;
    let key = sided_key(vk, lparam);
    if down {
        keyboard.key_down(key);
    } else {
        if Key(vk) == Key::SHIFT {
            // Only one release arrives when both shifts were held.
            keyboard.key_up(Key::SHIFT);
        }
        keyboard.key_up(key);
    }
    true
}

/// Feed a mouse-related message to `mouse`.
pub fn process_mouse_message(mouse: &Mouse, msg: u32, wparam: usize, lparam: isize) -> bool {
    if let Some(active) = focus_changed(msg, wparam) {
        mouse.process(MouseEvent::FocusChanged(active));
        return true;
    }

    let button = |button: MouseButton, pressed: bool| {
        let (x, y) = cursor_position(lparam);
        mouse.process(MouseEvent::CursorMoved { x, y });
        mouse.process(MouseEvent::Button { button, pressed });
    };

    match msg {
        WM_INPUT => {
            if let Some(packet) = read_wm_input(lparam) {
                mouse.process(MouseEvent::RawMotion {
                    dx: packet.dx as f32,
                    dy: packet.dy as f32,
                });
            }
        }
        WM_MOUSEMOVE => {
            let (x, y) = cursor_position(lparam);
            mouse.process(MouseEvent::CursorMoved { x, y });
        }
        WM_LBUTTONDOWN => button(MouseButton::Left, true),
        WM_LBUTTONUP => button(MouseButton::Left, false),
        WM_RBUTTONDOWN => button(MouseButton::Right, true),
        WM_RBUTTONUP => button(MouseButton::Right, false),
        WM_MBUTTONDOWN => button(MouseButton::Middle, true),
        WM_MBUTTONUP => button(MouseButton::Middle, false),
        WM_XBUTTONDOWN | WM_XBUTTONUP => {
            let which = if hiword(wparam) == XBUTTON1 {
                MouseButton::X1
            } else {
                MouseButton::X2
            };
            button(which, msg == WM_XBUTTONDOWN);
        }
        WM_MOUSEWHEEL => {
            let delta = hiword(wparam) as i16;
            mouse.process(MouseEvent::Wheel {
                notches: delta as f32 / WHEEL_DELTA,
            });
        }
        _ => return false,
    }
    true
}

/// Route one window message to whichever service wants it.
pub fn process_message(
    keyboard: &Keyboard,
    mouse: &Mouse,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> bool {
    // Focus messages go to both.
    let k = process_keyboard_message(keyboard, msg, wparam, lparam);
    let m = process_mouse_message(mouse, msg, wparam, lparam);
    k || m
}
