#![cfg(target_os = "windows")]

//! Windows input backends.
//!
//! - **Messages**: keyboard and mouse window messages routed into
//!   [`Keyboard`](crate::keyboard::Keyboard) and [`Mouse`](crate::mouse::Mouse).
//! - **Raw Input**: relative mouse motion from `WM_INPUT`.
//! - **Cursor**: [`Win32Cursor`] hides, clips and warps the system cursor.
//! - **XInput**: [`XInputGamepads`] as a [`GamepadBackend`](crate::backends::GamepadBackend).
//!
//! The host owns the message loop. A minimal window procedure:
//!
//! ```ignore
//! fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
//!     frameinput::backends::windows::process_message(&keyboard, &mouse, msg, wparam, lparam);
//!     unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
//! }
//! ```
//!
//! Call [`register_raw_mouse`] once the window exists, or relative mode receives
//! no motion.

pub mod cursor;
pub mod messages;
pub mod raw_input;
pub mod xinput_devices;

pub use cursor::Win32Cursor;
pub use messages::{process_keyboard_message, process_message, process_mouse_message};
pub use raw_input::register_raw_mouse;
pub use xinput_devices::{XInputGamepads, XUSER_MAX_COUNT};
