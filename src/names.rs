//! String names for keys, buttons and analog channels.
//!
//! Lookups are case-insensitive and ignore surrounding whitespace. The tables are
//! closed: anything not listed resolves to `None`.
//!
//! | family   | examples                                                      |
//! |----------|---------------------------------------------------------------|
//! | keys     | `a`, `7`, `up`, `[3]`, `[+]`, `space`, `left shift`, `f11`, `;` |
//! | buttons  | `mouse 0`, `mouse x2`, `joystick button 3`, `joystick dpad up`, `win` |
//! | gamepad  | `left x`, `right y`, `left trigger`                           |
//! | mouse    | `x`, `y`, `scroll wheel`                                      |
//!
//! Names covering either side of a modifier (`shift`, `ctrl`, `alt`, `win`) resolve
//! to a pair of controls; a query on such a name is true when either is.

use crate::gamepad::{GamepadAxis, GamepadButton};
use crate::keyboard::Key;
use crate::mouse::{MouseAxis, MouseButton};

/// One physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Key(Key),
    Mouse(MouseButton),
    Gamepad(GamepadButton),
}

/// What a name refers to: one control, or either of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    One(Control),
    Either(Control, Control),
}

impl Binding {
    pub fn controls(&self) -> impl Iterator<Item = Control> {
        let (first, second) = match *self {
            Binding::One(c) => (c, None),
            Binding::Either(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }
}

fn key(k: Key) -> Option<Binding> {
    Some(Binding::One(Control::Key(k)))
}

fn either(a: Key, b: Key) -> Option<Binding> {
    Some(Binding::Either(Control::Key(a), Control::Key(b)))
}

fn pad(b: GamepadButton) -> Option<Binding> {
    Some(Binding::One(Control::Gamepad(b)))
}

fn mouse(b: MouseButton) -> Option<Binding> {
    Some(Binding::One(Control::Mouse(b)))
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Resolve a keyboard key name.
pub fn key_binding(name: &str) -> Option<Binding> {
    let name = normalize(name);
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Key::letter(c).map(|k| Binding::One(Control::Key(k)));
        }
        if let Some(d) = c.to_digit(10) {
            return Key::digit(d as u8).map(|k| Binding::One(Control::Key(k)));
        }
    }

    if let Some(inner) = name.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return match inner {
            "+" => key(Key::ADD),
            "-" => key(Key::SUBTRACT),
            "*" => key(Key::MULTIPLY),
            "/" => key(Key::DIVIDE),
            "=" => key(Key::NUMPAD_EQUAL),
            "." => key(Key::DECIMAL),
            _ => inner
                .parse::<u8>()
                .ok()
                .and_then(Key::numpad)
                .map(|k| Binding::One(Control::Key(k))),
        };
    }

    if let Some(n) = name.strip_prefix('f').and_then(|s| s.parse::<u8>().ok()) {
        return Key::function(n).map(|k| Binding::One(Control::Key(k)));
    }

    match name.as_str() {
        "up" => key(Key::UP),
        "down" => key(Key::DOWN),
        "left" => key(Key::LEFT),
        "right" => key(Key::RIGHT),
        "caps" | "caps lock" => key(Key::CAPS_LOCK),
        "space" => key(Key::SPACE),
        "delete" => key(Key::DELETE),
        "ins" | "insert" => key(Key::INSERT),
        "home" => key(Key::HOME),
        "end" => key(Key::END),
        "enter" | "return" => key(Key::ENTER),
        "esc" | "escape" => key(Key::ESCAPE),
        "tab" => key(Key::TAB),
        "backspace" => key(Key::BACK),
        "pause" => key(Key::PAUSE),
        "numlock" => key(Key::NUM_LOCK),
        "page up" => key(Key::PAGE_UP),
        "page down" => key(Key::PAGE_DOWN),
        "shift" => either(Key::LEFT_SHIFT, Key::RIGHT_SHIFT),
        "ctrl" => either(Key::LEFT_CONTROL, Key::RIGHT_CONTROL),
        "alt" => either(Key::LEFT_ALT, Key::RIGHT_ALT),
        "left shift" => key(Key::LEFT_SHIFT),
        "right shift" => key(Key::RIGHT_SHIFT),
        "left ctrl" => key(Key::LEFT_CONTROL),
        "right ctrl" => key(Key::RIGHT_CONTROL),
        "left alt" => key(Key::LEFT_ALT),
        "right alt" => key(Key::RIGHT_ALT),
        "left win" => key(Key::LEFT_WINDOWS),
        "right win" => key(Key::RIGHT_WINDOWS),
        "menu" => key(Key::APPS),
        ";" => key(Key::OEM_SEMICOLON),
        "+" | "=" => key(Key::OEM_PLUS),
        "," => key(Key::OEM_COMMA),
        "-" => key(Key::OEM_MINUS),
        "." => key(Key::OEM_PERIOD),
        "?" | "/" => key(Key::OEM_QUESTION),
        "~" | "`" => key(Key::OEM_TILDE),
        "[" => key(Key::OEM_OPEN_BRACKETS),
        "]" => key(Key::OEM_CLOSE_BRACKETS),
        "|" | "\\" => key(Key::OEM_PIPE),
        "'" => key(Key::OEM_QUOTES),
        _ => None,
    }
}

/// Resolve a mouse, gamepad or `win` button name.
pub fn button_binding(name: &str) -> Option<Binding> {
    use GamepadButton as G;

    let name = normalize(name);
    if name == "win" {
        return either(Key::LEFT_WINDOWS, Key::RIGHT_WINDOWS);
    }

    if let Some(rest) = name.strip_prefix("mouse ") {
        return match rest.trim() {
            "0" => mouse(MouseButton::Left),
            "1" => mouse(MouseButton::Right),
            "2" => mouse(MouseButton::Middle),
            "3" | "x1" => mouse(MouseButton::X1),
            "4" | "x2" => mouse(MouseButton::X2),
            _ => None,
        };
    }

    let rest = name.strip_prefix("joystick ")?.trim();
    if let Some(n) = rest.strip_prefix("button ") {
        const NUMBERED: [GamepadButton; 10] = [
            G::A,
            G::B,
            G::X,
            G::Y,
            G::LeftShoulder,
            G::RightShoulder,
            G::Back,
            G::Start,
            G::LeftStick,
            G::RightStick,
        ];
        let n: usize = n.trim().parse().ok()?;
        return n.checked_sub(1).and_then(|i| NUMBERED.get(i)).and_then(|b| pad(*b));
    }

    match rest {
        "a" | "cross" => pad(G::A),
        "b" | "circle" => pad(G::B),
        "x" | "square" => pad(G::X),
        "y" | "triangle" => pad(G::Y),
        "back" | "view" => pad(G::Back),
        "start" | "menu" => pad(G::Start),
        "left shoulder" | "lb" => pad(G::LeftShoulder),
        "right shoulder" | "rb" => pad(G::RightShoulder),
        "left stick" | "ls" => pad(G::LeftStick),
        "right stick" | "rs" => pad(G::RightStick),
        "left trigger" | "lt" => pad(G::LeftTrigger),
        "right trigger" | "rt" => pad(G::RightTrigger),
        "dpad up" => pad(G::DPadUp),
        "dpad down" => pad(G::DPadDown),
        "dpad left" => pad(G::DPadLeft),
        "dpad right" => pad(G::DPadRight),
        "left stick up" => pad(G::LeftStickUp),
        "left stick down" => pad(G::LeftStickDown),
        "left stick left" => pad(G::LeftStickLeft),
        "left stick right" => pad(G::LeftStickRight),
        "right stick up" => pad(G::RightStickUp),
        "right stick down" => pad(G::RightStickDown),
        "right stick left" => pad(G::RightStickLeft),
        "right stick right" => pad(G::RightStickRight),
        _ => None,
    }
}

/// Resolve a name from either table, keys first.
pub fn control_binding(name: &str) -> Option<Binding> {
    key_binding(name).or_else(|| button_binding(name))
}

pub fn gamepad_axis(name: &str) -> Option<GamepadAxis> {
    match normalize(name).replace('_', " ").as_str() {
        "left x" => Some(GamepadAxis::LeftX),
        "left y" => Some(GamepadAxis::LeftY),
        "right x" => Some(GamepadAxis::RightX),
        "right y" => Some(GamepadAxis::RightY),
        "left trigger" => Some(GamepadAxis::LeftTrigger),
        "right trigger" => Some(GamepadAxis::RightTrigger),
        _ => None,
    }
}

pub fn mouse_axis(name: &str) -> Option<MouseAxis> {
    match normalize(name).replace('_', " ").as_str() {
        "x" => Some(MouseAxis::X),
        "y" => Some(MouseAxis::Y),
        "scroll wheel" | "scrollwheel" => Some(MouseAxis::ScrollWheel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_key(name: &str) -> Option<Key> {
        match key_binding(name)? {
            Binding::One(Control::Key(k)) => Some(k),
            _ => None,
        }
    }

    #[test]
    fn letters_and_digits() {
        assert_eq!(one_key("a"), Some(Key::A));
        assert_eq!(one_key("Z"), Key::letter('z'));
        assert_eq!(one_key("0"), Some(Key::D0));
        assert_eq!(one_key(" 7 "), Key::digit(7));
    }

    #[test]
    fn keypad_names() {
        assert_eq!(one_key("[0]"), Some(Key::NUMPAD0));
        assert_eq!(one_key("[9]"), Key::numpad(9));
        assert_eq!(one_key("[+]"), Some(Key::ADD));
        assert_eq!(one_key("[=]"), Some(Key::NUMPAD_EQUAL));
        assert_eq!(one_key("[10]"), None);
    }

    #[test]
    fn named_keys_are_case_insensitive() {
        assert_eq!(one_key("Page Up"), Some(Key::PAGE_UP));
        assert_eq!(one_key("ESC"), Some(Key::ESCAPE));
        assert_eq!(one_key("f12"), Key::function(12));
        assert_eq!(one_key("~"), Some(Key::OEM_TILDE));
        assert_eq!(one_key("'"), Some(Key::OEM_QUOTES));
    }

    #[test]
    fn modifiers_cover_both_sides() {
        let shift = key_binding("shift").unwrap();
        let controls: Vec<_> = shift.controls().collect();
        assert_eq!(
            controls,
            vec![Control::Key(Key::LEFT_SHIFT), Control::Key(Key::RIGHT_SHIFT)]
        );
        assert_eq!(one_key("left alt"), Some(Key::LEFT_ALT));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(key_binding("hyper"), None);
        assert_eq!(key_binding(""), None);
        assert_eq!(key_binding("f0"), None);
        assert_eq!(button_binding("mouse 9"), None);
        assert_eq!(button_binding("joystick button 11"), None);
        assert_eq!(button_binding("joystick button 0"), None);
    }

    #[test]
    fn mouse_buttons_follow_left_right_middle() {
        assert_eq!(button_binding("mouse 0"), mouse(MouseButton::Left));
        assert_eq!(button_binding("mouse 1"), mouse(MouseButton::Right));
        assert_eq!(button_binding("mouse 2"), mouse(MouseButton::Middle));
        assert_eq!(button_binding("Mouse X2"), mouse(MouseButton::X2));
    }

    #[test]
    fn joystick_numbering_and_aliases() {
        assert_eq!(button_binding("joystick button 1"), pad(GamepadButton::A));
        assert_eq!(button_binding("joystick button 7"), pad(GamepadButton::Back));
        assert_eq!(button_binding("joystick button 10"), pad(GamepadButton::RightStick));
        assert_eq!(button_binding("joystick view"), button_binding("joystick back"));
        assert_eq!(button_binding("joystick cross"), pad(GamepadButton::A));
        assert_eq!(button_binding("joystick dpad left"), pad(GamepadButton::DPadLeft));
    }

    #[test]
    fn win_is_a_button_not_a_key() {
        assert!(key_binding("win").is_none());
        assert_eq!(button_binding("win"), either(Key::LEFT_WINDOWS, Key::RIGHT_WINDOWS));
        assert!(control_binding("win").is_some());
    }

    #[test]
    fn axis_names() {
        assert_eq!(gamepad_axis("Left X"), Some(GamepadAxis::LeftX));
        assert_eq!(gamepad_axis("right_trigger"), Some(GamepadAxis::RightTrigger));
        assert_eq!(mouse_axis("ScrollWheel"), Some(MouseAxis::ScrollWheel));
        assert_eq!(mouse_axis("z"), None);
    }
}
