// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logical key identities

use std::{fmt, ops::BitOr};

use serde::Serialize;

/// Symbolic key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[rustfmt::skip]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    D0, D1, D2, D3, D4, D5, D6, D7, D8, D9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    UpArrow, DownArrow, LeftArrow, RightArrow,
    Home, End, PageUp, PageDown,
    Insert, Delete, Backspace, Tab, Enter, Escape, Spacebar,
    NumPad0, NumPad1, NumPad2, NumPad3, NumPad4,
    NumPad5, NumPad6, NumPad7, NumPad8, NumPad9,
    Multiply, Add, Subtract, Decimal, Divide,
    Clear, Pause, PrintScreen,
}

impl Key {
    /// Letter keys in alphabetical order
    #[rustfmt::skip]
    pub const LETTERS: [Self; 26] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G, Self::H, Self::I,
        Self::J, Self::K, Self::L, Self::M, Self::N, Self::O, Self::P, Self::Q, Self::R,
        Self::S, Self::T, Self::U, Self::V, Self::W, Self::X, Self::Y, Self::Z,
    ];

    /// Digit keys of the main keyboard
    #[rustfmt::skip]
    pub const DIGITS: [Self; 10] = [
        Self::D0, Self::D1, Self::D2, Self::D3, Self::D4,
        Self::D5, Self::D6, Self::D7, Self::D8, Self::D9,
    ];

    /// Function keys F1 to F12
    #[rustfmt::skip]
    pub const FUNCTION: [Self; 12] = [
        Self::F1, Self::F2, Self::F3, Self::F4, Self::F5, Self::F6,
        Self::F7, Self::F8, Self::F9, Self::F10, Self::F11, Self::F12,
    ];

    /// Digit keys of the numeric keypad
    #[rustfmt::skip]
    pub const NUMPAD_DIGITS: [Self; 10] = [
        Self::NumPad0, Self::NumPad1, Self::NumPad2, Self::NumPad3, Self::NumPad4,
        Self::NumPad5, Self::NumPad6, Self::NumPad7, Self::NumPad8, Self::NumPad9,
    ];
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            digit if Self::DIGITS.contains(digit) => {
                write!(f, "{}", *digit as u8 - Self::D0 as u8)
            }
            Self::UpArrow => f.write_str("Up Arrow"),
            Self::DownArrow => f.write_str("Down Arrow"),
            Self::LeftArrow => f.write_str("Left Arrow"),
            Self::RightArrow => f.write_str("Right Arrow"),
            Self::PageUp => f.write_str("Page Up"),
            Self::PageDown => f.write_str("Page Down"),
            Self::Spacebar => f.write_str("Space"),
            Self::PrintScreen => f.write_str("Print Screen"),
            key => write!(f, "{key:?}"),
        }
    }
}

/// Set of modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        control: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            shift: self.shift || rhs.shift,
            alt: self.alt || rhs.alt,
            control: self.control || rhs.control,
        }
    }
}

impl fmt::Display for Modifiers {
    /// Modifiers as a key chord prefix, e.g. `Ctrl+Alt+`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.control {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        Ok(())
    }
}

/// A key press as a decoder is expected to report it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyIdentity {
    pub key: Key,
    /// Character produced by the key press, `'\0'` for none
    pub key_char: char,
    pub modifiers: Modifiers,
}

impl KeyIdentity {
    pub const fn new(key: Key, key_char: char, modifiers: Modifiers) -> Self {
        Self {
            key,
            key_char,
            modifiers,
        }
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers, self.key)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chord_names() {
        let identity = KeyIdentity::new(
            Key::F5,
            '\0',
            Modifiers::SHIFT | Modifiers::CONTROL | Modifiers::ALT,
        );
        assert_eq!(identity.to_string(), "Ctrl+Alt+Shift+F5");
        assert_eq!(
            KeyIdentity::new(Key::PageUp, '\0', Modifiers::NONE).to_string(),
            "Page Up"
        );
        assert_eq!(
            KeyIdentity::new(Key::D7, '7', Modifiers::ALT).to_string(),
            "Alt+7"
        );
    }

    #[test]
    fn modifier_union() {
        let modifiers = Modifiers::ALT | Modifiers::NONE;
        assert_eq!(modifiers, Modifiers::ALT);
        assert_eq!(
            Modifiers::SHIFT | Modifiers::CONTROL,
            Modifiers {
                shift: true,
                alt: false,
                control: true,
            }
        );
    }

    #[test]
    fn key_tables() {
        assert_eq!(Key::LETTERS[25], Key::Z);
        assert_eq!(Key::DIGITS[9].to_string(), "9");
        assert_eq!(Key::FUNCTION[11], Key::F12);
        assert_eq!(Key::NUMPAD_DIGITS[0].to_string(), "NumPad0");
    }
}
