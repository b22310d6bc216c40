//! Key code tables for the three keycode modes the native library accepts
//!
//! - `HidCode`: USB HID Usage Tables, Keyboard/Keypad page (section 10)
//! - `VirtualKey`: Windows virtual-key codes (also used by `VirtualKeyTranslate`)
//! - `ScanCode1`: PC/AT scan code set 1, extended keys as `0xE0xx`

use crate::types::KeycodeType;

macro_rules! keycode_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $name {
            $($variant = $code),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn code(self) -> u16 {
                self as u16
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }

            pub fn from_code(code: u16) -> Option<Self> {
                Self::ALL.iter().copied().find(|k| k.code() == code)
            }

            /// Case-insensitive lookup by variant name
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|k| k.name().eq_ignore_ascii_case(name))
            }
        }
    };
}

keycode_table! {
    /// USB HID keyboard usage codes
    HidCode {
        A = 0x04, B = 0x05, C = 0x06, D = 0x07, E = 0x08, F = 0x09, G = 0x0A,
        H = 0x0B, I = 0x0C, J = 0x0D, K = 0x0E, L = 0x0F, M = 0x10, N = 0x11,
        O = 0x12, P = 0x13, Q = 0x14, R = 0x15, S = 0x16, T = 0x17, U = 0x18,
        V = 0x19, W = 0x1A, X = 0x1B, Y = 0x1C, Z = 0x1D,
        Digit1 = 0x1E, Digit2 = 0x1F, Digit3 = 0x20, Digit4 = 0x21, Digit5 = 0x22,
        Digit6 = 0x23, Digit7 = 0x24, Digit8 = 0x25, Digit9 = 0x26, Digit0 = 0x27,
        Enter = 0x28, Escape = 0x29, Backspace = 0x2A, Tab = 0x2B, Space = 0x2C,
        Minus = 0x2D, Equal = 0x2E, BracketLeft = 0x2F, BracketRight = 0x30,
        Backslash = 0x31, NonUsHash = 0x32, Semicolon = 0x33, Quote = 0x34,
        Backquote = 0x35, Comma = 0x36, Period = 0x37, Slash = 0x38, CapsLock = 0x39,
        F1 = 0x3A, F2 = 0x3B, F3 = 0x3C, F4 = 0x3D, F5 = 0x3E, F6 = 0x3F,
        F7 = 0x40, F8 = 0x41, F9 = 0x42, F10 = 0x43, F11 = 0x44, F12 = 0x45,
        PrintScreen = 0x46, ScrollLock = 0x47, Pause = 0x48, Insert = 0x49,
        Home = 0x4A, PageUp = 0x4B, Delete = 0x4C, End = 0x4D, PageDown = 0x4E,
        ArrowRight = 0x4F, ArrowLeft = 0x50, ArrowDown = 0x51, ArrowUp = 0x52,
        NumLock = 0x53, NumpadDivide = 0x54, NumpadMultiply = 0x55,
        NumpadSubtract = 0x56, NumpadAdd = 0x57, NumpadEnter = 0x58,
        Numpad1 = 0x59, Numpad2 = 0x5A, Numpad3 = 0x5B, Numpad4 = 0x5C,
        Numpad5 = 0x5D, Numpad6 = 0x5E, Numpad7 = 0x5F, Numpad8 = 0x60,
        Numpad9 = 0x61, Numpad0 = 0x62, NumpadDecimal = 0x63,
        IntlBackslash = 0x64, ContextMenu = 0x65, Power = 0x66, NumpadEqual = 0x67,
        F13 = 0x68, F14 = 0x69, F15 = 0x6A, F16 = 0x6B, F17 = 0x6C, F18 = 0x6D,
        F19 = 0x6E, F20 = 0x6F, F21 = 0x70, F22 = 0x71, F23 = 0x72, F24 = 0x73,
        IntlRo = 0x87, KanaMode = 0x88, IntlYen = 0x89, Convert = 0x8A, NonConvert = 0x8B,
        ControlLeft = 0xE0, ShiftLeft = 0xE1, AltLeft = 0xE2, MetaLeft = 0xE3,
        ControlRight = 0xE4, ShiftRight = 0xE5, AltRight = 0xE6, MetaRight = 0xE7,
    }
}

keycode_table! {
    /// Windows virtual-key codes
    VirtualKey {
        Back = 0x08, Tab = 0x09, Clear = 0x0C, Return = 0x0D,
        Shift = 0x10, Control = 0x11, Menu = 0x12, Pause = 0x13, Capital = 0x14,
        Kana = 0x15, Junja = 0x17, Final = 0x18, Kanji = 0x19,
        Escape = 0x1B, Convert = 0x1C, NonConvert = 0x1D,
        Space = 0x20, Prior = 0x21, Next = 0x22, End = 0x23, Home = 0x24,
        Left = 0x25, Up = 0x26, Right = 0x27, Down = 0x28,
        Select = 0x29, Print = 0x2A, Execute = 0x2B, Snapshot = 0x2C,
        Insert = 0x2D, Delete = 0x2E, Help = 0x2F,
        Key0 = 0x30, Key1 = 0x31, Key2 = 0x32, Key3 = 0x33, Key4 = 0x34,
        Key5 = 0x35, Key6 = 0x36, Key7 = 0x37, Key8 = 0x38, Key9 = 0x39,
        A = 0x41, B = 0x42, C = 0x43, D = 0x44, E = 0x45, F = 0x46, G = 0x47,
        H = 0x48, I = 0x49, J = 0x4A, K = 0x4B, L = 0x4C, M = 0x4D, N = 0x4E,
        O = 0x4F, P = 0x50, Q = 0x51, R = 0x52, S = 0x53, T = 0x54, U = 0x55,
        V = 0x56, W = 0x57, X = 0x58, Y = 0x59, Z = 0x5A,
        LWin = 0x5B, RWin = 0x5C, Apps = 0x5D, Sleep = 0x5F,
        Numpad0 = 0x60, Numpad1 = 0x61, Numpad2 = 0x62, Numpad3 = 0x63,
        Numpad4 = 0x64, Numpad5 = 0x65, Numpad6 = 0x66, Numpad7 = 0x67,
        Numpad8 = 0x68, Numpad9 = 0x69,
        Multiply = 0x6A, Add = 0x6B, Separator = 0x6C, Subtract = 0x6D,
        Decimal = 0x6E, Divide = 0x6F,
        F1 = 0x70, F2 = 0x71, F3 = 0x72, F4 = 0x73, F5 = 0x74, F6 = 0x75,
        F7 = 0x76, F8 = 0x77, F9 = 0x78, F10 = 0x79, F11 = 0x7A, F12 = 0x7B,
        F13 = 0x7C, F14 = 0x7D, F15 = 0x7E, F16 = 0x7F, F17 = 0x80, F18 = 0x81,
        F19 = 0x82, F20 = 0x83, F21 = 0x84, F22 = 0x85, F23 = 0x86, F24 = 0x87,
        NumLock = 0x90, Scroll = 0x91,
        LShift = 0xA0, RShift = 0xA1, LControl = 0xA2, RControl = 0xA3,
        LMenu = 0xA4, RMenu = 0xA5,
        BrowserBack = 0xA6, BrowserForward = 0xA7, BrowserRefresh = 0xA8,
        BrowserStop = 0xA9, BrowserSearch = 0xAA, BrowserFavorites = 0xAB,
        BrowserHome = 0xAC,
        VolumeMute = 0xAD, VolumeDown = 0xAE, VolumeUp = 0xAF,
        MediaNextTrack = 0xB0, MediaPrevTrack = 0xB1, MediaStop = 0xB2,
        MediaPlayPause = 0xB3, LaunchMail = 0xB4, LaunchMediaSelect = 0xB5,
        LaunchApp1 = 0xB6, LaunchApp2 = 0xB7,
        Oem1 = 0xBA, OemPlus = 0xBB, OemComma = 0xBC, OemMinus = 0xBD,
        OemPeriod = 0xBE, Oem2 = 0xBF, Oem3 = 0xC0, Oem4 = 0xDB, Oem5 = 0xDC,
        Oem6 = 0xDD, Oem7 = 0xDE, Oem8 = 0xDF, Oem102 = 0xE2,
    }
}

keycode_table! {
    /// Scan code set 1 make codes
    ScanCode1 {
        Escape = 0x01,
        Digit1 = 0x02, Digit2 = 0x03, Digit3 = 0x04, Digit4 = 0x05, Digit5 = 0x06,
        Digit6 = 0x07, Digit7 = 0x08, Digit8 = 0x09, Digit9 = 0x0A, Digit0 = 0x0B,
        Minus = 0x0C, Equal = 0x0D, Backspace = 0x0E, Tab = 0x0F,
        Q = 0x10, W = 0x11, E = 0x12, R = 0x13, T = 0x14, Y = 0x15, U = 0x16,
        I = 0x17, O = 0x18, P = 0x19, BracketLeft = 0x1A, BracketRight = 0x1B,
        Enter = 0x1C, ControlLeft = 0x1D,
        A = 0x1E, S = 0x1F, D = 0x20, F = 0x21, G = 0x22, H = 0x23, J = 0x24,
        K = 0x25, L = 0x26, Semicolon = 0x27, Quote = 0x28, Backquote = 0x29,
        ShiftLeft = 0x2A, Backslash = 0x2B,
        Z = 0x2C, X = 0x2D, C = 0x2E, V = 0x2F, B = 0x30, N = 0x31, M = 0x32,
        Comma = 0x33, Period = 0x34, Slash = 0x35, ShiftRight = 0x36,
        NumpadMultiply = 0x37, AltLeft = 0x38, Space = 0x39, CapsLock = 0x3A,
        F1 = 0x3B, F2 = 0x3C, F3 = 0x3D, F4 = 0x3E, F5 = 0x3F, F6 = 0x40,
        F7 = 0x41, F8 = 0x42, F9 = 0x43, F10 = 0x44,
        NumLock = 0x45, ScrollLock = 0x46,
        Numpad7 = 0x47, Numpad8 = 0x48, Numpad9 = 0x49, NumpadSubtract = 0x4A,
        Numpad4 = 0x4B, Numpad5 = 0x4C, Numpad6 = 0x4D, NumpadAdd = 0x4E,
        Numpad1 = 0x4F, Numpad2 = 0x50, Numpad3 = 0x51, Numpad0 = 0x52,
        NumpadDecimal = 0x53, IntlBackslash = 0x56, F11 = 0x57, F12 = 0x58,
        IntlRo = 0x73, IntlYen = 0x7D,
        NumpadEnter = 0xE01C, ControlRight = 0xE01D, NumpadDivide = 0xE035,
        PrintScreen = 0xE037, AltRight = 0xE038, Home = 0xE047, ArrowUp = 0xE048,
        PageUp = 0xE049, ArrowLeft = 0xE04B, ArrowRight = 0xE04D, End = 0xE04F,
        ArrowDown = 0xE050, PageDown = 0xE051, Insert = 0xE052, Delete = 0xE053,
        MetaLeft = 0xE05B, MetaRight = 0xE05C, ContextMenu = 0xE05D,
    }
}

/// Name of a key code under the given mode, `"?"` if not in the table
pub fn key_name(mode: KeycodeType, code: u16) -> &'static str {
    let name = match mode {
        KeycodeType::Hid => HidCode::from_code(code).map(HidCode::name),
        KeycodeType::ScanCode1 => ScanCode1::from_code(code).map(ScanCode1::name),
        KeycodeType::VirtualKey | KeycodeType::VirtualKeyTranslate => {
            VirtualKey::from_code(code).map(VirtualKey::name)
        }
    };
    name.unwrap_or("?")
}

/// Resolve a key name under the given mode
///
/// Accepts table names (`"ArrowUp"`, `"LShift"`), bare digits (`"1"`) and
/// numeric codes (`"26"`, `"0x1A"`).
pub fn key_code_from_name(mode: KeycodeType, name: &str) -> Option<u16> {
    let name = name.trim();
    if let Some(code) = parse_numeric(name) {
        return Some(code);
    }

    let digit_name;
    let lookup = if name.len() == 1 && name.as_bytes()[0].is_ascii_digit() {
        digit_name = match mode {
            KeycodeType::VirtualKey | KeycodeType::VirtualKeyTranslate => format!("Key{name}"),
            _ => format!("Digit{name}"),
        };
        digit_name.as_str()
    } else {
        name
    };

    match mode {
        KeycodeType::Hid => HidCode::from_name(lookup).map(HidCode::code),
        KeycodeType::ScanCode1 => ScanCode1::from_name(lookup).map(ScanCode1::code),
        KeycodeType::VirtualKey | KeycodeType::VirtualKeyTranslate => {
            VirtualKey::from_name(lookup).map(VirtualKey::code)
        }
    }
}

fn parse_numeric(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if s.len() > 1 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hid_codes() {
        assert_eq!(HidCode::A.code(), 0x04);
        assert_eq!(HidCode::Z.code(), 0x1D);
        assert_eq!(HidCode::Escape.code(), 0x29);
        assert_eq!(HidCode::from_code(0x1A), Some(HidCode::W));
        assert_eq!(HidCode::from_code(0x00), None);
        assert_eq!(HidCode::from_name("arrowup"), Some(HidCode::ArrowUp));
    }

    #[test]
    fn test_tables_have_unique_names() {
        for names in [
            HidCode::ALL.iter().map(|k| k.name()).collect::<Vec<_>>(),
            VirtualKey::ALL.iter().map(|k| k.name()).collect(),
            ScanCode1::ALL.iter().map(|k| k.name()).collect(),
        ] {
            let unique: HashSet<_> = names.iter().map(|n| n.to_ascii_lowercase()).collect();
            assert_eq!(unique.len(), names.len());
        }
    }

    #[test]
    fn test_scan_code_extended_keys() {
        assert_eq!(ScanCode1::ArrowUp.code(), 0xE048);
        assert_eq!(ScanCode1::from_code(0x48), Some(ScanCode1::Numpad8));
        assert_eq!(key_name(KeycodeType::ScanCode1, 0xE01D), "ControlRight");
    }

    #[test]
    fn test_key_name_per_mode() {
        assert_eq!(key_name(KeycodeType::Hid, 0x1A), "W");
        assert_eq!(key_name(KeycodeType::VirtualKey, 0x57), "W");
        assert_eq!(key_name(KeycodeType::VirtualKeyTranslate, 0xA0), "LShift");
        assert_eq!(key_name(KeycodeType::ScanCode1, 0x11), "W");
        assert_eq!(key_name(KeycodeType::Hid, 0xFFFF), "?");
    }

    #[test]
    fn test_key_code_from_name() {
        assert_eq!(key_code_from_name(KeycodeType::Hid, "w"), Some(0x1A));
        assert_eq!(key_code_from_name(KeycodeType::Hid, "1"), Some(0x1E));
        assert_eq!(key_code_from_name(KeycodeType::VirtualKey, "1"), Some(0x31));
        assert_eq!(key_code_from_name(KeycodeType::ScanCode1, "1"), Some(0x02));
        assert_eq!(key_code_from_name(KeycodeType::ScanCode1, "Space"), Some(0x39));
        assert_eq!(key_code_from_name(KeycodeType::Hid, "0x2C"), Some(0x2C));
        assert_eq!(key_code_from_name(KeycodeType::Hid, "44"), Some(44));
        assert_eq!(key_code_from_name(KeycodeType::Hid, "NotAKey"), None);
    }
}
