use serde::{Deserialize, Serialize};

/// Host-defined key code. The constants are PC set-1 scancodes, which is what
/// the default bindings use; hosts with other key spaces supply their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const A: KeyCode = KeyCode(0x1E);
    pub const S: KeyCode = KeyCode(0x1F);
    pub const D: KeyCode = KeyCode(0x20);
    pub const F: KeyCode = KeyCode(0x21);
    pub const J: KeyCode = KeyCode(0x24);
    pub const K: KeyCode = KeyCode(0x25);
    pub const L: KeyCode = KeyCode(0x26);
    pub const SEMICOLON: KeyCode = KeyCode(0x27);
    pub const SPACE: KeyCode = KeyCode(0x39);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Host time when the event occurred, informational only
    pub timestamp: f64,
    pub key: KeyCode,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(key: KeyCode, timestamp: f64) -> Self {
        Self {
            timestamp,
            key,
            pressed: true,
        }
    }

    pub fn release(key: KeyCode, timestamp: f64) -> Self {
        Self {
            timestamp,
            key,
            pressed: false,
        }
    }
}
