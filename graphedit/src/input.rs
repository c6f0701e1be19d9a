//! Host-neutral input vocabulary fed to `Editor::handle`.

use crate::model::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Toggles objects into/out of the selection.
    pub shift: bool,
    /// Held for temporary Draw mode.
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// DOM `MouseEvent.button` numbering.
    pub fn from_dom(button: i16) -> Button {
        match button {
            1 => Button::Middle,
            2 => Button::Secondary,
            _ => Button::Primary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Delete,
    Escape,
    Control,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Key {
        match key {
            "Delete" | "Del" => Key::Delete,
            "Escape" | "Esc" => Key::Escape,
            "Control" => Key::Control,
            _ => Key::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        pos: Vec2,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerEnter {
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer left the canvas; ends any gesture like a release.
    PointerLeave {
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Focus moved elsewhere (e.g. a dialog); held modifiers are forgotten.
    FocusLost,
}

impl InputEvent {
    pub fn down(x: f64, y: f64) -> Self {
        InputEvent::PointerDown { pos: Vec2::new(x, y), button: Button::Primary, modifiers: Modifiers::NONE }
    }
    pub fn moved(x: f64, y: f64) -> Self {
        InputEvent::PointerMove { pos: Vec2::new(x, y), modifiers: Modifiers::NONE }
    }
    pub fn up(x: f64, y: f64) -> Self {
        InputEvent::PointerUp { pos: Vec2::new(x, y), modifiers: Modifiers::NONE }
    }
    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    pub fn with_modifiers(mut self, m: Modifiers) -> Self {
        match &mut self {
            InputEvent::PointerDown { modifiers, .. }
            | InputEvent::PointerMove { modifiers, .. }
            | InputEvent::PointerUp { modifiers, .. }
            | InputEvent::PointerEnter { modifiers }
            | InputEvent::PointerLeave { modifiers }
            | InputEvent::KeyDown { modifiers, .. }
            | InputEvent::KeyUp { modifiers, .. } => *modifiers = m,
            InputEvent::FocusLost => {}
        }
        self
    }
}
