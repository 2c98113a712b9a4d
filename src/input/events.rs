use crate::layers::marker::ElementId;
use serde::{Deserialize, Serialize};

/// User input forwarded by the host, already resolved to map elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Click or tap on a rendered element
    ElementClick { element: ElementId },
    /// The street view button inside an element's popup
    PopupAction { element: ElementId },
    /// The panel's imagery control
    ImageryActivate,
    /// The panel's close button
    CloseControl,
    /// Keyboard input
    KeyPress { key: KeyCode },
}

impl InputEvent {
    /// The element the event targets, if any
    pub fn element(&self) -> Option<ElementId> {
        match self {
            InputEvent::ElementClick { element } | InputEvent::PopupAction { element } => {
                Some(*element)
            }
            _ => None,
        }
    }

    pub fn is_keyboard_event(&self) -> bool {
        matches!(self, InputEvent::KeyPress { .. })
    }
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Escape,
    Enter,
    Space,
    Tab,
    Other(u32),
}

impl KeyCode {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => KeyCode::Escape,
            "Enter" => KeyCode::Enter,
            " " | "Spacebar" => KeyCode::Space,
            "Tab" => KeyCode::Tab,
            other => KeyCode::Other(other.chars().next().map_or(0, u32::from)),
        }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

impl From<bool> for EventHandled {
    fn from(handled: bool) -> Self {
        if handled {
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }
}
