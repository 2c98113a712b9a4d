pub mod events;

pub use events::{EventHandled, InputEvent, KeyCode};
