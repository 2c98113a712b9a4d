pub mod panel;
pub mod popup;
pub mod selection;

pub use panel::{ImageryControl, PanelViewModel, ViewBindings};
pub use popup::{PopupBuilder, PopupContent};
pub use selection::{SelectionController, SelectionState, Transition};
