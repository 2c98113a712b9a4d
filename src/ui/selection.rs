//! Selection state machine
//!
//! Exactly one permit can be selected at a time. While something is selected
//! its element is on the map surface and the panel is open; with nothing
//! selected the panel is closed and holds no content.

use crate::{
    core::geo::LatLng,
    data::feature::Feature,
    imagery::{build_viewer_link, ImageryProvider},
    input::events::KeyCode,
    layers::marker::ElementId,
    traits::{LinkTarget, MapSurface, PanOptions},
    ui::panel::{PanelViewModel, ViewBindings},
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    NoSelection,
    Selected {
        feature: Arc<Feature>,
        element: ElementId,
    },
}

impl SelectionState {
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    pub fn element(&self) -> Option<ElementId> {
        match self {
            Self::Selected { element, .. } => Some(*element),
            Self::NoSelection => None,
        }
    }

    pub fn feature(&self) -> Option<&Arc<Feature>> {
        match self {
            Self::Selected { feature, .. } => Some(feature),
            Self::NoSelection => None,
        }
    }
}

/// What a request did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new feature is selected and the panel shows it.
    Selected,
    /// The selection was cleared and the panel closed.
    Closed,
    /// Nothing observable changed.
    Unchanged,
    /// The element is not on the map surface; the selection was left alone.
    Rejected,
}

pub struct SelectionController {
    state: SelectionState,
    view_model: Option<PanelViewModel>,
    bindings: ViewBindings,
    provider: ImageryProvider,
    pan: PanOptions,
}

impl SelectionController {
    pub fn new(bindings: ViewBindings, provider: ImageryProvider, pan: PanOptions) -> Self {
        Self {
            state: SelectionState::NoSelection,
            view_model: None,
            bindings,
            provider,
            pan,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn view_model(&self) -> Option<&PanelViewModel> {
        self.view_model.as_ref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.state.is_selected()
    }

    /// Selects `feature`, rendered on the surface as `element`.
    pub fn select(
        &mut self,
        surface: &mut dyn MapSurface,
        feature: Arc<Feature>,
        element: ElementId,
    ) -> Transition {
        if self.state.element() == Some(element) {
            return Transition::Unchanged;
        }
        if !surface.contains_element(element) {
            log::warn!("ignoring selection of {element}: not on the map");
            return Transition::Rejected;
        }

        let model = PanelViewModel::from_feature(&feature, &self.provider);
        self.bindings.panel.open(&model);
        match feature.coordinates {
            Some(point) => surface.pan_to(point, self.pan),
            None => log::debug!("{element} has no location, not panning"),
        }

        log::debug!("selected {element}");
        self.view_model = Some(model);
        self.state = SelectionState::Selected { feature, element };
        Transition::Selected
    }

    /// Clears the selection from any state.
    pub fn close(&mut self) -> Transition {
        let was_selected = self.state.is_selected();
        self.bindings.panel.close();
        self.view_model = None;
        self.state = SelectionState::NoSelection;

        if was_selected {
            log::debug!("selection closed");
            Transition::Closed
        } else {
            Transition::Unchanged
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Transition {
        match key {
            KeyCode::Escape => self.close(),
            _ => Transition::Unchanged,
        }
    }

    /// Opens the selected feature's imagery viewer, if it has one.
    pub fn activate_imagery(&mut self) -> bool {
        let Some(url) = self
            .view_model
            .as_ref()
            .and_then(|model| model.imagery.link_url())
        else {
            return false;
        };
        self.bindings.links.open(url, LinkTarget::NewContext);
        true
    }

    /// Opens the viewer for coordinates carried by a popup's action control.
    pub fn open_popup_action(&mut self, action: Option<LatLng>) -> bool {
        let link = build_viewer_link(
            action.map(|p| p.lat),
            action.map(|p| p.lng),
            &self.provider,
        );
        match link {
            Some(url) => {
                self.bindings.links.open(&url, LinkTarget::NewContext);
                true
            }
            None => false,
        }
    }
}
