use crate::{
    core::{
        config::ViewerConfig,
        geo::{LatLng, LatLngBounds},
    },
    data::{
        feature::FeatureCollection,
        store::{FeatureSource, FeatureStore},
    },
    input::events::{EventHandled, InputEvent},
    layers::{
        factory::MarkerFactory,
        marker::{ElementId, MapElement},
    },
    prelude::HashMap,
    traits::{LayerId, MapSurface},
    ui::{
        panel::ViewBindings,
        selection::{SelectionController, SelectionState, Transition},
    },
    LoadError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Ready,
    TornDown,
}

const NOT_READY: &str = "viewer is not initialised";

/// Outcome of loading a collection onto the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    pub features: usize,
    pub markers: usize,
    pub geometry_errors: usize,
    pub bounds: Option<LatLngBounds>,
    /// Set when the collection could not be loaded at all.
    pub error: Option<String>,
}

impl LoadSummary {
    fn failed(error: &LoadError) -> Self {
        Self::rejected(error.to_string())
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.error.is_none()
    }

    /// Features that produced no element.
    pub fn skipped(&self) -> usize {
        self.features.saturating_sub(self.markers)
    }
}

/// What the viewer remembers about an element it handed to the surface.
#[derive(Debug, Clone, Copy)]
struct ElementEntry {
    feature_index: usize,
    popup_action: Option<LatLng>,
}

/// The permit map: one surface, one collection, one selection.
pub struct PermitViewer<S: MapSurface> {
    config: ViewerConfig,
    surface: S,
    store: FeatureStore,
    factory: MarkerFactory,
    elements: HashMap<ElementId, ElementEntry>,
    layer: Option<LayerId>,
    next_layer: u64,
    selection: SelectionController,
    lifecycle: Lifecycle,
}

impl<S: MapSurface> PermitViewer<S> {
    pub fn new(config: ViewerConfig, surface: S, bindings: ViewBindings) -> Self {
        let selection = SelectionController::new(
            bindings,
            config.imagery.clone(),
            config.animation.pan_options(),
        );
        Self {
            store: FeatureStore::new(config.loader.clone()),
            factory: MarkerFactory::new(config.markers.clone()),
            elements: HashMap::default(),
            layer: None,
            next_layer: 0,
            selection,
            lifecycle: Lifecycle::Created,
            config,
            surface,
        }
    }

    /// Replaces the marker factory, e.g. to inject an icon renderer.
    pub fn with_factory(mut self, factory: MarkerFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Sets up the base map and loads the configured data source.
    ///
    /// A load failure is logged and leaves a usable map without markers.
    pub async fn init(&mut self) -> LoadSummary {
        if self.lifecycle == Lifecycle::Ready {
            log::warn!("viewer already initialised, reloading");
            self.detach();
        } else {
            self.surface.set_view(&self.config.view);
            self.surface.add_tile_layer(&self.config.tiles);
            self.lifecycle = Lifecycle::Ready;
        }

        match FeatureSource::resolve(
            &self.config.data_source,
            self.config.loader.base_url.as_deref(),
        ) {
            Ok(source) => self.load(&source).await,
            Err(e) => {
                log::error!("cannot load permits: {e}");
                LoadSummary::failed(&e)
            }
        }
    }

    /// Swaps the displayed collection for `source`.
    pub async fn reload(&mut self, source: &FeatureSource) -> LoadSummary {
        if self.lifecycle != Lifecycle::Ready {
            log::warn!("ignoring reload: {NOT_READY}");
            return LoadSummary::rejected(NOT_READY);
        }
        self.detach();
        self.load(source).await
    }

    /// Closes the selection and removes everything this viewer attached.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.detach();
        self.store.clear();
        self.lifecycle = Lifecycle::TornDown;
        log::debug!("viewer torn down");
    }

    pub fn handle_event(&mut self, event: InputEvent) -> EventHandled {
        if self.lifecycle != Lifecycle::Ready {
            return EventHandled::NotHandled;
        }

        match event {
            InputEvent::ElementClick { element } => {
                (self.select(element) != Transition::Rejected).into()
            }
            InputEvent::PopupAction { element } => match self.elements.get(&element) {
                Some(entry) => self.selection.open_popup_action(entry.popup_action).into(),
                None => EventHandled::NotHandled,
            },
            InputEvent::ImageryActivate => self.selection.activate_imagery().into(),
            InputEvent::CloseControl => {
                self.selection.close();
                EventHandled::Handled
            }
            InputEvent::KeyPress { key } => {
                (self.selection.handle_key(key) != Transition::Unchanged).into()
            }
        }
    }

    /// Selects the feature rendered as `element`.
    pub fn select(&mut self, element: ElementId) -> Transition {
        let feature = self.elements.get(&element).and_then(|entry| {
            self.store
                .collection()
                .and_then(|collection| collection.get(entry.feature_index))
                .cloned()
        });

        match feature {
            Some(feature) => self.selection.select(&mut self.surface, feature, element),
            None => {
                log::warn!("no permit registered for {element}");
                Transition::Rejected
            }
        }
    }

    pub fn close_selection(&mut self) -> Transition {
        self.selection.close()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selection_state(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn collection(&self) -> Option<&FeatureCollection> {
        self.store.collection()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    async fn load(&mut self, source: &FeatureSource) -> LoadSummary {
        let collection = match self.store.load(source).await {
            Ok(collection) => collection,
            Err(e) => {
                log::error!("failed to load permits: {e}");
                return LoadSummary::failed(&e);
            }
        };

        let rendered = self.factory.build_all(collection).await;
        let summary = LoadSummary {
            features: collection.len(),
            markers: rendered.len(),
            geometry_errors: collection.geometry_errors().len(),
            bounds: rendered.bounds.clone(),
            error: None,
        };

        self.elements = rendered
            .elements
            .iter()
            .map(|element| {
                let entry = ElementEntry {
                    feature_index: element.id().feature_index(),
                    popup_action: element.popup().action,
                };
                (element.id(), entry)
            })
            .collect();

        self.attach(rendered.elements);
        if let Some(bounds) = &rendered.bounds {
            self.surface.fit_bounds(bounds, self.config.view.padding());
        }

        log::info!(
            "showing {} of {} permits ({} without a location)",
            summary.markers,
            summary.features,
            summary.skipped()
        );
        summary
    }

    fn attach(&mut self, elements: Vec<MapElement>) {
        if elements.is_empty() {
            return;
        }
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.surface.add_layer(id, elements);
        self.layer = Some(id);
    }

    fn detach(&mut self) {
        self.selection.close();
        if let Some(id) = self.layer.take() {
            self.surface.remove_layer(id);
        }
        self.elements.clear();
    }
}
