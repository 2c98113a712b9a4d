use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use permitmap::{
    core::config::{MapViewConfig, TileLayerSpec, ViewerProfile},
    data::socrata::{self, DEFAULT_ROW_LIMIT, PERMITS_ROWS_URL},
    prelude::*,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(about = "Prepare demolition permit data and preview the permit map")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download permits from the open data portal and write GeoJSON
    Fetch {
        /// Output GeoJSON path
        #[arg(long, default_value = permitmap::constants::DEFAULT_DATA_PATH)]
        output: PathBuf,

        /// Portal rows.json export
        #[arg(long, default_value = PERMITS_ROWS_URL)]
        url: String,

        /// Maximum number of rows to request
        #[arg(long, default_value_t = DEFAULT_ROW_LIMIT)]
        limit: u32,
    },
    /// Load a feature collection into a headless viewer and describe the result
    Preview {
        /// GeoJSON file path or URL
        source: String,

        /// Viewer configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset (balanced, lightweight, rich), ignored with --config
        #[arg(long, default_value = "balanced")]
        profile: String,

        /// Select the permit at this index in the collection
        #[arg(long)]
        select: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    permitmap::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch { output, url, limit } => fetch(&output, &url, limit).await,
        Command::Preview {
            source,
            config,
            profile,
            select,
        } => preview(source, config.as_deref(), &profile, select).await,
    }
}

async fn fetch(output: &Path, url: &str, limit: u32) -> Result<()> {
    eprintln!("Fetching up to {limit} permits from {url}...");
    let loader = LoaderConfig::default();

    let features = match socrata::fetch_permits(url, limit, &loader).await {
        Ok(features) if !features.is_empty() => features,
        Ok(_) => {
            log::warn!("portal returned no permits, writing sample data");
            socrata::sample_permits(chrono::Local::now().date_naive())
        }
        Err(e) => {
            log::warn!("fetch failed ({e}), writing sample data");
            socrata::sample_permits(chrono::Local::now().date_naive())
        }
    };

    let collection = FeatureCollection::from_features(features);
    let json = serde_json::to_string_pretty(&collection.to_geojson())?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "Wrote {} permits ({} located) to {}",
        collection.len(),
        collection.located().count(),
        output.display()
    );
    Ok(())
}

async fn preview(
    source: String,
    config_path: Option<&Path>,
    profile: &str,
    select: Option<usize>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ViewerConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match ViewerProfile::from_name(profile) {
            Some(profile) => profile.resolve(),
            None => bail!("unknown profile {profile:?}"),
        },
    };
    config.data_source = source;
    config.validate()?;

    let imagery = config.imagery.clone();
    let bindings = ViewBindings::new(PrintPanel, PrintLinks);
    let mut viewer = PermitViewer::new(config, LoggingSurface::default(), bindings);
    let summary = viewer.init().await;

    if let Some(error) = &summary.error {
        bail!("could not load permits: {error}");
    }
    println!("permits:         {}", summary.features);
    println!("markers:         {}", summary.markers);
    println!("without location: {}", summary.skipped());
    match &summary.bounds {
        Some(bounds) => println!(
            "bounds:          ({}, {}) - ({}, {})",
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng
        ),
        None => println!("bounds:          none"),
    }

    let Some(index) = select else {
        return Ok(());
    };
    let feature = viewer
        .collection()
        .and_then(|collection| collection.get(index))
        .cloned()
        .with_context(|| format!("no permit at index {index}"))?;

    let element = ElementId::for_feature(index);
    if let Some(rendered) = viewer.surface().element(element) {
        println!("\npopup:\n{}", rendered.popup().markup);
    }

    println!();
    if !viewer
        .handle_event(InputEvent::ElementClick { element })
        .is_handled()
    {
        println!("{element} is not on the map");
    }
    match build_viewer_url(feature.lat(), feature.lng(), &imagery) {
        Some(url) => println!("viewer url: {url}"),
        None => println!("viewer url: unavailable"),
    }
    viewer.handle_event(InputEvent::ImageryActivate);

    viewer.teardown();
    Ok(())
}

/// A map surface that records elements and logs every call.
#[derive(Default)]
struct LoggingSurface {
    layers: HashMap<LayerId, Vec<MapElement>>,
}

impl LoggingSurface {
    fn element(&self, id: ElementId) -> Option<&MapElement> {
        self.layers.values().flatten().find(|e| e.id() == id)
    }
}

impl MapSurface for LoggingSurface {
    fn set_view(&mut self, view: &MapViewConfig) {
        log::info!(
            "set view to ({}, {}) zoom {}, range {}-{}, zoom control {}",
            view.center.lat,
            view.center.lng,
            view.zoom,
            view.min_zoom,
            view.max_zoom,
            if view.zoom_control { "on" } else { "off" }
        );
    }

    fn add_tile_layer(&mut self, spec: &TileLayerSpec) {
        log::info!("tiles from {} ({})", spec.url_template, spec.attribution);
    }

    fn add_layer(&mut self, id: LayerId, elements: Vec<MapElement>) {
        log::info!("layer {} with {} elements", id.0, elements.len());
        for element in &elements {
            log::debug!("{} {}", element.id(), element.options());
        }
        self.layers.insert(id, elements);
    }

    fn remove_layer(&mut self, id: LayerId) {
        log::info!("removed layer {}", id.0);
        self.layers.remove(&id);
    }

    fn contains_element(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Padding) {
        let center = bounds.center();
        log::info!(
            "fit bounds around ({}, {}) with {}px padding",
            center.lat,
            center.lng,
            padding.x
        );
    }

    fn pan_to(&mut self, point: LatLng, options: PanOptions) {
        log::info!(
            "pan to ({}, {}) over {:?}",
            point.lat,
            point.lng,
            options.duration
        );
    }
}

struct PrintPanel;

impl PanelView for PrintPanel {
    fn open(&mut self, model: &PanelViewModel) {
        println!("panel: {}", model.address);
        println!("  permit  {}", model.permit);
        println!("  type    {}", model.permit_type);
        println!("  status  {}", model.status);
        println!("  issued  {}", model.issued);
        if !model.description.is_empty() {
            println!("  {}", model.description);
        }
        match &model.imagery {
            ImageryControl::Link { label, .. } => println!("  [{label}]"),
            ImageryControl::Thumbnail { image_url, .. } => println!("  thumbnail {image_url}"),
            ImageryControl::Unavailable { message } => println!("  {message}"),
        }
    }

    fn close(&mut self) {
        log::debug!("panel closed");
    }
}

struct PrintLinks;

impl LinkOpener for PrintLinks {
    fn open(&mut self, url: &str, target: LinkTarget) {
        println!("open {url} (target {})", target.as_html_target());
    }
}
