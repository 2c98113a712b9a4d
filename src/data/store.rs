use crate::{
    core::config::LoaderConfig,
    data::{feature::FeatureCollection, geojson::parse_feature_collection},
    LoadError,
};
use std::path::PathBuf;
use url::Url;

/// Where a feature collection comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSource {
    Url(Url),
    Path(PathBuf),
    /// Already-fetched document text.
    Inline(String),
}

impl FeatureSource {
    /// Interprets a configured source string.
    ///
    /// Absolute `http(s)` URLs are fetched as-is, relative specs are joined
    /// onto `base` when one is given, and anything else is a filesystem path.
    pub fn resolve(spec: &str, base: Option<&str>) -> Result<Self, LoadError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(LoadError::InvalidSource(spec.to_string()));
        }

        if let Ok(url) = Url::parse(spec) {
            return match url.scheme() {
                "http" | "https" => Ok(Self::Url(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Path)
                    .map_err(|_| LoadError::InvalidSource(spec.to_string())),
                _ => Err(LoadError::InvalidSource(spec.to_string())),
            };
        }

        match base {
            Some(base) => {
                let base =
                    Url::parse(base).map_err(|_| LoadError::InvalidSource(base.to_string()))?;
                base.join(spec)
                    .map(Self::Url)
                    .map_err(|_| LoadError::InvalidSource(spec.to_string()))
            }
            None => Ok(Self::Path(PathBuf::from(spec))),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::Path(path) => path.display().to_string(),
            Self::Inline(text) => format!("<inline, {} bytes>", text.len()),
        }
    }
}

/// Loads and holds the permit collection for one viewer.
pub struct FeatureStore {
    config: LoaderConfig,
    collection: Option<FeatureCollection>,
}

impl FeatureStore {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            collection: None,
        }
    }

    /// Fetches and parses `source`, replacing any previously held collection.
    ///
    /// On failure the previous collection is dropped as well, so callers never
    /// render stale data after a failed reload.
    pub async fn load(&mut self, source: &FeatureSource) -> Result<&FeatureCollection, LoadError> {
        self.collection = None;
        log::debug!("loading permits from {}", source.describe());

        let text = self.fetch(source).await?;
        let collection = parse_feature_collection(&text)?;
        log::info!(
            "loaded {} permits from {}",
            collection.len(),
            source.describe()
        );
        Ok(&*self.collection.insert(collection))
    }

    pub fn collection(&self) -> Option<&FeatureCollection> {
        self.collection.as_ref()
    }

    pub fn clear(&mut self) {
        self.collection = None;
    }

    async fn fetch(&self, source: &FeatureSource) -> Result<String, LoadError> {
        match source {
            FeatureSource::Inline(text) => Ok(text.clone()),
            FeatureSource::Path(path) => read_file(path.clone()).await,
            FeatureSource::Url(url) => {
                let client = reqwest::Client::builder()
                    .user_agent(self.config.user_agent.clone())
                    .timeout(self.config.timeout())
                    .build()?;
                let response = client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }
}

async fn read_file(path: PathBuf) -> Result<String, LoadError> {
    #[cfg(feature = "tokio-runtime")]
    let result = tokio::fs::read_to_string(&path).await;

    #[cfg(not(feature = "tokio-runtime"))]
    let result = std::fs::read_to_string(&path);

    result.map_err(|source| LoadError::Io { path, source })
}
