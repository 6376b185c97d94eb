use log::LevelFilter;
use phl_api::client::{AdminRouting, ApiResult, Endpoints, LeagueApi};
use phl_api::store::DataSource;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    Remote,
    Seed,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub source: SourceKind,
    pub endpoints: Endpoints,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            source: SourceKind::default(),
            endpoints: Endpoints::new(DEFAULT_API_URL),
        }
    }
}

impl AppSettings {
    /// Read `PHL_*` environment variables; unset or blank values keep defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let read_base = var("PHL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut endpoints = Endpoints::new(&read_base);
        if let Some(admin) = var("PHL_ADMIN_URL") {
            endpoints.admin_base = admin.trim_end_matches('/').to_string();
        }
        if let Some(scores) = var("PHL_SCORES_URL") {
            endpoints.scores_url = scores;
        }
        endpoints.routing = match var("PHL_ADMIN_ROUTING").as_deref() {
            Some("query") => AdminRouting::QueryParam,
            _ => AdminRouting::PathSegments,
        };

        let source = match var("PHL_DATA_SOURCE").as_deref() {
            Some("seed") => SourceKind::Seed,
            _ => SourceKind::Remote,
        };

        Self {
            full_screen: false,
            log_level: var("PHL_LOG").and_then(|level| level.parse().ok()),
            source,
            endpoints,
        }
    }

    pub fn data_source(&self) -> ApiResult<DataSource> {
        Ok(match self.source {
            SourceKind::Seed => DataSource::Seed,
            SourceKind::Remote => DataSource::Remote(LeagueApi::new(self.endpoints.clone())?),
        })
    }

    pub fn source_label(&self) -> String {
        match self.source {
            SourceKind::Seed => "built-in data".to_string(),
            SourceKind::Remote => self.endpoints.read_base.clone(),
        }
    }
}
