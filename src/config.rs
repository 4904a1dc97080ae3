use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8088/api/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 12;

pub const ENV_BASE_URL: &str = "BOOK_NEXUS_API_BASE_URL";
pub const ENV_TOKEN: &str = "BOOK_NEXUS_TOKEN";
pub const ENV_PAGE_SIZE: &str = "BOOK_NEXUS_PAGE_SIZE";

/// On-disk YAML configuration. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub page_size: Option<u32>,
}

impl FileConfig {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parse config: {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    pub token: Option<String>,
    pub page_size: u32,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Loads the optional YAML file, then applies `BOOK_NEXUS_*` overrides.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    pub fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let base_url = env(ENV_BASE_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = parse_base_url(&base_url)
            .with_context(|| format!("invalid {ENV_BASE_URL}={base_url:?}"))?;

        let token = env(ENV_TOKEN)
            .or(file.token)
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());

        let page_size = match env(ENV_PAGE_SIZE) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid {ENV_PAGE_SIZE}={raw:?}"))?,
            None => file.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        if page_size == 0 {
            anyhow::bail!("page size must be greater than zero");
        }

        Ok(Self {
            base_url,
            token,
            page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        anyhow::bail!("api base url is empty");
    }
    let url = Url::parse(trimmed).context("parse api base url")?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("api base url must be http/https: {url}");
    }
    if url.cannot_be_a_base() {
        anyhow::bail!("api base url cannot carry a path: {url}");
    }
    Ok(url)
}
