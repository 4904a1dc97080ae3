use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Session;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::fetcher::PageSource;
use crate::models::{BookSummary, GoogleBookSearchResult, Page, UnifiedSearchResponse};

/// Which book collection a paged request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    All,
    Mine,
    Borrowed,
    Read,
    Returned,
}

impl ListKind {
    fn segments(self) -> &'static [&'static str] {
        match self {
            Self::All => &["books"],
            Self::Mine => &["books", "mine"],
            Self::Borrowed => &["books", "borrowed"],
            Self::Read => &["books", "read"],
            Self::Returned => &["books", "returned"],
        }
    }

    /// Everything except the public catalog is scoped to the current user.
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::All)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "catalog",
            Self::Mine => "my books",
            Self::Borrowed => "borrowed",
            Self::Read => "read",
            Self::Returned => "returned",
        }
    }
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Arc<dyn Session>,
}

impl CatalogClient {
    pub fn new(config: ApiConfig, session: Arc<dyn Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> Arc<dyn Session> {
        Arc::clone(&self.session)
    }

    /// A [`PageSource`] bound to one collection.
    pub fn source(&self, kind: ListKind) -> BookListSource {
        BookListSource {
            client: self.clone(),
            kind,
        }
    }

    pub async fn list_books(
        &self,
        kind: ListKind,
        page: u32,
        size: u32,
    ) -> Result<Page<BookSummary>, ApiError> {
        let url = self.config.endpoint(kind.segments());
        let query = [("page", page.to_string()), ("size", size.to_string())];
        self.send_json(Method::GET, url, &query).await
    }

    pub async fn find_book(&self, book_id: i64) -> Result<BookSummary, ApiError> {
        let url = self.config.endpoint(&["books", &book_id.to_string()]);
        self.send_json(Method::GET, url, &[]).await
    }

    pub async fn search(
        &self,
        query: &str,
        max_local: u32,
        max_google: u32,
    ) -> Result<UnifiedSearchResponse, ApiError> {
        let url = self.config.endpoint(&["books", "search"]);
        let params = [
            ("q", query.to_owned()),
            ("maxLocal", max_local.to_string()),
            ("maxGoogle", max_google.to_string()),
        ];
        self.send_json(Method::GET, url, &params).await
    }

    /// Imports an external result; the body is the new local book id.
    pub async fn add_from_google(&self, google_id: &str) -> Result<i64, ApiError> {
        let url = self.config.endpoint(&["books", "add-from-google"]);
        let params = [("googleId", google_id.to_owned())];
        self.send_json(Method::POST, url, &params).await
    }

    pub async fn google_book(&self, google_id: &str) -> Result<GoogleBookSearchResult, ApiError> {
        let url = self.config.endpoint(&["books", "google", google_id]);
        self.send_json(Method::GET, url, &[]).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let endpoint = format!("{method} {}", url.path());
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%endpoint, "sending request");
        let response = request.send().await.map_err(|source| {
            tracing::warn!(%endpoint, error = %source, "request failed");
            ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            }
        })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        if !status.is_success() {
            let err = ApiError::from_status(endpoint.clone(), status, &raw);
            tracing::warn!(%endpoint, %status, "backend returned an error");
            return Err(err);
        }

        serde_json::from_str(&raw).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

/// Paged source over one [`ListKind`] collection.
#[derive(Clone)]
pub struct BookListSource {
    client: CatalogClient,
    kind: ListKind,
}

#[async_trait]
impl PageSource<BookSummary> for BookListSource {
    async fn fetch_page(&self, page: u32, size: u32) -> Result<Page<BookSummary>, ApiError> {
        self.client.list_books(self.kind, page, size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_public_catalog_skips_auth() {
        assert!(!ListKind::All.requires_auth());
        for kind in [
            ListKind::Mine,
            ListKind::Borrowed,
            ListKind::Read,
            ListKind::Returned,
        ] {
            assert!(kind.requires_auth(), "{kind:?}");
        }
    }

    #[test]
    fn list_endpoints_match_backend_routes() -> anyhow::Result<()> {
        let config = ApiConfig::new("http://localhost:8088/api/v1")?;
        assert_eq!(
            config.endpoint(ListKind::Mine.segments()).path(),
            "/api/v1/books/mine"
        );
        assert_eq!(
            config.endpoint(ListKind::All.segments()).path(),
            "/api/v1/books"
        );
        Ok(())
    }
}
