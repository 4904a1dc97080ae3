use async_trait::async_trait;

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::models::{GoogleBookSearchResult, UnifiedSearchResponse};

pub const DEFAULT_MAX_LOCAL: u32 = 10;
pub const DEFAULT_MAX_GOOGLE: u32 = 20;

/// Backend half of unified search. [`CatalogClient`] is the HTTP implementation.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_local: u32,
        max_google: u32,
    ) -> Result<UnifiedSearchResponse, ApiError>;

    async fn add_from_google(&self, google_id: &str) -> Result<i64, ApiError>;

    async fn google_book(&self, google_id: &str) -> Result<GoogleBookSearchResult, ApiError>;
}

#[async_trait]
impl SearchBackend for CatalogClient {
    async fn search(
        &self,
        query: &str,
        max_local: u32,
        max_google: u32,
    ) -> Result<UnifiedSearchResponse, ApiError> {
        CatalogClient::search(self, query, max_local, max_google).await
    }

    async fn add_from_google(&self, google_id: &str) -> Result<i64, ApiError> {
        CatalogClient::add_from_google(self, google_id).await
    }

    async fn google_book(&self, google_id: &str) -> Result<GoogleBookSearchResult, ApiError> {
        CatalogClient::google_book(self, google_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    BookList,
    Book(i64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::BookList => "/books".to_owned(),
            Self::Book(id) => format!("/books/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub book_id: i64,
    pub next_route: Route,
}

pub struct SearchAggregator<B> {
    backend: B,
}

impl<B: SearchBackend> SearchAggregator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// A blank query returns an empty response without touching the backend.
    pub async fn search(
        &self,
        query: &str,
        max_local: u32,
        max_google: u32,
    ) -> Result<UnifiedSearchResponse, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(UnifiedSearchResponse::empty(""));
        }

        let response = self.backend.search(query, max_local, max_google).await?;
        tracing::debug!(
            query,
            local = response.local_books.len(),
            google = response.google_books.len(),
            total = response.total_results,
            "search finished"
        );
        Ok(response)
    }

    /// Imports an external result. Navigation goes back to the list, not to the new book.
    pub async fn add_from_external(&self, google_id: &str) -> Result<Imported, ApiError> {
        let google_id = non_blank_id(google_id)?;
        let book_id = self.backend.add_from_google(google_id).await?;
        tracing::info!(google_id, book_id, "imported external book");
        Ok(Imported {
            book_id,
            next_route: Route::BookList,
        })
    }

    pub async fn get_by_external_id(
        &self,
        google_id: &str,
    ) -> Result<GoogleBookSearchResult, ApiError> {
        let google_id = non_blank_id(google_id)?;
        self.backend.google_book(google_id).await
    }
}

fn non_blank_id(google_id: &str) -> Result<&str, ApiError> {
    let google_id = google_id.trim();
    if google_id.is_empty() {
        return Err(ApiError::InvalidArgument("google id is empty".to_owned()));
    }
    Ok(google_id)
}
