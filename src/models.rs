use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One slice of a larger ordered collection, as returned by the catalog backend.
///
/// `number` is the zero-based page index. The backend names it `number`; older
/// payloads use `pageNumber`/`pageSize`, accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(alias = "pageNumber")]
    pub number: u32,
    #[serde(alias = "pageSize")]
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageInvariantError {
    #[error("page size must be greater than zero")]
    ZeroSize,

    #[error("page holds {len} items but its size is {size}")]
    Overfull { len: usize, size: u32 },

    #[error(
        "page reports {total_pages} total pages, expected {expected} for {total_elements} elements at size {size}"
    )]
    TotalPagesMismatch {
        total_pages: u32,
        expected: u64,
        total_elements: u64,
        size: u32,
    },
}

impl<T> Page<T> {
    pub fn empty(number: u32, size: u32) -> Self {
        Self {
            content: Vec::new(),
            number,
            size,
            total_elements: 0,
            total_pages: 0,
            first: number == 0,
            last: true,
        }
    }

    /// Checks `content.len() <= size` and `total_pages == ceil(total_elements / size)`.
    pub fn validate(&self) -> Result<(), PageInvariantError> {
        if self.size == 0 {
            return Err(PageInvariantError::ZeroSize);
        }
        if self.content.len() > self.size as usize {
            return Err(PageInvariantError::Overfull {
                len: self.content.len(),
                size: self.size,
            });
        }
        let expected = self.total_elements.div_ceil(u64::from(self.size));
        if u64::from(self.total_pages) != expected {
            return Err(PageInvariantError::TotalPagesMismatch {
                total_pages: self.total_pages,
                expected,
                total_elements: self.total_elements,
                size: self.size,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Cover payload as the backend serialises it: a URL, a base64 string, or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cover {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub shareable: bool,
    #[serde(default)]
    pub returned: bool,
    #[serde(default)]
    pub return_approved: bool,
}

/// A hit from the external catalog. Not part of the library until imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBookSearchResult {
    pub google_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Merged search payload. `total_results` comes from the backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSearchResponse {
    #[serde(default)]
    pub local_books: Vec<BookSummary>,
    #[serde(default)]
    pub google_books: Vec<GoogleBookSearchResult>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total_local_results: u32,
    #[serde(default)]
    pub total_google_results: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl UnifiedSearchResponse {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            local_books: Vec::new(),
            google_books: Vec::new(),
            query: query.into(),
            total_local_results: 0,
            total_google_results: 0,
            total_results: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.local_books.is_empty() && self.google_books.is_empty()
    }
}
