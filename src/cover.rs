use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::config::ApiConfig;
use crate::models::Cover;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverRef {
    Url(String),
    Inline { data_uri: String },
}

impl CoverRef {
    pub fn as_src(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Inline { data_uri } => data_uri,
        }
    }
}

/// Resolves a book cover to something an image element can load.
///
/// `http*` strings are used as-is, other strings must be valid base64 and
/// become a JPEG data URI. Anything missing or unreadable falls back to the
/// backend's `/books/cover/{id}` resource.
pub fn resolve_cover(config: &ApiConfig, book_id: i64, cover: Option<&Cover>) -> CoverRef {
    match cover {
        Some(Cover::Text(text)) => {
            let text = text.trim();
            if text.starts_with("http") {
                return CoverRef::Url(text.to_owned());
            }
            if !text.is_empty() && STANDARD.decode(text).is_ok() {
                return inline_jpeg(text);
            }
            if !text.is_empty() {
                tracing::debug!(book_id, "cover payload is not base64; using cover endpoint");
            }
        }
        Some(Cover::Bytes(bytes)) if !bytes.is_empty() => {
            return inline_jpeg(&STANDARD.encode(bytes));
        }
        Some(Cover::Bytes(_)) | None => {}
    }
    cover_endpoint(config, book_id)
}

pub fn cover_endpoint(config: &ApiConfig, book_id: i64) -> CoverRef {
    CoverRef::Url(
        config
            .endpoint(&["books", "cover", &book_id.to_string()])
            .to_string(),
    )
}

fn inline_jpeg(payload: &str) -> CoverRef {
    CoverRef::Inline {
        data_uri: format!("data:image/jpeg;base64,{payload}"),
    }
}
