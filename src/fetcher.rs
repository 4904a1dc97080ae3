//! Paged list fetching with stale-response suppression.
//!
//! Every request gets a sequence number from its fetcher. Only the result
//! carrying the latest number is committed to the visible state; anything
//! older that settles afterwards is dropped. In-flight requests are never
//! aborted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::auth::Session;
use crate::error::ApiError;
use crate::models::Page;

#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, page: u32, size: u32) -> Result<Page<T>, ApiError>;
}

/// Snapshot of a fetcher's visible state. At most one of `data`/`error` is set
/// by the last committed request.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub loading: bool,
    pub data: Option<Page<T>>,
    pub error: Option<Arc<ApiError>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    pub page: u32,
    pub size: u32,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    Superseded,
    SkippedUnauthenticated,
}

struct Inner<T> {
    latest_seq: u64,
    state: FetchState<T>,
}

pub struct PagedFetcher<T> {
    name: &'static str,
    session: Option<Arc<dyn Session>>,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone + Send + Sync> PagedFetcher<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            session: None,
            inner: Mutex::new(Inner {
                latest_seq: 0,
                state: FetchState::default(),
            }),
        }
    }

    /// A fetcher that skips the request entirely when the session is logged out.
    pub fn gated(name: &'static str, session: Arc<dyn Session>) -> Self {
        Self {
            session: Some(session),
            ..Self::new(name)
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.lock().state.clone()
    }

    /// Starts a request: newer than every ticket issued before it.
    pub fn begin(&self, page: u32, size: u32) -> FetchTicket {
        let mut inner = self.lock();
        inner.latest_seq += 1;
        inner.state.loading = true;
        inner.state.error = None;
        let ticket = FetchTicket {
            seq: inner.latest_seq,
            page,
            size,
        };
        tracing::debug!(fetcher = self.name, seq = ticket.seq, page, size, "fetch started");
        ticket
    }

    /// Commits `result` if `ticket` is still the latest request. Returns whether it was committed.
    pub fn settle(&self, ticket: FetchTicket, result: Result<Page<T>, ApiError>) -> bool {
        let mut inner = self.lock();
        if ticket.seq != inner.latest_seq {
            tracing::debug!(
                fetcher = self.name,
                seq = ticket.seq,
                latest = inner.latest_seq,
                "dropping stale response"
            );
            return false;
        }

        match result {
            Ok(page) => {
                inner.state.data = Some(page);
                inner.state.error = None;
            }
            Err(err) => {
                tracing::warn!(fetcher = self.name, seq = ticket.seq, error = %err, "fetch failed");
                inner.state.error = Some(Arc::new(err));
            }
        }
        inner.state.loading = false;
        true
    }

    /// Runs one request cycle for `(page, size)` against `source`.
    pub async fn load<S>(&self, source: &S, page: u32, size: u32) -> LoadOutcome
    where
        S: PageSource<T> + ?Sized,
    {
        if let Some(session) = &self.session
            && !session.is_logged_in()
        {
            self.clear_unauthenticated();
            return LoadOutcome::SkippedUnauthenticated;
        }

        let ticket = self.begin(page, size);
        let result = if size == 0 {
            Err(ApiError::InvalidArgument(
                "page size must be greater than zero".to_owned(),
            ))
        } else {
            source
                .fetch_page(page, size)
                .await
                .and_then(|fetched| {
                    fetched.validate()?;
                    Ok(fetched)
                })
        };

        if self.settle(ticket, result) {
            LoadOutcome::Committed
        } else {
            LoadOutcome::Superseded
        }
    }

    // Logged out is an idle state, not a failure. Bumping the sequence makes
    // any request still in flight stale.
    fn clear_unauthenticated(&self) {
        let mut inner = self.lock();
        inner.latest_seq += 1;
        inner.state = FetchState::default();
        tracing::debug!(fetcher = self.name, "not logged in; fetch skipped");
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
