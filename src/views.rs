//! Home page lists derived from pages that are already loaded. Nothing here fetches.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{BookSummary, Page};

pub const TRENDING_LIMIT: usize = 8;
pub const TO_READ_LIMIT: usize = 4;
pub const FAVORITES_LIMIT: usize = 4;

pub fn trending(items: &[BookSummary], n: usize) -> Vec<BookSummary> {
    items.iter().take(n).cloned().collect()
}

/// Books from `my_books` that are neither borrowed nor read, in listed order.
pub fn to_read(
    my_books: &[BookSummary],
    borrowed: &[BookSummary],
    read: &[BookSummary],
    max: usize,
) -> Vec<BookSummary> {
    let excluded: HashSet<i64> = borrowed.iter().chain(read).map(|book| book.id).collect();
    my_books
        .iter()
        .filter(|book| !excluded.contains(&book.id))
        .take(max)
        .cloned()
        .collect()
}

pub fn favorites(read: &[BookSummary], max: usize) -> Vec<BookSummary> {
    read.iter().take(max).cloned().collect()
}

pub fn currently_reading(borrowed: &[BookSummary]) -> Option<BookSummary> {
    borrowed.first().cloned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeView {
    pub trending: Vec<BookSummary>,
    pub currently_reading: Option<BookSummary>,
    pub to_read: Vec<BookSummary>,
    pub favorites: Vec<BookSummary>,
}

/// Pages backing the home view; `None` when not loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeInputs<'a> {
    pub catalog: Option<&'a Page<BookSummary>>,
    pub my_books: Option<&'a Page<BookSummary>>,
    pub borrowed: Option<&'a Page<BookSummary>>,
    pub read: Option<&'a Page<BookSummary>>,
}

impl HomeView {
    /// Personal sections stay empty for a logged-out session.
    pub fn derive(logged_in: bool, inputs: HomeInputs<'_>) -> Self {
        let trending = trending(content_of(inputs.catalog), TRENDING_LIMIT);
        if !logged_in {
            return Self {
                trending,
                ..Self::default()
            };
        }

        let my_books = content_of(inputs.my_books);
        let borrowed = content_of(inputs.borrowed);
        let read = content_of(inputs.read);
        Self {
            trending,
            currently_reading: currently_reading(borrowed),
            to_read: to_read(my_books, borrowed, read, TO_READ_LIMIT),
            favorites: favorites(read, FAVORITES_LIMIT),
        }
    }
}

fn content_of(page: Option<&Page<BookSummary>>) -> &[BookSummary] {
    page.map(|p| p.content.as_slice()).unwrap_or(&[])
}
