//! Controlled pagination model: zero-based model indices in, one-based display out.

use crate::models::Page;

pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];

const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEvent {
    /// Zero-based page index to load next.
    PageChange(u32),
    PageSizeChange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControl {
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub display_page: u32,
    pub total_pages: u32,
    pub range_start: u64,
    pub range_end: u64,
    pub total_elements: u64,
    pub has_previous: bool,
    pub has_next: bool,
    /// Zero-based indices of the page buttons to show.
    pub page_numbers: Vec<u32>,
}

pub fn to_display(model_page: u32) -> u32 {
    model_page.saturating_add(1)
}

pub fn to_model(display_page: u32) -> Option<u32> {
    display_page.checked_sub(1)
}

impl PaginationControl {
    pub fn new(page: u32, size: u32, total_pages: u32, total_elements: u64) -> Self {
        Self {
            page,
            size,
            total_pages,
            total_elements,
        }
    }

    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self::new(page.number, page.size, page.total_pages, page.total_elements)
    }

    /// `None` when there is nothing to paginate.
    pub fn render(&self) -> Option<PaginationView> {
        if self.total_pages <= 1 || self.total_elements == 0 {
            return None;
        }

        let page = self.current_page();
        let (range_start, range_end) = self.item_range();
        Some(PaginationView {
            display_page: to_display(page),
            total_pages: self.total_pages,
            range_start,
            range_end,
            total_elements: self.total_elements,
            has_previous: page > 0,
            has_next: page.saturating_add(1) < self.total_pages,
            page_numbers: self.page_window(),
        })
    }

    /// One-based inclusive item range shown on the current page.
    pub fn item_range(&self) -> (u64, u64) {
        let page = u64::from(self.current_page());
        let size = u64::from(self.size);
        let start = page * size + 1;
        let end = ((page + 1) * size).min(self.total_elements);
        (start, end)
    }

    pub fn previous(&self) -> Option<PaginationEvent> {
        let page = self.current_page();
        if page == 0 {
            return None;
        }
        Some(PaginationEvent::PageChange(page - 1))
    }

    pub fn next(&self) -> Option<PaginationEvent> {
        let next = self.page.checked_add(1)?;
        if next >= self.total_pages {
            return None;
        }
        Some(PaginationEvent::PageChange(next))
    }

    /// Click on a one-based page button.
    pub fn select_display(&self, display_page: u32) -> Option<PaginationEvent> {
        let model = to_model(display_page)?;
        if model >= self.total_pages || model == self.page {
            return None;
        }
        Some(PaginationEvent::PageChange(model))
    }

    pub fn change_size(&self, size: u32) -> Option<PaginationEvent> {
        if size == 0 || size == self.size {
            return None;
        }
        Some(PaginationEvent::PageSizeChange(size))
    }

    // A page past the end (size changed, refetch still pending) is shown as
    // the last page.
    fn current_page(&self) -> u32 {
        self.page.min(self.total_pages.saturating_sub(1))
    }

    // Centre on the current page, then shift back near the end so the
    // window stays full.
    fn page_window(&self) -> Vec<u32> {
        let last = self.total_pages.saturating_sub(1);
        let mut start = self.current_page().saturating_sub(MAX_VISIBLE_PAGES / 2);
        let end = start.saturating_add(MAX_VISIBLE_PAGES - 1).min(last);
        if end - start < MAX_VISIBLE_PAGES - 1 {
            start = end.saturating_sub(MAX_VISIBLE_PAGES - 1);
        }
        (start..=end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nothing_for_empty_results() {
        assert_eq!(PaginationControl::new(0, 12, 0, 0).render(), None);
        assert_eq!(PaginationControl::new(0, 12, 1, 7).render(), None);
    }

    #[test]
    fn range_for_third_page() {
        let view = PaginationControl::new(2, 10, 5, 45).render().expect("view");
        assert_eq!(view.display_page, 3);
        assert_eq!((view.range_start, view.range_end), (21, 30));

        let view = PaginationControl::new(2, 10, 3, 25).render().expect("view");
        assert_eq!((view.range_start, view.range_end), (21, 25));
        assert!(!view.has_next);
        assert!(view.has_previous);
    }

    #[test]
    fn index_conversions() {
        assert_eq!(to_display(0), 1);
        assert_eq!(to_model(1), Some(0));
        assert_eq!(to_model(0), None);
    }

    #[test]
    fn events_never_leave_the_valid_range() {
        let first = PaginationControl::new(0, 10, 3, 25);
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), Some(PaginationEvent::PageChange(1)));

        let last = PaginationControl::new(2, 10, 3, 25);
        assert_eq!(last.next(), None);
        assert_eq!(last.previous(), Some(PaginationEvent::PageChange(1)));

        assert_eq!(first.select_display(3), Some(PaginationEvent::PageChange(2)));
        assert_eq!(first.select_display(4), None);
        assert_eq!(first.select_display(1), None);
        assert_eq!(first.select_display(0), None);
    }

    #[test]
    fn size_change_is_emitted_without_mutating() {
        let control = PaginationControl::new(1, 10, 3, 25);
        assert_eq!(
            control.change_size(20),
            Some(PaginationEvent::PageSizeChange(20))
        );
        assert_eq!(control.change_size(10), None);
        assert_eq!(control.change_size(0), None);
        assert_eq!(control.size, 10);
        assert_eq!(control.page, 1);
    }

    #[test]
    fn page_window_is_centred_and_clamped() {
        let window = |page, total_pages| {
            PaginationControl::new(page, 10, total_pages, u64::from(total_pages) * 10)
                .render()
                .expect("view")
                .page_numbers
        };
        assert_eq!(window(0, 10), vec![0, 1, 2, 3, 4]);
        assert_eq!(window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(window(9, 10), vec![5, 6, 7, 8, 9]);
        assert_eq!(window(1, 3), vec![0, 1, 2]);
    }

    #[test]
    fn page_past_the_end_renders_as_last_page() {
        // Page 9 at size 5, then switched to size 20 before the refetch lands.
        let control = PaginationControl::new(9, 20, 5, 100);
        let view = control.render().expect("view");
        assert_eq!(view.display_page, 5);
        assert_eq!((view.range_start, view.range_end), (81, 100));
        assert_eq!(view.page_numbers, vec![0, 1, 2, 3, 4]);
        assert!(!view.has_next);
        assert!(view.has_previous);
        assert_eq!(control.next(), None);
        assert_eq!(control.previous(), Some(PaginationEvent::PageChange(3)));
    }

    #[test]
    fn largest_page_index_does_not_overflow() {
        assert_eq!(to_display(u32::MAX), u32::MAX);
        let control = PaginationControl::new(u32::MAX, 10, u32::MAX, u64::MAX);
        assert_eq!(control.next(), None);
        let view = control.render().expect("view");
        assert!(!view.has_next);
        assert_eq!(view.page_numbers.len(), 5);
        assert_eq!(view.page_numbers.last(), Some(&(u32::MAX - 1)));
    }

    #[test]
    fn from_page_reads_backend_metadata() {
        let page: Page<u32> = Page {
            content: vec![1, 2],
            number: 1,
            size: 2,
            total_elements: 4,
            total_pages: 2,
            first: false,
            last: true,
        };
        let view = PaginationControl::from_page(&page).render().expect("view");
        assert_eq!((view.range_start, view.range_end), (3, 4));
        assert_eq!(view.page_numbers, vec![0, 1]);
    }
}
