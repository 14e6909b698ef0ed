//! Fixed-size, 1-indexed pagination over an ordered slice.

use plantstore_core::{DomainError, DomainResult};

/// Products per storefront page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> DomainResult<Self> {
        if page_size == 0 {
            return Err(DomainError::validation("page size must be at least 1"));
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; zero for an empty sequence.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Page `page` (1-indexed) of `items`.
    ///
    /// Out-of-range pages yield an empty slice; use [`Paginator::clamp`]
    /// first when the caller wants the nearest valid page instead.
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        if page == 0 || page > self.total_pages(items.len()) {
            return &[];
        }
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Nearest valid page for a sequence of `len` items (1 when empty).
    pub fn clamp(&self, page: usize, len: usize) -> usize {
        page.clamp(1, self.total_pages(len).max(1))
    }
}
