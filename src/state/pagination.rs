use std::ops::Range;

/// Page size meaning "everything on one page".
pub const PAGE_SIZE_ALL: usize = usize::MAX;

/// Pagination state as exposed to rendering code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Number of items being paginated (after filtering)
    pub total: usize,
}

impl PageInfo {
    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// Page cursor over a list whose length is supplied by the caller.
///
/// The page index is kept inside `[0, page_count - 1]` (0 when empty) by
/// every operation; none of them panic on out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Pull the page index back into range for `total` items.
    pub fn clamp(&mut self, total: usize) {
        let last = self.page_count(total).saturating_sub(1);
        self.page_index = self.page_index.min(last);
    }

    pub fn set_page_size(&mut self, page_size: usize, total: usize) {
        self.page_size = page_size.max(1);
        self.clamp(total);
    }

    /// Returns false when already on the last page.
    pub fn next(&mut self, total: usize) -> bool {
        if self.page_index + 1 < self.page_count(total) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns false when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn jump(&mut self, page_index: usize, total: usize) -> bool {
        let before = self.page_index;
        self.page_index = page_index;
        self.clamp(total);
        before != self.page_index
    }

    /// Index range of the current page within a list of `total` items.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            page_index: self.page_index,
            page_count: self.page_count(total),
            page_size: self.page_size,
            total,
        }
    }
}
