//! Pagination utilities
//!
//! `Pager` turns a 1-based page index into a row offset; `PageRequest`
//! normalizes raw query input before it reaches the service layer.

/// Row offset arithmetic used by listing queries.
pub trait Pager: Send + Sync {
    /// Zero-based offset of the first row on `page_index` (1-based).
    fn row_offset(&self, page_index: u32, page_size: u32) -> u64;
}

/// Default pager: page 1 starts at row 0; indexes below 1 are treated as page 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageCalculator;

impl Pager for PageCalculator {
    fn row_offset(&self, page_index: u32, page_size: u32) -> u64 {
        if page_index > 0 {
            (page_index as u64 - 1) * page_size as u64
        } else {
            0
        }
    }
}

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    /// 1-based page index
    pub page_index: u32,
    /// items per page
    pub page_size: u32,
}

impl PageRequest {
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Clamp to sane defaults
    pub fn normalize(self) -> Self {
        let page_index = if self.page_index == 0 { 1 } else { self.page_index };
        let page_size = self.page_size.clamp(1, Self::MAX_PAGE_SIZE);
        Self { page_index, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page_index: 1, page_size: 20 } }
}
