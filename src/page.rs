use crate::tree::Sort;

/// Caller-supplied paging directive: zero-based page index, page size and an
/// optional sort appended to the query's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Offset in result rows, not pages.
    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// The following page; saturates at `u32::MAX`.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Option<PageRequest>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        match &self.pageable {
            Some(p) if p.size > 0 => self.total.div_ceil(p.size as u64),
            _ => 1,
        }
    }

    pub fn has_next(&self) -> bool {
        match &self.pageable {
            Some(p) => (p.page as u64 + 1) < self.total_pages(),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub pageable: Option<PageRequest>,
    pub has_next: bool,
}

impl<T> Slice<T> {
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn next_pageable(&self) -> Option<PageRequest> {
        match &self.pageable {
            Some(p) if self.has_next => Some(p.next()),
            _ => None,
        }
    }
}
