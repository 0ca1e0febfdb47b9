// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Paginated results

use serde::{Deserialize, Serialize};

/// Sizes describing one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Items in this page
    pub count: usize,
    /// Items matching the bound without the page size; only set for sized pages
    pub total: Option<usize>,
}

impl PageInfo {
    /// Whether more items lie beyond this page in the scan direction
    pub fn has_more(&self) -> bool {
        self.total.map_or(false, |total| total > self.count)
    }
}

/// A bounded, ordered slice of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub total: Option<usize>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<usize>) -> Self {
        Self {
            count: items.len(),
            items,
            total,
        }
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            count: self.count,
            total: self.total,
        }
    }

    pub fn has_more(&self) -> bool {
        self.info().has_more()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
