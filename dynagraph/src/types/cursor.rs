// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Relay-style cursors and their translation into range queries
//!
//! A cursor pages forward with `first`/`after` or backward with
//! `last`/`before` over a sequence ordered by weight (edges) or `updatedAt`
//! (vertices). The boundary values are the ordering values of the previous
//! page's last item, so paging needs no offsets.

use crate::error::{GraphError, GraphResult};
use crate::storage::RangeCondition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
}

impl Cursor {
    /// Forward page of at most `n` items
    pub fn first(n: usize) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    /// Backward page of at most `n` items
    pub fn last(n: usize) -> Self {
        Self {
            last: Some(n),
            ..Self::default()
        }
    }

    /// Start strictly after `bound` (forward)
    pub fn after(mut self, bound: i64) -> Self {
        self.after = Some(bound);
        self
    }

    /// Start strictly before `bound` (backward)
    pub fn before(mut self, bound: i64) -> Self {
        self.before = Some(bound);
        self
    }

    pub fn is_backward(&self) -> bool {
        self.last.is_some() || self.before.is_some()
    }

    /// Translate into store query parameters
    pub fn parse(&self) -> GraphResult<CursorQuery> {
        if self.first.is_some() && self.last.is_some() {
            return Err(GraphError::cursor("`first` and `last` are mutually exclusive"));
        }
        let forward = self.first.is_some() || self.after.is_some();
        if forward && self.is_backward() {
            return Err(GraphError::cursor(
                "forward fields (`first`, `after`) cannot be mixed with backward fields (`last`, `before`)",
            ));
        }
        if self.first == Some(0) || self.last == Some(0) {
            return Err(GraphError::cursor("page size must be positive"));
        }

        if self.is_backward() {
            Ok(CursorQuery {
                bound: self.before.map(RangeCondition::lt),
                limit: self.last,
                scan_forward: false,
            })
        } else {
            Ok(CursorQuery {
                bound: self.after.map(RangeCondition::gt),
                limit: self.first,
                scan_forward: true,
            })
        }
    }
}

/// Store-native form of a cursor
#[derive(Debug, Clone, PartialEq)]
pub struct CursorQuery {
    /// Strict inequality on the ordering attribute
    pub bound: Option<RangeCondition>,
    /// Page size, None for unlimited
    pub limit: Option<usize>,
    pub scan_forward: bool,
}

/// Parse an optional cursor; no cursor means unbounded ascending
pub fn parse(cursor: Option<&Cursor>) -> GraphResult<CursorQuery> {
    match cursor {
        Some(cursor) => cursor.parse(),
        None => Cursor::default().parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Comparison;

    #[test]
    fn test_empty_cursor_is_unbounded_ascending() {
        let q = parse(None).unwrap();
        assert_eq!(q.bound, None);
        assert_eq!(q.limit, None);
        assert!(q.scan_forward);
        assert_eq!(Cursor::default().parse().unwrap(), q);
    }

    #[test]
    fn test_forward_cursor() {
        let q = Cursor::first(10).after(42).parse().unwrap();
        assert!(q.scan_forward);
        assert_eq!(q.limit, Some(10));
        let bound = q.bound.unwrap();
        assert_eq!(bound.comparison, Comparison::Gt);
        assert_eq!(bound.value, serde_json::json!(42));

        let q = Cursor::default().after(7).parse().unwrap();
        assert_eq!(q.limit, None);
        assert!(q.scan_forward);
    }

    #[test]
    fn test_backward_cursor() {
        let q = Cursor::last(3).before(-5).parse().unwrap();
        assert!(!q.scan_forward);
        assert_eq!(q.limit, Some(3));
        let bound = q.bound.unwrap();
        assert_eq!(bound.comparison, Comparison::Lt);
        assert_eq!(bound.value, serde_json::json!(-5));

        let q = Cursor::default().before(1).parse().unwrap();
        assert!(!q.scan_forward);
        assert_eq!(q.limit, None);
    }

    #[test]
    fn test_rejects_mixed_directions() {
        let both = Cursor {
            first: Some(1),
            last: Some(1),
            ..Cursor::default()
        };
        assert!(matches!(both.parse(), Err(GraphError::InvalidCursor(_))));
        assert!(matches!(
            Cursor::first(2).before(3).parse(),
            Err(GraphError::InvalidCursor(_))
        ));
        assert!(matches!(
            Cursor::last(2).after(3).parse(),
            Err(GraphError::InvalidCursor(_))
        ));
        assert!(matches!(Cursor::first(0).parse(), Err(GraphError::InvalidCursor(_))));
    }

    #[test]
    fn test_cursor_serde_token() {
        let cursor = Cursor::last(5).before(99);
        let token = serde_json::to_string(&cursor).unwrap();
        assert_eq!(token, r#"{"last":5,"before":99}"#);
        let back: Cursor = serde_json::from_str(&token).unwrap();
        assert_eq!(back, cursor);
    }
}
