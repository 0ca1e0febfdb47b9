// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for graph operations
//!
//! Every public operation validates its arguments before touching the store,
//! so the validation variants never accompany a partial write. Failures that
//! come back from a store driver are wrapped in [`GraphError::StoreFailure`]
//! and are never retried here.

use crate::storage::StoreError;
use thiserror::Error;

/// Error types for graph operations
///
/// `Clone` so that a single failed batch dispatch can be delivered to every
/// caller that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Wrong shape or value passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// String that does not decode to a natural number
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Label or graph name already registered with an incompatible definition
    #[error("Definition conflict: {0}")]
    DefinitionConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Pagination fields from both directions supplied together
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl GraphError {
    /// Create an invalid argument error
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a definition conflict error
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::DefinitionConflict(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid cursor error
    pub fn cursor<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCursor(msg.into())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::StoreFailure(StoreError::from(e))
    }
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
