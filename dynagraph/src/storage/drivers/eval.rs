// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query evaluation shared by the bundled drivers
//!
//! Both the memory and the sled driver keep items as flat JSON documents and
//! answer index queries by filtering and sorting a table scan. The sort order
//! is `(range value, serialized primary key)`, which makes continuation
//! tokens stable across pages.

use super::types::{
    Comparison, Item, KeySchema, QueryOutput, QueryRequest, StoreError, StoreResult, TableSchema,
};
use serde_json::Value;
use std::cmp::Ordering;

/// Serialize the primary key of an item (or key item) to a stable string
pub fn primary_key(schema: &KeySchema, item: &Item) -> StoreResult<String> {
    let mut parts = Vec::with_capacity(2);
    for attribute in schema.attributes() {
        match item.get(attribute) {
            Some(value @ (Value::String(_) | Value::Number(_))) => parts.push(value.clone()),
            Some(other) => {
                return Err(StoreError::InvalidKey(format!(
                    "key attribute '{}' must be a string or number, got {}",
                    attribute, other
                )))
            }
            None => {
                return Err(StoreError::InvalidKey(format!(
                    "missing key attribute '{}'",
                    attribute
                )))
            }
        }
    }
    Ok(Value::Array(parts).to_string())
}

/// Project an item onto the attributes of a key schema
pub fn key_of(schema: &KeySchema, item: &Item) -> StoreResult<Item> {
    let mut key = Item::new();
    for attribute in schema.attributes() {
        let value = item
            .get(attribute)
            .ok_or_else(|| StoreError::InvalidKey(format!("missing key attribute '{}'", attribute)))?;
        key.insert(attribute.to_string(), value.clone());
    }
    Ok(key)
}

/// Total order over the scalar values used as range keys
///
/// Numbers sort before strings; anything else falls back to its JSON text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(_), Value::String(_)) => Ordering::Less,
        (Value::String(_), Value::Number(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn compare_positions(a: &(Option<Value>, String), b: &(Option<Value>, String)) -> Ordering {
    let by_range = match (&a.0, &b.0) {
        (Some(x), Some(y)) => compare_values(x, y),
        _ => Ordering::Equal,
    };
    by_range.then_with(|| a.1.cmp(&b.1))
}

/// Answer one page of `request` from a full scan of the table's items
pub fn run_query<I>(
    schema: &TableSchema,
    rows: I,
    request: &QueryRequest,
    page_size: usize,
) -> StoreResult<QueryOutput>
where
    I: IntoIterator<Item = Item>,
{
    let index_key = schema.key_for(request.index.as_deref())?;

    if request.range.is_some() && index_key.range.is_none() {
        return Err(StoreError::InvalidKey(format!(
            "range condition on hash-only key of '{}'",
            request.index.as_deref().unwrap_or(&schema.name)
        )));
    }

    let mut matches: Vec<((Option<Value>, String), Item)> = Vec::new();
    for item in rows {
        if item.get(&index_key.hash) != Some(&request.hash_value) {
            continue;
        }

        // Indexes are sparse: items without the range attribute are invisible
        let range_value = match &index_key.range {
            Some(attribute) => match item.get(attribute) {
                Some(value) => Some(value.clone()),
                None => continue,
            },
            None => None,
        };

        if let (Some(condition), Some(value)) = (&request.range, &range_value) {
            let ordering = compare_values(value, &condition.value);
            let keep = match condition.comparison {
                Comparison::Lt => ordering == Ordering::Less,
                Comparison::Gt => ordering == Ordering::Greater,
                Comparison::Eq => ordering == Ordering::Equal,
            };
            if !keep {
                continue;
            }
        }

        let pk = primary_key(&schema.key, &item)?;
        matches.push(((range_value, pk), item));
    }

    matches.sort_by(|a, b| compare_positions(&a.0, &b.0));
    if !request.scan_forward {
        matches.reverse();
    }

    if let Some(token) = &request.exclusive_start_key {
        let start = (
            index_key.range.as_ref().and_then(|attribute| token.get(attribute).cloned()),
            primary_key(&schema.key, token)?,
        );
        matches.retain(|(position, _)| {
            let ordering = compare_positions(position, &start);
            if request.scan_forward {
                ordering == Ordering::Greater
            } else {
                ordering == Ordering::Less
            }
        });
    }

    let take = request.limit.unwrap_or(usize::MAX).min(page_size.max(1));
    let has_more = matches.len() > take;
    matches.truncate(take);

    let last_evaluated_key = match (has_more, matches.last()) {
        (true, Some((_, item))) => {
            let mut token = key_of(&schema.key, item)?;
            if let Some(attribute) = &index_key.range {
                if let Some(value) = item.get(attribute) {
                    token.insert(attribute.clone(), value.clone());
                }
            }
            Some(token)
        }
        _ => None,
    };

    let count = matches.len();
    let items = if request.count_only {
        Vec::new()
    } else {
        matches.into_iter().map(|(_, item)| item).collect()
    };

    Ok(QueryOutput {
        items,
        count,
        last_evaluated_key,
    })
}

/// Add `amount` to a numeric attribute of `item`, creating it at zero
pub fn apply_increment(item: &mut Item, attribute: &str, amount: i64) -> StoreResult<i64> {
    let current = match item.get(attribute) {
        None | Some(Value::Null) => 0,
        Some(value) => value.as_i64().ok_or_else(|| {
            StoreError::Backend(format!(
                "attribute '{}' is not an integer: {}",
                attribute, value
            ))
        })?,
    };
    let next = current.checked_add(amount).ok_or_else(|| {
        StoreError::Backend(format!(
            "attribute '{}' overflows: {} + {}",
            attribute, current, amount
        ))
    })?;
    item.insert(attribute.to_string(), Value::from(next));
    Ok(next)
}

pub fn check_batch(limit: usize, got: usize) -> StoreResult<()> {
    if got > limit {
        return Err(StoreError::BatchLimitExceeded { limit, got });
    }
    Ok(())
}
