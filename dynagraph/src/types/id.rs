// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Compact radix-64 identifiers
//!
//! Vertex ids are natural numbers drawn from a store counter and rendered in
//! a 64-character alphabet sorted by byte value, so that two ids of equal
//! length compare like the numbers they encode.

use crate::error::{GraphError, GraphResult};

/// Digits in ascending byte order: `-` is 0, `A` is 11, `z` is 63
const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 64;
const BASE_BITS: u32 = 6;

fn digit(c: u8) -> Option<u64> {
    match c {
        b'-' => Some(0),
        b'0'..=b'9' => Some((c - b'0') as u64 + 1),
        b'A'..=b'Z' => Some((c - b'A') as u64 + 11),
        b'_' => Some(37),
        b'a'..=b'z' => Some((c - b'a') as u64 + 38),
        _ => None,
    }
}

/// Render a positive integer as an id of minimal length
pub fn encode(n: u64) -> GraphResult<String> {
    if n == 0 {
        return Err(GraphError::invalid("ids encode positive integers only, got 0"));
    }

    let bits = u64::BITS - n.leading_zeros();
    let length = ((bits - 1) / BASE_BITS + 1) as usize;

    let mut chars = vec![ALPHABET[0]; length];
    let mut rest = n;
    for slot in chars.iter_mut().rev() {
        *slot = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }

    // every byte comes from ALPHABET
    Ok(chars.into_iter().map(char::from).collect())
}

/// Parse an id back into the integer it encodes
pub fn decode(id: &str) -> GraphResult<u64> {
    if id.is_empty() {
        return Err(GraphError::InvalidIdentifier(
            "the empty string is not an id".to_string(),
        ));
    }

    id.bytes().try_fold(0u64, |n, c| {
        let d = digit(c).ok_or_else(|| {
            GraphError::InvalidIdentifier(format!(
                "'{}' contains characters outside the id alphabet, possibly a foreign key",
                id
            ))
        })?;
        n.checked_mul(BASE)
            .and_then(|n| n.checked_add(d))
            .ok_or_else(|| GraphError::InvalidIdentifier(format!("'{}' overflows u64", id)))
    })
}
