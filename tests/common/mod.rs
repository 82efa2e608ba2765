//! Shared utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use serde_json::{Value, json};

/// Builds a note as the API returns it.
pub fn note_json(id: &str, title: &str, content: &str, tag: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "tag": tag,
        "createdAt": "2024-01-15T10:30:00Z",
        "updatedAt": "2024-01-15T10:30:00Z",
    })
}

/// Builds a list response with `count` notes titled "Note 1".."Note N".
pub fn page_json(count: usize, total_pages: u32) -> Value {
    let notes: Vec<Value> = (1..=count)
        .map(|i| note_json(&format!("65a1f0c2{:04}", i), &format!("Note {}", i), "", "Todo"))
        .collect();
    json!({ "notes": notes, "totalPages": total_pages })
}
