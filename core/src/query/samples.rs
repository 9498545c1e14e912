//! Built-in sample traces
//!
//! Used when the model is unreachable or answers with something that is not
//! a valid trace. Samples are keyed by the normalised query text.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::sync::Arc;

use log::error;

use crate::trace::ProblemTrace;

const BUILTIN: [(&str, &str); 3] = [
    ("binary search", include_str!("../../samples/binary_search.json")),
    ("quick sort", include_str!("../../samples/quick_sort.json")),
    ("tree traversal", include_str!("../../samples/tree_traversal.json")),
];

/// Lowercase, trimmed, single-spaced form of a query
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Static fallback table of traces
#[derive(Debug, Clone, Default)]
pub struct SampleLibrary {
    samples: BTreeMap<String, Arc<ProblemTrace>>,
}

impl SampleLibrary {
    /// Library with no samples
    pub fn empty() -> Self {
        Self::default()
    }

    /// Library holding the embedded samples
    pub fn builtin() -> Self {
        let mut library = Self::empty();
        for (key, json) in BUILTIN {
            match ProblemTrace::from_json_str(json) {
                Ok(trace) => library.insert(key, trace),
                Err(err) => error!("Embedded sample '{key}' is invalid: {err}"),
            }
        }
        library
    }

    pub fn insert(&mut self, key: &str, trace: ProblemTrace) {
        self.samples.insert(normalize_query(key), Arc::new(trace));
    }

    /// Sample whose key equals the normalised query
    pub fn lookup(&self, query: &str) -> Option<Arc<ProblemTrace>> {
        self.samples.get(&normalize_query(query)).cloned()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
