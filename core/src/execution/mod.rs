//! Execution records kept across runs
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod history;

pub use history::{HistoryCache, HistoryEntry, HistoryError};
