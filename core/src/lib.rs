//! AlgoLens core
//! Algorithm traces, step playback, history and the AI query adapter
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod execution;
pub mod playback;
pub mod query;
pub mod session;
pub mod storage;
pub mod trace;
pub mod tutor;

pub use self::config::{AppConfig, ConfigError};
pub use self::execution::{HistoryCache, HistoryEntry, HistoryError};
pub use self::playback::{AutoplayDriver, PlaybackError, PlaybackState, StepPlayer};
pub use self::query::{GeminiClient, QueryError, SampleLibrary, TraceGenerator};
pub use self::session::{SessionError, SessionOutcome, TraceSource, VisualizerSession};
pub use self::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use self::trace::{ProblemTrace, Step, TraceError, VisualElement};
pub use self::tutor::TutorCommand;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
