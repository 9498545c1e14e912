//! Visualizer session
//!
//! Ties the pieces together the way the interactive front end uses them: a
//! query goes to the trace generator, successes land in history and the
//! player, failures fall back to the sample table when it knows the query.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::AppConfig;
use crate::execution::history::{HistoryCache, HistoryEntry};
use crate::playback::{AutoplayDriver, StepPlayer};
use crate::query::{build_visualization_prompt, QueryError, SampleLibrary, TraceGenerator};
use crate::storage::KeyValueStore;
use crate::trace::ProblemTrace;
use crate::tutor::{step_change_message, tutor_prompt, TutorCommand};

/// Prefix of the notice shown when a sample replaces a failed query
pub const SAMPLE_NOTICE_PREFIX: &str = "Using sample data.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter an algorithm problem")]
    EmptyQuery,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("No history entry at index {0}")]
    NoSuchHistoryEntry(usize),

    #[error("No visualization loaded")]
    NoTraceLoaded,
}

/// Where the loaded trace came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceSource {
    Generated,
    Sample,
    History,
}

/// Result of loading a trace into the session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub trace: Arc<ProblemTrace>,
    pub source: TraceSource,

    /// User-facing note, set when a sample stood in for a failed query
    pub notice: Option<String>,
}

/// Generator, sample fallback, history and player for one user
pub struct VisualizerSession<G: TraceGenerator, S: KeyValueStore> {
    generator: G,
    samples: SampleLibrary,
    history: HistoryCache<S>,
    driver: AutoplayDriver,
}

impl<G: TraceGenerator, S: KeyValueStore> VisualizerSession<G, S> {
    /// Session over `store`, restoring history and using the built-in samples
    pub fn new(generator: G, store: S, config: &AppConfig) -> Self {
        let history = HistoryCache::restore(
            store,
            config.history.storage_key.as_str(),
            config.history.capacity,
        );
        Self {
            generator,
            samples: SampleLibrary::builtin(),
            history,
            driver: AutoplayDriver::new(StepPlayer::new(config.playback.base_delay())),
        }
    }

    /// Replace the fallback sample table
    pub fn with_samples(mut self, samples: SampleLibrary) -> Self {
        self.samples = samples;
        self
    }

    pub fn driver(&self) -> &AutoplayDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut AutoplayDriver {
        &mut self.driver
    }

    pub fn history(&self) -> &HistoryCache<S> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryCache<S> {
        &mut self.history
    }

    pub fn samples(&self) -> &SampleLibrary {
        &self.samples
    }

    /// Generate a trace for `query` and load it
    pub async fn submit(&mut self, query: &str) -> Result<SessionOutcome, SessionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let prompt = build_visualization_prompt(query);
        match self.generator.generate(&prompt).await {
            Ok(trace) => {
                info!(
                    "{} generated '{}' ({} steps)",
                    self.generator.name(),
                    trace.title,
                    trace.step_count()
                );
                let entry = HistoryEntry::new(query, trace);
                let trace = Arc::new(entry.trace.clone());
                if let Err(err) = self.history.record(entry) {
                    warn!("History not persisted: {err}");
                }
                self.driver.load(Arc::clone(&trace));
                Ok(SessionOutcome {
                    trace,
                    source: TraceSource::Generated,
                    notice: None,
                })
            }
            Err(err) => {
                warn!("Generation failed for '{query}': {err}");
                let Some(trace) = self.samples.lookup(query) else {
                    return Err(err.into());
                };
                self.driver.load(Arc::clone(&trace));
                Ok(SessionOutcome {
                    trace,
                    source: TraceSource::Sample,
                    notice: Some(format!("{SAMPLE_NOTICE_PREFIX} {err}")),
                })
            }
        }
    }

    /// Reload a stored trace into the player
    pub fn select_history(&mut self, index: usize) -> Result<SessionOutcome, SessionError> {
        let trace = self
            .history
            .select(index)
            .ok_or(SessionError::NoSuchHistoryEntry(index))?;
        self.driver.load(Arc::clone(&trace));
        Ok(SessionOutcome {
            trace,
            source: TraceSource::History,
            notice: None,
        })
    }

    /// Answer a tutor panel message
    ///
    /// Messages mentioning `go to step` never reach the model: they navigate
    /// when a number follows and return `None` otherwise. Anything else is sent
    /// with a summary of the current step; a reply carrying a step command
    /// navigates, any other reply is returned as is.
    pub async fn ask_tutor(&mut self, message: &str) -> Result<Option<String>, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        if TutorCommand::is_navigation_request(message) {
            return Ok(self.handle_tutor_message(message));
        }

        let trace = self.driver.trace().ok_or(SessionError::NoTraceLoaded)?;
        let index = self.driver.state().current_step_index;
        let prompt = tutor_prompt(&trace, index, message);
        let reply = self.generator.complete(&prompt).await?;
        debug!("{} answered tutor query ({} chars)", self.generator.name(), reply.len());

        Ok(self.handle_tutor_reply(&reply).or(Some(reply)))
    }

    /// Apply a navigation command typed by the user; returns the reply to show
    pub fn handle_tutor_message(&mut self, text: &str) -> Option<String> {
        self.navigate(TutorCommand::from_user_message(text)?)
    }

    /// Apply a navigation command found in a model reply
    pub fn handle_tutor_reply(&mut self, text: &str) -> Option<String> {
        self.navigate(TutorCommand::from_reply(text)?)
    }

    fn navigate(&mut self, command: TutorCommand) -> Option<String> {
        self.driver.trace()?;
        let index = self.driver.go_to(command.target_index());
        Some(self.driver.with_player(|player| {
            step_change_message(index, player.current_step())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::tests::trace_with_steps;
    use crate::storage::{MemoryStore, StorageError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Answers with a fixed trace and reply, or fails when no trace is set
    struct ScriptedGenerator {
        trace: Option<ProblemTrace>,
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn answering(trace: ProblemTrace) -> Self {
            Self {
                trace: Some(trace),
                reply: String::new(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                trace: None,
                reply: String::new(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn replying(mut self, reply: &str) -> Self {
            self.reply = reply.to_owned();
            self
        }

        fn outage() -> QueryError {
            QueryError::Status {
                status: 500,
                message: "backend down".into(),
            }
        }
    }

    #[async_trait]
    impl TraceGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<ProblemTrace, QueryError> {
            self.prompts.lock().push(prompt.to_owned());
            self.trace.clone().ok_or_else(Self::outage)
        }

        async fn complete(&self, prompt: &str) -> Result<String, QueryError> {
            self.prompts.lock().push(prompt.to_owned());
            match self.trace {
                Some(_) => Ok(self.reply.clone()),
                None => Err(Self::outage()),
            }
        }
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_owned()))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_owned()))
        }
    }

    fn session<G: TraceGenerator>(generator: G) -> VisualizerSession<G, MemoryStore> {
        VisualizerSession::new(generator, MemoryStore::new(), &AppConfig::default())
    }

    fn four_steps() -> ProblemTrace {
        let mut trace = (*trace_with_steps(4)).clone();
        trace.title = String::new();
        trace
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let mut session = session(ScriptedGenerator::answering(four_steps()));
        let err = session.submit("   ").await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuery));
        assert!(session.generator.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_success_records_history_and_loads() {
        let mut session = session(ScriptedGenerator::answering(four_steps()));
        let outcome = session.submit(" bubble sort ").await.unwrap();

        assert_eq!(outcome.source, TraceSource::Generated);
        assert!(outcome.notice.is_none());
        assert_eq!(session.driver().state().current_step_index, 0);
        assert_eq!(session.driver().trace().unwrap().step_count(), 4);

        let entry = session.history().get(0).unwrap();
        assert_eq!(entry.title, "bubble sort");
        assert_eq!(entry.category, "General");
        assert_eq!(entry.original_query, "bubble sort");
        assert!(session.generator.prompts.lock()[0].contains("bubble sort"));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_sample() {
        let mut session = session(ScriptedGenerator::failing());
        let outcome = session.submit("Binary Search").await.unwrap();

        assert_eq!(outcome.source, TraceSource::Sample);
        assert_eq!(outcome.trace.title, "Binary Search");
        let notice = outcome.notice.unwrap();
        assert!(notice.starts_with("Using sample data. "));
        assert!(notice.contains("backend down"));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_failure_without_sample_returns_error() {
        let mut session = session(ScriptedGenerator::failing());
        let err = session.submit("dijkstra").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Query(QueryError::Status { status: 500, .. })
        ));
        assert!(session.driver().trace().is_none());
    }

    #[tokio::test]
    async fn test_persist_failure_still_loads() {
        let mut session = VisualizerSession::new(
            ScriptedGenerator::answering(four_steps()),
            ReadOnlyStore,
            &AppConfig::default(),
        );
        let outcome = session.submit("heap sort").await.unwrap();
        assert_eq!(outcome.source, TraceSource::Generated);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_select_history() {
        let mut session = session(ScriptedGenerator::answering(four_steps()));
        session.submit("a").await.unwrap();
        session.driver_mut().go_to(3);

        let outcome = session.select_history(0).unwrap();
        assert_eq!(outcome.source, TraceSource::History);
        assert_eq!(session.driver().state().current_step_index, 0);
        assert!(matches!(
            session.select_history(5),
            Err(SessionError::NoSuchHistoryEntry(5))
        ));
    }

    #[tokio::test]
    async fn test_tutor_navigation_clamps() {
        let mut session = session(ScriptedGenerator::answering(four_steps()));
        assert_eq!(session.handle_tutor_message("go to step 2"), None);

        session.submit("a").await.unwrap();
        let reply = session.handle_tutor_message("Go To Step 2").unwrap();
        assert_eq!(reply, "Moving to step 2: step 1");
        assert_eq!(session.driver().state().current_step_index, 1);

        session.handle_tutor_reply("[[STEP]]40[[/STEP]]").unwrap();
        assert_eq!(session.driver().state().current_step_index, 3);

        session.handle_tutor_message("go to step 0").unwrap();
        assert_eq!(session.driver().state().current_step_index, 0);

        assert_eq!(session.handle_tutor_message("what is a swap?"), None);
    }

    #[tokio::test]
    async fn test_tutor_question_goes_to_model_with_context() {
        let generator = ScriptedGenerator::answering(four_steps()).replying("A swap orders the pair.");
        let mut session = session(generator);
        session.submit("bubble sort").await.unwrap();
        session.driver_mut().go_to(2);

        let reply = session.ask_tutor("why swap here?").await.unwrap();
        assert_eq!(reply.as_deref(), Some("A swap orders the pair."));
        assert_eq!(session.driver().state().current_step_index, 2);

        let prompts = session.generator.prompts.lock();
        let context = prompts.last().unwrap();
        assert!(context.contains("Current Step: 3 of 4"));
        assert!(context.contains("Step Description: step 2"));
        assert!(context.ends_with("User Query: why swap here?"));
    }

    #[tokio::test]
    async fn test_tutor_reply_with_step_command_navigates() {
        let generator = ScriptedGenerator::answering(four_steps())
            .replying("Look at [[STEP]]2[[/STEP]] first.");
        let mut session = session(generator);
        session.submit("a").await.unwrap();

        let reply = session.ask_tutor("where does it start?").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Moving to step 2: step 1"));
        assert_eq!(session.driver().state().current_step_index, 1);
    }

    #[tokio::test]
    async fn test_tutor_navigation_request_skips_model() {
        let mut session = session(ScriptedGenerator::answering(four_steps()).replying("unused"));
        session.submit("a").await.unwrap();
        let asked = session.generator.prompts.lock().len();

        let reply = session.ask_tutor("go to step 4").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Moving to step 4: step 3"));
        assert_eq!(session.ask_tutor("Go to step four").await.unwrap(), None);
        assert_eq!(session.driver().state().current_step_index, 3);
        assert_eq!(session.generator.prompts.lock().len(), asked);
    }

    #[tokio::test]
    async fn test_tutor_needs_loaded_trace() {
        let mut session = session(ScriptedGenerator::answering(four_steps()));
        assert!(matches!(
            session.ask_tutor("what is this?").await,
            Err(SessionError::NoTraceLoaded)
        ));
        assert!(matches!(
            session.ask_tutor("  ").await,
            Err(SessionError::EmptyQuery)
        ));
        assert!(session.generator.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_tutor_model_failure_is_query_error() {
        let mut session = session(ScriptedGenerator::failing());
        session.submit("Binary Search").await.unwrap();
        assert!(matches!(
            session.ask_tutor("why halve?").await,
            Err(SessionError::Query(QueryError::Status { status: 500, .. }))
        ));
    }
}
