//! Step playback
//!
//! `StepPlayer` owns the position within a loaded trace and the playback
//! settings. Manual navigation clamps at both ends of the step sequence;
//! the autoplay advance wraps from the last step back to the first. Timer
//! scheduling lives in [`autoplay`]; the player itself only mutates state.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod autoplay;

pub use autoplay::AutoplayDriver;

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::{ProblemTrace, Step};

/// Delay between autoplay advances at 1x speed
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(3000);

/// Multipliers offered by speed selectors
pub const SPEED_PRESETS: [f64; 5] = [0.5, 1.0, 1.5, 2.0, 3.0];

/// Accepted speed multiplier range
pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("Speed multiplier must be between {MIN_SPEED} and {MAX_SPEED}, got {0}")]
    InvalidSpeed(f64),
}

/// Transient playback state, reset on every load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Index into the trace's steps
    pub current_step_index: usize,

    /// Whether autoplay is running
    pub is_playing: bool,

    /// Speed relative to the base delay
    pub speed_multiplier: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_step_index: 0,
            is_playing: false,
            speed_multiplier: 1.0,
        }
    }
}

/// Position and playback settings over one loaded trace
#[derive(Debug, Clone)]
pub struct StepPlayer {
    /// Active trace, if any
    trace: Option<Arc<ProblemTrace>>,

    /// Current playback state
    state: PlaybackState,

    /// Autoplay delay at 1x speed
    base_delay: Duration,

    /// Bumped whenever a pending autoplay advance becomes stale
    generation: u64,
}

impl Default for StepPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY)
    }
}

impl StepPlayer {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            trace: None,
            state: PlaybackState::default(),
            base_delay,
            generation: 0,
        }
    }

    /// Replace the active trace and reset playback
    pub fn load(&mut self, trace: Arc<ProblemTrace>) {
        debug!(
            "Loading trace '{}' with {} steps",
            trace.title,
            trace.step_count()
        );
        self.trace = Some(trace);
        self.state = PlaybackState::default();
        self.generation += 1;
    }

    pub fn trace(&self) -> Option<&Arc<ProblemTrace>> {
        self.trace.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn step_count(&self) -> usize {
        self.trace.as_ref().map_or(0, |t| t.step_count())
    }

    pub fn current_index(&self) -> usize {
        self.state.current_step_index
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.trace
            .as_ref()
            .and_then(|t| t.step(self.state.current_step_index))
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Fraction of the trace reached, counting the current step
    pub fn progress(&self) -> f64 {
        match self.step_count() {
            0 => 0.0,
            n => (self.state.current_step_index + 1) as f64 / n as f64,
        }
    }

    /// Code line executing at the current step
    pub fn highlighted_code_line(&self) -> Option<u32> {
        self.current_step().and_then(|step| step.code_line)
    }

    pub fn is_at_start(&self) -> bool {
        self.state.current_step_index == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.state.current_step_index + 1 >= self.step_count()
    }

    /// Advance one step; no-op on the last step
    pub fn next(&mut self) -> usize {
        if !self.is_at_end() {
            self.state.current_step_index += 1;
        }
        self.state.current_step_index
    }

    /// Go back one step; no-op on the first step
    pub fn previous(&mut self) -> usize {
        self.state.current_step_index = self.state.current_step_index.saturating_sub(1);
        self.state.current_step_index
    }

    /// Jump to `index`, clamped into the valid range
    pub fn go_to(&mut self, index: isize) -> usize {
        let last = self.step_count().saturating_sub(1);
        self.state.current_step_index = usize::try_from(index).map_or(0, |i| i.min(last));
        self.state.current_step_index
    }

    /// Flip autoplay; stays off when there is nothing to play
    pub fn toggle_play(&mut self) -> bool {
        let playing = !self.state.is_playing && self.step_count() > 0;
        self.set_playing(playing);
        playing
    }

    /// Stop autoplay if it is running
    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.generation += 1;
        }
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PlaybackError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&multiplier) {
            return Err(PlaybackError::InvalidSpeed(multiplier));
        }
        self.state.speed_multiplier = multiplier;
        self.generation += 1;
        Ok(())
    }

    /// Delay between autoplay advances at the current speed
    pub fn effective_delay(&self) -> Duration {
        let secs = self.base_delay.as_secs_f64() / self.state.speed_multiplier;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Autoplay step: advance, wrapping to the first step after the last
    pub fn autoplay_advance(&mut self) -> usize {
        let count = self.step_count();
        if count > 0 {
            self.state.current_step_index = (self.state.current_step_index + 1) % count;
        }
        self.state.current_step_index
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::trace::Step;

    pub(crate) fn trace_with_steps(count: usize) -> Arc<ProblemTrace> {
        let steps = (0..count)
            .map(|i| Step {
                description: format!("step {i}"),
                code_line: Some(i as u32 + 1),
                visual_elements: Vec::new(),
                memory_model: None,
            })
            .collect();
        Arc::new(ProblemTrace {
            title: format!("{count} steps"),
            description: String::new(),
            difficulty: Default::default(),
            category: String::new(),
            time_complexity: Default::default(),
            key_points: Vec::new(),
            pseudocode: String::new(),
            code: None,
            steps,
        })
    }

    fn loaded(count: usize) -> StepPlayer {
        let mut player = StepPlayer::default();
        player.load(trace_with_steps(count));
        player
    }

    #[test]
    fn test_next_clamps_at_last_step() {
        let mut player = loaded(3);
        player.next();
        player.next();
        player.next();
        assert_eq!(player.current_index(), 2);
        assert!(player.is_at_end());
    }

    #[test]
    fn test_previous_clamps_at_first_step() {
        let mut player = loaded(3);
        assert_eq!(player.previous(), 0);
        player.next();
        assert_eq!(player.previous(), 0);
    }

    #[test]
    fn test_go_to_clamps_out_of_range() {
        let mut player = loaded(5);
        assert_eq!(player.go_to(-3), 0);
        assert_eq!(player.go_to(99), 4);
        assert_eq!(player.go_to(2), 2);

        for n in 1..8 {
            let mut player = loaded(n);
            assert_eq!(player.go_to(n as isize), n - 1);
            assert_eq!(player.go_to(-1), 0);
        }
    }

    #[test]
    fn test_autoplay_advance_wraps() {
        let mut player = loaded(3);
        player.go_to(2);
        assert_eq!(player.autoplay_advance(), 0);
        assert_eq!(player.autoplay_advance(), 1);
    }

    #[test]
    fn test_load_resets_state() {
        let mut player = loaded(4);
        player.go_to(3);
        player.toggle_play();
        player.set_speed(2.0).unwrap();

        player.load(trace_with_steps(2));
        assert_eq!(player.state(), PlaybackState::default());
    }

    #[test]
    fn test_empty_trace_disables_navigation_and_play() {
        let mut player = loaded(0);
        assert_eq!(player.next(), 0);
        assert_eq!(player.go_to(5), 0);
        assert!(!player.toggle_play());
        assert!(!player.is_playing());
        assert_eq!(player.autoplay_advance(), 0);
        assert!(player.current_step().is_none());
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn test_effective_delay_scales_with_speed() {
        let mut player = loaded(3);
        assert_eq!(player.effective_delay(), Duration::from_millis(3000));
        player.set_speed(2.0).unwrap();
        assert_eq!(player.effective_delay(), Duration::from_millis(1500));
        player.set_speed(0.5).unwrap();
        assert_eq!(player.effective_delay(), Duration::from_millis(6000));
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut player = loaded(3);
        assert_eq!(player.set_speed(0.0), Err(PlaybackError::InvalidSpeed(0.0)));
        assert!(player.set_speed(-1.0).is_err());
        assert!(player.set_speed(f64::NAN).is_err());
        assert_eq!(player.state().speed_multiplier, 1.0);
    }

    #[test]
    fn test_generation_bumps_on_stale_events() {
        let mut player = loaded(3);
        let start = player.generation();

        player.next();
        assert_eq!(player.generation(), start);

        player.toggle_play();
        assert_eq!(player.generation(), start + 1);
        player.set_speed(1.5).unwrap();
        assert_eq!(player.generation(), start + 2);
        player.load(trace_with_steps(1));
        assert_eq!(player.generation(), start + 3);
    }

    #[test]
    fn test_progress_and_code_line() {
        let mut player = loaded(4);
        assert_eq!(player.progress(), 0.25);
        player.go_to(1);
        assert_eq!(player.highlighted_code_line(), Some(2));
        assert_eq!(player.progress(), 0.5);
    }
}
