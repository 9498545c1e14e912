//! Autoplay scheduling
//!
//! `AutoplayDriver` wraps a `StepPlayer` and owns the one timer task that
//! advances it while playing. Every call that changes what the timer should
//! do aborts the pending task before anything new is scheduled, and the task
//! re-checks the player's generation before each advance, so a timer from a
//! previous trace or speed can never move the current one.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{PlaybackError, PlaybackState, StepPlayer};
use crate::trace::ProblemTrace;

/// Lower bound on the timer period; a zero period would spin
const MIN_TICK: Duration = Duration::from_millis(1);

/// Player shared between the driver and its timer task
pub type SharedPlayer = Arc<Mutex<StepPlayer>>;

/// Step player plus its single autoplay timer
#[derive(Debug)]
pub struct AutoplayDriver {
    /// Player state shared with the timer task
    player: SharedPlayer,

    /// Pending timer, if autoplay is running
    timer: Option<JoinHandle<()>>,

    /// Publishes the current step index after every change
    position: Arc<watch::Sender<usize>>,
}

impl AutoplayDriver {
    pub fn new(player: StepPlayer) -> Self {
        let (position, _) = watch::channel(player.current_index());
        Self {
            player: Arc::new(Mutex::new(player)),
            timer: None,
            position: Arc::new(position),
        }
    }

    /// Receiver notified with the step index whenever it changes
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.position.subscribe()
    }

    /// Shared handle to the underlying player
    pub fn shared(&self) -> SharedPlayer {
        Arc::clone(&self.player)
    }

    /// Run a read-only closure against the player
    pub fn with_player<R>(&self, read: impl FnOnce(&StepPlayer) -> R) -> R {
        read(&self.player.lock())
    }

    pub fn state(&self) -> PlaybackState {
        self.player.lock().state()
    }

    pub fn trace(&self) -> Option<Arc<ProblemTrace>> {
        self.player.lock().trace().cloned()
    }

    /// Whether a timer task is currently scheduled
    pub fn is_timer_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Load a new trace; any running autoplay stops
    pub fn load(&mut self, trace: Arc<ProblemTrace>) {
        self.cancel_timer();
        let index = {
            let mut player = self.player.lock();
            player.load(trace);
            player.current_index()
        };
        self.publish(index);
    }

    pub fn toggle_play(&mut self) -> bool {
        self.cancel_timer();
        self.player.lock().toggle_play();
        self.reschedule();
        self.player.lock().is_playing()
    }

    pub fn pause(&mut self) {
        self.cancel_timer();
        self.player.lock().pause();
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PlaybackError> {
        self.player.lock().set_speed(multiplier)?;
        self.cancel_timer();
        self.reschedule();
        Ok(())
    }

    pub fn next(&mut self) -> usize {
        let index = self.player.lock().next();
        self.publish(index)
    }

    pub fn previous(&mut self) -> usize {
        let index = self.player.lock().previous();
        self.publish(index)
    }

    pub fn go_to(&mut self, index: isize) -> usize {
        let index = self.player.lock().go_to(index);
        self.publish(index)
    }

    fn publish(&self, index: usize) -> usize {
        self.position.send_replace(index);
        index
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            trace!("Autoplay timer cancelled");
        }
    }

    /// Start a timer if the player is playing; assumes none is pending
    fn reschedule(&mut self) {
        debug_assert!(self.timer.is_none());

        let (playing, generation, delay) = {
            let player = self.player.lock();
            (player.is_playing(), player.generation(), player.effective_delay())
        };
        if !playing {
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("Autoplay requested outside a tokio runtime; staying paused");
            self.player.lock().pause();
            return;
        };

        debug!("Scheduling autoplay every {delay:?}");
        self.timer = Some(runtime.spawn(run_timer(
            Arc::clone(&self.player),
            Arc::clone(&self.position),
            generation,
            delay,
        )));
    }
}

impl Drop for AutoplayDriver {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn run_timer(
    player: SharedPlayer,
    position: Arc<watch::Sender<usize>>,
    generation: u64,
    delay: Duration,
) {
    let delay = delay.max(MIN_TICK);
    let mut ticker = time::interval_at(Instant::now() + delay, delay);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let index = {
            let mut player = player.lock();
            if player.generation() != generation || !player.is_playing() {
                break;
            }
            player.autoplay_advance()
        };

        trace!("Autoplay advanced to step {index}");
        position.send_replace(index);
    }
}
