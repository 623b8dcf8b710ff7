//! Countdown timer for a quiz attempt.
//!
//! `Timer` is a plain state machine with no thread of its own: every call to
//! `tick()` is one elapsed second. The `Ticker` task produces those seconds
//! on a channel owned by the ticker itself, so dropping the ticker also drops
//! any tick that was queued but not yet consumed.

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub type ExpireCallback = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    Expired,
}

pub struct Timer {
    duration_secs: u32,
    remaining_secs: u32,
    running: bool,
    time_up: bool,
    on_expire: Option<ExpireCallback>,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("duration_secs", &self.duration_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .field("time_up", &self.time_up)
            .finish()
    }
}

impl Timer {
    pub fn new(duration_minutes: u32) -> Self {
        let duration_secs = duration_minutes.saturating_mul(60);
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            time_up: false,
            on_expire: None,
        }
    }

    /// Called once each time a run reaches zero.
    pub fn set_on_expire(&mut self, callback: ExpireCallback) {
        self.on_expire = Some(callback);
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts ticking. A timer that already expired must be `reset()` first.
    pub fn start(&mut self) -> bool {
        if self.time_up {
            return false;
        }
        self.running = true;
        true
    }

    /// Halts ticking, keeping the remaining time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.time_up = false;
        self.remaining_secs = self.duration_secs;
    }

    /// Advances the clock by one second. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Some(TimerEvent::Tick {
                remaining: self.remaining_secs,
            });
        }

        self.running = false;
        self.time_up = true;
        if let Some(callback) = self.on_expire.as_mut() {
            callback();
        }
        Some(TimerEvent::Expired)
    }
}

/// Background task delivering one tick per `TICK_INTERVAL`.
#[derive(Debug)]
pub struct Ticker {
    rx: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        Self::spawn_with_interval(TICK_INTERVAL)
    }

    pub fn spawn_with_interval(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_tick_task(period, tx);
        Self { rx, handle }
    }

    /// Resolves on the next tick; `None` once the task has ended.
    pub async fn next_tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn spawn_tick_task(period: Duration, tx: mpsc::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    })
}

/// Keeps the ticker slot in step with the timer: a ticker exists exactly
/// while the timer is running.
pub fn reconcile_ticker(slot: &mut Option<Ticker>, timer_running: bool) {
    match (slot.is_some(), timer_running) {
        (false, true) => *slot = Some(Ticker::spawn()),
        (true, false) => *slot = None,
        _ => {}
    }
}

pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
