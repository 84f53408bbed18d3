//! What wakes the enforcement loop: a fixed interval, or foreground-change
//! events with the interval as a fallback.

use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How the enforcement loop is woken up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerKind {
    /// Tick on a fixed interval.
    #[default]
    Poll,
    /// Tick on every foreground change, and on the interval in between.
    WinEvent,
}

pub trait ForegroundTrigger: Send {
    /// Block until the next tick is due. Returns `false` once the loop should stop.
    fn wait(&mut self) -> bool;
}

/// Pull-based trigger: sleep, then tick.
pub struct IntervalTrigger {
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl IntervalTrigger {
    pub fn new(interval: Duration, running: Arc<AtomicBool>) -> Self {
        Self { interval, running }
    }
}

impl ForegroundTrigger for IntervalTrigger {
    fn wait(&mut self) -> bool {
        thread::sleep(self.interval);
        self.running.load(Ordering::SeqCst)
    }
}

/// Build the requested trigger, falling back to polling when the platform
/// has no foreground event source.
pub fn build_trigger(
    kind: TriggerKind,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> Box<dyn ForegroundTrigger> {
    match kind {
        TriggerKind::Poll => Box::new(IntervalTrigger::new(interval, running)),
        TriggerKind::WinEvent => win_event_trigger(interval, running),
    }
}

#[cfg(target_os = "windows")]
fn win_event_trigger(interval: Duration, running: Arc<AtomicBool>) -> Box<dyn ForegroundTrigger> {
    match super::hook::WinEventTrigger::install(interval, Arc::clone(&running)) {
        Ok(trigger) => Box::new(trigger),
        Err(e) => {
            warn!("Foreground hook unavailable ({e}), falling back to polling");
            Box::new(IntervalTrigger::new(interval, running))
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn win_event_trigger(interval: Duration, running: Arc<AtomicBool>) -> Box<dyn ForegroundTrigger> {
    warn!("Foreground hook is only available on Windows, falling back to polling");
    Box::new(IntervalTrigger::new(interval, running))
}
