#[cfg(target_os = "windows")]
mod hook;
pub mod trigger;

pub use trigger::{build_trigger, ForegroundTrigger, IntervalTrigger, TriggerKind};

use crate::blocklist::BlockListStore;
use crate::constants::{
    DEFAULT_GRACE_PERIOD_MS, DEFAULT_POLL_INTERVAL_MS, ENV_DISABLE_WINDOWS, ENV_GRACE_PERIOD_MS,
    ENV_POLL_INTERVAL_MS, ENV_TRIGGER,
};
use crate::platform::{WindowController, WindowId};
use crate::validation::{parse_flag, parse_grace_period, parse_poll_interval, parse_trigger};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcerConfig {
    pub poll_interval: Duration,
    /// Wait before checking whether a minimize stuck.
    pub grace_period: Duration,
    /// Also disable input to blocked windows while they are minimized.
    pub disable_windows: bool,
    pub trigger: TriggerKind,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
            disable_windows: true,
            trigger: TriggerKind::Poll,
        }
    }
}

impl EnforcerConfig {
    /// Defaults with `ROUTINE_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Invalid values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            match parse_poll_interval(&value) {
                Ok(interval) => self.poll_interval = interval,
                Err(e) => warn!("Ignoring {ENV_POLL_INTERVAL_MS}: {e}"),
            }
        }
        if let Some(value) = lookup(ENV_GRACE_PERIOD_MS) {
            match parse_grace_period(&value) {
                Ok(grace) => self.grace_period = grace,
                Err(e) => warn!("Ignoring {ENV_GRACE_PERIOD_MS}: {e}"),
            }
        }
        if let Some(value) = lookup(ENV_DISABLE_WINDOWS) {
            match parse_flag("disable_windows", &value) {
                Ok(flag) => self.disable_windows = flag,
                Err(e) => warn!("Ignoring {ENV_DISABLE_WINDOWS}: {e}"),
            }
        }
        if let Some(value) = lookup(ENV_TRIGGER) {
            match parse_trigger(&value) {
                Ok(kind) => self.trigger = kind,
                Err(e) => warn!("Ignoring {ENV_TRIGGER}: {e}"),
            }
        }
        self
    }
}

/// Where a tick gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    ProcessId,
    ImagePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No foreground window.
    Idle,
    /// An OS lookup failed; try again next tick.
    Skipped(TickStage),
    Allowed,
    Suppressed { retried: bool },
}

/// What the sweep learned about a window it disabled earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepState {
    Blocked,
    Exempt,
    Gone,
    /// Lookup failed; retry next tick.
    Unknown,
}

/// One enforcement pass against the live desktop per `tick`.
///
/// Remembers the windows it disabled so they can be re-enabled once a
/// configuration change exempts them. A disabled window cannot become the
/// foreground again, so every tick sweeps that set.
pub struct EnforcementLoop<P> {
    platform: P,
    store: Arc<BlockListStore>,
    grace_period: Duration,
    disable_windows: bool,
    disabled: HashSet<WindowId>,
}

impl<P: WindowController> EnforcementLoop<P> {
    pub fn new(platform: P, store: Arc<BlockListStore>, config: &EnforcerConfig) -> Self {
        Self {
            platform,
            store,
            grace_period: config.grace_period,
            disable_windows: config.disable_windows,
            disabled: HashSet::new(),
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.release_exempted();

        let Some(window) = self.platform.foreground_window() else {
            return TickOutcome::Idle;
        };

        let Some(pid) = self.platform.window_process_id(window) else {
            debug!("No owning process for {window:?}, skipping tick");
            return TickOutcome::Skipped(TickStage::ProcessId);
        };

        let Some(path) = self.platform.process_image_path(pid) else {
            debug!("No image path for pid {pid}, skipping tick");
            return TickOutcome::Skipped(TickStage::ImagePath);
        };

        if self.store.is_blocked(&path) {
            let retried = self.suppress(window, &path);
            TickOutcome::Suppressed { retried }
        } else {
            self.release(window);
            TickOutcome::Allowed
        }
    }

    /// Minimize, optionally disable, then re-check once after the grace period.
    /// Returns whether the minimize had to be repeated.
    fn suppress(&mut self, window: WindowId, path: &str) -> bool {
        info!("Blocking foreground app {path}");
        self.platform.minimize(window);

        if self.disable_windows && !self.disabled.contains(&window) && self.platform.set_enabled(window, false) {
            self.disabled.insert(window);
        }

        if !self.grace_period.is_zero() {
            thread::sleep(self.grace_period);
        }

        if self.platform.is_minimized(window) {
            return false;
        }

        info!("{path} resisted minimize, retrying once");
        self.platform.minimize(window);
        true
    }

    fn release(&mut self, window: WindowId) {
        if self.disabled.remove(&window) {
            self.platform.set_enabled(window, true);
            info!("Re-enabled window {window:?}");
        }
    }

    fn release_exempted(&mut self) {
        let exempted: Vec<WindowId> = self
            .disabled
            .iter()
            .copied()
            .filter(|&window| match self.sweep_state(window) {
                SweepState::Exempt | SweepState::Gone => true,
                SweepState::Blocked | SweepState::Unknown => false,
            })
            .collect();

        for window in exempted {
            self.release(window);
        }
    }

    /// A failed lookup on a window that still exists leaves it disabled.
    fn sweep_state(&self, window: WindowId) -> SweepState {
        if !self.platform.window_exists(window) {
            return SweepState::Gone;
        }

        let path = self
            .platform
            .window_process_id(window)
            .and_then(|pid| self.platform.process_image_path(pid));

        match path {
            Some(path) if self.store.is_blocked(&path) => SweepState::Blocked,
            Some(_) => SweepState::Exempt,
            None => SweepState::Unknown,
        }
    }

    /// Re-enable every window this loop disabled.
    pub fn release_all(&mut self) {
        let windows: Vec<WindowId> = self.disabled.iter().copied().collect();
        for window in windows {
            self.release(window);
        }
    }

    pub fn disabled_windows(&self) -> usize {
        self.disabled.len()
    }
}

/// Runs the enforcement loop on its own thread.
pub struct EnforcerService {
    config: EnforcerConfig,
    running: Arc<AtomicBool>,
    store: Arc<BlockListStore>,
}

impl EnforcerService {
    pub fn new(store: Arc<BlockListStore>, config: EnforcerConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            store,
        }
    }

    pub fn start<P>(&self, platform: P) -> thread::JoinHandle<()>
    where
        P: WindowController + 'static,
    {
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let config = self.config.clone();

        info!(
            "Starting enforcement: {:?} trigger, {} ms interval",
            config.trigger,
            config.poll_interval.as_millis()
        );

        thread::spawn(move || {
            let mut trigger = build_trigger(config.trigger, config.poll_interval, Arc::clone(&running));
            let mut enforcement = EnforcementLoop::new(platform, store, &config);

            while running.load(Ordering::SeqCst) {
                enforcement.tick();
                if !trigger.wait() {
                    break;
                }
            }

            enforcement.release_all();
            info!("Enforcement stopped");
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
