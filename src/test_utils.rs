//! Shared test utilities for Routine.
//!
//! `FakeDesktop` is a scripted stand-in for the native window controller.
//! Clones share state, so a test can keep one handle while the enforcement
//! loop owns another.

#![cfg(test)]

use crate::platform::{WindowController, WindowId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct FakeWindow {
    pid: Option<u32>,
    minimized: bool,
    enabled: bool,
    /// Minimize requests to ignore before complying.
    resist: u32,
    minimize_calls: u32,
}

#[derive(Debug, Default)]
struct FakeState {
    foreground: Option<WindowId>,
    windows: HashMap<WindowId, FakeWindow>,
    processes: HashMap<u32, String>,
    supports_disable: bool,
}

#[derive(Debug, Clone)]
pub struct FakeDesktop {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                supports_disable: true,
                ..FakeState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Add a window owned by a process running `path`, and focus it.
    pub fn open(&self, window: usize, pid: u32, path: &str) -> WindowId {
        let id = WindowId(window);
        let mut state = self.lock();
        state.windows.insert(
            id,
            FakeWindow {
                pid: Some(pid),
                minimized: false,
                enabled: true,
                resist: 0,
                minimize_calls: 0,
            },
        );
        state.processes.insert(pid, path.to_string());
        state.foreground = Some(id);
        id
    }

    pub fn focus(&self, window: WindowId) {
        let mut state = self.lock();
        if let Some(w) = state.windows.get_mut(&window) {
            w.minimized = false;
        }
        state.foreground = Some(window);
    }

    pub fn clear_foreground(&self) {
        self.lock().foreground = None;
    }

    pub fn close(&self, window: WindowId) {
        let mut state = self.lock();
        state.windows.remove(&window);
        if state.foreground == Some(window) {
            state.foreground = None;
        }
    }

    /// Make the owning-process lookup fail for `window`.
    pub fn lose_pid(&self, window: WindowId) {
        if let Some(w) = self.lock().windows.get_mut(&window) {
            w.pid = None;
        }
    }

    /// Make the image path query fail for `pid`.
    pub fn deny_path(&self, pid: u32) {
        self.lock().processes.remove(&pid);
    }

    pub fn resist_minimize(&self, window: WindowId, times: u32) {
        if let Some(w) = self.lock().windows.get_mut(&window) {
            w.resist = times;
        }
    }

    pub fn without_disable_support(self) -> Self {
        self.lock().supports_disable = false;
        self
    }

    pub fn minimize_calls(&self, window: WindowId) -> u32 {
        self.lock().windows.get(&window).map_or(0, |w| w.minimize_calls)
    }

    pub fn is_enabled(&self, window: WindowId) -> bool {
        self.lock().windows.get(&window).is_some_and(|w| w.enabled)
    }

    pub fn minimized(&self, window: WindowId) -> bool {
        self.lock().windows.get(&window).is_some_and(|w| w.minimized)
    }
}

impl WindowController for FakeDesktop {
    fn foreground_window(&self) -> Option<WindowId> {
        self.lock().foreground
    }

    fn window_exists(&self, window: WindowId) -> bool {
        self.lock().windows.contains_key(&window)
    }

    fn window_process_id(&self, window: WindowId) -> Option<u32> {
        self.lock().windows.get(&window)?.pid
    }

    fn process_image_path(&self, pid: u32) -> Option<String> {
        self.lock().processes.get(&pid).cloned()
    }

    fn minimize(&self, window: WindowId) {
        let mut state = self.lock();
        let Some(w) = state.windows.get_mut(&window) else {
            return;
        };
        w.minimize_calls += 1;
        if w.resist > 0 {
            w.resist -= 1;
        } else {
            w.minimized = true;
        }
    }

    fn is_minimized(&self, window: WindowId) -> bool {
        self.minimized(window)
    }

    fn set_enabled(&self, window: WindowId, enabled: bool) -> bool {
        let mut state = self.lock();
        if !state.supports_disable {
            return false;
        }
        match state.windows.get_mut(&window) {
            Some(w) => {
                w.enabled = enabled;
                true
            }
            None => false,
        }
    }
}
