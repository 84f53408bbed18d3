//! Push-based trigger backed by an out-of-context `EVENT_SYSTEM_FOREGROUND`
//! hook. The hook lives on its own thread with a message pump; the callback
//! forwards a wake-up to the enforcement thread.

#![allow(unsafe_code, reason = "WinEvent hooks and the message pump are unsafe FFI")]

use super::trigger::ForegroundTrigger;
use crate::error::AppError;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, EVENT_SYSTEM_FOREGROUND, MSG,
    WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS, WM_QUIT,
};

// The hook callback carries no user data
static FOREGROUND_EVENTS: Mutex<Option<Sender<()>>> = Mutex::new(None);

unsafe extern "system" fn on_foreground_event(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if event != EVENT_SYSTEM_FOREGROUND || hwnd.0.is_null() {
        return;
    }

    if let Ok(guard) = FOREGROUND_EVENTS.lock() {
        if let Some(sender) = guard.as_ref() {
            let _ = sender.send(());
        }
    }
}

pub struct WinEventTrigger {
    events: Receiver<()>,
    interval: Duration,
    running: Arc<AtomicBool>,
    pump_thread_id: u32,
    pump: Option<JoinHandle<()>>,
}

impl WinEventTrigger {
    /// Install the hook on a dedicated pump thread.
    pub fn install(interval: Duration, running: Arc<AtomicBool>) -> Result<Self, AppError> {
        let (events_tx, events) = mpsc::channel();
        {
            let mut slot = FOREGROUND_EVENTS.lock().map_err(|_| AppError::LockPoisoned)?;
            if slot.is_some() {
                return Err(AppError::Internal("foreground hook already installed".into()));
            }
            *slot = Some(events_tx);
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let pump = thread::spawn(move || run_pump(&ready_tx));

        match ready_rx.recv() {
            Ok(Some(pump_thread_id)) => {
                info!("Foreground hook installed");
                Ok(Self {
                    events,
                    interval,
                    running,
                    pump_thread_id,
                    pump: Some(pump),
                })
            }
            Ok(None) | Err(_) => {
                let _ = pump.join();
                clear_sender();
                Err(AppError::Internal("SetWinEventHook failed".into()))
            }
        }
    }
}

fn run_pump(ready: &Sender<Option<u32>>) {
    let hook = unsafe {
        SetWinEventHook(
            EVENT_SYSTEM_FOREGROUND,
            EVENT_SYSTEM_FOREGROUND,
            None,
            Some(on_foreground_event),
            0,
            0,
            WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
        )
    };

    if hook.0.is_null() {
        let _ = ready.send(None);
        return;
    }

    let _ = ready.send(Some(unsafe { GetCurrentThreadId() }));

    // Out-of-context callbacks are delivered while this thread waits for
    // messages. GetMessageW returns -1 on error, 0 on WM_QUIT.
    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    if !unsafe { UnhookWinEvent(hook) }.as_bool() {
        warn!("UnhookWinEvent failed");
    }
    debug!("Foreground hook pump exited");
}

fn clear_sender() {
    match FOREGROUND_EVENTS.lock() {
        Ok(mut slot) => *slot = None,
        Err(poisoned) => *poisoned.into_inner() = None,
    }
}

impl ForegroundTrigger for WinEventTrigger {
    fn wait(&mut self) -> bool {
        match self.events.recv_timeout(self.interval) {
            Ok(()) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => thread::sleep(self.interval),
        }
        // Coalesce bursts of focus changes into one tick
        while self.events.try_recv().is_ok() {}

        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for WinEventTrigger {
    fn drop(&mut self) {
        let posted = unsafe { PostThreadMessageW(self.pump_thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        if let Err(e) = posted {
            warn!("Could not stop foreground hook pump: {e}");
        } else if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
        clear_sender();
        info!("Foreground hook removed");
    }
}
