use super::{WindowController, WindowId};
use log::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ClientMessageEvent, ConnectionExt, EventMask, Window};

/// ICCCM `IconicState`, requested through `WM_CHANGE_STATE`.
const ICONIC_STATE: u32 = 3;

pub struct LinuxDesktop {
    conn: Option<x11rb::rust_connection::RustConnection>,
    root: Window,
}

impl Default for LinuxDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxDesktop {
    pub fn new() -> Self {
        match x11rb::connect(None) {
            Ok((conn, screen_num)) => {
                let Some(root) = conn.setup().roots.get(screen_num).map(|screen| screen.root) else {
                    warn!(
                        "Invalid screen number {} ({} screens available). Enforcement disabled.",
                        screen_num,
                        conn.setup().roots.len()
                    );
                    return Self { conn: None, root: 0 };
                };
                Self {
                    conn: Some(conn),
                    root,
                }
            }
            Err(e) => {
                // Wayland and headless sessions end up here
                warn!("Failed to connect to X server: {e}. Enforcement disabled.");
                Self { conn: None, root: 0 }
            }
        }
    }

    fn get_atom(&self, name: &str) -> Option<u32> {
        self.conn.as_ref()?
            .intern_atom(false, name.as_bytes())
            .ok()?
            .reply()
            .ok()
            .map(|r| r.atom)
    }

    /// First 32-bit values of a window property.
    fn get_property32(&self, window: Window, atom: u32, kind: AtomEnum, len: u32) -> Option<Vec<u32>> {
        let reply = self.conn.as_ref()?
            .get_property(false, window, atom, kind, 0, len)
            .ok()?
            .reply()
            .ok()?;

        let values: Vec<u32> = reply.value32()?.collect();
        Some(values)
    }

    fn to_window(window: WindowId) -> Option<Window> {
        Window::try_from(window.0).ok()
    }
}

impl WindowController for LinuxDesktop {
    fn foreground_window(&self) -> Option<WindowId> {
        let atom = self.get_atom("_NET_ACTIVE_WINDOW")?;
        let window = *self.get_property32(self.root, atom, AtomEnum::WINDOW, 1)?.first()?;
        if window == 0 {
            return None;
        }
        usize::try_from(window).ok().map(WindowId)
    }

    fn window_exists(&self, window: WindowId) -> bool {
        let (Some(conn), Some(window)) = (self.conn.as_ref(), Self::to_window(window)) else {
            return false;
        };
        conn.get_window_attributes(window)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .is_some()
    }

    fn window_process_id(&self, window: WindowId) -> Option<u32> {
        let atom = self.get_atom("_NET_WM_PID")?;
        let pid = *self
            .get_property32(Self::to_window(window)?, atom, AtomEnum::CARDINAL, 1)?
            .first()?;
        (pid != 0).then_some(pid)
    }

    fn process_image_path(&self, pid: u32) -> Option<String> {
        match std::fs::read_link(format!("/proc/{pid}/exe")) {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                debug!("Could not resolve executable of {pid}: {e}");
                None
            }
        }
    }

    fn minimize(&self, window: WindowId) {
        let (Some(conn), Some(window), Some(change_state)) =
            (self.conn.as_ref(), Self::to_window(window), self.get_atom("WM_CHANGE_STATE"))
        else {
            return;
        };

        let event = ClientMessageEvent::new(32, window, change_state, [ICONIC_STATE, 0, 0, 0, 0]);
        let sent = conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .map(|_| ())
            .and_then(|()| conn.flush());

        if let Err(e) = sent {
            debug!("Minimize request for window {window} failed: {e}");
        }
    }

    fn is_minimized(&self, window: WindowId) -> bool {
        let (Some(window), Some(state), Some(hidden)) = (
            Self::to_window(window),
            self.get_atom("_NET_WM_STATE"),
            self.get_atom("_NET_WM_STATE_HIDDEN"),
        ) else {
            return false;
        };

        self.get_property32(window, state, AtomEnum::ATOM, 32)
            .is_some_and(|atoms| atoms.contains(&hidden))
    }

    fn set_enabled(&self, _window: WindowId, _enabled: bool) -> bool {
        // X11 has no per-window input disable
        false
    }
}
