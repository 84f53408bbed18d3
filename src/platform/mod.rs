pub mod types;

pub use types::{WindowController, WindowId};

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub use win32::WindowsDesktop as NativeDesktop;

#[cfg(target_os = "linux")]
pub use linux::LinuxDesktop as NativeDesktop;

// Nothing to enforce on other platforms
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub struct NativeDesktop;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
impl WindowController for NativeDesktop {
    fn foreground_window(&self) -> Option<WindowId> {
        None
    }

    fn window_exists(&self, _window: WindowId) -> bool {
        false
    }

    fn window_process_id(&self, _window: WindowId) -> Option<u32> {
        None
    }

    fn process_image_path(&self, _pid: u32) -> Option<String> {
        None
    }

    fn minimize(&self, _window: WindowId) {}

    fn is_minimized(&self, _window: WindowId) -> bool {
        false
    }

    fn set_enabled(&self, _window: WindowId, _enabled: bool) -> bool {
        false
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
impl NativeDesktop {
    pub fn new() -> Self {
        Self
    }
}
