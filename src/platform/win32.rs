//! Win32 implementation of the window controller.

#![allow(unsafe_code, reason = "Win32 window and process APIs are unsafe FFI")]
#![allow(clippy::as_conversions, reason = "HWND is a raw pointer wrapper")]

use super::{WindowController, WindowId};
use log::debug;
use std::ffi::c_void;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, HWND};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowThreadProcessId, IsIconic, IsWindow, ShowWindow, SW_FORCEMINIMIZE,
};

/// Longest image path we ask the OS for (extended-length paths).
const MAX_IMAGE_PATH: usize = 1024;

#[derive(Debug, Default)]
pub struct WindowsDesktop;

impl WindowsDesktop {
    pub fn new() -> Self {
        Self
    }
}

fn to_hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut c_void)
}

pub(crate) fn from_hwnd(hwnd: HWND) -> Option<WindowId> {
    if hwnd.0.is_null() {
        None
    } else {
        Some(WindowId(hwnd.0 as usize))
    }
}

impl WindowController for WindowsDesktop {
    fn foreground_window(&self) -> Option<WindowId> {
        from_hwnd(unsafe { GetForegroundWindow() })
    }

    fn window_exists(&self, window: WindowId) -> bool {
        unsafe { IsWindow(Some(to_hwnd(window))) }.as_bool()
    }

    fn window_process_id(&self, window: WindowId) -> Option<u32> {
        let mut pid = 0u32;
        let thread_id = unsafe { GetWindowThreadProcessId(to_hwnd(window), Some(std::ptr::addr_of_mut!(pid))) };
        if thread_id == 0 || pid == 0 {
            return None;
        }
        Some(pid)
    }

    fn process_image_path(&self, pid: u32) -> Option<String> {
        let handle = match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
            Ok(handle) => handle,
            Err(e) => {
                debug!("OpenProcess({pid}) failed: {e}");
                return None;
            }
        };

        let mut buffer = [0u16; MAX_IMAGE_PATH];
        let mut size = u32::try_from(buffer.len()).ok()?;
        let queried = unsafe {
            QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buffer.as_mut_ptr()), &mut size)
        };
        let _ = unsafe { CloseHandle(handle) };

        if let Err(e) = queried {
            debug!("QueryFullProcessImageNameW({pid}) failed: {e}");
            return None;
        }

        let len = usize::try_from(size).ok()?;
        Some(String::from_utf16_lossy(buffer.get(..len)?))
    }

    fn minimize(&self, window: WindowId) {
        // Return value is the previous visibility, not success
        let _ = unsafe { ShowWindow(to_hwnd(window), SW_FORCEMINIMIZE) };
    }

    fn is_minimized(&self, window: WindowId) -> bool {
        unsafe { IsIconic(to_hwnd(window)) }.as_bool()
    }

    fn set_enabled(&self, window: WindowId, enabled: bool) -> bool {
        // Fails only for invalid handles, which the pid lookup rejects first
        let _ = unsafe { EnableWindow(to_hwnd(window), enabled) };
        self.window_process_id(window).is_some()
    }
}
