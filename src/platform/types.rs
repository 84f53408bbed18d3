/// Native top-level window handle, opaque outside the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub usize);

/// Window and process operations the enforcement loop needs.
///
/// Every call is fallible at the OS level; failures come back as `None` or
/// `false` and the caller skips the current tick.
pub trait WindowController: Send + Sync {
    fn foreground_window(&self) -> Option<WindowId>;
    /// Whether the handle still names a live window.
    fn window_exists(&self, window: WindowId) -> bool;
    fn window_process_id(&self, window: WindowId) -> Option<u32>;
    /// Full executable path, queried with limited rights.
    fn process_image_path(&self, pid: u32) -> Option<String>;
    fn minimize(&self, window: WindowId);
    fn is_minimized(&self, window: WindowId) -> bool;
    /// Enable or disable input to a window. Returns `false` when the platform
    /// could not apply the change.
    fn set_enabled(&self, window: WindowId, enabled: bool) -> bool;
}
