//! Paths that are never blocked, and the system directory kept usable in
//! allow-list mode.

use crate::constants::{DEFAULT_WINDOWS_DIR, SHELL_EXECUTABLE, SYSTEM_APPS_DIR};
use log::warn;

/// The Windows directory, from `%WINDIR%` when set.
pub fn windows_dir() -> String {
    std::env::var("WINDIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_WINDOWS_DIR.to_string())
}

/// Full path of the desktop shell executable.
pub fn shell_executable() -> String {
    join_windows_path(&windows_dir(), SHELL_EXECUTABLE)
}

/// Directory hosting shell system apps (start menu, settings, lock screen).
pub fn system_apps_dir() -> String {
    join_windows_path(&windows_dir(), SYSTEM_APPS_DIR)
}

/// Path of the running executable, if the OS reports one.
pub fn own_executable() -> Option<String> {
    match std::env::current_exe() {
        Ok(path) => Some(path.to_string_lossy().into_owned()),
        Err(e) => {
            warn!("Could not resolve own executable path: {e}");
            None
        }
    }
}

/// Shell plus this process, in raw (not yet normalized) form.
pub fn default_exclusions() -> Vec<String> {
    let mut paths = vec![shell_executable()];
    paths.extend(own_executable());
    paths
}

fn join_windows_path(dir: &str, leaf: &str) -> String {
    format!("{}\\{leaf}", dir.trim_end_matches(['\\', '/']))
}
