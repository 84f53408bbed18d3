// src/constants.rs

/// Method channel the Flutter UI talks to.
pub const APP_LIST_CHANNEL: &str = "com.routine.applist";

/// Default delay between enforcement ticks, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Fastest allowed enforcement cadence, in milliseconds.
pub const MIN_POLL_INTERVAL_MS: u64 = 20;

/// Slowest allowed enforcement cadence, in milliseconds.
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

/// Default wait before re-checking a minimized window, in milliseconds.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 50;

/// Upper bound on the re-check wait, in milliseconds.
pub const MAX_GRACE_PERIOD_MS: u64 = 500;

/// Windows directory used when `%WINDIR%` is not set.
pub const DEFAULT_WINDOWS_DIR: &str = r"C:\Windows";

/// Desktop shell executable, relative to the Windows directory.
pub const SHELL_EXECUTABLE: &str = "explorer.exe";

/// Directory of shell-hosted system apps, kept usable in allow-list mode.
pub const SYSTEM_APPS_DIR: &str = "SystemApps";

/// Log file name inside the application data directory.
pub const LOG_FILE_NAME: &str = "routine_app.log";

/// Environment overrides for the enforcer.
pub const ENV_POLL_INTERVAL_MS: &str = "ROUTINE_POLL_INTERVAL_MS";
pub const ENV_GRACE_PERIOD_MS: &str = "ROUTINE_GRACE_PERIOD_MS";
pub const ENV_DISABLE_WINDOWS: &str = "ROUTINE_DISABLE_WINDOWS";
pub const ENV_TRIGGER: &str = "ROUTINE_TRIGGER";
