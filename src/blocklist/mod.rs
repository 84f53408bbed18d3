pub mod builtin;
pub mod normalize;

pub use normalize::{executable_name, normalize_path, ProcessKey};

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Whether the configured list names the permitted or the blocked apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Only listed apps may stay in the foreground.
    Allow,
    /// Only listed apps are blocked.
    #[default]
    Deny,
}

impl ListMode {
    /// Map the channel's `allowList` flag.
    pub fn from_allow_flag(allow: bool) -> Self {
        if allow {
            ListMode::Allow
        } else {
            ListMode::Deny
        }
    }

    pub fn is_allow(self) -> bool {
        matches!(self, ListMode::Allow)
    }
}

impl std::fmt::Display for ListMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListMode::Allow => write!(f, "allow-list"),
            ListMode::Deny => write!(f, "deny-list"),
        }
    }
}

/// One complete enforcement configuration, already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockConfig {
    pub mode: ListMode,
    /// Executable names (lowercase, no extension).
    pub members: HashSet<String>,
    /// Normalized path fragments matched by substring.
    pub directories: Vec<String>,
}

impl BlockConfig {
    /// Build a configuration from raw channel input. Blank entries are dropped.
    pub fn new<A, D, S, T>(mode: ListMode, apps: A, directories: D) -> Self
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let members = apps
            .into_iter()
            .map(|app| executable_name(app.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        let mut dirs: Vec<String> = Vec::new();
        for dir in directories {
            let dir = normalize_path(dir.as_ref());
            if !dir.is_empty() && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        Self {
            mode,
            members,
            directories: dirs,
        }
    }

    fn in_list(&self, key: &ProcessKey) -> bool {
        self.members.contains(key.name()) || self.in_directories(key.path())
    }

    fn in_directories(&self, path: &str) -> bool {
        self.directories.iter().any(|dir| path.contains(dir.as_str()))
    }

    fn decide(&self, key: &ProcessKey) -> bool {
        let in_list = self.in_list(key);
        match self.mode {
            ListMode::Deny => in_list,
            ListMode::Allow => !in_list,
        }
    }
}

struct BlockState {
    config: BlockConfig,
    cache: HashMap<String, bool>,
}

/// Single source of truth for "may this process stay in the foreground".
///
/// Configuration and decision cache live behind one mutex, so a decision is
/// never served against a configuration other than the one it was computed
/// for.
pub struct BlockListStore {
    exclusions: HashSet<String>,
    system_apps_dir: String,
    state: Mutex<BlockState>,
}

impl Default for BlockListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockListStore {
    /// Store with the shell and this executable excluded.
    pub fn new() -> Self {
        Self::with_exclusions(builtin::default_exclusions())
    }

    /// Store with an explicit set of never-blocked paths.
    pub fn with_exclusions<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclusions: HashSet<String> = paths
            .into_iter()
            .map(|p| normalize_path(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        let cache = seeded_cache(&exclusions);

        Self {
            exclusions,
            system_apps_dir: normalize_path(&builtin::system_apps_dir()),
            state: Mutex::new(BlockState {
                config: BlockConfig::default(),
                cache,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BlockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("BlockListStore: state mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Replace the whole configuration and drop every cached decision.
    pub fn set_configuration<A, D, S, T>(&self, mode: ListMode, apps: A, directories: D)
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut config = BlockConfig::new(mode, apps, directories);
        if mode.is_allow() && !config.directories.contains(&self.system_apps_dir) {
            config.directories.push(self.system_apps_dir.clone());
        }

        info!(
            "Block list updated: {} mode, {} apps, {} directories",
            config.mode,
            config.members.len(),
            config.directories.len()
        );

        let cache = seeded_cache(&self.exclusions);
        let mut state = self.lock_state();
        state.config = config;
        state.cache = cache;
    }

    /// Whether the process at `path` must be kept out of the foreground.
    pub fn is_blocked(&self, path: &str) -> bool {
        let key = ProcessKey::new(path);
        let mut state = self.lock_state();

        if self.exclusions.contains(key.path()) {
            state.cache.insert(key.path().to_string(), false);
            return false;
        }

        if let Some(&cached) = state.cache.get(key.path()) {
            return cached;
        }

        let blocked = state.config.decide(&key);
        debug!("Decision for {}: blocked={blocked}", key.path());
        state.cache.insert(key.path().to_string(), blocked);
        blocked
    }

    pub fn mode(&self) -> ListMode {
        self.lock_state().config.mode
    }

    /// Copy of the active configuration.
    pub fn snapshot(&self) -> BlockConfig {
        self.lock_state().config.clone()
    }

    /// Number of cached decisions, exclusions included.
    pub fn cached_decisions(&self) -> usize {
        self.lock_state().cache.len()
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.contains(&normalize_path(path))
    }
}

fn seeded_cache(exclusions: &HashSet<String>) -> HashMap<String, bool> {
    exclusions.iter().map(|p| (p.clone(), false)).collect()
}
