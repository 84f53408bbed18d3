//! Path normalization shared by the block list and its callers.
//!
//! Every path is lowercased and uses `\` separators. Members are compared by
//! executable name (base name without extension), directory fragments and
//! exclusions by the full normalized path.

/// Lowercase a path and turn `/` separators into `\`.
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('/', "\\").to_lowercase()
}

/// Lowercase base name of an executable path or bare name, without extension.
///
/// Returns an empty string for paths ending in a separator.
pub fn executable_name(path: &str) -> String {
    let normalized = normalize_path(path);
    let base = normalized.rsplit('\\').next().unwrap_or_default();

    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        Some(_) | None => base.to_string(),
    }
}

/// A queried process path reduced to both matching forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessKey {
    path: String,
    name: String,
}

impl ProcessKey {
    pub fn new(raw_path: &str) -> Self {
        Self {
            path: normalize_path(raw_path),
            name: executable_name(raw_path),
        }
    }

    /// Full normalized path, used for exclusions, directories and the cache.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Executable name, used for member matching.
    pub fn name(&self) -> &str {
        &self.name
    }
}
