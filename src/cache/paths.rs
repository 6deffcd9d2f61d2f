// Cache path utilities.
// Locates the store directory and log file under the platform cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/folio on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Resolve the base directory, preferring an explicit override.
pub fn base_dir(override_dir: Option<&Path>) -> Option<PathBuf> {
    override_dir.map(Path::to_path_buf).or_else(cache_dir)
}

/// Directory holding key-value store entries.
pub fn store_dir(base: &Path) -> PathBuf {
    base.join("store")
}

/// Path to the tracing log file.
pub fn log_path(base: &Path) -> PathBuf {
    base.join("folio.log")
}

/// Store key for a data kind of an account, e.g. `github_projects_octocat`.
pub fn entry_key(kind: &str, account: &str) -> String {
    format!("github_{}_{}", kind, account)
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
