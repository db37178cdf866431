// paths.rs — home-relative directories for the rotating log and the audit
// trail. Both live under ~/.mailsweep/ so a cron-driven run needs no
// writable working directory.

use std::path::PathBuf;

use anyhow::Context;

pub fn home_dir() -> Option<PathBuf> {
    for key in ["HOME", "USERPROFILE"] {
        if let Ok(v) = std::env::var(key) {
            if !v.is_empty() {
                return Some(PathBuf::from(v));
            }
        }
    }
    None
}

/// Resolve a home-relative directory, creating it if missing.
pub fn ensure_home_subdir(rel: &str) -> anyhow::Result<PathBuf> {
    let home = home_dir().context("cannot determine home directory")?;
    let dir = home.join(rel);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed creating {}", dir.display()))?;
    Ok(dir)
}
