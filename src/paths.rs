use std::path::PathBuf;

use crate::types::CONFIG_DIR;

/// Returns the issuedesk settings directory.
///
/// Resolution order:
/// 1. `ISSUEDESK_ROOT` environment variable (if set)
/// 2. Current working directory + `.issuedesk`
pub fn desk_root() -> PathBuf {
    if let Ok(root) = std::env::var("ISSUEDESK_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(CONFIG_DIR)
    }
}
