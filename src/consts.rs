//! Project-wide constants.

use std::path::PathBuf;

/// Setting key for the cache lifetime applied when no per-id override exists.
pub const CACHE_TTL_KEY: &str = "review.cache_ttl_ms";

/// Prefix for per-identifier cache lifetime overrides (`review.cache_ttl_ms.<id>`).
pub const CACHE_TTL_KEY_PREFIX: &str = "review.cache_ttl_ms.";

/// Capacity of the state-change broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default settings database path: `~/.review-kit/settings.db`.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".review-kit").join("settings.db"))
}

/// Setting key holding the cache lifetime override for one identifier.
pub fn cache_ttl_key_for(id: &str) -> String {
    format!("{CACHE_TTL_KEY_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_id_key_extends_default_key() {
        let key = cache_ttl_key_for("p1");
        assert_eq!(key, "review.cache_ttl_ms.p1");
        assert!(key.starts_with(CACHE_TTL_KEY));
    }

    #[test]
    fn default_db_path_ends_with_settings_db() {
        if let Some(path) = default_db_path() {
            assert!(path.ends_with(".review-kit/settings.db"));
        }
    }
}
