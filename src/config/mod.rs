//! Review settings backed by a SQLite key-value table.
//!
//! [`Config`] is the raw store; [`ReviewConfig`] is the typed view the
//! factory consumes. Cache lifetimes are stored in milliseconds under
//! [`CACHE_TTL_KEY`] (default) and `CACHE_TTL_KEY.<id>` (per identifier).

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::consts::{CACHE_TTL_KEY, CACHE_TTL_KEY_PREFIX, cache_ttl_key_for, default_db_path};

/// Persistent key-value settings store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the settings table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open settings database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create settings table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the settings database at [`default_db_path`].
    pub fn open_default() -> Result<Self> {
        let path = default_db_path().context("cannot determine home directory")?;
        Self::open_at(&path)
    }

    /// Open a file-backed database, creating missing parent directories.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let path = path
            .to_str()
            .with_context(|| format!("non-UTF-8 settings path: {}", path.display()))?;
        Self::open(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Upsert.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(())
    }

    /// All entries whose key starts with `prefix`, ordered by key.
    pub fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT key, value FROM settings WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let entries = stmt
            .query_map([prefix], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

/// Cache lifetimes for review state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewConfig {
    /// Applies to ids without an override. `None` means never expire.
    pub default_ttl: Option<Duration>,
    pub ttl_overrides: HashMap<String, Duration>,
}

impl ReviewConfig {
    pub fn ttl_for(&self, id: &str) -> Option<Duration> {
        self.ttl_overrides.get(id).copied().or(self.default_ttl)
    }

    pub fn load(config: &Config) -> Result<Self> {
        let default_ttl = config
            .get(CACHE_TTL_KEY)?
            .map(|v| parse_millis(CACHE_TTL_KEY, &v))
            .transpose()?;

        let mut ttl_overrides = HashMap::new();
        for (key, value) in config.entries_with_prefix(CACHE_TTL_KEY_PREFIX)? {
            let id = &key[CACHE_TTL_KEY_PREFIX.len()..];
            if id.is_empty() {
                continue;
            }
            ttl_overrides.insert(id.to_string(), parse_millis(&key, &value)?);
        }

        Ok(Self {
            default_ttl,
            ttl_overrides,
        })
    }

    /// Write every lifetime back. Keys for ttls no longer present are removed.
    pub fn save(&self, config: &Config) -> Result<()> {
        match self.default_ttl {
            Some(ttl) => config.set(CACHE_TTL_KEY, &ttl.as_millis().to_string())?,
            None => config.remove(CACHE_TTL_KEY)?,
        }
        for (key, _) in config.entries_with_prefix(CACHE_TTL_KEY_PREFIX)? {
            if !self.ttl_overrides.contains_key(&key[CACHE_TTL_KEY_PREFIX.len()..]) {
                config.remove(&key)?;
            }
        }
        for (id, ttl) in &self.ttl_overrides {
            config.set(&cache_ttl_key_for(id), &ttl.as_millis().to_string())?;
        }
        Ok(())
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    let ms: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid millisecond value for {key}: {value:?}"))?;
    Ok(Duration::from_millis(ms))
}
