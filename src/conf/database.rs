use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::BulkError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SynchronousMode {
    Off,
    Normal,
    Full,
    Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_journal_mode")]
    pub journal_mode: JournalMode,
    #[serde(default = "DatabaseConfig::default_synchronous")]
    pub synchronous: SynchronousMode,
    #[serde(
        with = "humantime_serde",
        default = "DatabaseConfig::default_acquire_timeout"
    )]
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    fn default_url() -> String {
        String::from("sqlite::memory:")
    }

    fn default_max_connections() -> u32 {
        1
    }

    fn default_journal_mode() -> JournalMode {
        JournalMode::Wal
    }

    fn default_synchronous() -> SynchronousMode {
        SynchronousMode::Off
    }

    fn default_acquire_timeout() -> Duration {
        Duration::from_secs(30)
    }

    /// Config for an on-disk database file, created if missing.
    pub fn for_file(path: &std::path::Path) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// A private in-memory database is only visible to the connection that
    /// opened it. `cache=shared` urls are visible to the whole pool.
    pub fn requires_single_connection(&self) -> bool {
        self.is_in_memory() && !self.url.contains("cache=shared")
    }

    pub fn validate(&self) -> Result<(), BulkError> {
        if self.max_connections == 0 {
            return Err(BulkError::ConfigParsingError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.requires_single_connection() && self.max_connections != 1 {
            return Err(BulkError::ConfigParsingError(format!(
                "in-memory database '{}' requires max_connections = 1, got {}",
                self.url, self.max_connections
            )));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
            journal_mode: Self::default_journal_mode(),
            synchronous: Self::default_synchronous(),
            acquire_timeout: Self::default_acquire_timeout(),
        }
    }
}
