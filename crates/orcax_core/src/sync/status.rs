//! Persistence provenance and save status indicators.

use std::fmt::{Display, Formatter};

/// Where the currently held snapshot is known to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Confirmed by the remote store.
    Cloud,
    /// Held by the local cache only.
    Local,
    /// Built-in seed data; nothing persisted yet.
    Offline,
}

impl PersistenceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Local => "local",
            Self::Offline => "offline",
        }
    }
}

impl Display for PersistenceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the most recent save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// A write is scheduled or running.
    Saving,
    Saved,
    /// The local write failed; editing continues.
    Error,
}

impl SaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Error => "error",
        }
    }
}

impl Display for SaveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
