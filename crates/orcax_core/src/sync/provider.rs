//! Ordered snapshot providers for the startup load cascade.
//!
//! # Responsibility
//! - Wrap each snapshot source (remote, local cache, seed) behind one contract.
//! - Try sources in order and report the first success with its provenance.
//!
//! # Invariants
//! - Providers return results; none of them panics on bad input.
//! - The cascade always yields a snapshot: seed data ends every run.
//! - Cache payloads fill missing top-level keys from seed data; remote
//!   payloads fill them with empty collections.

use crate::model::snapshot::{Snapshot, SnapshotPayload};
use crate::repo::snapshot_cache::LocalCache;
use crate::seed::seed_snapshot;
use crate::sync::remote::RemoteStore;
use crate::sync::status::PersistenceMode;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Why one provider could not supply a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Source unreachable or refused the read.
    Unavailable,
    /// Source reachable but holds no snapshot.
    Missing,
    /// Source holds data that does not parse.
    Corrupt,
}

/// Failure envelope for one provider attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub provider: &'static str,
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: &'static str, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} provider {:?}: {}", self.provider, self.kind, self.message)
    }
}

impl Error for ProviderError {}

/// One tier of the load cascade.
pub trait SnapshotProvider {
    fn name(&self) -> &'static str;
    /// Provenance tag recorded when this provider wins.
    fn mode(&self) -> PersistenceMode;
    fn provide(&self) -> ProviderResult<Snapshot>;
}

/// Remote tier.
pub struct RemoteProvider<'a, R: RemoteStore> {
    remote: &'a R,
}

impl<'a, R: RemoteStore> RemoteProvider<'a, R> {
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }
}

impl<R: RemoteStore> SnapshotProvider for RemoteProvider<'_, R> {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Cloud
    }

    fn provide(&self) -> ProviderResult<Snapshot> {
        self.remote
            .fetch()
            .map_err(|err| ProviderError::new(self.name(), ProviderErrorKind::Unavailable, err.to_string()))
    }
}

/// Local cache tier.
pub struct CacheProvider<'a, C: LocalCache> {
    cache: &'a C,
    key: &'a str,
}

impl<'a, C: LocalCache> CacheProvider<'a, C> {
    pub fn new(cache: &'a C, key: &'a str) -> Self {
        Self { cache, key }
    }
}

impl<C: LocalCache> SnapshotProvider for CacheProvider<'_, C> {
    fn name(&self) -> &'static str {
        "local"
    }

    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Local
    }

    fn provide(&self) -> ProviderResult<Snapshot> {
        let text = self
            .cache
            .read(self.key)
            .map_err(|err| ProviderError::new(self.name(), ProviderErrorKind::Unavailable, err.to_string()))?
            .ok_or_else(|| {
                ProviderError::new(self.name(), ProviderErrorKind::Missing, "no cached snapshot")
            })?;

        let payload = SnapshotPayload::parse(&text).map_err(|err| {
            ProviderError::new(self.name(), ProviderErrorKind::Corrupt, err.to_string())
        })?;
        Ok(payload.or_fallback(seed_snapshot()))
    }
}

/// Built-in seed tier; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedProvider;

impl SnapshotProvider for SeedProvider {
    fn name(&self) -> &'static str {
        "seed"
    }

    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Offline
    }

    fn provide(&self) -> ProviderResult<Snapshot> {
        Ok(seed_snapshot())
    }
}

/// Result of a cascade run: the adopted snapshot and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub snapshot: Snapshot,
    pub mode: PersistenceMode,
    /// Provider that supplied the snapshot.
    pub source: &'static str,
    /// Failed attempts, in the order they were tried.
    pub failures: Vec<ProviderError>,
}

/// Ordered provider list; the first success wins.
#[derive(Default)]
pub struct LoadCascade<'a> {
    providers: Vec<Box<dyn SnapshotProvider + 'a>>,
}

impl<'a> LoadCascade<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard `remote -> local -> seed` order.
    pub fn standard<R: RemoteStore, C: LocalCache>(remote: &'a R, cache: &'a C, key: &'a str) -> Self {
        Self::new()
            .then(RemoteProvider::new(remote))
            .then(CacheProvider::new(cache, key))
            .then(SeedProvider)
    }

    /// Appends a provider to the end of the list.
    pub fn then(mut self, provider: impl SnapshotProvider + 'a) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Tries providers in order. Falls back to seed data if every one fails.
    pub fn run(&self) -> LoadOutcome {
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.provide() {
                Ok(snapshot) => {
                    info!(
                        "event=snapshot_load module=sync status=ok source={} mode={} projects={} members={} failed_attempts={}",
                        provider.name(),
                        provider.mode(),
                        snapshot.projects.len(),
                        snapshot.team.len(),
                        failures.len()
                    );
                    return LoadOutcome {
                        snapshot,
                        mode: provider.mode(),
                        source: provider.name(),
                        failures,
                    };
                }
                Err(err) => {
                    warn!(
                        "event=snapshot_load module=sync status=fallback source={} kind={:?} error={}",
                        err.provider, err.kind, err.message
                    );
                    failures.push(err);
                }
            }
        }

        warn!("event=snapshot_load module=sync status=fallback source=seed reason=providers_exhausted");
        LoadOutcome {
            snapshot: seed_snapshot(),
            mode: PersistenceMode::Offline,
            source: SeedProvider.name(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadCascade, ProviderErrorKind, SeedProvider};
    use crate::repo::snapshot_cache::{LocalCache, SqliteSnapshotCache};
    use crate::seed::seed_snapshot;
    use crate::sync::remote::DisabledRemote;
    use crate::sync::status::PersistenceMode;

    #[test]
    fn corrupt_cache_falls_through_to_seed() {
        let cache = SqliteSnapshotCache::open_in_memory().expect("cache");
        cache.write("k", "{broken").expect("write");

        let outcome = LoadCascade::standard(&DisabledRemote, &cache, "k").run();

        assert_eq!(outcome.mode, PersistenceMode::Offline);
        assert_eq!(outcome.source, "seed");
        assert_eq!(outcome.snapshot, seed_snapshot());
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[1].kind, ProviderErrorKind::Corrupt);
    }

    #[test]
    fn cache_payload_missing_team_uses_seed_team() {
        let cache = SqliteSnapshotCache::open_in_memory().expect("cache");
        cache.write("k", r#"{"projects":[]}"#).expect("write");

        let outcome = LoadCascade::standard(&DisabledRemote, &cache, "k").run();

        assert_eq!(outcome.mode, PersistenceMode::Local);
        assert!(outcome.snapshot.projects.is_empty());
        assert_eq!(outcome.snapshot.team, seed_snapshot().team);
    }

    #[test]
    fn empty_cascade_still_yields_seed() {
        let outcome = LoadCascade::new().run();
        assert_eq!(outcome.mode, PersistenceMode::Offline);
        assert_eq!(outcome.snapshot, seed_snapshot());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn seed_provider_wins_when_listed_first() {
        let cascade = LoadCascade::new().then(SeedProvider);
        assert_eq!(cascade.len(), 1);
        assert_eq!(cascade.run().source, "seed");
    }
}
