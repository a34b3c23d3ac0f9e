//! Persistence coordinator state machine.
//!
//! # Responsibility
//! - Run the startup load cascade and record its provenance.
//! - Turn entity mutations into one debounced dual write per burst.
//! - Report persistence mode and save status.
//!
//! # Invariants
//! - Mutations recorded before `load` completes never schedule a save.
//! - Adopting the loaded snapshot is not a mutation and is never re-persisted.
//! - The snapshot is captured from the store when the timer fires, so a save
//!   always reflects the latest state of its burst.
//! - A save cycle's outcome is applied only if no newer mutation was recorded
//!   after it was captured; stale outcomes leave mode and status untouched.
//! - The remote write is attempted before the local write, and the local write
//!   happens regardless of the remote outcome.

use crate::model::snapshot::Snapshot;
use crate::repo::snapshot_cache::{CacheError, CacheResult, LocalCache};
use crate::store::entity_store::EntityStore;
use crate::sync::debounce::{Debouncer, PendingWrite};
use crate::sync::provider::{LoadCascade, LoadOutcome};
use crate::sync::remote::{RemoteResult, RemoteStore};
use crate::sync::status::{PersistenceMode, SaveStatus};
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

/// Snapshot captured for one save cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub generation: u64,
    pub snapshot: Snapshot,
}

/// Raw results of both sinks for one save cycle.
#[derive(Debug)]
pub struct SaveOutcome {
    pub remote: RemoteResult<()>,
    pub local: CacheResult<()>,
}

/// What applying a save outcome did to the coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub generation: u64,
    pub remote_ok: bool,
    pub local_ok: bool,
    /// `true` when a newer mutation superseded this cycle and it was ignored.
    pub stale: bool,
    pub mode: PersistenceMode,
    pub status: SaveStatus,
}

/// Coordinates remote store, local cache, and in-memory edits.
pub struct PersistenceCoordinator<R: RemoteStore, C: LocalCache> {
    remote: R,
    cache: C,
    cache_key: String,
    debouncer: Debouncer,
    mode: PersistenceMode,
    status: SaveStatus,
    generation: u64,
    loaded: bool,
}

impl<R: RemoteStore, C: LocalCache> PersistenceCoordinator<R, C> {
    pub fn new(remote: R, cache: C, cache_key: impl Into<String>, debounce: Duration) -> Self {
        Self {
            remote,
            cache,
            cache_key: cache_key.into(),
            debouncer: Debouncer::new(debounce),
            mode: PersistenceMode::Offline,
            status: SaveStatus::Idle,
            generation: 0,
            loaded: false,
        }
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Latest recorded mutation generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Runs `remote -> local -> seed` and records the winning provenance.
    pub fn load(&mut self) -> LoadOutcome {
        let outcome = LoadCascade::standard(&self.remote, &self.cache, self.cache_key.as_str()).run();
        self.mode = outcome.mode;
        self.status = SaveStatus::Idle;
        self.loaded = true;
        outcome
    }

    /// Records one entity mutation and (re)starts the debounce timer.
    pub fn notify_mutation(&mut self, now: Instant) {
        if !self.loaded {
            debug!("event=save_schedule module=sync status=skipped reason=not_loaded");
            return;
        }
        self.generation += 1;
        self.status = SaveStatus::Saving;
        if let Some(superseded) = self.debouncer.schedule(self.generation, now) {
            debug!(
                "event=save_schedule module=sync status=restarted generation={} superseded={}",
                self.generation, superseded.generation
            );
        }
    }

    /// Drains the pending write if its quiet period has elapsed.
    pub fn take_due(&mut self, store: &EntityStore, now: Instant) -> Option<SaveTicket> {
        let pending = self.debouncer.take_due(now)?;
        Some(self.capture(store, pending))
    }

    /// Drains the pending write immediately, ignoring the quiet period.
    pub fn take_pending(&mut self, store: &EntityStore) -> Option<SaveTicket> {
        let pending = self.debouncer.cancel()?;
        Some(self.capture(store, pending))
    }

    /// Writes the ticket's snapshot to the remote and then the local cache.
    pub fn execute(&self, ticket: &SaveTicket) -> SaveOutcome {
        let remote = self.remote.push(&ticket.snapshot);
        if let Err(err) = &remote {
            warn!(
                "event=save_remote module=sync status=error generation={} error_code={} error={}",
                ticket.generation,
                err.code(),
                err
            );
        }

        let local = ticket
            .snapshot
            .to_json()
            .map_err(|err| CacheError::Unavailable(format!("snapshot encoding failed: {err}")))
            .and_then(|payload| self.cache.write(&self.cache_key, &payload));
        if let Err(err) = &local {
            error!(
                "event=save_local module=sync status=error generation={} error={}",
                ticket.generation, err
            );
        }

        SaveOutcome { remote, local }
    }

    /// Folds a save outcome into mode and status.
    pub fn apply(&mut self, ticket: &SaveTicket, outcome: &SaveOutcome) -> SaveReport {
        let remote_ok = outcome.remote.is_ok();
        let local_ok = outcome.local.is_ok();

        if ticket.generation != self.generation {
            debug!(
                "event=save_apply module=sync status=stale generation={} latest={}",
                ticket.generation, self.generation
            );
            return SaveReport {
                generation: ticket.generation,
                remote_ok,
                local_ok,
                stale: true,
                mode: self.mode,
                status: self.status,
            };
        }

        self.mode = if remote_ok {
            PersistenceMode::Cloud
        } else {
            PersistenceMode::Local
        };
        self.status = if local_ok {
            SaveStatus::Saved
        } else {
            SaveStatus::Error
        };

        info!(
            "event=save_apply module=sync status={} generation={} mode={} remote_ok={} local_ok={}",
            self.status, ticket.generation, self.mode, remote_ok, local_ok
        );

        SaveReport {
            generation: ticket.generation,
            remote_ok,
            local_ok,
            stale: false,
            mode: self.mode,
            status: self.status,
        }
    }

    /// Runs one due save cycle, if any.
    pub fn poll(&mut self, store: &EntityStore, now: Instant) -> Option<SaveReport> {
        let ticket = self.take_due(store, now)?;
        let outcome = self.execute(&ticket);
        Some(self.apply(&ticket, &outcome))
    }

    /// Saves a pending write right away.
    pub fn flush(&mut self, store: &EntityStore) -> Option<SaveReport> {
        let ticket = self.take_pending(store)?;
        let outcome = self.execute(&ticket);
        Some(self.apply(&ticket, &outcome))
    }

    /// Schedules and immediately runs a save of the current state.
    ///
    /// Used to push a snapshot that was never edited, e.g. to seed a remote.
    pub fn save_now(&mut self, store: &EntityStore, now: Instant) -> Option<SaveReport> {
        self.notify_mutation(now);
        self.flush(store)
    }

    fn capture(&self, store: &EntityStore, pending: PendingWrite) -> SaveTicket {
        info!(
            "event=save_fire module=sync status=start generation={} store_revision={}",
            pending.generation,
            store.revision()
        );
        SaveTicket {
            generation: pending.generation,
            snapshot: store.snapshot(),
        }
    }
}
