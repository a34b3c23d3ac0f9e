use orcax_core::seed::seed_snapshot;
use orcax_core::sync::clock::{Clock, ManualClock};
use orcax_core::sync::remote::RemoteResult;
use orcax_core::{
    AppConfig, BudgetApp, CacheError, CacheResult, EntityStore, LocalCache, MemberField,
    PersistenceCoordinator, PersistenceMode, Project, RemoteError, RemoteStore, SaveStatus,
    Snapshot, SnapshotPayload, SqliteSnapshotCache, TeamMember,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const KEY: &str = "app_data_v1";

#[derive(Default)]
struct RemoteState {
    stored: Option<Snapshot>,
    reject_push: bool,
    pushes: Vec<Snapshot>,
}

/// In-memory remote; clones share state so tests can inspect it after moving.
#[derive(Clone, Default)]
struct FakeRemote {
    state: Rc<RefCell<RemoteState>>,
}

impl FakeRemote {
    fn serving(snapshot: Snapshot) -> Self {
        let remote = Self::default();
        remote.state.borrow_mut().stored = Some(snapshot);
        remote
    }

    fn unreachable() -> Self {
        let remote = Self::default();
        remote.state.borrow_mut().reject_push = true;
        remote
    }

    fn push_count(&self) -> usize {
        self.state.borrow().pushes.len()
    }

    fn last_push(&self) -> Option<Snapshot> {
        self.state.borrow().pushes.last().cloned()
    }
}

impl RemoteStore for FakeRemote {
    fn fetch(&self) -> RemoteResult<Snapshot> {
        self.state
            .borrow()
            .stored
            .clone()
            .ok_or(RemoteError::Status(503))
    }

    fn push(&self, snapshot: &Snapshot) -> RemoteResult<()> {
        let mut state = self.state.borrow_mut();
        state.pushes.push(snapshot.clone());
        if state.reject_push {
            return Err(RemoteError::Status(503));
        }
        state.stored = Some(snapshot.clone());
        Ok(())
    }
}

/// Cache whose writes always fail.
struct ReadOnlyCache;

impl LocalCache for ReadOnlyCache {
    fn read(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _payload: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable("quota exceeded".to_string()))
    }
}

fn small_snapshot() -> Snapshot {
    Snapshot::new(
        vec![Project::new(42, "Cached", "").with_member("m", 25.0)],
        vec![TeamMember::new("m", "Member", "Dev")],
    )
}

fn start<C: LocalCache>(
    remote: FakeRemote,
    cache: C,
) -> (BudgetApp<FakeRemote, C>, ManualClock, orcax_core::LoadOutcome) {
    let clock = ManualClock::new();
    let (app, outcome) =
        BudgetApp::start_with_clock(remote, cache, &AppConfig::default(), Box::new(clock.clone()));
    (app, clock, outcome)
}

fn cached_payload<C: LocalCache>(cache: &C) -> Option<Snapshot> {
    let text = cache.read(KEY).unwrap()?;
    Some(SnapshotPayload::parse(&text).unwrap().or_empty())
}

#[test]
fn remote_snapshot_wins_and_sets_cloud_mode() {
    let remote = FakeRemote::serving(small_snapshot());
    let (app, _clock, outcome) = start(remote, SqliteSnapshotCache::open_in_memory().unwrap());

    assert_eq!(outcome.source, "remote");
    assert_eq!(app.mode(), PersistenceMode::Cloud);
    assert_eq!(app.save_status(), SaveStatus::Idle);
    assert_eq!(app.store().snapshot(), small_snapshot());
}

#[test]
fn unreachable_remote_falls_back_to_cache() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    cache.write(KEY, &small_snapshot().to_json().unwrap()).unwrap();

    let (app, _clock, outcome) = start(FakeRemote::unreachable(), cache);

    assert_eq!(app.mode(), PersistenceMode::Local);
    assert_eq!(outcome.source, "local");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(app.store().snapshot(), small_snapshot());
}

#[test]
fn unreachable_remote_and_empty_cache_use_seed() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();

    let (app, _clock, outcome) = start(FakeRemote::unreachable(), cache);

    assert_eq!(app.mode(), PersistenceMode::Offline);
    assert_eq!(outcome.source, "seed");
    assert_eq!(app.store().snapshot(), seed_snapshot());
}

#[test]
fn corrupt_cache_is_discarded_for_seed() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    cache.write(KEY, "not json").unwrap();

    let (app, _clock, _outcome) = start(FakeRemote::unreachable(), cache);

    assert_eq!(app.mode(), PersistenceMode::Offline);
    assert_eq!(app.store().snapshot(), seed_snapshot());
}

#[test]
fn blank_numbers_in_cache_keep_user_projects() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    let payload = r#"{
        "projects": [
            {"id": 1, "name": "Kept", "objective": "", "startMonth": 2, "durationMonths": null,
             "teamIds": ["m"], "allocations": {"m": null}},
            {"id": 2, "name": "Also kept", "objective": "", "startMonth": 1, "durationMonths": 3,
             "teamIds": ["m"], "allocations": {"m": 50}}
        ],
        "team": [{"id": "m", "name": "Member", "role": "Dev", "monthlyCost": [100,100,100,100,100,100,100,100,100,100,100,100]}]
    }"#;
    cache.write(KEY, payload).unwrap();

    let (app, _clock, outcome) = start(FakeRemote::unreachable(), cache);

    assert_eq!(app.mode(), PersistenceMode::Local);
    assert_eq!(outcome.source, "local");
    let projects = app.store().projects();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Kept");
    assert_eq!(projects[0].duration_months, 0);
    assert_eq!(projects[0].allocation_for("m"), 0.0);
    assert_eq!(projects[1].allocation_for("m"), 50.0);
}

#[test]
fn null_cache_payload_is_discarded_for_seed() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    cache.write(KEY, "null").unwrap();

    let (app, _clock, outcome) = start(FakeRemote::unreachable(), cache);

    assert_eq!(app.mode(), PersistenceMode::Offline);
    assert_eq!(outcome.source, "seed");
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(app.store().snapshot(), seed_snapshot());
}

#[test]
fn loading_does_not_trigger_a_save() {
    let remote = FakeRemote::serving(small_snapshot());
    let (mut app, clock, _outcome) =
        start(remote.clone(), SqliteSnapshotCache::open_in_memory().unwrap());

    clock.advance(Duration::from_secs(10));

    assert!(app.tick().is_none());
    assert_eq!(remote.push_count(), 0);
    assert_eq!(cached_payload(app.coordinator().cache()), None);
    assert_eq!(app.save_status(), SaveStatus::Idle);
}

#[test]
fn burst_of_edits_produces_one_save_with_final_state() {
    let remote = FakeRemote::serving(small_snapshot());
    let (mut app, clock, _outcome) =
        start(remote.clone(), SqliteSnapshotCache::open_in_memory().unwrap());

    for month in 0..5 {
        app.update_member_cost("m", month, 1000.0 + month as f64).unwrap();
        assert_eq!(app.save_status(), SaveStatus::Saving);
        clock.advance(Duration::from_millis(300));
        assert!(app.tick().is_none());
    }

    // 300ms already elapsed since the fifth edit.
    clock.advance(Duration::from_millis(1199));
    assert!(app.tick().is_none());
    assert_eq!(app.time_until_save(), Some(Duration::from_millis(1)));

    clock.advance(Duration::from_millis(1));
    let report = app.tick().unwrap();

    assert!(!report.stale);
    assert!(report.remote_ok && report.local_ok);
    assert_eq!(report.mode, PersistenceMode::Cloud);
    assert_eq!(report.status, SaveStatus::Saved);
    assert_eq!(remote.push_count(), 1);

    let pushed = remote.last_push().unwrap();
    assert_eq!(pushed, app.store().snapshot());
    assert_eq!(pushed.team[0].monthly_cost.get_index(4), Some(1004.0));
    assert_eq!(cached_payload(app.coordinator().cache()), Some(pushed));

    clock.advance(Duration::from_secs(5));
    assert!(app.tick().is_none());
    assert_eq!(remote.push_count(), 1);
}

#[test]
fn failed_remote_write_still_saves_locally() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    cache.write(KEY, &small_snapshot().to_json().unwrap()).unwrap();
    let remote = FakeRemote::unreachable();
    let (mut app, clock, _outcome) = start(remote.clone(), cache);

    app.update_member_field("m", MemberField::Name("Renamed".to_string()))
        .unwrap();
    clock.advance(Duration::from_millis(1500));
    let report = app.tick().unwrap();

    assert!(!report.remote_ok);
    assert_eq!(app.mode(), PersistenceMode::Local);
    assert_eq!(app.save_status(), SaveStatus::Saved);
    assert_eq!(remote.push_count(), 1);
    let cached = cached_payload(app.coordinator().cache()).unwrap();
    assert_eq!(cached.team[0].name, "Renamed");
}

#[test]
fn failed_local_write_reports_error() {
    let remote = FakeRemote::serving(small_snapshot());
    let (mut app, _clock, _outcome) = start(remote.clone(), ReadOnlyCache);

    app.add_project();
    let report = app.flush().unwrap();

    assert!(report.remote_ok);
    assert!(!report.local_ok);
    assert_eq!(app.mode(), PersistenceMode::Cloud);
    assert_eq!(app.save_status(), SaveStatus::Error);

    // Editing continues after a failed save.
    app.add_member();
    assert_eq!(app.save_status(), SaveStatus::Saving);
}

#[test]
fn rejected_mutation_does_not_schedule_a_save() {
    let remote = FakeRemote::serving(small_snapshot());
    let (mut app, clock, _outcome) =
        start(remote.clone(), SqliteSnapshotCache::open_in_memory().unwrap());

    assert!(app.update_member_cost("ghost", 0, 1.0).is_err());
    assert!(app.update_allocation(42, "nobody", 10.0).is_err());

    assert!(!app.coordinator().has_pending_write());
    clock.advance(Duration::from_secs(2));
    assert!(app.tick().is_none());
    assert_eq!(app.save_status(), SaveStatus::Idle);
}

#[test]
fn flush_writes_pending_edits_immediately() {
    let remote = FakeRemote::serving(small_snapshot());
    let (mut app, _clock, _outcome) =
        start(remote.clone(), SqliteSnapshotCache::open_in_memory().unwrap());

    assert!(app.flush().is_none());
    app.remove_member("m").unwrap();
    let report = app.flush().unwrap();

    assert_eq!(report.status, SaveStatus::Saved);
    let pushed = remote.last_push().unwrap();
    assert!(pushed.team.is_empty());
    assert!(pushed.projects[0].team_ids.is_empty());
    assert!(!app.coordinator().has_pending_write());
}

#[test]
fn save_now_persists_unedited_state() {
    let cache = SqliteSnapshotCache::open_in_memory().unwrap();
    let (mut app, _clock, _outcome) = start(FakeRemote::unreachable(), cache);

    let report = app.save_now().unwrap();

    assert_eq!(report.mode, PersistenceMode::Local);
    assert_eq!(report.status, SaveStatus::Saved);
    assert_eq!(
        cached_payload(app.coordinator().cache()),
        Some(seed_snapshot())
    );
}

#[test]
fn stale_save_outcome_is_ignored() {
    let remote = FakeRemote::serving(small_snapshot());
    let mut coordinator = PersistenceCoordinator::new(
        remote.clone(),
        SqliteSnapshotCache::open_in_memory().unwrap(),
        KEY,
        Duration::from_millis(1500),
    );
    let outcome = coordinator.load();
    let mut store = EntityStore::from_snapshot(outcome.snapshot);
    let clock = ManualClock::new();

    store.add_project();
    coordinator.notify_mutation(clock.now());
    let ticket = coordinator.take_pending(&store).unwrap();

    store.add_member();
    coordinator.notify_mutation(clock.now());

    let result = coordinator.execute(&ticket);
    let report = coordinator.apply(&ticket, &result);

    assert!(report.stale);
    assert_eq!(coordinator.status(), SaveStatus::Saving);
    assert!(coordinator.has_pending_write());

    let report = coordinator.flush(&store).unwrap();
    assert!(!report.stale);
    assert_eq!(report.status, SaveStatus::Saved);
    assert_eq!(remote.last_push().unwrap(), store.snapshot());
}

#[test]
fn mutations_before_load_are_not_persisted() {
    let remote = FakeRemote::serving(small_snapshot());
    let mut coordinator = PersistenceCoordinator::new(
        remote.clone(),
        SqliteSnapshotCache::open_in_memory().unwrap(),
        KEY,
        Duration::from_millis(1500),
    );
    let store = EntityStore::new();

    coordinator.notify_mutation(ManualClock::new().now());

    assert!(!coordinator.is_loaded());
    assert!(!coordinator.has_pending_write());
    assert!(coordinator.flush(&store).is_none());
    assert_eq!(remote.push_count(), 0);
}
