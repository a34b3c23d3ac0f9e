use orcax_core::seed::seed_snapshot;
use orcax_core::{EntityStore, MemberField, Project, ProjectField, Snapshot, StoreError, TeamMember};
use std::collections::HashSet;

#[test]
fn remove_member_leaves_no_dangling_references() {
    let mut store = EntityStore::from_snapshot(seed_snapshot());
    assert!(store.projects().iter().any(|p| p.has_member("samuel")));

    let removed = store.remove_member("samuel").unwrap();

    assert_eq!(removed.id, "samuel");
    assert!(store.member("samuel").is_none());
    for project in store.projects() {
        assert!(!project.team_ids.iter().any(|id| id == "samuel"));
        assert!(!project.allocations.contains_key("samuel"));
    }
}

#[test]
fn toggling_membership_off_and_on_resets_allocation() {
    let mut store = EntityStore::from_snapshot(seed_snapshot());
    assert_eq!(store.project(1).unwrap().allocation_for("luiz"), 60.0);

    assert!(!store.toggle_membership(1, "luiz").unwrap());
    let project = store.project(1).unwrap();
    assert!(!project.has_member("luiz"));
    assert!(!project.allocations.contains_key("luiz"));

    assert!(store.toggle_membership(1, "luiz").unwrap());
    let project = store.project(1).unwrap();
    assert_eq!(project.team_ids.last().map(String::as_str), Some("luiz"));
    assert_eq!(project.allocations.get("luiz"), Some(&0.0));
}

#[test]
fn toggling_clears_member_ids_missing_from_team() {
    let mut store = EntityStore::from_snapshot(Snapshot::new(
        vec![Project::new(1, "Orphaned", "").with_member("ghost", 30.0)],
        vec![TeamMember::new("m", "Member", "Dev")],
    ));

    assert_eq!(store.toggle_membership(1, "ghost"), Ok(false));

    let project = store.project(1).unwrap();
    assert!(project.team_ids.is_empty());
    assert!(project.allocations.is_empty());
    assert_eq!(store.revision(), 1);
    assert_eq!(
        store.toggle_membership(1, "ghost"),
        Err(StoreError::MemberNotFound("ghost".to_string()))
    );
}

#[test]
fn added_projects_go_first_with_next_id() {
    let mut store = EntityStore::from_snapshot(seed_snapshot());
    let max_id = store.projects().iter().map(|p| p.id).max().unwrap();

    let id = store.add_project();

    assert_eq!(id, max_id + 1);
    let first = &store.projects()[0];
    assert_eq!(first.id, id);
    assert_eq!(first.name, "Novo Projeto");
    assert_eq!(first.objective, "Definir objetivo");
    assert_eq!((first.start_month, first.duration_months), (1, 6));
    assert!(first.team_ids.is_empty());
}

#[test]
fn first_project_in_empty_store_gets_id_one() {
    let mut store = EntityStore::new();
    assert_eq!(store.add_project(), 1);
}

#[test]
fn member_ids_stay_unique_under_rapid_creation() {
    let mut store = EntityStore::new();
    let ids: HashSet<String> = (0..50).map(|_| store.add_member()).collect();

    assert_eq!(ids.len(), 50);
    assert!(ids.iter().all(|id| id.starts_with("member-")));
    let last = store.team().last().unwrap();
    assert_eq!(last.name, "Novo Membro");
    assert_eq!(last.role, "Cargo");
    assert_eq!(last.monthly_cost.total(), 0.0);
}

#[test]
fn member_ids_stay_unique_across_stores() {
    let mut first = EntityStore::new();
    let mut second = EntityStore::new();
    let mut ids = HashSet::new();

    for _ in 0..25 {
        assert!(ids.insert(first.add_member()));
        assert!(ids.insert(second.add_member()));
    }

    assert_eq!(ids.len(), 50);
}

#[test]
fn rejected_mutations_leave_store_untouched() {
    let mut store = EntityStore::from_snapshot(seed_snapshot());
    let before = store.snapshot();
    let revision = store.revision();

    assert_eq!(
        store.update_member_cost("laio", 12, 1.0),
        Err(StoreError::MonthIndexOutOfRange(12))
    );
    assert!(matches!(
        store.update_member_cost("laio", 0, f64::NAN),
        Err(StoreError::InvalidNumber { .. })
    ));
    assert!(matches!(
        store.update_member_cost("laio", 0, -1.0),
        Err(StoreError::InvalidNumber { .. })
    ));
    assert!(matches!(
        store.update_project_field(1, ProjectField::StartMonth(13)),
        Err(StoreError::InvalidField { .. })
    ));
    assert!(matches!(
        store.update_project_field(1, ProjectField::DurationMonths(0)),
        Err(StoreError::InvalidField { .. })
    ));
    assert_eq!(
        store.update_allocation(6, "laio", 10.0),
        Err(StoreError::MemberNotAssigned {
            project_id: 6,
            member_id: "laio".to_string(),
        })
    );
    assert_eq!(
        store.toggle_membership(1, "ghost"),
        Err(StoreError::MemberNotFound("ghost".to_string()))
    );
    assert_eq!(store.remove_project(999).unwrap_err(), StoreError::ProjectNotFound(999));

    assert_eq!(store.snapshot(), before);
    assert_eq!(store.revision(), revision);
}

#[test]
fn field_updates_replace_single_values() {
    let mut store = EntityStore::from_snapshot(seed_snapshot());

    store
        .update_project_field(2, ProjectField::Name("Renamed".to_string()))
        .unwrap();
    store.update_allocation(2, "luiz", 150.0).unwrap();
    store
        .update_member_field("rodrigo", MemberField::Role("Diretor".to_string()))
        .unwrap();
    store.update_member_cost("rodrigo", 11, 12_000.0).unwrap();

    let project = store.project(2).unwrap();
    assert_eq!(project.name, "Renamed");
    assert_eq!(project.allocation_for("luiz"), 150.0);
    let rodrigo = store.member("rodrigo").unwrap();
    assert_eq!(rodrigo.role, "Diretor");
    assert_eq!(rodrigo.monthly_cost.get_index(11), Some(12_000.0));
    assert_eq!(rodrigo.monthly_cost.get_index(10), Some(10_000.0));
    assert_eq!(store.revision(), 4);
}
