//! Canonical in-memory entity store.
//!
//! # Responsibility
//! - Hold the current project and team collections.
//! - Expose the only mutation paths for those collections.
//!
//! # Invariants
//! - No project keeps an allocation for a member outside its `team_ids`.
//! - Removing a member detaches it from every project.
//! - A rejected mutation leaves the store untouched and the revision unchanged.
//! - Member ids issued by `add_member` are unique for the process lifetime,
//!   across every store instance.

use crate::model::member::{MemberId, TeamMember};
use crate::model::month::Month;
use crate::model::project::{Project, ProjectId};
use crate::model::snapshot::Snapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const NEW_PROJECT_NAME: &str = "Novo Projeto";
pub const NEW_PROJECT_OBJECTIVE: &str = "Definir objetivo";
pub const NEW_PROJECT_START_MONTH: u32 = 1;
pub const NEW_PROJECT_DURATION_MONTHS: u32 = 6;
pub const NEW_MEMBER_NAME: &str = "Novo Membro";
pub const NEW_MEMBER_ROLE: &str = "Cargo";

const MEMBER_ID_PREFIX: &str = "member-";

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejection reasons for entity mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    ProjectNotFound(ProjectId),
    MemberNotFound(MemberId),
    /// Allocation targets a member that is not on the project team.
    MemberNotAssigned {
        project_id: ProjectId,
        member_id: MemberId,
    },
    /// Cost month index outside `0..=11`.
    MonthIndexOutOfRange(usize),
    /// Field value outside its allowed range.
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// NaN, infinity, or a negative cost.
    InvalidNumber {
        field: &'static str,
        value: f64,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::MemberNotFound(id) => write!(f, "team member not found: {id}"),
            Self::MemberNotAssigned {
                project_id,
                member_id,
            } => write!(
                f,
                "team member `{member_id}` is not assigned to project {project_id}"
            ),
            Self::MonthIndexOutOfRange(index) => {
                write!(f, "month index {index} is out of range 0..=11")
            }
            Self::InvalidField { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            Self::InvalidNumber { field, value } => {
                write!(f, "invalid numeric value for `{field}`: {value}")
            }
        }
    }
}

impl Error for StoreError {}

/// Single-field replacement for a project.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    Name(String),
    Objective(String),
    /// 1-based calendar month, `1..=12`.
    StartMonth(u32),
    /// At least one month.
    DurationMonths(u32),
}

/// Single-field replacement for a team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberField {
    Name(String),
    Role(String),
}

/// Owner of the canonical `{projects, team}` collections.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    projects: Vec<Project>,
    team: Vec<TeamMember>,
    revision: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a loaded snapshot as-is. Revision starts at zero.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            projects: snapshot.projects,
            team: snapshot.team,
            revision: 0,
        }
    }

    /// Replaces all entities without counting as a user mutation.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.projects = snapshot.projects;
        self.team = snapshot.team;
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == id)
    }

    /// Number of successful mutations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Copies the current collections for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.projects.clone(), self.team.clone())
    }

    /// Creates a project with default placeholders at the front of the list.
    ///
    /// The new id is `max(existing ids, 0) + 1`.
    pub fn add_project(&mut self) -> ProjectId {
        let id = self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let project = Project::new(id, NEW_PROJECT_NAME, NEW_PROJECT_OBJECTIVE)
            .with_schedule(NEW_PROJECT_START_MONTH, NEW_PROJECT_DURATION_MONTHS);
        self.projects.insert(0, project);
        self.bump();
        id
    }

    pub fn remove_project(&mut self, id: ProjectId) -> StoreResult<Project> {
        let position = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::ProjectNotFound(id))?;
        let removed = self.projects.remove(position);
        self.bump();
        Ok(removed)
    }

    pub fn update_project_field(&mut self, id: ProjectId, field: ProjectField) -> StoreResult<()> {
        validate_project_field(&field)?;
        let project = self.project_mut(id)?;
        match field {
            ProjectField::Name(value) => project.name = value,
            ProjectField::Objective(value) => project.objective = value,
            ProjectField::StartMonth(value) => project.start_month = value,
            ProjectField::DurationMonths(value) => project.duration_months = value,
        }
        self.bump();
        Ok(())
    }

    /// Adds the member with allocation 0, or removes it with its allocation.
    ///
    /// Returns `true` when the member is assigned after the call.
    ///
    /// Unassigning works for ids missing from the team, so dangling ids in
    /// loaded data can be cleared. Assigning requires a known member.
    pub fn toggle_membership(&mut self, project_id: ProjectId, member_id: &str) -> StoreResult<bool> {
        let assigned = self.project(project_id).map(|p| p.has_member(member_id));
        match assigned {
            None => return Err(StoreError::ProjectNotFound(project_id)),
            Some(false) if self.member(member_id).is_none() => {
                return Err(StoreError::MemberNotFound(member_id.to_string()));
            }
            _ => {}
        }

        let project = self.project_mut(project_id)?;
        let assigned = if project.has_member(member_id) {
            project.detach_member(member_id);
            false
        } else {
            project.team_ids.push(member_id.to_string());
            project.allocations.insert(member_id.to_string(), 0.0);
            true
        };
        self.bump();
        Ok(assigned)
    }

    /// Sets the allocation of an assigned member. Values are not clamped.
    pub fn update_allocation(
        &mut self,
        project_id: ProjectId,
        member_id: &str,
        pct: f64,
    ) -> StoreResult<()> {
        ensure_finite("allocation", pct)?;
        let project = self.project_mut(project_id)?;
        if !project.has_member(member_id) {
            return Err(StoreError::MemberNotAssigned {
                project_id,
                member_id: member_id.to_string(),
            });
        }
        project.allocations.insert(member_id.to_string(), pct);
        self.bump();
        Ok(())
    }

    /// Appends a member with placeholder name/role and zero costs.
    pub fn add_member(&mut self) -> MemberId {
        let id = self.next_member_id();
        self.team
            .push(TeamMember::new(id.clone(), NEW_MEMBER_NAME, NEW_MEMBER_ROLE));
        self.bump();
        id
    }

    /// Deletes the member and detaches it from every project.
    pub fn remove_member(&mut self, id: &str) -> StoreResult<TeamMember> {
        let position = self
            .team
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::MemberNotFound(id.to_string()))?;
        let removed = self.team.remove(position);
        for project in &mut self.projects {
            project.detach_member(id);
        }
        self.bump();
        Ok(removed)
    }

    pub fn update_member_field(&mut self, id: &str, field: MemberField) -> StoreResult<()> {
        let member = self.member_mut(id)?;
        match field {
            MemberField::Name(value) => member.name = value,
            MemberField::Role(value) => member.role = value,
        }
        self.bump();
        Ok(())
    }

    /// Replaces one month of a member's cost row.
    pub fn update_member_cost(&mut self, id: &str, month_index: usize, value: f64) -> StoreResult<()> {
        let month =
            Month::from_index(month_index).ok_or(StoreError::MonthIndexOutOfRange(month_index))?;
        ensure_finite("monthlyCost", value)?;
        if value < 0.0 {
            return Err(StoreError::InvalidNumber {
                field: "monthlyCost",
                value,
            });
        }
        let member = self.member_mut(id)?;
        member.monthly_cost.set(month, value);
        self.bump();
        Ok(())
    }

    fn project_mut(&mut self, id: ProjectId) -> StoreResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::ProjectNotFound(id))
    }

    fn member_mut(&mut self, id: &str) -> StoreResult<&mut TeamMember> {
        self.team
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::MemberNotFound(id.to_string()))
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn next_member_id(&self) -> MemberId {
        loop {
            let candidate = format!("{MEMBER_ID_PREFIX}{}", next_member_stamp());
            if self.member(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

fn validate_project_field(field: &ProjectField) -> StoreResult<()> {
    match field {
        ProjectField::StartMonth(value) if Month::from_number(*value).is_none() => {
            Err(StoreError::InvalidField {
                field: "startMonth",
                reason: format!("{value} is not a calendar month 1..=12"),
            })
        }
        ProjectField::DurationMonths(0) => Err(StoreError::InvalidField {
            field: "durationMonths",
            reason: "duration must be at least one month".to_string(),
        }),
        _ => Ok(()),
    }
}

fn ensure_finite(field: &'static str, value: f64) -> StoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StoreError::InvalidNumber { field, value })
    }
}

// Shared by every store so ids never repeat within the process.
static LAST_MEMBER_STAMP: AtomicU64 = AtomicU64::new(0);

fn next_member_stamp() -> u64 {
    let now = epoch_millis();
    let next = |last: u64| now.max(last.saturating_add(1));
    match LAST_MEMBER_STAMP.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last))) {
        Ok(last) | Err(last) => next(last),
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
