//! Snapshot envelope shared by remote and local persistence.
//!
//! # Responsibility
//! - Define the `{projects, team}` unit of load and save.
//! - Decode partially-filled payloads with caller-chosen fallbacks.
//!
//! # Invariants
//! - A save always writes the full snapshot; there are no partial writes.
//! - Decoding never fabricates data: absent keys resolve to the fallback the
//!   caller provides (empty collections for remote, seed data for cache).

use crate::model::member::TeamMember;
use crate::model::project::Project;
use serde::{de, Deserialize, Serialize};
use serde_json::Value;

/// Full entity collection at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

impl Snapshot {
    pub fn new(projects: Vec<Project>, team: Vec<TeamMember>) -> Self {
        Self { projects, team }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Decoded payload where each top-level key may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPayload {
    pub projects: Option<Vec<Project>>,
    pub team: Option<Vec<TeamMember>>,
}

impl SnapshotPayload {
    /// Parses JSON text.
    ///
    /// Keys that are absent or `null` decode to `None`. Text that is not JSON,
    /// a payload that is not an object (including `null`), or a key whose
    /// value has the wrong shape, is an error.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(de::Error::custom(
                "snapshot payload must be a JSON object",
            ));
        };

        let projects = match object.remove("projects") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        let team = match object.remove("team") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };

        Ok(Self { projects, team })
    }

    /// Resolves missing keys to empty collections.
    pub fn or_empty(self) -> Snapshot {
        Snapshot {
            projects: self.projects.unwrap_or_default(),
            team: self.team.unwrap_or_default(),
        }
    }

    /// Resolves each missing key from `fallback` independently.
    pub fn or_fallback(self, fallback: Snapshot) -> Snapshot {
        Snapshot {
            projects: self.projects.unwrap_or(fallback.projects),
            team: self.team.unwrap_or(fallback.team),
        }
    }
}
