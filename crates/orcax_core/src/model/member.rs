//! Team member domain model.
//!
//! # Responsibility
//! - Define the roster entry whose cost varies per calendar month.
//! - Normalize persisted cost arrays to the fixed twelve-month axis.
//!
//! # Invariants
//! - `monthly_cost` always holds exactly twelve values (index 0 = January).
//! - Missing or `null` months read back as `0.0`.

use crate::model::month::{Month, MONTHS_PER_YEAR};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque stable identifier of a team member.
pub type MemberId = String;

/// Fully-loaded cost of one member for each month of the year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyCost([f64; MONTHS_PER_YEAR]);

impl MonthlyCost {
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Same cost for every month.
    pub fn flat(value: f64) -> Self {
        Self([value; MONTHS_PER_YEAR])
    }

    pub fn from_array(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    /// Builds a cost row from an arbitrary slice.
    ///
    /// Shorter input is padded with zeros, longer input is truncated.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut costs = [0.0; MONTHS_PER_YEAR];
        for (slot, value) in costs.iter_mut().zip(values) {
            *slot = *value;
        }
        Self(costs)
    }

    /// Cost for one month.
    pub fn get(&self, month: Month) -> f64 {
        self.0[month.index()]
    }

    /// Cost by 0-based index; `None` past December.
    pub fn get_index(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub(crate) fn set(&mut self, month: Month, value: f64) {
        self.0[month.index()] = value;
    }

    pub fn as_array(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Serialize for MonthlyCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MonthlyCost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        let values: Vec<f64> = raw.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        Ok(Self::from_slice(&values))
    }
}

/// Roster entry with per-month employment cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    /// Free text, e.g. contract type and position.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub monthly_cost: MonthlyCost,
}

impl TeamMember {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            monthly_cost: MonthlyCost::zeros(),
        }
    }

    /// Builder-style helper used by seed data and tests.
    pub fn with_costs(mut self, monthly_cost: MonthlyCost) -> Self {
        self.monthly_cost = monthly_cost;
        self
    }

    pub fn cost_in(&self, month: Month) -> f64 {
        self.monthly_cost.get(month)
    }
}

#[cfg(test)]
mod tests {
    use super::{MonthlyCost, TeamMember};
    use crate::model::month::Month;

    #[test]
    fn short_cost_arrays_are_padded_with_zeros() {
        let member: TeamMember = serde_json::from_str(
            r#"{"id":"ana","name":"Ana","role":"Dev","monthlyCost":[100, 200]}"#,
        )
        .expect("member should parse");

        assert_eq!(member.cost_in(Month::January), 100.0);
        assert_eq!(member.cost_in(Month::February), 200.0);
        assert_eq!(member.cost_in(Month::December), 0.0);
    }

    #[test]
    fn long_arrays_are_truncated_and_nulls_read_as_zero() {
        let member: TeamMember = serde_json::from_str(
            r#"{"id":"bo","name":"Bo","monthlyCost":[1,null,3,4,5,6,7,8,9,10,11,12,13,14]}"#,
        )
        .expect("member should parse");

        assert_eq!(member.monthly_cost.get(Month::February), 0.0);
        assert_eq!(member.monthly_cost.get(Month::December), 12.0);
        assert_eq!(member.role, "");
    }

    #[test]
    fn missing_cost_field_defaults_to_zeros() {
        let member: TeamMember =
            serde_json::from_str(r#"{"id":"cy","name":"Cy","role":"QA"}"#).expect("parse");
        assert_eq!(member.monthly_cost, MonthlyCost::zeros());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let member = TeamMember::new("dee", "Dee", "PM").with_costs(MonthlyCost::flat(10.0));
        let json = serde_json::to_value(&member).expect("serialize");

        assert_eq!(json["monthlyCost"].as_array().map(Vec::len), Some(12));
        assert!(json.get("monthly_cost").is_none());
    }
}
