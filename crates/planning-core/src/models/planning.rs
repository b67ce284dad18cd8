//! Planning model definition.

use std::collections::BTreeSet;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Money, PlanningStatus, PlanningType};

/// A time-boxed initiative tracked for a condominium unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Planning {
    /// Backend-assigned identifier
    pub id: String,

    pub title: String,

    pub description: String,

    /// Time box covered by the planning
    #[serde(rename = "type")]
    pub planning_type: PlanningType,

    pub status: PlanningStatus,

    pub start_date: Date,

    pub end_date: Date,

    /// Completion percentage derived from the planning's tasks (0-100)
    pub progress: u8,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,

    /// Identifier of the user who created the planning
    pub created_by: String,

    #[serde(default)]
    pub assigned_to: BTreeSet<String>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Budget in major units, persisted as cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Money>,
}
