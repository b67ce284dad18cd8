//! Comment model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A discussion entry on a planning or one of its tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanningComment {
    pub id: String,
    pub planning_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub text: String,
    pub created_at: Timestamp,
    /// Author; the only user allowed to edit or delete the comment
    pub created_by: String,
    /// Present only once the comment has been edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl PlanningComment {
    /// Whether `user_id` authored this comment.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }
}
