//! Document model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata for a file attached to a planning or one of its tasks.
///
/// The file itself lives in the blob store at `file_url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanningDocument {
    pub id: String,
    pub planning_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Display name, the original file name on upload
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Retrieval URL returned by the blob store
    pub file_url: String,
    /// MIME type
    pub file_type: String,
    /// Size in bytes
    pub file_size: u64,
    pub uploaded_at: Timestamp,
    pub uploaded_by: String,
}
