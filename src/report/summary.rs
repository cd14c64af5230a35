//! Per-branch totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Agent;

/// Headline numbers for one decoded branch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    /// Branch name
    pub name: String,
    /// Size of the source report in bytes
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
    pub total_agents: usize,
    pub total_operations: u64,
}

impl BranchSummary {
    /// Summarize `agents`, stamped with the current time.
    pub fn new(name: impl Into<String>, agents: &[Agent], file_size: u64) -> Self {
        Self {
            name: name.into(),
            file_size,
            created_at: Utc::now(),
            total_agents: agents.len(),
            total_operations: agents.iter().map(Agent::total_operations).sum(),
        }
    }
}
