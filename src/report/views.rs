//! Flat, table-friendly projections of decoded agents.

use serde::{Deserialize, Serialize};

use crate::model::Agent;

/// One row per agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub national_id: String,
    pub name: String,
    /// Total operation count
    pub operations: u64,
    pub branch: String,
    pub responsibility: String,
}

impl AgentView {
    pub fn from_agent(agent: &Agent, branch: &str) -> Self {
        Self {
            national_id: agent.id.clone(),
            name: agent.name.clone(),
            operations: agent.total_operations(),
            branch: branch.to_string(),
            responsibility: agent.responsibility.clone(),
        }
    }
}

/// One row per (agent, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationView {
    pub category: String,
    pub repeated: u64,
    pub agent_id: String,
    pub branch: String,
}

/// Agent rows in input order.
pub fn agent_views(agents: &[Agent], branch: &str) -> Vec<AgentView> {
    agents
        .iter()
        .map(|agent| AgentView::from_agent(agent, branch))
        .collect()
}

/// Operation rows, agent by agent.
pub fn operation_views(agents: &[Agent], branch: &str) -> Vec<OperationView> {
    agents
        .iter()
        .flat_map(|agent| {
            agent.operations.iter().map(move |op| OperationView {
                category: op.category.clone(),
                repeated: op.repeated,
                agent_id: agent.id.clone(),
                branch: branch.to_string(),
            })
        })
        .collect()
}
