//! Report helpers connecting decoded agents to the layout engine: sorting,
//! branch totals, flat views and section tree building.

mod builder;
mod sorting;
mod summary;
mod views;

pub use builder::{build_document, BranchReport};
pub use sorting::{sort_agents, Sorting};
pub use summary::BranchSummary;
pub use views::{agent_views, operation_views, AgentView, OperationView};
