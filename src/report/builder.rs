//! Turns decoded branches into a section tree for the layout engine.

use crate::model::{Agent, ChildSection, GrandchildSection, GreatGrandchildSection, Section, SectionTree};

use super::sorting::{sort_agents, Sorting};
use super::summary::BranchSummary;
use super::views::{agent_views, operation_views, AgentView, OperationView};

/// The decoded agents of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReport {
    pub name: String,
    pub agents: Vec<Agent>,
}

impl BranchReport {
    pub fn new(name: impl Into<String>, agents: Vec<Agent>) -> Self {
        Self {
            name: name.into(),
            agents,
        }
    }

    /// Reorder agents and their operations.
    pub fn sorted(mut self, sorting: Sorting) -> Self {
        sort_agents(&mut self.agents, sorting);
        self
    }

    pub fn summary(&self, file_size: u64) -> BranchSummary {
        BranchSummary::new(self.name.clone(), &self.agents, file_size)
    }

    pub fn agent_views(&self) -> Vec<AgentView> {
        agent_views(&self.agents, &self.name)
    }

    pub fn operation_views(&self) -> Vec<OperationView> {
        operation_views(&self.agents, &self.name)
    }

    /// One child per responsibility (first-seen order), one grandchild per
    /// agent, one great-grandchild per operation holding its count.
    pub fn to_section(&self) -> Section {
        let mut groups: Vec<(&str, Vec<&Agent>)> = Vec::new();
        for agent in &self.agents {
            match groups.iter().position(|(name, _)| *name == agent.responsibility) {
                Some(i) => groups[i].1.push(agent),
                None => groups.push((agent.responsibility.as_str(), vec![agent])),
            }
        }

        groups
            .into_iter()
            .fold(Section::new(self.name.clone()), |section, (responsibility, members)| {
                let child = members
                    .into_iter()
                    .fold(ChildSection::new(responsibility), |child, agent| {
                        child.with_grandchild(agent_section(agent))
                    });
                section.with_child(child)
            })
    }
}

fn agent_section(agent: &Agent) -> GrandchildSection {
    agent.operations.iter().fold(
        GrandchildSection::new(format!("{} ({})", agent.name, agent.id)),
        |grandchild, op| {
            grandchild.with_great_grandchild(
                GreatGrandchildSection::new(op.category.clone()).with_content(op.repeated.to_string()),
            )
        },
    )
}

/// Build the document tree for a set of branches.
pub fn build_document(title: Option<&str>, branches: &[BranchReport]) -> SectionTree {
    let tree = match title {
        Some(title) => SectionTree::new().with_title(title),
        None => SectionTree::new(),
    };
    branches
        .iter()
        .fold(tree, |tree, branch| tree.with_section(branch.to_section()))
}
