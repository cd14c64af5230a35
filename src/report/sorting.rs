//! Agent ordering for reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Agent;

/// How agents are ordered in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    /// Alphabetically by name
    #[default]
    Name,
    /// By total operation count, smallest first
    Operations,
}

impl FromStr for Sorting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Sorting::Name),
            "operations" => Ok(Sorting::Operations),
            other => Err(Error::Config(format!("unknown sorting {:?}", other))),
        }
    }
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sorting::Name => write!(f, "name"),
            Sorting::Operations => write!(f, "operations"),
        }
    }
}

/// Sort agents in place, then each agent's operations by count ascending.
///
/// Both sorts are stable, so ties keep report order.
pub fn sort_agents(agents: &mut [Agent], sorting: Sorting) {
    match sorting {
        Sorting::Name => agents.sort_by(|a, b| a.name.cmp(&b.name)),
        Sorting::Operations => agents.sort_by_key(Agent::total_operations),
    }

    for agent in agents.iter_mut() {
        agent.operations.sort_by_key(|op| op.repeated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operation;

    fn agents() -> Vec<Agent> {
        vec![
            Agent::new("1", "Rivka", "Teller").with_operations(vec![
                Operation::new("Deposits", 9),
                Operation::new("Loans", 2),
            ]),
            Agent::new("2", "Avi", "Teller").with_operations(vec![Operation::new("Deposits", 20)]),
            Agent::new("3", "Moshe", "Manager").with_operations(vec![Operation::new("Loans", 1)]),
        ]
    }

    #[test]
    fn test_sort_by_name() {
        let mut agents = agents();
        sort_agents(&mut agents, Sorting::Name);
        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Avi", "Moshe", "Rivka"]);
    }

    #[test]
    fn test_sort_by_operations() {
        let mut agents = agents();
        sort_agents(&mut agents, Sorting::Operations);
        let ids: Vec<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);

        let rivka = &agents[1];
        assert_eq!(rivka.operations[0].category, "Loans");
        assert_eq!(rivka.operations[1].category, "Deposits");
    }

    #[test]
    fn test_parse_sorting() {
        assert_eq!("Name".parse::<Sorting>().unwrap(), Sorting::Name);
        assert_eq!("operations".parse::<Sorting>().unwrap(), Sorting::Operations);
        assert!("date".parse::<Sorting>().is_err());
    }
}
