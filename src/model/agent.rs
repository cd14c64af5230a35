//! Agent and operation records decoded from a branch report.

use serde::{Deserialize, Serialize};

/// One employee or branch actor extracted from a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// National or employee identifier (not necessarily numeric)
    pub id: String,

    /// Display name
    pub name: String,

    /// Role or category label
    pub responsibility: String,

    /// Operations performed, unique by category
    pub operations: Vec<Operation>,
}

impl Agent {
    /// Create an agent with no operations.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        responsibility: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            responsibility: responsibility.into(),
            operations: Vec::new(),
        }
    }

    /// Set the operations list.
    pub fn with_operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations = operations;
        self
    }

    /// Sum of `repeated` over all operations.
    pub fn total_operations(&self) -> u64 {
        self.operations.iter().map(|op| op.repeated).sum()
    }

    /// Find an operation by category.
    pub fn operation(&self, category: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.category == category)
    }
}

/// One activity category and its count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// Free-text category label
    pub category: String,

    /// How many times the activity occurred
    pub repeated: u64,
}

impl Operation {
    /// Create a new operation entry.
    pub fn new(category: impl Into<String>, repeated: u64) -> Self {
        Self {
            category: category.into(),
            repeated,
        }
    }
}
