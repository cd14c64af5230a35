//! Per-agent operation aggregation.

use std::collections::HashMap;

use crate::model::Operation;

/// Ordered accumulator of operation counts keyed by category.
///
/// Categories keep the order in which they were first seen; a repeated
/// category adds its count to the existing entry.
#[derive(Debug, Clone, Default)]
pub struct OperationTally {
    entries: Vec<Operation>,
    index: HashMap<String, usize>,
}

impl OperationTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one operation into the tally.
    pub fn add(mut self, operation: Operation) -> Self {
        match self.index.get(&operation.category) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.repeated = entry.repeated.saturating_add(operation.repeated);
            }
            None => {
                self.index
                    .insert(operation.category.clone(), self.entries.len());
                self.entries.push(operation);
            }
        }
        self
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|op| op.repeated).sum()
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.entries
    }
}

impl FromIterator<Operation> for OperationTally {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::add)
    }
}

/// Merge an agent's table rows by category, then fold in the entry taken
/// from the agent's header row.
pub fn aggregate_operations<I>(rows: I, header: Operation) -> Vec<Operation>
where
    I: IntoIterator<Item = Operation>,
{
    rows.into_iter()
        .chain(std::iter::once(header))
        .collect::<OperationTally>()
        .into_operations()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_categories_are_summed() {
        let tally: OperationTally = vec![
            Operation::new("Deposit", 3),
            Operation::new("Loan", 1),
            Operation::new("Deposit", 4),
        ]
        .into_iter()
        .collect();

        assert_eq!(tally.len(), 2);
        assert_eq!(tally.total(), 8);
        assert_eq!(
            tally.into_operations(),
            vec![Operation::new("Deposit", 7), Operation::new("Loan", 1)]
        );
    }

    #[test]
    fn test_header_entry_appended_last() {
        let ops = aggregate_operations(
            vec![Operation::new("Deposit", 3)],
            Operation::new("Transfer", 12),
        );
        assert_eq!(
            ops,
            vec![Operation::new("Deposit", 3), Operation::new("Transfer", 12)]
        );
    }

    #[test]
    fn test_header_entry_merges_with_existing_row() {
        // The header's category must not appear twice
        let ops = aggregate_operations(
            vec![Operation::new("Deposit", 3), Operation::new("Loan", 2)],
            Operation::new("Deposit", 12),
        );
        assert_eq!(
            ops,
            vec![Operation::new("Deposit", 15), Operation::new("Loan", 2)]
        );
    }

    #[test]
    fn test_counts_are_summed_not_concatenated() {
        // Guards against accumulating the count into the category label
        let ops = aggregate_operations(
            vec![Operation::new("Deposit", 1), Operation::new("Deposit", 1)],
            Operation::new("", 0),
        );
        assert_eq!(ops[0], Operation::new("Deposit", 2));
    }
}
