//! Undo history for the daily log
//!
//! A flat LIFO of signed servings deltas. Entries are never modified once
//! pushed and can be read back by position.

use serde::Serialize;

/// One recorded log mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndoEntry {
    pub date: String,
    pub food_name: String,
    /// Positive for an addition, negative for a removal
    pub delta: i64,
}

/// What an undo did to the affected cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UndoOutcome {
    /// The food entry was re-created with this many servings
    Restored { entry: UndoEntry, servings: i64 },
    /// The food entry now holds this many servings
    Changed { entry: UndoEntry, servings: i64 },
    /// The food entry dropped to zero and was deleted
    Removed { entry: UndoEntry },
}

impl UndoOutcome {
    pub fn entry(&self) -> &UndoEntry {
        match self {
            UndoOutcome::Restored { entry, .. }
            | UndoOutcome::Changed { entry, .. }
            | UndoOutcome::Removed { entry } => entry,
        }
    }

    /// Servings left in the cell after the undo
    pub fn servings(&self) -> i64 {
        match self {
            UndoOutcome::Restored { servings, .. } | UndoOutcome::Changed { servings, .. } => {
                *servings
            }
            UndoOutcome::Removed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.last()
    }

    pub fn get(&self, index: usize) -> Option<&UndoEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(delta: i64) -> UndoEntry {
        UndoEntry {
            date: "01/06/2024".into(),
            food_name: "Apple".into(),
            delta,
        }
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = UndoStack::new();
        assert!(stack.pop().is_none());

        stack.push(entry(3));
        stack.push(entry(-3));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().unwrap().delta, -3);
        assert_eq!(stack.get(0).unwrap().delta, 3);

        assert_eq!(stack.pop().unwrap().delta, -3);
        assert_eq!(stack.pop().unwrap().delta, 3);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = UndoOutcome::Changed { entry: entry(2), servings: 3 };
        assert_eq!(outcome.servings(), 3);
        assert_eq!(outcome.entry().delta, 2);

        let json = serde_json::to_value(UndoOutcome::Removed { entry: entry(1) }).unwrap();
        assert_eq!(json["action"], "removed");
        assert_eq!(UndoOutcome::Removed { entry: entry(1) }.servings(), 0);
    }
}
