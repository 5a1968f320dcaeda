//! Command history
//!
//! Bounded, most-recent-first record of completed commands. Kept in memory
//! only.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::CommandKind;

/// Default number of records kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// A completed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Command that was sent
    pub kind: CommandKind,
    /// When the command finished
    pub timestamp: DateTime<Utc>,
    /// Whether dispatch and the follow-up refresh both succeeded
    pub success: bool,
}

impl CommandRecord {
    /// Create a record stamped now
    pub fn new(kind: CommandKind, success: bool) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            success,
        }
    }
}

/// Ring buffer of command records, newest first
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<CommandRecord>,
    capacity: usize,
}

impl CommandHistory {
    /// Create an empty history holding at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Add a record, dropping the oldest once over capacity
    pub fn push(&mut self, record: CommandRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
    }

    /// Newest record
    pub fn latest(&self) -> Option<&CommandRecord> {
        self.entries.front()
    }

    /// Records, newest first
    pub fn iter(&self) -> impl Iterator<Item = &CommandRecord> {
        self.entries.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no command has completed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy, newest first
    pub fn to_vec(&self) -> Vec<CommandRecord> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut history = CommandHistory::default();
        let kinds = [
            CommandKind::Lock,
            CommandKind::Unlock,
            CommandKind::Start,
            CommandKind::Stop,
            CommandKind::Honk,
            CommandKind::Lock,
            CommandKind::Start,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            history.push(CommandRecord::new(*kind, i % 2 == 0));
        }

        assert_eq!(history.len(), 5);
        let recorded: Vec<_> = history.iter().map(|r| r.kind).collect();
        assert_eq!(
            recorded,
            vec![
                CommandKind::Start,
                CommandKind::Lock,
                CommandKind::Honk,
                CommandKind::Stop,
                CommandKind::Start,
            ]
        );
        assert!(history.latest().unwrap().success);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = CommandHistory::new(0);
        history.push(CommandRecord::new(CommandKind::Lock, true));
        history.push(CommandRecord::new(CommandKind::Unlock, false));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.to_vec().len(), 1);
        assert_eq!(history.latest().unwrap().kind, CommandKind::Unlock);
    }
}
