//! In-Memory Conversation Buffer
//!
//! Information Hiding:
//! - Per-session partitioning hidden behind session-keyed accessors
//! - FIFO eviction applied on append, invisible to callers
//! - Process-lifetime only; nothing here is written to disk

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// One prior question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Memory partition for a request's session id.
/// Absent and blank ids share the anonymous partition (`None`).
pub fn session_key(session_id: Option<&str>) -> Option<&str> {
    session_id.filter(|s| !s.trim().is_empty())
}

/// Ordered prior turns, partitioned by session id.
/// Not synchronised; the owner wraps it in a lock.
#[derive(Debug, Default)]
pub struct MemoryBuffer {
    sessions: HashMap<Option<String>, VecDeque<Turn>>,
    max_turns: Option<usize>,
}

impl MemoryBuffer {
    pub fn new(max_turns: Option<usize>) -> Self {
        Self {
            sessions: HashMap::new(),
            max_turns,
        }
    }

    /// Snapshot of a session's turns, oldest first
    pub fn turns(&self, session_id: Option<&str>) -> Vec<Turn> {
        let key = session_key(session_id).map(str::to_string);
        self.sessions
            .get(&key)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn append(&mut self, session_id: Option<&str>, turn: Turn) {
        let key = session_key(session_id).map(str::to_string);
        let turns = self.sessions.entry(key).or_default();
        turns.push_back(turn);

        if let Some(cap) = self.max_turns {
            while turns.len() > cap {
                turns.pop_front();
            }
        }

        tracing::debug!(
            "[MemoryBuffer] Session {:?} now holds {} turns",
            session_key(session_id),
            turns.len()
        );
    }

    /// Drop every session's turns
    pub fn reset(&mut self) {
        self.sessions.clear();
        tracing::debug!("[MemoryBuffer] Cleared all sessions");
    }

    /// Drop one session's turns, returning how many were removed
    pub fn reset_session(&mut self, session_id: Option<&str>) -> usize {
        let key = session_key(session_id).map(str::to_string);
        let removed = self
            .sessions
            .remove(&key)
            .map(|turns| turns.len())
            .unwrap_or(0);
        tracing::debug!(
            "[MemoryBuffer] Cleared session {:?} ({} turns)",
            key,
            removed
        );
        removed
    }

    /// Total turns across all sessions
    pub fn len(&self) -> usize {
        self.sessions.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn session_count(&self) -> usize {
        self.sessions.values().filter(|turns| !turns.is_empty()).count()
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }
}
