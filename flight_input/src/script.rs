//! Scripted input.
//!
//! A flight script is a JSON list of commands keyed by the tick they take
//! effect on, used to drive the simulation without a keyboard:
//!
//! ```json
//! [
//!   { "tick": 0,  "command": { "boost": "forward" } },
//!   { "tick": 60, "command": { "roll": "ccw" } },
//!   { "tick": 90, "command": { "roll": "none" } }
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    pub command: Command,
}

/// Timeline of commands, consumed in tick order.
#[derive(Debug, Clone, Default)]
pub struct FlightScript {
    entries: Vec<ScriptEntry>,
    cursor: usize,
}

impl FlightScript {
    /// Entries are sorted by tick; entries sharing a tick keep file order.
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|e| e.tick);
        Self { entries, cursor: 0 }
    }

    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(s)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script {}", path.display()))?;
        let script = Self::from_json_str(&text)
            .with_context(|| format!("parse script {}", path.display()))?;
        debug!(entries = script.entries.len(), path = %path.display(), "Script loaded");
        Ok(script)
    }

    /// Entries due at or before `tick` that have not been returned yet.
    pub fn due(&mut self, tick: u64) -> &[ScriptEntry] {
        let start = self.cursor;
        while self
            .entries
            .get(self.cursor)
            .is_some_and(|e| e.tick <= tick)
        {
            self.cursor += 1;
        }
        &self.entries[start..self.cursor]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Tick of the final entry, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.entries.last().map(|e| e.tick)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
