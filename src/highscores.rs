//! Local top-10 scoreboard
//!
//! Persisted as a JSON array of `{name, score}` through the [`ScoreStore`]
//! port. Kept sorted descending by score; ties keep insertion order.

use serde::{Deserialize, Serialize};

use crate::platform::ScoreStore;

/// Maximum number of entries kept after a submission
pub const MAX_ENTRIES: usize = 10;

/// Maximum stored name length, matching the original entry widget
pub const MAX_NAME_LEN: usize = 12;

/// A single scoreboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// The local scoreboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Storage key for the persisted blob
    pub const STORAGE_KEY: &'static str = "triangle_blitz_scoreboard";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a score: normalize the name, append, stable-sort descending,
    /// truncate to the top 10.
    pub fn submit(&mut self, name: &str, score: u32) {
        let name = normalize_name(name);
        self.entries.push(ScoreEntry { name, score });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Load from storage; absent or unparsable data yields an empty board
    pub fn load(store: &dyn ScoreStore) -> Self {
        match store.read(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(board) => board,
                Err(err) => {
                    log::warn!("Discarding unparsable scoreboard: {err}");
                    Self::new()
                }
            },
            None => Self::new(),
        }
    }

    /// Best-effort save; failures are logged and swallowed
    pub fn save(&self, store: &mut dyn ScoreStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if !store.write(Self::STORAGE_KEY, &json) {
                    log::warn!("Scoreboard save dropped by storage backend");
                }
            }
            Err(err) => log::warn!("Scoreboard serialization failed: {err}"),
        }
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "Anonymous".to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}
