use std::{collections::VecDeque, ffi::OsString, fs, io::{BufWriter, Write}};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::DEFAULT_HISTORY_CAPACITY, history::HistoryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub starred: bool,
}

/// Recently run SQL, most recent first. A query appears at most once;
/// running it again moves it to the front. When full, the oldest unstarred
/// entry goes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl QueryHistory {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), entries: VecDeque::new() }
    }

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn queries(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.query.as_str()).collect()
    }

    /// Record `query` as run now. Blank queries are ignored.
    pub fn save(&mut self, query: &str) -> bool {
        self.save_at(query, Utc::now())
    }

    pub fn save_at(&mut self, query: &str, timestamp: DateTime<Utc>) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        let starred = match self.entries.iter().position(|e| e.query == query) {
            Some(index) => self.entries.remove(index).is_some_and(|e| e.starred),
            None => false,
        };
        self.entries.push_front(HistoryEntry { query: query.to_string(), timestamp, starred });
        self.evict();
        true
    }

    pub fn set_starred(&mut self, query: &str, starred: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.query == query) {
            Some(entry) => {
                entry.starred = starred;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, query: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.query == query)?;
        self.entries.remove(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            let victim = self.entries.iter().rposition(|e| !e.starred)
                .unwrap_or(self.entries.len() - 1);
            if let Some(entry) = self.entries.remove(victim) {
                debug!("history full, dropped '{}'", entry.query);
            }
        }
    }

    /// Load entries written by [`QueryHistory::write_to_file`]. Entries beyond
    /// `capacity` are evicted.
    pub fn load_from_file(file_path: &OsString, capacity: usize) -> Result<Self, HistoryError> {
        let content = fs::read_to_string(file_path)?;
        let entries: Vec<HistoryEntry> = serde_json::from_str(&content)?;

        let mut history = Self::new(capacity);
        history.entries = entries.into();
        history.evict();
        Ok(history)
    }

    pub fn write_to_file(&self, file_path: &OsString) -> Result<(), HistoryError> {
        let file = fs::File::create(file_path)?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, &self.entries)?;
        w.flush()?;
        Ok(())
    }
}
