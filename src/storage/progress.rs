//! Exam progress cache
//!
//! Answers are stored as JSON text under `exam_<attempt id>` along with the
//! time they were saved. Reads ignore entries older than the freshness window.
//! Every operation is best-effort: failures are logged and swallowed so that a
//! broken cache never interrupts an exam.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Answers keyed by question id
pub type Answers = Map<String, Value>;

/// Default freshness window for cached progress
pub const DEFAULT_PROGRESS_TTL_HOURS: u32 = 24;

#[derive(Debug, Error)]
enum StorageError {
    #[error("progress store lock poisoned")]
    Poisoned,

    #[error("progress entry encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredProgress {
    answers: Answers,
    /// Save time in unix milliseconds
    timestamp: i64,
}

/// Storage key for an attempt
pub fn progress_key(attempt_id: &str) -> String {
    format!("exam_{}", attempt_id)
}

#[derive(Debug)]
pub struct ProgressCache {
    entries: Mutex<HashMap<String, String>>,
    ttl: Duration,
}

impl ProgressCache {
    pub fn new(ttl_hours: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn save(&self, attempt_id: &str, answers: &Answers) {
        self.save_at(attempt_id, answers, Utc::now());
    }

    /// Saved answers if they are still fresh, otherwise an empty map
    pub fn load(&self, attempt_id: &str) -> Answers {
        self.load_at(attempt_id, Utc::now())
    }

    pub fn clear(&self, attempt_id: &str) {
        if let Err(e) = self.try_clear(attempt_id) {
            warn!("Failed to clear exam progress for {}: {}", attempt_id, e);
        }
    }

    /// Drop every entry that is stale or unreadable. Returns how many were removed.
    pub fn purge_stale(&self) -> usize {
        self.purge_stale_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn save_at(&self, attempt_id: &str, answers: &Answers, now: DateTime<Utc>) {
        if let Err(e) = self.try_save(attempt_id, answers, now) {
            warn!("Failed to save exam progress for {}: {}", attempt_id, e);
        }
    }

    pub(crate) fn load_at(&self, attempt_id: &str, now: DateTime<Utc>) -> Answers {
        match self.try_load(attempt_id, now) {
            Ok(Some(answers)) => answers,
            Ok(None) => Answers::new(),
            Err(e) => {
                warn!("Failed to load exam progress for {}: {}", attempt_id, e);
                Answers::new()
            }
        }
    }

    pub(crate) fn purge_stale_at(&self, now: DateTime<Utc>) -> usize {
        let Ok(mut entries) = self.lock() else {
            warn!("Failed to purge exam progress: store lock poisoned");
            return 0;
        };

        let before = entries.len();
        entries.retain(|key, raw| match serde_json::from_str::<StoredProgress>(raw) {
            Ok(stored) => self.is_fresh(&stored, now),
            Err(e) => {
                debug!("Purging unreadable progress entry {}: {}", key, e);
                false
            }
        });
        before - entries.len()
    }

    fn try_save(&self, attempt_id: &str, answers: &Answers, now: DateTime<Utc>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&StoredProgress {
            answers: answers.clone(),
            timestamp: now.timestamp_millis(),
        })?;
        self.lock()?.insert(progress_key(attempt_id), raw);
        debug!("Saved {} answers for attempt {}", answers.len(), attempt_id);
        Ok(())
    }

    fn try_load(&self, attempt_id: &str, now: DateTime<Utc>) -> Result<Option<Answers>, StorageError> {
        let raw = match self.lock()?.get(&progress_key(attempt_id)) {
            Some(raw) => raw.clone(),
            None => return Ok(None),
        };

        let stored: StoredProgress = serde_json::from_str(&raw)?;
        if !self.is_fresh(&stored, now) {
            debug!("Ignoring stale progress for attempt {}", attempt_id);
            return Ok(None);
        }
        Ok(Some(stored.answers))
    }

    fn try_clear(&self, attempt_id: &str) -> Result<(), StorageError> {
        self.lock()?.remove(&progress_key(attempt_id));
        Ok(())
    }

    fn is_fresh(&self, stored: &StoredProgress, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() - stored.timestamp < self.ttl.num_milliseconds()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Poisoned)
    }

    #[cfg(test)]
    fn insert_raw(&self, attempt_id: &str, raw: &str) {
        self.lock().unwrap().insert(progress_key(attempt_id), raw.to_string());
    }
}

impl Default for ProgressCache {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_TTL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answers(value: Value) -> Answers {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_progress_key_format() {
        assert_eq!(progress_key("42"), "exam_42");
    }

    #[test]
    fn test_save_then_load() {
        let cache = ProgressCache::default();
        let saved = answers(json!({"q1": "c3", "q2": ["c1", "c4"]}));
        cache.save("a1", &saved);

        assert_eq!(cache.load("a1"), saved);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let cache = ProgressCache::default();
        assert!(cache.load("nope").is_empty());
    }

    #[test]
    fn test_load_respects_freshness_window() {
        let cache = ProgressCache::default();
        let saved_at = Utc::now();
        cache.save_at("a1", &answers(json!({"q1": "c1"})), saved_at);

        let almost = saved_at + Duration::hours(24) - Duration::milliseconds(1);
        assert_eq!(cache.load_at("a1", almost).len(), 1);

        let expired = saved_at + Duration::hours(24);
        assert!(cache.load_at("a1", expired).is_empty());
    }

    #[test]
    fn test_custom_ttl() {
        let cache = ProgressCache::new(1);
        let saved_at = Utc::now();
        cache.save_at("a1", &answers(json!({"q1": "c1"})), saved_at);
        assert!(cache.load_at("a1", saved_at + Duration::hours(2)).is_empty());
    }

    #[test]
    fn test_corrupt_entry_loads_empty() {
        let cache = ProgressCache::default();
        cache.insert_raw("a1", "{not json");
        assert!(cache.load("a1").is_empty());
    }

    #[test]
    fn test_clear_removes_entry() {
        let cache = ProgressCache::default();
        cache.save("a1", &answers(json!({"q1": "c1"})));
        cache.clear("a1");
        cache.clear("a1");
        assert!(cache.load("a1").is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_stale_drops_old_and_corrupt() {
        let cache = ProgressCache::default();
        let now = Utc::now();
        cache.save_at("old", &answers(json!({"q1": "c1"})), now - Duration::hours(30));
        cache.save_at("new", &answers(json!({"q1": "c2"})), now);
        cache.insert_raw("bad", "[]");

        assert_eq!(cache.purge_stale_at(now), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.load_at("new", now).len(), 1);
    }
}
