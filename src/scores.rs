//! Personal-best tables, one JSON array per game mode in a key-value store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::settings::{Choice, Difficulty, RoundsOption, TrackSpeed};
use crate::util::round_to;

/// Entries kept for every facet value (difficulty, speed, round count)
pub const MAX_SCORES_PER_FACET: usize = 10;

/// String key-value persistence, in the spirit of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// A leaderboard row for one game mode.
pub trait ScoreRecord: Serialize + DeserializeOwned + Clone {
    type Facet: Copy + PartialEq + fmt::Debug + 'static;

    const STORAGE_KEY: &'static str;
    /// Every facet value, in the order tables are written back
    const FACETS: &'static [Self::Facet];

    fn facet(&self) -> Self::Facet;

    /// `Less` means `self` ranks above `other`
    fn rank(&self, other: &Self) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalScore {
    pub hits: u32,
    /// Seconds survived
    pub time: u32,
    pub timestamp: i64,
    pub difficulty: Difficulty,
}

impl ScoreRecord for SurvivalScore {
    type Facet = Difficulty;

    const STORAGE_KEY: &'static str = "survival-scores";
    const FACETS: &'static [Difficulty] = <Difficulty as Choice>::ALL;

    fn facet(&self) -> Difficulty {
        self.difficulty
    }

    fn rank(&self, other: &Self) -> Ordering {
        other
            .hits
            .cmp(&self.hits)
            .then_with(|| other.time.cmp(&self.time))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackScore {
    /// Percent of ticks spent on target, two decimals
    pub accuracy: f64,
    pub speed: TrackSpeed,
    pub timestamp: i64,
}

impl TrackScore {
    pub fn new(accuracy: f64, speed: TrackSpeed, timestamp: i64) -> Self {
        Self {
            accuracy: round_to(accuracy, 2),
            speed,
            timestamp,
        }
    }
}

impl ScoreRecord for TrackScore {
    type Facet = TrackSpeed;

    const STORAGE_KEY: &'static str = "track-scores";
    const FACETS: &'static [TrackSpeed] = <TrackSpeed as Choice>::ALL;

    fn facet(&self) -> TrackSpeed {
        self.speed
    }

    fn rank(&self, other: &Self) -> Ordering {
        other.accuracy.total_cmp(&self.accuracy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTimeScore {
    /// Milliseconds
    pub average_time: u64,
    pub rounds: RoundsOption,
    pub timestamp: i64,
}

impl ScoreRecord for ReactionTimeScore {
    type Facet = RoundsOption;

    const STORAGE_KEY: &'static str = "reaction-time-scores";
    const FACETS: &'static [RoundsOption] = <RoundsOption as Choice>::ALL;

    fn facet(&self) -> RoundsOption {
        self.rounds
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.average_time.cmp(&other.average_time)
    }
}

/// Reads and writes every game's leaderboard through one store
#[derive(Debug, Clone)]
pub struct ScoreBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ScoreBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load_all<R: ScoreRecord>(&self) -> Vec<R> {
        let Some(raw) = self.store.get(R::STORAGE_KEY) else {
            return Vec::new();
        };
        let rows = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(key = R::STORAGE_KEY, error = %e, "ignoring unreadable score table");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<R>(row) {
                Ok(score) => Some(score),
                Err(e) => {
                    warn!(key = R::STORAGE_KEY, error = %e, "skipping unreadable score");
                    None
                }
            })
            .collect()
    }

    /// Stored scores, best first, optionally narrowed to one facet.
    /// Missing or corrupt data reads as an empty table; a single bad row is
    /// dropped and the rest kept.
    pub fn scores<R: ScoreRecord>(&self, facet: Option<R::Facet>) -> Vec<R> {
        let all = self.load_all::<R>();
        match facet {
            Some(f) => all.into_iter().filter(|s| s.facet() == f).collect(),
            None => all,
        }
    }

    pub fn best<R: ScoreRecord>(&self, facet: R::Facet) -> Option<R> {
        self.scores::<R>(Some(facet)).into_iter().next()
    }

    /// Inserts a record, re-ranks, and keeps the top entries per facet value
    pub fn save<R: ScoreRecord>(&mut self, record: R) -> Result<(), StoreError> {
        let mut all = self.load_all::<R>();
        all.push(record);
        all.sort_by(|a, b| a.rank(b));

        let kept: Vec<R> = R::FACETS
            .iter()
            .flat_map(|facet| {
                all.iter()
                    .filter(move |s| s.facet() == *facet)
                    .take(MAX_SCORES_PER_FACET)
                    .cloned()
            })
            .collect();

        debug!(key = R::STORAGE_KEY, kept = kept.len(), "writing score table");
        let json = serde_json::to_string(&kept)?;
        self.store.set(R::STORAGE_KEY, &json)
    }
}

/// Current wall-clock time as Unix milliseconds, the timestamp scores carry
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// `MM:SS`
pub fn format_survival_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn format_accuracy(accuracy: f64) -> String {
    format!("{}%", accuracy.round())
}

pub fn format_reaction_time(ms: u64) -> String {
    format!("{ms}ms")
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{n} {unit}s ago")
    } else {
        format!("{n} {unit} ago")
    }
}

/// "just now", "3 minutes ago", "1 day ago", ...
pub fn format_relative_time(timestamp: i64, now: i64) -> String {
    let diff = Duration::milliseconds(now - timestamp);
    let seconds = diff.num_seconds();
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();
    let weeks = diff.num_weeks();

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else if weeks < 4 {
        plural(weeks, "week")
    } else {
        plural(days / 30, "month")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn track(accuracy: f64, speed: TrackSpeed) -> TrackScore {
        TrackScore::new(accuracy, speed, 0)
    }

    fn survival(hits: u32, time: u32, difficulty: Difficulty) -> SurvivalScore {
        SurvivalScore {
            hits,
            time,
            timestamp: 0,
            difficulty,
        }
    }

    #[test]
    fn empty_store_reads_empty() {
        let book = ScoreBook::new(MemoryStore::new());
        assert!(book.scores::<TrackScore>(None).is_empty());
        assert!(book.scores::<SurvivalScore>(Some(Difficulty::Easy)).is_empty());
        assert!(book.best::<ReactionTimeScore>(RoundsOption::Five).is_none());
    }

    #[test]
    fn corrupt_data_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(TrackScore::STORAGE_KEY, "{not json").unwrap();
        let book = ScoreBook::new(store);
        assert!(book.scores::<TrackScore>(None).is_empty());
    }

    #[test]
    fn save_keeps_readable_neighbours_of_a_bad_row() {
        let mut store = MemoryStore::new();
        store
            .set(
                ReactionTimeScore::STORAGE_KEY,
                r#"[{"averageTime":200,"rounds":5,"timestamp":1},
                    {"averageTime":210,"rounds":5,"timestamp":2},
                    {"averageTime":220,"rounds":7,"timestamp":3},
                    {"averageTime":190,"rounds":5}]"#,
            )
            .unwrap();
        let mut book = ScoreBook::new(store);
        assert_eq!(book.scores::<ReactionTimeScore>(None).len(), 2);

        book.save(ReactionTimeScore {
            average_time: 300,
            rounds: RoundsOption::Five,
            timestamp: 4,
        })
        .unwrap();
        let kept: Vec<u64> = book
            .scores::<ReactionTimeScore>(Some(RoundsOption::Five))
            .iter()
            .map(|s| s.average_time)
            .collect();
        assert_eq!(kept, vec![200, 210, 300]);
    }

    #[test]
    fn track_scores_sorted_descending() {
        let mut book = ScoreBook::new(MemoryStore::new());
        for a in [91.2, 88.0, 95.5] {
            book.save(track(a, TrackSpeed::Fast)).unwrap();
        }
        let stored: Vec<f64> = book
            .scores::<TrackScore>(Some(TrackSpeed::Fast))
            .iter()
            .map(|s| s.accuracy)
            .collect();
        assert_eq!(stored, vec![95.5, 91.2, 88.0]);
    }

    #[test]
    fn track_accuracy_rounded_to_two_decimals() {
        assert_eq!(track(66.666666, TrackSpeed::Slow).accuracy, 66.67);
    }

    #[test]
    fn keeps_top_ten_per_facet() {
        let mut book = ScoreBook::new(MemoryStore::new());
        for i in 0..15 {
            book.save(track(i as f64, TrackSpeed::Slow)).unwrap();
        }
        book.save(track(1.0, TrackSpeed::Medium)).unwrap();

        let slow = book.scores::<TrackScore>(Some(TrackSpeed::Slow));
        assert_eq!(slow.len(), MAX_SCORES_PER_FACET);
        assert_eq!(slow.first().unwrap().accuracy, 14.0);
        assert_eq!(slow.last().unwrap().accuracy, 5.0);
        assert_eq!(book.scores::<TrackScore>(Some(TrackSpeed::Medium)).len(), 1);
        assert_eq!(book.scores::<TrackScore>(None).len(), 11);
    }

    #[test]
    fn survival_ties_broken_by_time() {
        let mut book = ScoreBook::new(MemoryStore::new());
        book.save(survival(10, 30, Difficulty::Hard)).unwrap();
        book.save(survival(12, 20, Difficulty::Hard)).unwrap();
        book.save(survival(10, 45, Difficulty::Hard)).unwrap();

        let order: Vec<(u32, u32)> = book
            .scores::<SurvivalScore>(Some(Difficulty::Hard))
            .iter()
            .map(|s| (s.hits, s.time))
            .collect();
        assert_eq!(order, vec![(12, 20), (10, 45), (10, 30)]);
    }

    #[test]
    fn reaction_time_sorted_ascending() {
        let mut book = ScoreBook::new(MemoryStore::new());
        for avg in [310, 240, 275] {
            book.save(ReactionTimeScore {
                average_time: avg,
                rounds: RoundsOption::Three,
                timestamp: 0,
            })
            .unwrap();
        }
        let best = book.best::<ReactionTimeScore>(RoundsOption::Three).unwrap();
        assert_eq!(best.average_time, 240);
        assert!(book.best::<ReactionTimeScore>(RoundsOption::Ten).is_none());
    }

    #[test]
    fn reads_camel_case_documents() {
        let mut store = MemoryStore::new();
        store
            .set(
                ReactionTimeScore::STORAGE_KEY,
                r#"[{"averageTime":231,"rounds":5,"timestamp":1700000000000}]"#,
            )
            .unwrap();
        let book = ScoreBook::new(store);
        let scores = book.scores::<ReactionTimeScore>(Some(RoundsOption::Five));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].average_time, 231);
    }

    #[test]
    fn file_store_persists_between_books() {
        let dir = tempdir().unwrap();
        let mut book = ScoreBook::new(FileStore::new(dir.path()));
        book.save(survival(5, 12, Difficulty::Easy)).unwrap();

        let reopened = ScoreBook::new(FileStore::new(dir.path()));
        let scores = reopened.scores::<SurvivalScore>(None);
        assert_eq!(scores, vec![survival(5, 12, Difficulty::Easy)]);
        assert!(dir.path().join("survival-scores.json").exists());
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn formats() {
        assert_eq!(format_survival_time(0), "00:00");
        assert_eq!(format_survival_time(125), "02:05");
        assert_eq!(format_accuracy(87.6), "88%");
        assert_eq!(format_reaction_time(231), "231ms");
    }

    #[test]
    fn relative_time_buckets() {
        let now = 100 * 24 * 60 * 60 * 1000;
        let ago = |ms: i64| format_relative_time(now - ms, now);
        let min = 60_000;
        let hour = 60 * min;
        let day = 24 * hour;

        assert_eq!(ago(5_000), "just now");
        assert_eq!(ago(min), "1 minute ago");
        assert_eq!(ago(5 * min), "5 minutes ago");
        assert_eq!(ago(3 * hour), "3 hours ago");
        assert_eq!(ago(day), "1 day ago");
        assert_eq!(ago(14 * day), "2 weeks ago");
        assert_eq!(ago(60 * day), "2 months ago");
    }
}
