//! The persisted revision blob and the statistics derived from it

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::problem::{DifficultyLevel, Problem};
use crate::error::{Result, RevisionError};

/// Every tracked problem plus the time of the last save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStore {
    #[serde(default)]
    pub problems: Vec<Problem>,
    pub last_updated: DateTime<Utc>,
}

impl RevisionStore {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            problems: Vec::new(),
            last_updated: now,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Problem> {
        self.problems.iter_mut().find(|p| p.id == id)
    }

    /// Insert, or replace the record sharing `problem.link`
    ///
    /// A replaced record keeps its id, revision history and last revision date.
    pub fn upsert(&mut self, mut problem: Problem) -> &Problem {
        match self.problems.iter().position(|p| p.link == problem.link) {
            Some(index) => {
                let existing = &mut self.problems[index];
                problem.id = std::mem::take(&mut existing.id);
                problem.revision_history = std::mem::take(&mut existing.revision_history);
                problem.last_revised_date = existing.last_revised_date;
                *existing = problem;
                &self.problems[index]
            }
            None => {
                self.problems.push(problem);
                &self.problems[self.problems.len() - 1]
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Problem> {
        let index = self.problems.iter().position(|p| p.id == id)?;
        Some(self.problems.remove(index))
    }

    /// Check an externally supplied blob before it replaces the store
    ///
    /// Derived difficulty fields are recomputed rather than trusted.
    pub fn normalize(&mut self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut links = HashSet::new();

        for problem in &mut self.problems {
            if problem.id.trim().is_empty() {
                return Err(RevisionError::Validation(format!("problem '{}' has an empty id", problem.name)));
            }
            if problem.link.trim().is_empty() {
                return Err(RevisionError::Validation(format!("problem {} has an empty link", problem.id)));
            }
            if !(problem.time_in_minutes.is_finite() && problem.time_in_minutes > 0.0) {
                return Err(RevisionError::Validation(format!(
                    "problem {} has non-positive timeInMinutes",
                    problem.id
                )));
            }
            if !ids.insert(problem.id.clone()) {
                return Err(RevisionError::Validation(format!("duplicate problem id {}", problem.id)));
            }
            if !links.insert(problem.link.clone()) {
                return Err(RevisionError::Validation(format!("duplicate problem link {}", problem.link)));
            }
            problem.refresh_difficulty();
        }

        Ok(())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> RevisionStats {
        let mut difficulty_breakdown = BTreeMap::new();
        for problem in &self.problems {
            *difficulty_breakdown.entry(problem.difficulty_level).or_insert(0) += 1;
        }

        RevisionStats {
            total_problems: self.problems.len(),
            due_for_revision: self.problems.iter().filter(|p| p.is_due(now)).count(),
            completed_revisions: self.problems.iter().map(|p| u64::from(p.revision_count)).sum(),
            difficulty_breakdown,
        }
    }
}

/// Aggregate view over the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStats {
    pub total_problems: usize,
    pub due_for_revision: usize,
    /// Sum of every problem's revision count
    pub completed_revisions: u64,
    pub difficulty_breakdown: BTreeMap<DifficultyLevel, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn problem(id: &str, link: &str, mistakes: u32, minutes: f64) -> Problem {
        Problem::new(id.to_string(), id.to_string(), link.to_string(), mistakes, minutes, now())
    }

    #[test]
    fn test_upsert_inserts_new_links() {
        let mut store = RevisionStore::empty(now());
        store.upsert(problem("a", "https://x/a", 0, 1.0));
        store.upsert(problem("b", "https://x/b", 0, 1.0));
        assert_eq!(store.problems.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_same_link_and_keeps_identity() {
        let mut store = RevisionStore::empty(now());
        store.upsert(problem("a", "https://x/a", 0, 1.0));
        store
            .find_mut("a")
            .unwrap()
            .record_revision(now() + Duration::days(1), true);

        let replaced = store.upsert(problem("fresh-id", "https://x/a", 6, 20.0)).clone();

        assert_eq!(store.problems.len(), 1);
        assert_eq!(replaced.id, "a");
        assert_eq!(replaced.mistakes, 6);
        assert_eq!(replaced.revision_history.len(), 1);
        assert_eq!(replaced.last_revised_date, Some(now() + Duration::days(1)));
    }

    #[test]
    fn test_remove() {
        let mut store = RevisionStore::empty(now());
        store.upsert(problem("a", "https://x/a", 0, 1.0));

        assert!(store.remove("missing").is_none());
        assert_eq!(store.remove("a").unwrap().id, "a");
        assert!(store.problems.is_empty());
    }

    #[test]
    fn test_stats() {
        let mut store = RevisionStore::empty(now());
        store.upsert(problem("a", "https://x/a", 0, 1.0));
        store.upsert(problem("b", "https://x/b", 6, 20.0));
        store.upsert(problem("c", "https://x/c", 0, 2.0));
        store.find_mut("a").unwrap().schedule(now(), 3);
        store.find_mut("b").unwrap().revision_count = 2;
        store.find_mut("c").unwrap().revision_count = 1;

        let stats = store.stats(now());

        assert_eq!(stats.total_problems, 3);
        assert_eq!(stats.due_for_revision, 2);
        assert_eq!(stats.completed_revisions, 3);
        assert_eq!(stats.difficulty_breakdown.get(&DifficultyLevel::Easy), Some(&2));
        assert_eq!(stats.difficulty_breakdown.get(&DifficultyLevel::Hard), Some(&1));
        assert_eq!(stats.difficulty_breakdown.get(&DifficultyLevel::Medium), None);
    }

    #[test]
    fn test_stats_serializes_levels_as_keys() {
        let mut store = RevisionStore::empty(now());
        store.upsert(problem("a", "https://x/a", 0, 1.0));

        let value = serde_json::to_value(store.stats(now())).unwrap();
        assert_eq!(value["difficultyBreakdown"]["easy"], 1);
        assert_eq!(value["totalProblems"], 1);
    }

    #[test]
    fn test_normalize_recomputes_difficulty() {
        let mut store = RevisionStore::empty(now());
        let mut p = problem("a", "https://x/a", 6, 20.0);
        p.difficulty_score = 0;
        p.difficulty_level = DifficultyLevel::Easy;
        store.problems.push(p);

        store.normalize().unwrap();

        assert_eq!(store.problems[0].difficulty_score, 6);
        assert_eq!(store.problems[0].difficulty_level, DifficultyLevel::Hard);
    }

    #[test]
    fn test_normalize_rejects_duplicate_links() {
        let mut store = RevisionStore::empty(now());
        store.problems.push(problem("a", "https://x/a", 0, 1.0));
        store.problems.push(problem("b", "https://x/a", 0, 1.0));

        assert!(matches!(store.normalize(), Err(RevisionError::Validation(_))));
    }

    #[test]
    fn test_normalize_rejects_empty_link() {
        let mut store = RevisionStore::empty(now());
        store.problems.push(problem("a", "", 0, 1.0));

        assert!(matches!(store.normalize(), Err(RevisionError::Validation(_))));
    }

    #[test]
    fn test_parse_extension_blob() {
        let json = r#"{
            "problems": [{
                "id": "prob_1700000000000_abc123def",
                "name": "Two Sum",
                "link": "https://x/two-sum",
                "mistakes": 1,
                "timeInMinutes": 4,
                "solvedDate": "2025-03-01T09:00:00.000Z",
                "difficultyLevel": "easy",
                "difficultyScore": 2,
                "revisionCount": 0,
                "nextRevisionDate": "2025-03-04T09:00:00.000Z",
                "lastRevisedDate": null,
                "revisionHistory": []
            }],
            "lastUpdated": "2025-03-01T09:00:01.000Z"
        }"#;

        let store: RevisionStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.problems.len(), 1);
        assert_eq!(store.problems[0].difficulty_level, DifficultyLevel::Easy);
        assert_eq!(store.problems[0].next_revision_date, now() + Duration::days(3));
    }
}
