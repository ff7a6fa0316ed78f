//! Revision scheduler.
//!
//! Owns the problem/revision lifecycle:
//!
//! ```text
//! solved event -> scheduled -> revised (easy)  -> rescheduled further out
//!                           -> revised (hard)  -> rescheduled from the start
//! ```
//!
//! Every mutating operation is a read-modify-write of the whole store. A single
//! in-process mutex serializes them so back-to-back events never overwrite
//! each other's updates.

pub mod calendar;
pub mod interval;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::domain::{Problem, RevisionStats, RevisionStore, SolvedEvent};
use crate::error::{Result, RevisionError};
use crate::id::generate_problem_id;
use crate::storage::Storage;

pub use calendar::{RevisionTask, calendar_link};
pub use interval::IntervalPolicy;

/// Spaced-repetition scheduler over a single persisted store
pub struct RevisionScheduler {
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    policy: IntervalPolicy,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for RevisionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionScheduler")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RevisionScheduler {
    /// Create a scheduler using the system clock and the default policy.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            clock: Box::new(SystemClock),
            policy: IntervalPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_policy(mut self, policy: IntervalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> IntervalPolicy {
        self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| RevisionError::Storage(format!("scheduler lock poisoned: {}", e)))
    }

    fn load(&self) -> Result<RevisionStore> {
        Ok(self
            .storage
            .load()?
            .unwrap_or_else(|| RevisionStore::empty(self.now())))
    }

    fn persist(&self, store: &mut RevisionStore) -> Result<()> {
        store.last_updated = self.now();
        self.storage.save(store)
    }

    //=== Mutations ===

    /// Track a solved problem, or refresh the record for the same link.
    pub fn add_problem(&self, event: &SolvedEvent) -> Result<Problem> {
        event.validate()?;

        let _guard = self.lock()?;
        let now = self.now();
        let mut store = self.load()?;

        let mut problem = Problem::new(
            generate_problem_id(now),
            event.display_name(),
            event.canonical_link(),
            event.mistake_count(),
            event.time_in_minutes,
            event.solved_date.unwrap_or(now),
        );
        let days = self.policy.interval_days(&problem, 0);
        problem.schedule(now, days);
        debug!(
            "Scored {} as {} ({}), first revision in {} days",
            problem.link, problem.difficulty_level, problem.difficulty_score, days
        );

        let problem = store.upsert(problem).clone();
        self.persist(&mut store)?;

        info!(
            "Tracking problem {} ({}), next revision {}",
            problem.name,
            problem.id,
            problem.next_revision_date.to_rfc3339()
        );
        Ok(problem)
    }

    /// Record a finished revision and reschedule the problem.
    ///
    /// An easy revision climbs one step up the interval ladder; a hard one
    /// steps the count back and restarts the interval.
    pub fn complete_revision(&self, problem_id: &str, was_easy: bool) -> Result<Problem> {
        let _guard = self.lock()?;
        let now = self.now();
        let mut store = self.load()?;
        let policy = self.policy;

        let problem = store
            .find_mut(problem_id)
            .ok_or_else(|| RevisionError::NotFound(problem_id.to_string()))?;

        problem.record_revision(now, was_easy);
        let days = if was_easy {
            problem.revision_count = problem.revision_count.saturating_add(1);
            policy.interval_days(problem, problem.revision_count)
        } else {
            problem.revision_count = problem.revision_count.saturating_sub(1);
            policy.lapse_interval_days(problem)
        };
        problem.schedule(now, days);
        let updated = problem.clone();

        self.persist(&mut store)?;

        info!(
            "Revision of {} marked {}, count {}, next in {} days",
            updated.id,
            if was_easy { "easy" } else { "hard" },
            updated.revision_count,
            days
        );
        Ok(updated)
    }

    /// Stop tracking a single problem.
    pub fn remove_problem(&self, problem_id: &str) -> Result<Problem> {
        let _guard = self.lock()?;
        let mut store = self.load()?;

        let removed = store
            .remove(problem_id)
            .ok_or_else(|| RevisionError::NotFound(problem_id.to_string()))?;
        self.persist(&mut store)?;

        info!("Removed problem {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Delete the entire store.
    pub fn clear_all_data(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.storage.clear()?;
        info!("Cleared all revision data");
        Ok(())
    }

    /// Replace the store wholesale with an externally supplied one.
    ///
    /// Returns the number of problems imported.
    pub fn import(&self, mut store: RevisionStore) -> Result<usize> {
        store.normalize()?;

        let _guard = self.lock()?;
        self.persist(&mut store)?;

        info!("Imported {} problems", store.problems.len());
        Ok(store.problems.len())
    }

    //=== Queries ===

    pub fn problem(&self, problem_id: &str) -> Result<Problem> {
        self.load()?
            .find(problem_id)
            .cloned()
            .ok_or_else(|| RevisionError::NotFound(problem_id.to_string()))
    }

    /// Problems due at `now`, earliest first.
    pub fn problems_for_revision(&self, now: DateTime<Utc>) -> Result<Vec<Problem>> {
        let mut due: Vec<Problem> = self.load()?.problems.into_iter().filter(|p| p.is_due(now)).collect();
        due.sort_by_key(|p| p.next_revision_date);
        Ok(due)
    }

    /// Problems coming due after `now` but within `within`, earliest first.
    ///
    /// A window reaching past the last representable date has no upper bound.
    pub fn upcoming_problems(&self, now: DateTime<Utc>, within: Duration) -> Result<Vec<Problem>> {
        let horizon = now.checked_add_signed(within);
        let mut upcoming: Vec<Problem> = self
            .load()?
            .problems
            .into_iter()
            .filter(|p| p.next_revision_date > now && horizon.is_none_or(|h| p.next_revision_date <= h))
            .collect();
        upcoming.sort_by_key(|p| p.next_revision_date);
        Ok(upcoming)
    }

    /// Every tracked problem, most recently solved first.
    pub fn all_problems(&self) -> Result<Vec<Problem>> {
        let mut problems = self.load()?.problems;
        problems.sort_by(|a, b| b.solved_date.cmp(&a.solved_date));
        Ok(problems)
    }

    pub fn revision_stats(&self, now: DateTime<Utc>) -> Result<RevisionStats> {
        Ok(self.load()?.stats(now))
    }

    /// Snapshot of the whole store.
    pub fn export(&self) -> Result<RevisionStore> {
        self.load()
    }

    /// Next `count` revision dates for a problem, assuming every revision goes well.
    pub fn projected_revisions(&self, problem: &Problem, count: usize) -> Vec<DateTime<Utc>> {
        self.policy.projected_revisions(problem, count)
    }

    /// Reminder payload for the problem's next revision.
    pub fn revision_task(&self, problem: &Problem) -> RevisionTask {
        RevisionTask::for_problem(problem)
    }

    /// Reminder payloads for the next `count` revisions of a problem.
    pub fn revision_tasks(&self, problem: &Problem, count: usize) -> Vec<RevisionTask> {
        let mut projected = problem.clone();
        self.projected_revisions(problem, count)
            .into_iter()
            .enumerate()
            .map(|(offset, date)| {
                projected.next_revision_date = date;
                let offset = u32::try_from(offset).unwrap_or(u32::MAX);
                projected.revision_count = problem.revision_count.saturating_add(offset);
                RevisionTask::for_problem(&projected)
            })
            .collect()
    }
}
