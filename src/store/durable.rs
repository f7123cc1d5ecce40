//! ACID-durable record store backed by redb.
//!
//! All writes go through transactions and reads use MVCC snapshots. redb
//! admits one writer at a time, so anything that reads and then writes inside
//! a single write transaction (id allocation, focus admission) is serialized
//! against every other writer.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};

use crate::clock::Timestamp;
use crate::error::{GuardrailResult, StoreError, TrackerError};
use crate::focus::{FocusLockValidation, next_sunday_expiry, validate_can_activate};
use crate::model::{Idea, IdeaId, ProgressLog, ScoringRecord, WeeklyExecution};
use crate::scoring::ScoringResult;
use crate::store::{StoreResult, decode, encode, redb_err};

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "guardrail.redb";

const IDEAS: TableDefinition<u64, &[u8]> = TableDefinition::new("ideas");
const SCORING: TableDefinition<u64, &[u8]> = TableDefinition::new("scoring");
const WEEKLY: TableDefinition<(u64, i64), &[u8]> = TableDefinition::new("weekly");
const PROGRESS: TableDefinition<(u64, u64), &[u8]> = TableDefinition::new("progress");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const IDEA_COUNTER: &str = "idea_id";
const PROGRESS_COUNTER: &str = "progress_seq";

/// The tracker's database.
///
/// Cloning is cheap and clones share the same database handle.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create a store in the given directory.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join(DATABASE_FILE);
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;
        Self::init(db)
    }

    /// A throwaway store that lives only as long as this handle.
    pub fn in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(redb_err("create in-memory database"))?;
        Self::init(db)
    }

    /// Make sure every table exists so read transactions never miss one.
    fn init(db: Database) -> StoreResult<Self> {
        let txn = db.begin_write().map_err(redb_err("begin_write"))?;
        {
            txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            txn.open_table(SCORING).map_err(redb_err("open_table scoring"))?;
            txn.open_table(WEEKLY).map_err(redb_err("open_table weekly"))?;
            txn.open_table(PROGRESS).map_err(redb_err("open_table progress"))?;
            txn.open_table(META).map_err(redb_err("open_table meta"))?;
        }
        txn.commit().map_err(redb_err("commit"))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn begin_write(&self) -> StoreResult<WriteTransaction> {
        self.db.begin_write().map_err(redb_err("begin_write"))
    }

    // -----------------------------------------------------------------------
    // Ideas
    // -----------------------------------------------------------------------

    /// Allocate an id, build the idea from it, and insert it together with an
    /// optional first progress log.
    pub fn create_idea(
        &self,
        build: impl FnOnce(IdeaId) -> Idea,
        first_log: Option<&ProgressLog>,
    ) -> StoreResult<Idea> {
        let txn = self.begin_write()?;
        let idea = {
            let raw = next_counter(&txn, IDEA_COUNTER)?;
            let id = IdeaId::new(raw).ok_or_else(|| StoreError::CounterExhausted {
                counter: IDEA_COUNTER.to_string(),
            })?;
            let idea = build(id);
            let mut ideas = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            ideas
                .insert(raw, encode(&idea)?.as_slice())
                .map_err(redb_err("insert idea"))?;
            idea
        };
        if let Some(log) = first_log {
            insert_progress(&txn, idea.id, log)?;
        }
        txn.commit().map_err(redb_err("commit"))?;
        Ok(idea)
    }

    /// Read one idea regardless of owner.
    pub fn idea(&self, id: IdeaId) -> StoreResult<Option<Idea>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
        load_idea(&table, id)
    }

    /// Every idea owned by `owner`, oldest first.
    pub fn ideas_for(&self, owner: &str) -> StoreResult<Vec<Idea>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
        let mut ideas = load_all_ideas(&table)?;
        ideas.retain(|idea| idea.owner == owner);
        Ok(ideas)
    }

    /// Apply `change` to one of `owner`'s ideas and write it back atomically.
    ///
    /// Nothing is written if `change` fails.
    pub fn update_idea(
        &self,
        id: IdeaId,
        owner: &str,
        change: impl FnOnce(&mut Idea) -> Result<(), TrackerError>,
    ) -> GuardrailResult<Idea> {
        let txn = self.begin_write()?;
        let idea = {
            let mut ideas = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            let mut idea = owned_idea(&ideas, id, owner)?;
            change(&mut idea)?;
            ideas
                .insert(id.get(), encode(&idea)?.as_slice())
                .map_err(redb_err("insert idea"))?;
            idea
        };
        txn.commit().map_err(redb_err("commit"))?;
        Ok(idea)
    }

    /// Replace the scoring record and stamp the verdict on the idea in one
    /// transaction.
    pub fn record_score(
        &self,
        id: IdeaId,
        owner: &str,
        record: &ScoringRecord,
        result: &ScoringResult,
    ) -> GuardrailResult<Idea> {
        let txn = self.begin_write()?;
        let idea = {
            let mut ideas = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            let mut idea = owned_idea(&ideas, id, owner)?;
            idea.apply_score(result.total_score, result.decision, record.scored_at);
            ideas
                .insert(id.get(), encode(&idea)?.as_slice())
                .map_err(redb_err("insert idea"))?;

            let mut scoring = txn
                .open_table(SCORING)
                .map_err(redb_err("open_table scoring"))?;
            scoring
                .insert(id.get(), encode(record)?.as_slice())
                .map_err(redb_err("insert scoring"))?;
            idea
        };
        txn.commit().map_err(redb_err("commit"))?;
        Ok(idea)
    }

    /// The current rubric answers for an idea, if it was ever scored.
    pub fn scoring(&self, id: IdeaId) -> StoreResult<Option<ScoringRecord>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn
            .open_table(SCORING)
            .map_err(redb_err("open_table scoring"))?;
        let guard = table.get(id.get()).map_err(redb_err("get scoring"))?;
        guard.map(|g| decode(g.value())).transpose()
    }

    // -----------------------------------------------------------------------
    // Focus locks
    // -----------------------------------------------------------------------

    /// Commit one of `owner`'s ideas to a focus slot.
    ///
    /// Admission is decided from the owner's ideas as read inside the same
    /// write transaction that stores the new lock, so concurrent callers
    /// cannot both take the last slot.
    pub fn activate_idea<Tz>(
        &self,
        id: IdeaId,
        owner: &str,
        now: &DateTime<Tz>,
    ) -> GuardrailResult<Idea>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let stamp = Timestamp::from(now);
        let txn = self.begin_write()?;
        let idea = {
            let mut ideas = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            let mut idea = owned_idea(&ideas, id, owner)?;
            idea.check_activatable(stamp)?;

            let mut owned = load_all_ideas(&ideas)?;
            owned.retain(|other| other.owner == owner);
            let priority = match validate_can_activate(&owned, now) {
                FocusLockValidation::Admitted { priority } => priority,
                FocusLockValidation::Denied { reason, .. } => {
                    return Err(TrackerError::FocusLocked { reason }.into());
                }
            };

            let expiry = Timestamp::from(next_sunday_expiry(now));
            idea.activate(priority, stamp, expiry)?;
            ideas
                .insert(id.get(), encode(&idea)?.as_slice())
                .map_err(redb_err("insert idea"))?;
            idea
        };
        txn.commit().map_err(redb_err("commit"))?;
        Ok(idea)
    }

    /// Clear the active flag on `owner`'s ideas whose lock ran out at `now`.
    pub fn release_expired(&self, owner: &str, now: Timestamp) -> StoreResult<Vec<IdeaId>> {
        let txn = self.begin_write()?;
        let released = {
            let mut ideas = txn.open_table(IDEAS).map_err(redb_err("open_table ideas"))?;
            let mut released = Vec::new();
            for mut idea in load_all_ideas(&ideas)? {
                if idea.owner != owner || !idea.lock_expired(now) {
                    continue;
                }
                idea.is_active = false;
                ideas
                    .insert(idea.id.get(), encode(&idea)?.as_slice())
                    .map_err(redb_err("insert idea"))?;
                released.push(idea.id);
            }
            released
        };
        txn.commit().map_err(redb_err("commit"))?;
        Ok(released)
    }

    // -----------------------------------------------------------------------
    // Weekly execution
    // -----------------------------------------------------------------------

    /// Insert or replace the snapshot for `record.week_start`.
    pub fn put_weekly(&self, id: IdeaId, record: &WeeklyExecution) -> StoreResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(WEEKLY).map_err(redb_err("open_table weekly"))?;
            table
                .insert((id.get(), record.week_start.as_millis()), encode(record)?.as_slice())
                .map_err(redb_err("insert weekly"))?;
        }
        txn.commit().map_err(redb_err("commit"))?;
        Ok(())
    }

    /// The snapshot for one week, if recorded.
    pub fn weekly(&self, id: IdeaId, week_start: Timestamp) -> StoreResult<Option<WeeklyExecution>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn.open_table(WEEKLY).map_err(redb_err("open_table weekly"))?;
        let guard = table
            .get((id.get(), week_start.as_millis()))
            .map_err(redb_err("get weekly"))?;
        guard.map(|g| decode(g.value())).transpose()
    }

    /// All snapshots for an idea, most recent week first.
    pub fn weekly_history(&self, id: IdeaId) -> StoreResult<Vec<WeeklyExecution>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn.open_table(WEEKLY).map_err(redb_err("open_table weekly"))?;
        let raw = id.get();
        table
            .range((raw, i64::MIN)..=(raw, i64::MAX))
            .map_err(redb_err("range weekly"))?
            .rev()
            .map(|entry| {
                let (_, value) = entry.map_err(redb_err("read weekly"))?;
                decode(value.value())
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Progress logs
    // -----------------------------------------------------------------------

    /// Append a progress log; returns its sequence number.
    pub fn append_progress(&self, id: IdeaId, log: &ProgressLog) -> StoreResult<u64> {
        let txn = self.begin_write()?;
        let seq = insert_progress(&txn, id, log)?;
        txn.commit().map_err(redb_err("commit"))?;
        Ok(seq)
    }

    /// All progress logs for an idea, newest first.
    pub fn progress_logs(&self, id: IdeaId) -> StoreResult<Vec<ProgressLog>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn
            .open_table(PROGRESS)
            .map_err(redb_err("open_table progress"))?;
        let raw = id.get();
        table
            .range((raw, u64::MIN)..=(raw, u64::MAX))
            .map_err(redb_err("range progress"))?
            .rev()
            .map(|entry| {
                let (_, value) = entry.map_err(redb_err("read progress"))?;
                decode(value.value())
            })
            .collect()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish()
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Bump and return a named counter. First value is 1.
fn next_counter(txn: &WriteTransaction, name: &'static str) -> StoreResult<u64> {
    let mut meta = txn.open_table(META).map_err(redb_err("open_table meta"))?;
    let current = meta
        .get(name)
        .map_err(redb_err("get counter"))?
        .map(|guard| guard.value())
        .unwrap_or(0);
    let next = current
        .checked_add(1)
        .ok_or_else(|| StoreError::CounterExhausted {
            counter: name.to_string(),
        })?;
    meta.insert(name, next).map_err(redb_err("insert counter"))?;
    Ok(next)
}

fn insert_progress(txn: &WriteTransaction, id: IdeaId, log: &ProgressLog) -> StoreResult<u64> {
    let seq = next_counter(txn, PROGRESS_COUNTER)?;
    let mut table = txn
        .open_table(PROGRESS)
        .map_err(redb_err("open_table progress"))?;
    table
        .insert((id.get(), seq), encode(log)?.as_slice())
        .map_err(redb_err("insert progress"))?;
    Ok(seq)
}

fn load_idea(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: IdeaId,
) -> StoreResult<Option<Idea>> {
    let guard = table.get(id.get()).map_err(redb_err("get idea"))?;
    guard.map(|g| decode(g.value())).transpose()
}

fn load_all_ideas(table: &impl ReadableTable<u64, &'static [u8]>) -> StoreResult<Vec<Idea>> {
    table
        .iter()
        .map_err(redb_err("iter ideas"))?
        .map(|entry| {
            let (_, value) = entry.map_err(redb_err("read idea"))?;
            decode(value.value())
        })
        .collect()
}

/// Load an idea and check it belongs to `owner`; anyone else's idea is
/// reported as missing.
fn owned_idea(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: IdeaId,
    owner: &str,
) -> GuardrailResult<Idea> {
    match load_idea(table, id)? {
        Some(idea) if idea.owner == owner => Ok(idea),
        _ => Err(TrackerError::IdeaNotFound { id: id.get() }.into()),
    }
}
