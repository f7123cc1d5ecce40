//! Tracker facade: the user-facing flows over the store.
//!
//! A [`Tracker`] acts for one owner. It validates input, runs the scoring,
//! health, and focus engines, and persists the outcome. Time comes from an
//! injected [`Clock`] so week boundaries and lock expiry are testable.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;

use crate::clock::{Clock, SystemClock, Timestamp};
use crate::config::GuardrailConfig;
use crate::error::{GuardrailResult, TrackerError};
use crate::focus::{ActiveIdea, FocusLockValidation, current_week_start, live_focus, validate_can_activate};
use crate::health::{
    ExecutionHealthResult, ProgressDraft, WeeklyProgress, calculate_execution_health,
};
use crate::model::{
    DEFAULT_EXPECTED_LINKS, ExecutionStatus, Idea, IdeaId, ProgressLog, Resource, ResourceKind,
    ScoringRecord, WeeklyExecution, resource_progress, status_label,
};
use crate::scoring::{Decision, ScoringDraft, ScoringResponse, ScoringResult, score_idea};
use crate::store::Store;

/// Message of the log created for an idea that starts from a brainstorm.
pub const BRAINSTORM_LOG_MESSAGE: &str = "AI Brainstorm Session";
/// Title of the brainstorm resource.
pub const BRAINSTORM_RESOURCE_TITLE: &str = "Brainstorm Conversation";

// ---------------------------------------------------------------------------
// Inputs and outcomes
// ---------------------------------------------------------------------------

/// Fields to change on an idea. `None` leaves a field alone; an empty
/// `notes` clears the notes.
#[derive(Debug, Clone, Default)]
pub struct IdeaEdit {
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// Result of scoring an idea.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub idea: Idea,
    pub result: ScoringResult,
}

/// Result of recording a week.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOutcome {
    pub record: WeeklyExecution,
    pub result: ExecutionHealthResult,
}

/// Links attached so far against the idea's target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProgress {
    pub link_count: usize,
    pub expected_links: u32,
    pub percent: f64,
}

/// Everything stored for one idea.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaExport {
    pub idea: Idea,
    pub scoring: Option<ScoringRecord>,
    pub weekly: Vec<WeeklyExecution>,
    pub progress: Vec<ProgressLog>,
}

/// Everything stored for one owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    pub owner: String,
    pub exported_at: Timestamp,
    pub ideas: Vec<IdeaExport>,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Idea tracker for a single owner.
pub struct Tracker<C: Clock = SystemClock> {
    store: Store,
    clock: C,
    owner: String,
    expected_links: u32,
}

impl<C> Tracker<C>
where
    C: Clock,
    <C::Tz as TimeZone>::Offset: Display,
{
    pub fn new(store: Store, clock: C, owner: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            owner: owner.into(),
            expected_links: DEFAULT_EXPECTED_LINKS,
        }
    }

    /// Owner and default resource target taken from `config`.
    pub fn from_config(store: Store, clock: C, config: &GuardrailConfig) -> Self {
        Self::new(store, clock, config.user.clone()).with_expected_links(config.expected_links)
    }

    /// Default resource target for ideas that set none. Zero keeps the
    /// built-in default.
    pub fn with_expected_links(mut self, expected_links: u32) -> Self {
        if expected_links > 0 {
            self.expected_links = expected_links;
        }
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Ideas
    // -----------------------------------------------------------------------

    /// Capture a new idea. A brainstorm link becomes the idea's first
    /// progress log.
    pub fn create_idea(
        &self,
        title: &str,
        notes: Option<&str>,
        brainstorm_link: Option<&str>,
    ) -> GuardrailResult<Idea> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyTitle.into());
        }
        let notes = clean_notes(notes);
        let now = self.clock.timestamp();

        let first_log = brainstorm_link
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(|link| ProgressLog {
                message: BRAINSTORM_LOG_MESSAGE.to_string(),
                logged_at: now,
                resources: vec![Resource::new(
                    ResourceKind::Document,
                    BRAINSTORM_RESOURCE_TITLE,
                    link,
                )],
            });

        let idea = self.store.create_idea(
            |id| Idea::new(id, self.owner.as_str(), title, notes, now),
            first_log.as_ref(),
        )?;
        tracing::info!(id = %idea.id, title = %idea.title, "created idea");
        Ok(idea)
    }

    /// One of this owner's ideas.
    pub fn idea(&self, id: IdeaId) -> GuardrailResult<Idea> {
        match self.store.idea(id)? {
            Some(idea) if idea.owner == self.owner => Ok(idea),
            _ => Err(TrackerError::IdeaNotFound { id: id.get() }.into()),
        }
    }

    /// This owner's ideas, newest first, optionally narrowed by `filter`.
    ///
    /// The filter is case-insensitive. `active` selects live focus holders,
    /// `go`, `modify` and `drop` select by decision, `all` selects everything,
    /// and anything else is matched against the status label, so `"new"`
    /// selects ideas that never got a status.
    pub fn ideas(&self, filter: Option<&str>) -> GuardrailResult<Vec<Idea>> {
        self.find_ideas(filter, None)
    }

    /// [`ideas`](Self::ideas), further limited to titles containing
    /// `search` (case-insensitive).
    pub fn find_ideas(
        &self,
        filter: Option<&str>,
        search: Option<&str>,
    ) -> GuardrailResult<Vec<Idea>> {
        let mut ideas = self.store.ideas_for(&self.owner)?;
        if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
            let filter = filter.to_lowercase().replace(['-', '_'], " ");
            ideas.retain(|idea| matches_filter(idea, &filter));
        }
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let search = search.to_lowercase();
            ideas.retain(|idea| idea.title.to_lowercase().contains(&search));
        }
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(ideas)
    }

    pub fn edit_idea(&self, id: IdeaId, edit: IdeaEdit) -> GuardrailResult<Idea> {
        let title = match edit.title.as_deref().map(str::trim) {
            Some("") => return Err(TrackerError::EmptyTitle.into()),
            other => other.map(str::to_string),
        };
        self.store.update_idea(id, &self.owner, |idea| {
            if let Some(title) = title {
                idea.title = title;
            }
            if let Some(notes) = edit.notes.as_deref() {
                idea.notes = clean_notes(Some(notes));
            }
            Ok(())
        })
    }

    pub fn set_status(&self, id: IdeaId, status: ExecutionStatus) -> GuardrailResult<Idea> {
        let idea = self.store.update_idea(id, &self.owner, |idea| {
            idea.execution_status = Some(status);
            Ok(())
        })?;
        tracing::info!(id = %id, %status, "status changed");
        Ok(idea)
    }

    pub fn park(&self, id: IdeaId) -> GuardrailResult<Idea> {
        self.set_status(id, ExecutionStatus::Parked)
    }

    pub fn abandon(&self, id: IdeaId) -> GuardrailResult<Idea> {
        self.set_status(id, ExecutionStatus::Abandoned)
    }

    /// Set (or with `None` or zero, clear) the idea's resource target.
    pub fn set_expected_links(&self, id: IdeaId, expected: Option<u32>) -> GuardrailResult<Idea> {
        self.store.update_idea(id, &self.owner, |idea| {
            idea.expected_links = expected.filter(|&n| n > 0);
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    /// Validate the draft, score it, and replace the idea's scoring record.
    pub fn score_idea(&self, id: IdeaId, draft: &ScoringDraft) -> GuardrailResult<ScoreOutcome> {
        let response = ScoringResponse::try_from(draft).map_err(|report| {
            TrackerError::InvalidScoring {
                errors: report.messages(),
            }
        })?;
        let result = score_idea(&response);
        let record = ScoringRecord {
            response,
            scored_at: self.clock.timestamp(),
        };
        let idea = self.store.record_score(id, &self.owner, &record, &result)?;
        tracing::info!(
            id = %id,
            total = result.total_score,
            decision = %result.decision,
            "scored idea"
        );
        Ok(ScoreOutcome { idea, result })
    }

    pub fn scoring(&self, id: IdeaId) -> GuardrailResult<Option<ScoringRecord>> {
        self.idea(id)?;
        Ok(self.store.scoring(id)?)
    }

    // -----------------------------------------------------------------------
    // Focus lock
    // -----------------------------------------------------------------------

    /// Whether `id` could be activated right now, without changing anything.
    pub fn check_activation(&self, id: IdeaId) -> GuardrailResult<FocusLockValidation> {
        let now = self.clock.now();
        self.idea(id)?.check_activatable(Timestamp::from(&now))?;
        let ideas = self.store.ideas_for(&self.owner)?;
        Ok(validate_can_activate(&ideas, &now))
    }

    /// Commit a GO idea to a focus slot until next Sunday night.
    pub fn activate(&self, id: IdeaId) -> GuardrailResult<Idea> {
        let now = self.clock.now();
        let idea = self.store.activate_idea(id, &self.owner, &now)?;
        tracing::info!(
            id = %id,
            priority = ?idea.priority,
            expires = ?idea.lock_expires_at.map(|t| t.to_string()),
            "activated focus lock"
        );
        Ok(idea)
    }

    /// Release an idea's focus slot. Works on expired or inactive ideas too.
    pub fn deactivate(&self, id: IdeaId) -> GuardrailResult<Idea> {
        let idea = self.store.update_idea(id, &self.owner, |idea| {
            idea.deactivate();
            Ok(())
        })?;
        tracing::info!(id = %id, "released focus lock");
        Ok(idea)
    }

    /// Clear the active flag on ideas whose lock has run out.
    pub fn release_expired(&self) -> GuardrailResult<Vec<IdeaId>> {
        let released = self
            .store
            .release_expired(&self.owner, self.clock.timestamp())?;
        if !released.is_empty() {
            tracing::info!(count = released.len(), "released expired focus locks");
        }
        Ok(released)
    }

    /// Ideas holding a live lock, primary first.
    pub fn focus_board(&self) -> GuardrailResult<Vec<ActiveIdea>> {
        let ideas = self.store.ideas_for(&self.owner)?;
        Ok(live_focus(&ideas, self.clock.timestamp()))
    }

    // -----------------------------------------------------------------------
    // Weekly execution
    // -----------------------------------------------------------------------

    /// Validate the week's ratings and upsert them for the current week.
    pub fn record_week(&self, id: IdeaId, draft: &ProgressDraft) -> GuardrailResult<WeekOutcome> {
        self.idea(id)?;
        let progress = WeeklyProgress::try_from(draft).map_err(|report| {
            TrackerError::InvalidProgress {
                errors: report.messages(),
            }
        })?;
        let result = calculate_execution_health(&progress);
        let now = self.clock.now();
        let record = WeeklyExecution {
            week_start: Timestamp::from(current_week_start(&now)),
            progress,
            health: result.health,
            updated_at: Timestamp::from(&now),
        };
        self.store.put_weekly(id, &record)?;
        tracing::info!(
            id = %id,
            week = %record.week_start,
            health = %result.health,
            score = result.score,
            "recorded week"
        );
        if let Some(warning) = result.health.warning() {
            tracing::warn!(id = %id, "{warning}");
        }
        Ok(WeekOutcome { record, result })
    }

    /// The snapshot for the week containing now, if recorded.
    pub fn current_week(&self, id: IdeaId) -> GuardrailResult<Option<WeeklyExecution>> {
        self.idea(id)?;
        let week_start = Timestamp::from(current_week_start(&self.clock.now()));
        Ok(self.store.weekly(id, week_start)?)
    }

    /// All recorded weeks, most recent first.
    pub fn weekly_history(&self, id: IdeaId) -> GuardrailResult<Vec<WeeklyExecution>> {
        self.idea(id)?;
        Ok(self.store.weekly_history(id)?)
    }

    /// Ratings to pre-fill the weekly form with: this week's if recorded,
    /// otherwise the most recent week's.
    pub fn prefill_metrics(&self, id: IdeaId) -> GuardrailResult<Option<WeeklyProgress>> {
        if let Some(current) = self.current_week(id)? {
            return Ok(Some(current.progress));
        }
        Ok(self
            .store
            .weekly_history(id)?
            .first()
            .map(|week| week.progress))
    }

    // -----------------------------------------------------------------------
    // Progress logs
    // -----------------------------------------------------------------------

    /// Append a unit of completed work with any attached resources.
    pub fn log_progress(
        &self,
        id: IdeaId,
        message: &str,
        resources: Vec<Resource>,
    ) -> GuardrailResult<ProgressLog> {
        self.idea(id)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(TrackerError::EmptyMessage.into());
        }
        let resources = resources
            .into_iter()
            .map(|r| {
                let (title, url) = (r.title.trim(), r.url.trim());
                if title.is_empty() || url.is_empty() {
                    return Err(TrackerError::IncompleteResource {
                        title: r.title.clone(),
                    });
                }
                Ok(Resource::new(r.kind, title, url))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log = ProgressLog {
            message: message.to_string(),
            logged_at: self.clock.timestamp(),
            resources,
        };
        self.store.append_progress(id, &log)?;
        tracing::info!(id = %id, links = log.link_count(), "logged progress");
        Ok(log)
    }

    /// Progress logs, newest first.
    pub fn progress_logs(&self, id: IdeaId) -> GuardrailResult<Vec<ProgressLog>> {
        self.idea(id)?;
        Ok(self.store.progress_logs(id)?)
    }

    pub fn resource_progress(&self, id: IdeaId) -> GuardrailResult<ResourceProgress> {
        let idea = self.idea(id)?;
        let link_count = self
            .store
            .progress_logs(id)?
            .iter()
            .map(ProgressLog::link_count)
            .sum();
        let expected_links = idea.expected_links_or(self.expected_links);
        Ok(ResourceProgress {
            link_count,
            expected_links,
            percent: resource_progress(link_count, expected_links),
        })
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Snapshot of everything this owner has stored, newest idea first.
    pub fn export(&self) -> GuardrailResult<Export> {
        let ideas = self
            .ideas(None)?
            .into_iter()
            .map(|idea| {
                let id = idea.id;
                Ok(IdeaExport {
                    scoring: self.store.scoring(id)?,
                    weekly: self.store.weekly_history(id)?,
                    progress: self.store.progress_logs(id)?,
                    idea,
                })
            })
            .collect::<GuardrailResult<Vec<_>>>()?;
        Ok(Export {
            owner: self.owner.clone(),
            exported_at: self.clock.timestamp(),
            ideas,
        })
    }
}

/// `filter` is already lowercased with `-` and `_` read as spaces.
fn matches_filter(idea: &Idea, filter: &str) -> bool {
    match filter {
        "all" => true,
        "active" => idea.is_active,
        "go" => idea.decision == Some(Decision::Go),
        "modify" => idea.decision == Some(Decision::Modify),
        "drop" => idea.decision == Some(Decision::Drop),
        _ => status_label(idea.execution_status).to_lowercase() == filter,
    }
}

/// Trim notes; blank notes are no notes.
fn clean_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::GuardrailError;
    use crate::focus::Priority;
    use crate::health::{ExecutionHealth, MetricId};
    use crate::scoring::CriterionId;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .from_local_datetime(&NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap())
            .unwrap()
    }

    fn tracker() -> Tracker<FixedClock<FixedOffset>> {
        Tracker::new(
            Store::in_memory().unwrap(),
            FixedClock::new(at(2025, 10, 22, 9)),
            "guest",
        )
    }

    fn draft(score: f64) -> ScoringDraft {
        CriterionId::ALL
            .into_iter()
            .fold(ScoringDraft::default(), |d, id| d.with(id, score))
    }

    fn go(t: &Tracker<FixedClock<FixedOffset>>, title: &str) -> IdeaId {
        let idea = t.create_idea(title, None, None).unwrap();
        t.score_idea(idea.id, &draft(5.0)).unwrap();
        idea.id
    }

    #[test]
    fn create_trims_and_rejects_blank() {
        let t = tracker();
        let idea = t.create_idea("  Invoice bot ", Some("   "), None).unwrap();
        assert_eq!(idea.title, "Invoice bot");
        assert_eq!(idea.notes, None);
        assert!(!idea.is_active);
        assert!(matches!(
            t.create_idea("   ", None, None),
            Err(GuardrailError::Tracker(TrackerError::EmptyTitle))
        ));
    }

    #[test]
    fn brainstorm_link_becomes_first_log() {
        let t = tracker();
        let idea = t
            .create_idea("Bot", None, Some("https://chat.example/abc"))
            .unwrap();
        let logs = t.progress_logs(idea.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, BRAINSTORM_LOG_MESSAGE);
        assert_eq!(logs[0].resources[0].kind, ResourceKind::Document);
        assert_eq!(logs[0].resources[0].title, BRAINSTORM_RESOURCE_TITLE);
    }

    #[test]
    fn invalid_scoring_lists_every_problem() {
        let t = tracker();
        let idea = t.create_idea("x", None, None).unwrap();
        let partial = ScoringDraft::default()
            .with(CriterionId::PainIntensity, 7.0)
            .with(CriterionId::ManualPain, 3.0);
        match t.score_idea(idea.id, &partial) {
            Err(GuardrailError::Tracker(TrackerError::InvalidScoring { errors })) => {
                assert_eq!(errors.len(), 9);
                assert!(errors.contains(&"painIntensity must be an integer between 1 and 5".to_string()));
                assert!(errors.contains(&"existingParticipants is required".to_string()));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(t.idea(idea.id).unwrap().decision, None);
    }

    #[test]
    fn score_sets_verdict() {
        let t = tracker();
        let idea = t.create_idea("x", None, None).unwrap();
        let outcome = t.score_idea(idea.id, &draft(3.0)).unwrap();
        assert_eq!(outcome.result.total_score, 30);
        assert_eq!(outcome.idea.decision, Some(Decision::Modify));
        assert_eq!(outcome.idea.last_scored_at, Some(t.clock().timestamp()));
    }

    #[test]
    fn activation_fills_two_slots_then_denies() {
        let t = tracker();
        let (a, b, c) = (go(&t, "A"), go(&t, "B"), go(&t, "C"));

        assert_eq!(
            t.check_activation(a).unwrap(),
            FocusLockValidation::Admitted { priority: Priority::Primary }
        );
        let first = t.activate(a).unwrap();
        assert_eq!(first.execution_status, Some(ExecutionStatus::InProgress));
        // Sunday 2025-10-26 23:59:59.999 at +02:00.
        assert_eq!(
            first.lock_expires_at,
            Some(Timestamp::from(at(2025, 10, 27, 0)).offset_millis(-1))
        );
        t.activate(b).unwrap();

        let check = t.check_activation(c).unwrap();
        assert!(!check.can_activate());
        assert_eq!(check.active_ideas().len(), 2);
        assert!(matches!(
            t.activate(c),
            Err(GuardrailError::Tracker(TrackerError::FocusLocked { .. }))
        ));

        let board = t.focus_board().unwrap();
        assert_eq!(board[0].id, a);
        assert_eq!(board[1].id, b);
    }

    #[test]
    fn freed_primary_slot_is_reused() {
        let t = tracker();
        let (a, b, c) = (go(&t, "A"), go(&t, "B"), go(&t, "C"));
        t.activate(a).unwrap();
        t.activate(b).unwrap();
        t.deactivate(a).unwrap();
        assert_eq!(t.activate(c).unwrap().priority, Some(Priority::Primary));
    }

    #[test]
    fn locks_lapse_after_sunday() {
        let t = tracker();
        let (a, b, c) = (go(&t, "A"), go(&t, "B"), go(&t, "C"));
        t.activate(a).unwrap();
        t.activate(b).unwrap();

        t.clock().set(at(2025, 10, 27, 0));
        assert!(t.focus_board().unwrap().is_empty());
        assert_eq!(t.activate(c).unwrap().priority, Some(Priority::Primary));

        let released = t.release_expired().unwrap();
        assert_eq!(released.len(), 2);
        assert!(!t.idea(a).unwrap().is_active);
        assert!(t.idea(c).unwrap().is_active);
    }

    #[test]
    fn record_week_upserts_current_week() {
        let t = tracker();
        let id = t.create_idea("x", None, None).unwrap().id;
        assert_eq!(t.prefill_metrics(id).unwrap(), None);

        let mut week = MetricId::ALL
            .into_iter()
            .fold(ProgressDraft::default(), |d, m| d.with(m, 1.0));
        let outcome = t.record_week(id, &week).unwrap();
        assert_eq!(outcome.result.health, ExecutionHealth::Avoidance);
        assert_eq!(outcome.record.week_start, Timestamp::from(at(2025, 10, 20, 0)));

        week.set(MetricId::BuildProgress, Some(5.0));
        t.clock().advance(Duration::days(2));
        t.record_week(id, &week).unwrap();
        assert_eq!(t.weekly_history(id).unwrap().len(), 1);
        assert_eq!(t.prefill_metrics(id).unwrap().unwrap().get(MetricId::BuildProgress), 5);

        t.clock().advance(Duration::days(7));
        assert!(t.current_week(id).unwrap().is_none());
        assert_eq!(t.prefill_metrics(id).unwrap().unwrap().get(MetricId::BuildProgress), 5);
    }

    #[test]
    fn resource_progress_uses_target() {
        let t = tracker();
        let id = t.create_idea("x", None, None).unwrap().id;
        let link = |n: usize| Resource::new(ResourceKind::Link, format!("L{n}"), format!("https://l/{n}"));
        t.log_progress(id, "built it", vec![link(1), link(2)]).unwrap();

        let progress = t.resource_progress(id).unwrap();
        assert_eq!((progress.link_count, progress.expected_links), (2, 5));
        assert_eq!(progress.percent, 40.0);

        t.set_expected_links(id, Some(2)).unwrap();
        assert_eq!(t.resource_progress(id).unwrap().percent, 100.0);

        assert!(matches!(
            t.log_progress(id, "  ", vec![]),
            Err(GuardrailError::Tracker(TrackerError::EmptyMessage))
        ));
        assert!(matches!(
            t.log_progress(id, "x", vec![Resource::new(ResourceKind::Link, "t", " ")]),
            Err(GuardrailError::Tracker(TrackerError::IncompleteResource { .. }))
        ));
    }

    #[test]
    fn list_filters_by_status_newest_first() {
        let t = tracker();
        let a = t.create_idea("A", None, None).unwrap().id;
        t.clock().advance(Duration::minutes(1));
        let b = t.create_idea("B", None, None).unwrap().id;
        t.park(a).unwrap();

        let all: Vec<_> = t.ideas(None).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(all, vec![b, a]);
        assert_eq!(t.ideas(Some("PARKED")).unwrap()[0].id, a);
        assert_eq!(t.ideas(Some("new")).unwrap()[0].id, b);
        assert_eq!(t.ideas(Some("all")).unwrap().len(), 2);
    }

    #[test]
    fn list_filters_by_decision_and_focus() {
        let t = tracker();
        let strong = go(&t, "Strong");
        let middling = t.create_idea("Middling", None, None).unwrap().id;
        t.score_idea(middling, &draft(3.0)).unwrap();
        let weak = t.create_idea("Weak", None, None).unwrap().id;
        t.score_idea(weak, &draft(1.0)).unwrap();
        let unscored = t.create_idea("Unscored", None, None).unwrap().id;
        t.activate(strong).unwrap();

        let ids = |filter: &str| -> Vec<IdeaId> {
            t.ideas(Some(filter)).unwrap().into_iter().map(|i| i.id).collect()
        };
        assert_eq!(ids("active"), vec![strong]);
        assert_eq!(ids("GO"), vec![strong]);
        assert_eq!(ids("modify"), vec![middling]);
        assert_eq!(ids("Drop"), vec![weak]);
        assert_eq!(ids("new"), vec![unscored, weak, middling]);

        t.deactivate(strong).unwrap();
        assert!(ids("active").is_empty());
    }

    #[test]
    fn search_matches_title_substring() {
        let t = tracker();
        let invoice = t.create_idea("Invoice chaser", None, None).unwrap().id;
        let meal = t.create_idea("Meal planner", Some("invoice-free"), None).unwrap().id;
        t.park(meal).unwrap();

        let found = t.find_ideas(None, Some("  INVOICE ")).unwrap();
        assert_eq!(found.iter().map(|i| i.id).collect::<Vec<_>>(), vec![invoice]);
        assert_eq!(t.find_ideas(None, Some("er")).unwrap().len(), 2);
        assert!(t.find_ideas(Some("parked"), Some("chaser")).unwrap().is_empty());
        assert_eq!(t.find_ideas(Some("parked"), Some("")).unwrap()[0].id, meal);
    }

    #[test]
    fn other_owners_ideas_are_invisible() {
        let store = Store::in_memory().unwrap();
        let alice = Tracker::new(store.clone(), FixedClock::new(at(2025, 10, 22, 9)), "alice");
        let bob = Tracker::new(store, FixedClock::new(at(2025, 10, 22, 9)), "bob");
        let id = alice.create_idea("secret", None, None).unwrap().id;
        assert!(bob.ideas(None).unwrap().is_empty());
        assert!(matches!(
            bob.idea(id),
            Err(GuardrailError::Tracker(TrackerError::IdeaNotFound { .. }))
        ));
    }

    #[test]
    fn export_collects_everything() {
        let t = tracker();
        let id = go(&t, "A");
        t.log_progress(id, "did a thing", vec![]).unwrap();
        let export = t.export().unwrap();
        assert_eq!(export.owner, "guest");
        assert_eq!(export.ideas.len(), 1);
        assert!(export.ideas[0].scoring.is_some());
        assert_eq!(export.ideas[0].progress.len(), 1);
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["ideas"][0]["idea"]["decision"], "GO");
    }
}
