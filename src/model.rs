//! Persisted records: ideas and everything attached to them.
//!
//! An [`Idea`] belongs to one owner and is never hard-deleted; dropping or
//! parking an idea only changes its [`ExecutionStatus`]. Attached records:
//!
//! - [`ScoringRecord`]: at most one per idea, replaced on re-score
//! - [`WeeklyExecution`]: at most one per idea per Monday-anchored week
//! - [`ProgressLog`]: append-only, each carrying ordered [`Resource`]s

use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::TrackerError;
use crate::focus::{Priority, is_lock_active};
use crate::health::{ExecutionHealth, WeeklyProgress};
use crate::scoring::{Decision, ScoringResponse};

/// Resource target used when an idea sets none.
pub const DEFAULT_EXPECTED_LINKS: u32 = 5;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Unique identifier for an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(NonZeroU64);

impl IdeaId {
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(IdeaId)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for IdeaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Execution status
// ---------------------------------------------------------------------------

/// Where an idea stands in its execution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Launched,
    Validated,
    Parked,
    Abandoned,
}

impl ExecutionStatus {
    pub const ALL: [ExecutionStatus; 6] = [
        Self::Planned,
        Self::InProgress,
        Self::Launched,
        Self::Validated,
        Self::Parked,
        Self::Abandoned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Launched => "Launched",
            Self::Validated => "Validated",
            Self::Parked => "Parked",
            Self::Abandoned => "Abandoned",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExecutionStatus {
    type Err = TrackerError;

    /// Case-insensitive; `in-progress` and `in_progress` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == normalized)
            .ok_or_else(|| TrackerError::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// Label shown for an optional status; ideas that never got one are "New".
pub fn status_label(status: Option<ExecutionStatus>) -> &'static str {
    status.map_or("New", ExecutionStatus::label)
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

/// A business idea and its current verdict and focus state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    pub owner: String,
    pub title: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub last_scored_at: Option<Timestamp>,
    /// Rubric total, 10–50 once scored.
    pub total_score: Option<u32>,
    pub decision: Option<Decision>,
    pub execution_status: Option<ExecutionStatus>,
    pub is_active: bool,
    pub priority: Option<Priority>,
    pub activated_at: Option<Timestamp>,
    pub lock_expires_at: Option<Timestamp>,
    pub expected_links: Option<u32>,
}

impl Idea {
    /// A fresh, unscored, inactive idea.
    pub fn new(
        id: IdeaId,
        owner: impl Into<String>,
        title: impl Into<String>,
        notes: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner: owner.into(),
            title: title.into(),
            notes,
            created_at,
            last_scored_at: None,
            total_score: None,
            decision: None,
            execution_status: None,
            is_active: false,
            priority: None,
            activated_at: None,
            lock_expires_at: None,
            expected_links: None,
        }
    }

    /// Whether this idea occupies a focus slot at `now`.
    pub fn holds_lock(&self, now: Timestamp) -> bool {
        self.is_active
            && self
                .lock_expires_at
                .is_some_and(|expiry| is_lock_active(expiry, now))
    }

    /// Whether the stored active flag outlived its lock.
    pub fn lock_expired(&self, now: Timestamp) -> bool {
        self.is_active && !self.holds_lock(now)
    }

    /// Record a new verdict.
    pub fn apply_score(&mut self, total_score: u32, decision: Decision, scored_at: Timestamp) {
        self.total_score = Some(total_score);
        self.decision = Some(decision);
        self.last_scored_at = Some(scored_at);
    }

    /// Inactive → Active. Only GO ideas may commit, and an idea cannot take a
    /// second slot while its own lock is live. Capacity is checked by the
    /// caller through [`validate_can_activate`](crate::focus::validate_can_activate).
    pub fn activate(
        &mut self,
        priority: Priority,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<(), TrackerError> {
        self.check_activatable(now)?;
        self.is_active = true;
        self.priority = Some(priority);
        self.activated_at = Some(now);
        self.lock_expires_at = Some(expires_at);
        self.execution_status = Some(ExecutionStatus::InProgress);
        Ok(())
    }

    /// Refusals that depend only on this idea, checked before capacity.
    pub fn check_activatable(&self, now: Timestamp) -> Result<(), TrackerError> {
        if self.decision != Some(Decision::Go) {
            return Err(TrackerError::NotGo {
                id: self.id.get(),
                decision: self
                    .decision
                    .map_or_else(|| "unscored".to_string(), |d| d.to_string()),
            });
        }
        if self.holds_lock(now) {
            return Err(TrackerError::AlreadyFocused { id: self.id.get() });
        }
        Ok(())
    }

    /// Active → Inactive. Unconditional: no lock check on the way out.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.priority = None;
        self.lock_expires_at = None;
    }

    /// Resource target, falling back to `default` when unset or zero.
    pub fn expected_links_or(&self, default: u32) -> u32 {
        self.expected_links.filter(|&n| n > 0).unwrap_or(default)
    }
}

/// Percentage of the resource target reached, capped at 100.
pub fn resource_progress(link_count: usize, expected_links: u32) -> f64 {
    if expected_links == 0 {
        return 100.0;
    }
    (link_count as f64 / f64::from(expected_links) * 100.0).min(100.0)
}

// ---------------------------------------------------------------------------
// Attached records
// ---------------------------------------------------------------------------

/// The current rubric answers for an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRecord {
    pub response: ScoringResponse,
    pub scored_at: Timestamp,
}

/// One week's execution snapshot for an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyExecution {
    /// Monday 00:00 local time of the week this snapshot covers.
    pub week_start: Timestamp,
    pub progress: WeeklyProgress,
    pub health: ExecutionHealth,
    pub updated_at: Timestamp,
}

/// Kind of an attached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "doc")]
    Document,
    #[serde(rename = "image")]
    Image,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ResourceKind::Link => "link",
            ResourceKind::Document => "doc",
            ResourceKind::Image => "image",
        })
    }
}

impl FromStr for ResourceKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "link" | "url" => Ok(ResourceKind::Link),
            "doc" | "document" => Ok(ResourceKind::Document),
            "image" | "img" => Ok(ResourceKind::Image),
            _ => Err(TrackerError::UnknownResourceType {
                value: s.to_string(),
            }),
        }
    }
}

/// A link, document, or image attached to a progress log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub url: String,
}

impl Resource {
    pub fn new(kind: ResourceKind, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A unit of completed work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub message: String,
    pub logged_at: Timestamp,
    pub resources: Vec<Resource>,
}

impl ProgressLog {
    pub fn link_count(&self) -> usize {
        self.resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_idea() -> Idea {
        let mut idea = Idea::new(IdeaId::new(7).unwrap(), "guest", "Thing", None, Timestamp::from_millis(0));
        idea.apply_score(44, Decision::Go, Timestamp::from_millis(10));
        idea
    }

    #[test]
    fn idea_id_rejects_zero() {
        assert!(IdeaId::new(0).is_none());
        assert_eq!(IdeaId::new(3).unwrap().to_string(), "#3");
    }

    #[test]
    fn status_parsing_is_lenient() {
        assert_eq!("in progress".parse::<ExecutionStatus>().unwrap(), ExecutionStatus::InProgress);
        assert_eq!("In-Progress".parse::<ExecutionStatus>().unwrap(), ExecutionStatus::InProgress);
        assert_eq!("PARKED".parse::<ExecutionStatus>().unwrap(), ExecutionStatus::Parked);
        assert!("shipped".parse::<ExecutionStatus>().is_err());
        assert_eq!(status_label(None), "New");
    }

    #[test]
    fn status_serializes_with_space() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }

    #[test]
    fn activate_requires_go() {
        let mut idea = go_idea();
        idea.decision = Some(Decision::Modify);
        let err = idea
            .activate(Priority::Primary, Timestamp::from_millis(20), Timestamp::from_millis(1_000))
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotGo { id: 7, .. }));

        idea.decision = None;
        let err = idea
            .activate(Priority::Primary, Timestamp::from_millis(20), Timestamp::from_millis(1_000))
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotGo { ref decision, .. } if decision == "unscored"));
    }

    #[test]
    fn activate_then_deactivate() {
        let mut idea = go_idea();
        let now = Timestamp::from_millis(20);
        let expiry = Timestamp::from_millis(1_000);
        idea.activate(Priority::Secondary, now, expiry).unwrap();
        assert!(idea.holds_lock(now));
        assert_eq!(idea.priority, Some(Priority::Secondary));
        assert_eq!(idea.activated_at, Some(now));
        assert_eq!(idea.execution_status, Some(ExecutionStatus::InProgress));

        let again = idea.activate(Priority::Primary, now, expiry);
        assert!(matches!(again, Err(TrackerError::AlreadyFocused { .. })));

        idea.deactivate();
        assert!(!idea.is_active);
        assert_eq!(idea.priority, None);
        assert_eq!(idea.lock_expires_at, None);
        assert_eq!(idea.activated_at, Some(now));
    }

    #[test]
    fn expired_lock_allows_reactivation() {
        let mut idea = go_idea();
        idea.activate(Priority::Primary, Timestamp::from_millis(20), Timestamp::from_millis(100))
            .unwrap();
        let later = Timestamp::from_millis(100);
        assert!(!idea.holds_lock(later));
        assert!(idea.lock_expired(later));
        idea.activate(Priority::Secondary, later, Timestamp::from_millis(500)).unwrap();
        assert_eq!(idea.priority, Some(Priority::Secondary));
    }

    #[test]
    fn resource_progress_caps_at_100() {
        assert_eq!(resource_progress(0, 5), 0.0);
        assert_eq!(resource_progress(2, 5), 40.0);
        assert_eq!(resource_progress(9, 5), 100.0);
        assert_eq!(resource_progress(1, 0), 100.0);
    }

    #[test]
    fn resource_json_shape() {
        let r = Resource::new(ResourceKind::Document, "Brief", "https://example.com/brief");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "doc");
        assert_eq!(json["title"], "Brief");
        assert_eq!("Document".parse::<ResourceKind>().unwrap(), ResourceKind::Document);
    }
}
