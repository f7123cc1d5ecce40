//! Execution health engine: five weekly metrics → 0–100 score → health state.
//!
//! Each metric is rated 1–5 (raw total 5–25), linearly rescaled to 0–100:
//!
//! - **Healthy**: 80 and above
//! - **Stalled**: 40 to 79
//! - **Avoidance**: below 40

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationReport, rating_u8, submitted_rating};

/// Minimum score for [`ExecutionHealth::Healthy`].
pub const HEALTHY_THRESHOLD: u8 = 80;
/// Minimum score for [`ExecutionHealth::Stalled`].
pub const STALLED_THRESHOLD: u8 = 40;
/// A metric at or above this rating counts as a strong signal.
pub const STRONG_METRIC: u8 = 3;

const MAX_RAW_TOTAL: f64 = 25.0;

/// The five weekly execution metrics, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    BuildProgress,
    Exposure,
    RealUsage,
    Signal,
    RevenueAttempt,
}

impl MetricId {
    pub const ALL: [MetricId; 5] = [
        Self::BuildProgress,
        Self::Exposure,
        Self::RealUsage,
        Self::Signal,
        Self::RevenueAttempt,
    ];

    pub fn key(self) -> &'static str {
        self.metric().id
    }

    pub fn metric(self) -> &'static ProgressMetric {
        &PROGRESS_METRICS[self as usize]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One selectable rating for a metric.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricOption {
    pub value: u8,
    pub label: &'static str,
    pub description: &'static str,
}

/// Presentation metadata for one metric.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressMetric {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub options: [MetricOption; 5],
}

const fn opt(value: u8, label: &'static str, description: &'static str) -> MetricOption {
    MetricOption {
        value,
        label,
        description,
    }
}

/// Metric table, indexed by `MetricId as usize`.
pub static PROGRESS_METRICS: [ProgressMetric; 5] = [
    ProgressMetric {
        id: "buildProgress",
        label: "Build Progress",
        icon: "construction",
        options: [
            opt(1, "No Code Written", "Haven't started building"),
            opt(2, "Wireframes Done (Stuck)", "Designed but not coding"),
            opt(3, "Basic MVP Built", "Core functionality works"),
            opt(4, "Prototype Complete", "Feature complete, needs polish"),
            opt(5, "Feature Complete", "Ready for real users"),
        ],
    },
    ProgressMetric {
        id: "exposure",
        label: "Exposure",
        icon: "visibility",
        options: [
            opt(1, "No Public Mention", "Keeping it secret"),
            opt(2, "Posted on LinkedIn", "Shared with network"),
            opt(3, "Shared with Community", "Posted in relevant groups"),
            opt(4, "Marketing Campaign", "Active promotion"),
            opt(5, "Press Coverage", "External media attention"),
        ],
    },
    ProgressMetric {
        id: "realUsage",
        label: "Real Usage",
        icon: "gesture",
        options: [
            opt(1, "Zero Users", "No one using it"),
            opt(2, "Self-Testing Only", "Just you testing"),
            opt(3, "10 Daily Active Users", "Small group of early users"),
            opt(4, "100+ Active Users", "Growing user base"),
            opt(5, "1000+ Active Users", "Significant traction"),
        ],
    },
    ProgressMetric {
        id: "signal",
        label: "Signal",
        icon: "trending_up",
        options: [
            opt(1, "Crickets", "No response at all"),
            opt(2, "Polite Interest", "People are nice but not engaged"),
            opt(3, "Feature Requests", "Users asking for more"),
            opt(4, "Positive Feedback Loop", "Users actively recommending"),
            opt(5, "Organic Growth", "Users recruiting other users"),
        ],
    },
    ProgressMetric {
        id: "revenueAttempt",
        label: "Revenue Attempt",
        icon: "payments",
        options: [
            opt(1, "Waitlist Only", "Not accepting users yet"),
            opt(2, "Free Beta", "Free for early users"),
            opt(3, "Asked for Payment", "Attempted to charge"),
            opt(4, "First Revenue", "Someone paid once"),
            opt(5, "Recurring Revenue", "Multiple paying customers"),
        ],
    },
];

/// A complete, validated week of metric ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub build_progress: u8,
    pub exposure: u8,
    pub real_usage: u8,
    pub signal: u8,
    pub revenue_attempt: u8,
}

impl WeeklyProgress {
    pub fn uniform(rating: u8) -> Self {
        Self::from_fn(|_| rating)
    }

    pub fn from_fn(mut rate: impl FnMut(MetricId) -> u8) -> Self {
        Self {
            build_progress: rate(MetricId::BuildProgress),
            exposure: rate(MetricId::Exposure),
            real_usage: rate(MetricId::RealUsage),
            signal: rate(MetricId::Signal),
            revenue_attempt: rate(MetricId::RevenueAttempt),
        }
    }

    pub fn get(&self, id: MetricId) -> u8 {
        match id {
            MetricId::BuildProgress => self.build_progress,
            MetricId::Exposure => self.exposure,
            MetricId::RealUsage => self.real_usage,
            MetricId::Signal => self.signal,
            MetricId::RevenueAttempt => self.revenue_attempt,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricId, u8)> + '_ {
        MetricId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

/// A partially filled weekly progress form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressDraft {
    #[serde(deserialize_with = "submitted_rating")]
    pub build_progress: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub exposure: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub real_usage: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub signal: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub revenue_attempt: Option<f64>,
}

impl ProgressDraft {
    pub fn get(&self, id: MetricId) -> Option<f64> {
        match id {
            MetricId::BuildProgress => self.build_progress,
            MetricId::Exposure => self.exposure,
            MetricId::RealUsage => self.real_usage,
            MetricId::Signal => self.signal,
            MetricId::RevenueAttempt => self.revenue_attempt,
        }
    }

    pub fn set(&mut self, id: MetricId, value: Option<f64>) {
        let slot = match id {
            MetricId::BuildProgress => &mut self.build_progress,
            MetricId::Exposure => &mut self.exposure,
            MetricId::RealUsage => &mut self.real_usage,
            MetricId::Signal => &mut self.signal,
            MetricId::RevenueAttempt => &mut self.revenue_attempt,
        };
        *slot = value;
    }

    pub fn with(mut self, id: MetricId, value: f64) -> Self {
        self.set(id, Some(value));
        self
    }
}

impl From<&WeeklyProgress> for ProgressDraft {
    fn from(progress: &WeeklyProgress) -> Self {
        let mut draft = Self::default();
        for (id, rating) in progress.iter() {
            draft.set(id, Some(f64::from(rating)));
        }
        draft
    }
}

/// Check that all five metrics are present, whole, and within 1–5.
pub fn validate_progress_metrics(draft: &ProgressDraft) -> ValidationReport {
    let mut report = ValidationReport::default();
    for id in MetricId::ALL {
        report.check_rating(id.key(), draft.get(id));
    }
    report
}

impl TryFrom<&ProgressDraft> for WeeklyProgress {
    type Error = ValidationReport;

    fn try_from(draft: &ProgressDraft) -> Result<Self, Self::Error> {
        let report = validate_progress_metrics(draft);
        if !report.is_valid() {
            return Err(report);
        }
        Ok(Self::from_fn(|id| rating_u8(draft.get(id))))
    }
}

/// Weekly execution verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionHealth {
    Healthy,
    Stalled,
    Avoidance,
}

impl ExecutionHealth {
    /// Longer guidance shown alongside a non-healthy verdict.
    pub fn warning(self) -> Option<&'static str> {
        match self {
            ExecutionHealth::Healthy => None,
            ExecutionHealth::Stalled => Some(
                "Warning: Execution velocity is low. Consider a pivot or abandoning during Sunday review.",
            ),
            ExecutionHealth::Avoidance => Some(
                "STRUCTURAL FAILURE: You are avoiding this idea. Abandoning is a valid strategic choice. Re-evaluate on Sunday.",
            ),
        }
    }
}

impl std::fmt::Display for ExecutionHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExecutionHealth::Healthy => "Healthy",
            ExecutionHealth::Stalled => "Stalled",
            ExecutionHealth::Avoidance => "Avoidance",
        })
    }
}

/// Outcome of evaluating a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionHealthResult {
    pub health: ExecutionHealth,
    pub score: u8,
    pub message: String,
    pub strong_metrics: usize,
}

/// `round(sum / 25 × 100)`.
pub fn calculate_health_score(progress: &WeeklyProgress) -> u8 {
    let total: u32 = progress.iter().map(|(_, v)| u32::from(v)).sum();
    let scaled = (f64::from(total) / MAX_RAW_TOTAL * 100.0).round();
    scaled.clamp(0.0, f64::from(u8::MAX)) as u8
}

pub fn execution_health(score: u8) -> ExecutionHealth {
    if score >= HEALTHY_THRESHOLD {
        ExecutionHealth::Healthy
    } else if score >= STALLED_THRESHOLD {
        ExecutionHealth::Stalled
    } else {
        ExecutionHealth::Avoidance
    }
}

/// Number of metrics rated [`STRONG_METRIC`] or higher.
pub fn count_strong_metrics(progress: &WeeklyProgress) -> usize {
    progress.iter().filter(|(_, v)| *v >= STRONG_METRIC).count()
}

pub fn health_message(health: ExecutionHealth, strong_metrics: usize) -> String {
    match health {
        ExecutionHealth::Healthy => format!("Strong signal on {strong_metrics}/5 metrics"),
        ExecutionHealth::Stalled => "Momentum halted. Check velocity.".to_string(),
        ExecutionHealth::Avoidance => "AVOIDANCE DETECTED".to_string(),
    }
}

/// Evaluate a pre-validated week.
pub fn calculate_execution_health(progress: &WeeklyProgress) -> ExecutionHealthResult {
    let score = calculate_health_score(progress);
    let health = execution_health(score);
    let strong_metrics = count_strong_metrics(progress);
    ExecutionHealthResult {
        health,
        score,
        message: health_message(health, strong_metrics),
        strong_metrics,
    }
}
