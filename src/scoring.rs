//! Scoring engine: ten-criterion rubric → total score → GO/MODIFY/DROP.
//!
//! Each criterion is rated 1–5, so a validated response totals 10–50.
//! Decision thresholds are fixed:
//!
//! - **GO**: 40 and above
//! - **MODIFY**: 30 to 39
//! - **DROP**: below 30
//!
//! Validation and scoring are separate steps. [`score_idea`] trusts its input;
//! run [`validate_scoring_responses`] (or convert through
//! `ScoringResponse::try_from(&draft)`) first.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationReport, rating_u8, submitted_rating};

/// Minimum total for a GO decision.
pub const GO_THRESHOLD: u32 = 40;
/// Minimum total for a MODIFY decision.
pub const MODIFY_THRESHOLD: u32 = 30;

// ---------------------------------------------------------------------------
// Rubric
// ---------------------------------------------------------------------------

/// The ten rubric criteria, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriterionId {
    ExistingParticipants,
    PainIntensity,
    MonetizationGap,
    ManualPain,
    AutomationPotential,
    OneWayPayment,
    IncentiveAlignment,
    OperationalSimplicity,
    SmallTeamFit,
    TimeToValue,
}

impl CriterionId {
    /// All criteria in canonical order.
    pub const ALL: [CriterionId; 10] = [
        Self::ExistingParticipants,
        Self::PainIntensity,
        Self::MonetizationGap,
        Self::ManualPain,
        Self::AutomationPotential,
        Self::OneWayPayment,
        Self::IncentiveAlignment,
        Self::OperationalSimplicity,
        Self::SmallTeamFit,
        Self::TimeToValue,
    ];

    /// Stable field key (`existingParticipants`, `painIntensity`, ...).
    pub fn key(self) -> &'static str {
        self.criterion().id
    }

    /// Rubric metadata for this criterion.
    pub fn criterion(self) -> &'static Criterion {
        &SCORING_CRITERIA[self as usize]
    }

    /// Look up a criterion by its field key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for CriterionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Presentation metadata for one criterion.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub why_it_matters: &'static str,
    pub icon: &'static str,
    pub low_label: &'static str,
    pub high_label: &'static str,
    /// Guidance for scores 1 through 5 (index 0 is score 1).
    pub helper_text: [&'static str; 5],
}

impl Criterion {
    /// Guidance text for a 1–5 score, if in range.
    pub fn helper_for(&self, score: u8) -> Option<&'static str> {
        score
            .checked_sub(1)
            .and_then(|i| self.helper_text.get(usize::from(i)))
            .copied()
    }
}

/// The rubric, indexed by `CriterionId as usize`.
pub static SCORING_CRITERIA: [Criterion; 10] = [
    Criterion {
        id: "existingParticipants",
        name: "Existing Participants",
        description: "Are people already doing this activity without your product?",
        why_it_matters: "If the behavior doesn't exist yet, you're trying to create demand instead of capturing it. Creating demand is much harder and riskier.",
        icon: "Users",
        low_label: "None",
        high_label: "Very Active",
        helper_text: [
            "No one is doing this today. I'd have to teach them why they need it.",
            "A few early adopters might do this, but it's rare.",
            "Some people do this, but it's not a daily habit.",
            "Many people do this regularly using other tools.",
            "People are visibly trying to do this right now (e.g., spreadsheets, manual hacks).",
        ],
    },
    Criterion {
        id: "painIntensity",
        name: "Clear Pain",
        description: "Is there a genuine, felt pain or frustration with the current way?",
        why_it_matters: "People don't change behavior for marginal improvements. They need to feel real friction or dissatisfaction to adopt something new.",
        icon: "AlertCircle",
        low_label: "Mild",
        high_label: "Severe",
        helper_text: [
            "It's a 'nice to have'. No one is complaining.",
            "It's annoying, but people live with it.",
            "It's frustrating when it happens, but manageable.",
            "It's a persistent headache that actively hurts their workflow.",
            "It's hair-on-fire urgent. They are actively looking for a fix.",
        ],
    },
    Criterion {
        id: "monetizationGap",
        name: "Monetization Gap",
        description: "Are users currently paying for a solution, or would they clearly benefit from one?",
        why_it_matters: "If users aren't spending money on this problem today, it may not be valuable enough to pay for, or they may expect it for free.",
        icon: "DollarSign",
        low_label: "No Spend",
        high_label: "High Spend",
        helper_text: [
            "Users expect this to be free (consumer social, utilities).",
            "Budgets are tight or non-existent for this category.",
            "There is some willingness to pay, but price sensitivity is high.",
            "They pay for existing solutions or hire people to do it.",
            "They are already spending significant money to solve this (software or services).",
        ],
    },
    Criterion {
        id: "manualPain",
        name: "Manual Pain",
        description: "Are users doing something repetitive, time-consuming, or annoying manually?",
        why_it_matters: "Repetitive tasks create clear before/after value. If the workflow is already smooth, your product may not feel necessary.",
        icon: "Repeat",
        low_label: "Automated",
        high_label: "Very Manual",
        helper_text: [
            "It's already automated or very quick.",
            "It takes a few clicks, but isn't burdensome.",
            "It requires some manual data entry or copy-pasting.",
            "It's a tedious chore that takes up hours per week.",
            "It's a soul-crushing manual process (e.g., hours of spreadsheet formatting).",
        ],
    },
    Criterion {
        id: "automationPotential",
        name: "Automation Opportunity",
        description: "Can software meaningfully automate, simplify, or eliminate steps?",
        why_it_matters: "If the solution still requires significant manual work, users won't see it as a real improvement. True automation creates leverage.",
        icon: "Zap",
        low_label: "Low",
        high_label: "High",
        helper_text: [
            "Very hard to automate (requires human judgement/AI-complete).",
            "Can automate some parts, but human oversight is heavy.",
            "Can simplify the workflow, but still requires input.",
            "Can automate the bulk of the work with 80% accuracy.",
            "Software can completely eliminate the manual effort (10x faster).",
        ],
    },
    Criterion {
        id: "oneWayPayment",
        name: "One-Way Payment Flow",
        description: "Does money only flow from customer → product (not product → customer)?",
        why_it_matters: "Two-way payments introduce escrow, compliance, and trust issues. One-way flows are simpler, safer, and easier to scale.",
        icon: "ArrowRight",
        low_label: "Two-Way",
        high_label: "One-Way",
        helper_text: [
            "Complex marketplace (Escrow, payouts, compliance risk).",
            "Requires managing user funds or split payments.",
            "Standard marketplace but low compliance burden.",
            "Mostly simple, maybe some affiliate payouts.",
            "Pure simple payment: Customer pays, we deliver value (SaaS/E-commerce).",
        ],
    },
    Criterion {
        id: "incentiveAlignment",
        name: "Incentive Alignment",
        description: "Do both the user and the platform benefit when the user succeeds?",
        why_it_matters: "If your revenue depends on user failure or creates misaligned incentives, trust breaks down and retention suffers.",
        icon: "Target",
        low_label: "Misaligned",
        high_label: "Aligned",
        helper_text: [
            "Misaligned (e.g., selling user data, ads that hurt UX).",
            "Neutral or unclear alignment.",
            "Aligned, but with some tradeoffs.",
            "Mostly aligned (we grow when they grow).",
            "Perfectly aligned: We only make money/succeed when the user wins.",
        ],
    },
    Criterion {
        id: "operationalSimplicity",
        name: "Operational Simplicity",
        description: "Can this run without human intervention, moderation, or manual review?",
        why_it_matters: "High-touch operations don't scale. If you need humans in the loop for every transaction, costs grow linearly with users.",
        icon: "Settings",
        low_label: "Complex",
        high_label: "Simple",
        helper_text: [
            "Heavy operations (manual onboarding, support, moderation).",
            "Requires regular manual intervention.",
            "Some logical scaling friction.",
            "Mostly self-serve with minimal support.",
            "Zero-touch: Fully self-serve, no manual ops required per user.",
        ],
    },
    Criterion {
        id: "smallTeamFit",
        name: "Small Team Fit",
        description: "Can 2-3 people realistically build and run this to profitability?",
        why_it_matters: "Large teams introduce coordination overhead, burn rate, and funding dependency. Small-team products are more resilient.",
        icon: "Users2",
        low_label: "Large Team",
        high_label: "Small Team",
        helper_text: [
            "Needs a village (Sales, Support, Ops, large Eng team).",
            "Needs a medium sized team to start.",
            "Doable for a small team, but stretching it.",
            "Perfect for a small team of 2-4.",
            "One or two developers can build and scale this.",
        ],
    },
    Criterion {
        id: "timeToValue",
        name: "Time to Value",
        description: "Can users experience meaningful value in their first session?",
        why_it_matters: "Long onboarding or delayed value creates drop-off. Users should feel the benefit immediately, or they'll abandon the product.",
        icon: "Clock",
        low_label: "Slow",
        high_label: "Immediate",
        helper_text: [
            "Months (Requires integration, enterprise sales).",
            "Weeks (Requires data population or learning curve).",
            "Days (Needs some setup).",
            "Hours (First session is promising).",
            "Minutes (Instant 'Aha!' moment during onboarding).",
        ],
    },
];

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A complete, validated set of ten ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResponse {
    pub existing_participants: u8,
    pub pain_intensity: u8,
    pub monetization_gap: u8,
    pub manual_pain: u8,
    pub automation_potential: u8,
    pub one_way_payment: u8,
    pub incentive_alignment: u8,
    pub operational_simplicity: u8,
    pub small_team_fit: u8,
    pub time_to_value: u8,
}

impl ScoringResponse {
    /// Every criterion rated `score`.
    pub fn uniform(score: u8) -> Self {
        Self::from_fn(|_| score)
    }

    /// Build a response by rating each criterion in turn.
    pub fn from_fn(mut rate: impl FnMut(CriterionId) -> u8) -> Self {
        Self {
            existing_participants: rate(CriterionId::ExistingParticipants),
            pain_intensity: rate(CriterionId::PainIntensity),
            monetization_gap: rate(CriterionId::MonetizationGap),
            manual_pain: rate(CriterionId::ManualPain),
            automation_potential: rate(CriterionId::AutomationPotential),
            one_way_payment: rate(CriterionId::OneWayPayment),
            incentive_alignment: rate(CriterionId::IncentiveAlignment),
            operational_simplicity: rate(CriterionId::OperationalSimplicity),
            small_team_fit: rate(CriterionId::SmallTeamFit),
            time_to_value: rate(CriterionId::TimeToValue),
        }
    }

    pub fn get(&self, id: CriterionId) -> u8 {
        match id {
            CriterionId::ExistingParticipants => self.existing_participants,
            CriterionId::PainIntensity => self.pain_intensity,
            CriterionId::MonetizationGap => self.monetization_gap,
            CriterionId::ManualPain => self.manual_pain,
            CriterionId::AutomationPotential => self.automation_potential,
            CriterionId::OneWayPayment => self.one_way_payment,
            CriterionId::IncentiveAlignment => self.incentive_alignment,
            CriterionId::OperationalSimplicity => self.operational_simplicity,
            CriterionId::SmallTeamFit => self.small_team_fit,
            CriterionId::TimeToValue => self.time_to_value,
        }
    }

    /// `(criterion, rating)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CriterionId, u8)> + '_ {
        CriterionId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

/// A partially filled scoring form, as submitted.
///
/// Ratings are `f64` so that fractional submissions can be rejected rather than
/// silently truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringDraft {
    #[serde(deserialize_with = "submitted_rating")]
    pub existing_participants: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub pain_intensity: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub monetization_gap: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub manual_pain: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub automation_potential: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub one_way_payment: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub incentive_alignment: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub operational_simplicity: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub small_team_fit: Option<f64>,
    #[serde(deserialize_with = "submitted_rating")]
    pub time_to_value: Option<f64>,
}

impl ScoringDraft {
    fn slot(&mut self, id: CriterionId) -> &mut Option<f64> {
        match id {
            CriterionId::ExistingParticipants => &mut self.existing_participants,
            CriterionId::PainIntensity => &mut self.pain_intensity,
            CriterionId::MonetizationGap => &mut self.monetization_gap,
            CriterionId::ManualPain => &mut self.manual_pain,
            CriterionId::AutomationPotential => &mut self.automation_potential,
            CriterionId::OneWayPayment => &mut self.one_way_payment,
            CriterionId::IncentiveAlignment => &mut self.incentive_alignment,
            CriterionId::OperationalSimplicity => &mut self.operational_simplicity,
            CriterionId::SmallTeamFit => &mut self.small_team_fit,
            CriterionId::TimeToValue => &mut self.time_to_value,
        }
    }

    pub fn get(&self, id: CriterionId) -> Option<f64> {
        match id {
            CriterionId::ExistingParticipants => self.existing_participants,
            CriterionId::PainIntensity => self.pain_intensity,
            CriterionId::MonetizationGap => self.monetization_gap,
            CriterionId::ManualPain => self.manual_pain,
            CriterionId::AutomationPotential => self.automation_potential,
            CriterionId::OneWayPayment => self.one_way_payment,
            CriterionId::IncentiveAlignment => self.incentive_alignment,
            CriterionId::OperationalSimplicity => self.operational_simplicity,
            CriterionId::SmallTeamFit => self.small_team_fit,
            CriterionId::TimeToValue => self.time_to_value,
        }
    }

    pub fn set(&mut self, id: CriterionId, value: Option<f64>) {
        *self.slot(id) = value;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, id: CriterionId, value: f64) -> Self {
        self.set(id, Some(value));
        self
    }
}

impl From<&ScoringResponse> for ScoringDraft {
    fn from(response: &ScoringResponse) -> Self {
        let mut draft = Self::default();
        for (id, score) in response.iter() {
            draft.set(id, Some(f64::from(score)));
        }
        draft
    }
}

/// Check that all ten criteria are present, whole, and within 1–5.
///
/// Reports one error per offending field, in canonical criterion order.
pub fn validate_scoring_responses(draft: &ScoringDraft) -> ValidationReport {
    let mut report = ValidationReport::default();
    for id in CriterionId::ALL {
        report.check_rating(id.key(), draft.get(id));
    }
    report
}

impl TryFrom<&ScoringDraft> for ScoringResponse {
    type Error = ValidationReport;

    fn try_from(draft: &ScoringDraft) -> Result<Self, Self::Error> {
        let report = validate_scoring_responses(draft);
        if !report.is_valid() {
            return Err(report);
        }
        Ok(Self::from_fn(|id| rating_u8(draft.get(id))))
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Verdict derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "MODIFY")]
    Modify,
    #[serde(rename = "DROP")]
    Drop,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Go => "GO",
            Decision::Modify => "MODIFY",
            Decision::Drop => "DROP",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Decision::Go => "🟢",
            Decision::Modify => "🟡",
            Decision::Drop => "🔴",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a total score onto a decision.
pub fn decide(total_score: u32) -> Decision {
    if total_score >= GO_THRESHOLD {
        Decision::Go
    } else if total_score >= MODIFY_THRESHOLD {
        Decision::Modify
    } else {
        Decision::Drop
    }
}

/// Sum of the ten ratings.
pub fn calculate_total_score(response: &ScoringResponse) -> u32 {
    response.iter().map(|(_, score)| u32::from(score)).sum()
}

/// One criterion's contribution to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub id: CriterionId,
    pub name: &'static str,
    pub score: u8,
}

/// Outcome of scoring an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub total_score: u32,
    pub decision: Decision,
    pub criteria_scores: Vec<CriterionScore>,
}

/// Score a pre-validated response.
pub fn score_idea(response: &ScoringResponse) -> ScoringResult {
    let total_score = calculate_total_score(response);
    let criteria_scores = response
        .iter()
        .map(|(id, score)| CriterionScore {
            id,
            name: id.criterion().name,
            score,
        })
        .collect();

    ScoringResult {
        total_score,
        decision: decide(total_score),
        criteria_scores,
    }
}
