//! Focus lock: the weekly commitment that caps concurrent work at two ideas.
//!
//! - At most two ideas may hold a live lock at once, in distinct
//!   [`Priority`] slots (primary and secondary).
//! - A lock expires on the upcoming Sunday at 23:59:59.999 local time.
//! - Expired locks never count toward capacity, whatever the stored
//!   `is_active` flag says.
//!
//! All functions take "now" explicitly; see [`crate::clock`].

use std::fmt::Display;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::clock::{Timestamp, resolve_local};
use crate::model::{Idea, IdeaId};

/// Sort key used for active ideas that carry no priority.
const UNSET_PRIORITY_RANK: u8 = 99;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Focus slot held by an active idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Primary,
    Secondary,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Primary => 1,
            Priority::Secondary => 2,
        }
    }

    /// The other slot.
    pub fn other(self) -> Self {
        match self {
            Priority::Primary => Priority::Secondary,
            Priority::Secondary => Priority::Primary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Primary => "PRIMARY FOCUS",
            Priority::Secondary => "SECONDARY FOCUS",
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.rank()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Primary),
            2 => Ok(Priority::Secondary),
            other => Err(format!("invalid focus priority {other}: expected 1 or 2")),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Primary => write!(f, "primary"),
            Priority::Secondary => write!(f, "secondary"),
        }
    }
}

fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.map_or(UNSET_PRIORITY_RANK, Priority::rank)
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// An idea currently holding a live focus lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveIdea {
    pub id: IdeaId,
    pub title: String,
    pub priority: Option<Priority>,
    pub lock_expires_at: Timestamp,
}

/// Result of asking whether another idea may be activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "outcome")]
pub enum FocusLockValidation {
    /// A slot is free; the new idea takes `priority`.
    Admitted { priority: Priority },
    /// Both slots are taken until a lock expires.
    Denied {
        reason: String,
        active_ideas: Vec<ActiveIdea>,
    },
}

impl FocusLockValidation {
    pub fn can_activate(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    pub fn available_priority(&self) -> Option<Priority> {
        match self {
            Self::Admitted { priority } => Some(*priority),
            Self::Denied { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Admitted { .. } => None,
            Self::Denied { reason, .. } => Some(reason),
        }
    }

    pub fn active_ideas(&self) -> &[ActiveIdea] {
        match self {
            Self::Admitted { .. } => &[],
            Self::Denied { active_ideas, .. } => active_ideas,
        }
    }
}

/// Ideas holding a live lock at `now`, sorted primary first.
///
/// Ideas without a priority sort last; ties keep their input order.
pub fn live_focus<'a>(
    ideas: impl IntoIterator<Item = &'a Idea>,
    now: Timestamp,
) -> Vec<ActiveIdea> {
    let mut active: Vec<ActiveIdea> = ideas
        .into_iter()
        .filter_map(|idea| {
            let expiry = idea.lock_expires_at?;
            (idea.is_active && is_lock_active(expiry, now)).then(|| ActiveIdea {
                id: idea.id,
                title: idea.title.clone(),
                priority: idea.priority,
                lock_expires_at: expiry,
            })
        })
        .collect();
    active.sort_by_key(|a| priority_rank(a.priority));
    active
}

/// Decide whether one more idea may take a focus slot.
///
/// `ideas` is every idea the user owns. With no live locks the new idea
/// becomes primary; with one it takes whichever slot is unused; with two or
/// more it is denied and the holders are reported primary first.
pub fn validate_can_activate<'a, Tz>(
    ideas: impl IntoIterator<Item = &'a Idea>,
    now: &DateTime<Tz>,
) -> FocusLockValidation
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let active = live_focus(ideas, Timestamp::from(now));

    if active.len() < 2 {
        let priority = active
            .first()
            .map_or(Priority::Primary, |only| {
                only.priority.map_or(Priority::Secondary, Priority::other)
            });
        return FocusLockValidation::Admitted { priority };
    }

    let (primary, secondary) = (&active[0], &active[1]);
    let frees = format_lock_expiry(primary.lock_expires_at, &now.timezone());
    let reason = format!(
        "Focus lock is full: primary \"{}\" and secondary \"{}\" are active. \
         The primary lock frees {frees}.",
        primary.title, secondary.title
    );
    FocusLockValidation::Denied {
        reason,
        active_ideas: active,
    }
}

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

/// Lock expiry for a commitment made at `now`: the coming Sunday at
/// 23:59:59.999 local time. On a Sunday this is the *next* Sunday, seven days
/// out, never today.
pub fn next_sunday_expiry<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let since_sunday = i64::from(now.weekday().num_days_from_sunday());
    let days_until = if since_sunday == 0 { 7 } else { 7 - since_sunday };
    let sunday = now.date_naive() + Duration::days(days_until);
    let last_instant =
        (sunday + Duration::days(1)).and_time(NaiveTime::MIN) - Duration::milliseconds(1);
    resolve_local(&now.timezone(), &last_instant)
}

/// Start of the week containing `now`: Monday 00:00:00.000 local time.
/// Sunday belongs to the week that began six days earlier.
pub fn current_week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let since_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(since_monday);
    resolve_local(&now.timezone(), &monday.and_time(NaiveTime::MIN))
}

/// `now < expiry`. The exact expiry instant already counts as expired.
pub fn is_lock_active(expiry: Timestamp, now: Timestamp) -> bool {
    now < expiry
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// Time left on a lock, decomposed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockTimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
}

pub fn lock_time_remaining(expiry: Timestamp, now: Timestamp) -> LockTimeRemaining {
    let remaining = expiry.as_millis().saturating_sub(now.as_millis());
    if remaining <= 0 {
        return LockTimeRemaining {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
        };
    }

    LockTimeRemaining {
        days: remaining / MILLIS_PER_DAY,
        hours: (remaining % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
        minutes: (remaining % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
        seconds: (remaining % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
        is_expired: false,
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Render the time left on a lock.
///
/// Days appear when non-zero; hours whenever days or hours are non-zero;
/// minutes only when there are no whole days left. Past expiry the result
/// is `"Expired"`.
pub fn format_countdown(expiry: Timestamp, now: Timestamp) -> String {
    let left = lock_time_remaining(expiry, now);
    if left.is_expired {
        return "Expired".to_string();
    }

    let mut parts = Vec::with_capacity(2);
    if left.days > 0 {
        parts.push(plural(left.days, "day"));
    }
    if left.hours > 0 || left.days > 0 {
        parts.push(plural(left.hours, "hour"));
    }
    if left.days == 0 {
        parts.push(plural(left.minutes, "min"));
    }
    parts.join(", ")
}

/// Human-readable expiry, e.g. `Sunday, Oct 26, 11:59 PM`.
pub fn format_lock_expiry<Tz>(expiry: Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    expiry.to_datetime(tz).format("%A, %b %-d, %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn idea(id: u64, title: &str) -> Idea {
        Idea::new(IdeaId::new(id).unwrap(), "guest", title, None, Timestamp::from_millis(0))
    }

    fn locked(id: u64, title: &str, priority: Option<Priority>, expiry: Timestamp) -> Idea {
        let mut idea = idea(id, title);
        idea.is_active = true;
        idea.priority = priority;
        idea.lock_expires_at = Some(expiry);
        idea
    }

    #[test]
    fn priority_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Priority::Secondary).unwrap(), "2");
        let p: Priority = serde_json::from_str("1").unwrap();
        assert_eq!(p, Priority::Primary);
        assert!(serde_json::from_str::<Priority>("3").is_err());
    }

    #[test]
    fn empty_set_admits_primary() {
        let now = at(2025, 10, 22, 9, 0);
        let none: [Idea; 0] = [];
        let v = validate_can_activate(&none, &now);
        assert!(v.can_activate());
        assert_eq!(v.available_priority(), Some(Priority::Primary));
        assert!(v.reason().is_none());
    }

    #[test]
    fn one_live_lock_admits_secondary() {
        let now = at(2025, 10, 22, 9, 0);
        let expiry = Timestamp::from(next_sunday_expiry(&now));
        let ideas = [locked(1, "Alpha", Some(Priority::Primary), expiry), idea(2, "Beta")];
        let v = validate_can_activate(&ideas, &now);
        assert_eq!(v.available_priority(), Some(Priority::Secondary));
    }

    #[test]
    fn lone_secondary_frees_primary_slot() {
        let now = at(2025, 10, 22, 9, 0);
        let expiry = Timestamp::from(next_sunday_expiry(&now));
        let ideas = [locked(1, "Alpha", Some(Priority::Secondary), expiry)];
        let v = validate_can_activate(&ideas, &now);
        assert_eq!(v.available_priority(), Some(Priority::Primary));
    }

    #[test]
    fn two_live_locks_deny_and_name_both() {
        let now = at(2025, 10, 22, 9, 0);
        let expiry = Timestamp::from(next_sunday_expiry(&now));
        let ideas = [
            locked(2, "Second Thing", Some(Priority::Secondary), expiry),
            idea(3, "Idle"),
            locked(1, "First Thing", Some(Priority::Primary), expiry),
        ];
        let v = validate_can_activate(&ideas, &now);
        assert!(!v.can_activate());
        assert_eq!(v.available_priority(), None);

        let active = v.active_ideas();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].title, "First Thing");
        assert_eq!(active[1].title, "Second Thing");

        let reason = v.reason().unwrap();
        assert_eq!(
            reason,
            "Focus lock is full: primary \"First Thing\" and secondary \"Second Thing\" are active. \
             The primary lock frees Sunday, Oct 26, 11:59 PM."
        );
    }

    #[test]
    fn missing_priority_sorts_last_and_ties_keep_order() {
        let now = Timestamp::from(at(2025, 10, 22, 9, 0));
        let expiry = now.offset_millis(MILLIS_PER_DAY);
        let ideas = [
            locked(1, "NoPrio", None, expiry),
            locked(2, "Secondary", Some(Priority::Secondary), expiry),
            locked(3, "AlsoNoPrio", None, expiry),
        ];
        let active = live_focus(&ideas, now);
        let titles: Vec<_> = active.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Secondary", "NoPrio", "AlsoNoPrio"]);
    }

    #[test]
    fn expired_locks_do_not_count() {
        let now = at(2025, 10, 22, 9, 0);
        let past = Timestamp::from(now).offset_millis(-1);
        let ideas = [
            locked(1, "Stale A", Some(Priority::Primary), past),
            locked(2, "Stale B", Some(Priority::Secondary), past),
        ];
        let v = validate_can_activate(&ideas, &now);
        assert_eq!(v.available_priority(), Some(Priority::Primary));
    }

    #[test]
    fn active_flag_without_expiry_does_not_count() {
        let now = at(2025, 10, 22, 9, 0);
        let mut stray = idea(1, "Stray");
        stray.is_active = true;
        stray.priority = Some(Priority::Primary);
        let v = validate_can_activate(&[stray], &now);
        assert_eq!(v.available_priority(), Some(Priority::Primary));
    }

    #[test]
    fn lock_boundary_is_strict() {
        let now = Timestamp::from_millis(1_000_000);
        assert!(!is_lock_active(now.offset_millis(-1), now));
        assert!(!is_lock_active(now, now));
        assert!(is_lock_active(now.offset_millis(1), now));
    }

    #[test]
    fn sunday_expiry_from_midweek() {
        let now = at(2025, 10, 22, 14, 30);
        let expiry = next_sunday_expiry(&now);
        assert_eq!(expiry.weekday(), Weekday::Sun);
        assert_eq!(expiry.date_naive().to_string(), "2025-10-26");
        assert_eq!((expiry.hour(), expiry.minute(), expiry.second()), (23, 59, 59));
        assert_eq!(expiry.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn sunday_expiry_on_sunday_rolls_a_full_week() {
        for (h, m) in [(0, 0), (12, 0), (23, 59)] {
            let now = at(2025, 10, 19, h, m);
            let expiry = next_sunday_expiry(&now);
            assert_eq!(expiry.date_naive().to_string(), "2025-10-26");
            let same_day_cutoff = now.date_naive().and_hms_milli_opt(23, 59, 59, 999).unwrap();
            assert_eq!(
                expiry.naive_local() - same_day_cutoff,
                Duration::days(7)
            );
        }
    }

    #[test]
    fn sunday_expiry_from_saturday_is_tomorrow() {
        let now = at(2025, 10, 25, 23, 0);
        assert_eq!(next_sunday_expiry(&now).date_naive().to_string(), "2025-10-26");
    }

    #[test]
    fn sunday_expiry_uses_local_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // Monday 02:00 UTC is still Sunday evening at UTC-5.
        let now = at(2025, 10, 20, 2, 0).with_timezone(&tz);
        assert_eq!(now.weekday(), Weekday::Sun);
        let expiry = next_sunday_expiry(&now);
        assert_eq!(expiry.date_naive().to_string(), "2025-10-26");
        assert_eq!(expiry.naive_utc().to_string(), "2025-10-27 04:59:59.999");
    }

    #[test]
    fn week_start_is_monday_midnight() {
        let wednesday = at(2025, 10, 22, 17, 45);
        let start = current_week_start(&wednesday);
        assert_eq!(start.naive_local().to_string(), "2025-10-20 00:00:00");

        let monday = at(2025, 10, 20, 0, 0);
        assert_eq!(current_week_start(&monday), monday);

        let sunday = at(2025, 10, 26, 23, 59);
        assert_eq!(
            current_week_start(&sunday).naive_local().to_string(),
            "2025-10-20 00:00:00"
        );
    }

    #[test]
    fn countdown_formats() {
        let now = Timestamp::from_millis(0);
        let after = |d: i64, h: i64, m: i64| {
            now.offset_millis(d * MILLIS_PER_DAY + h * MILLIS_PER_HOUR + m * MILLIS_PER_MINUTE)
        };

        assert_eq!(format_countdown(after(3, 4, 10), now), "3 days, 4 hours");
        assert_eq!(format_countdown(after(1, 1, 0), now), "1 day, 1 hour");
        assert_eq!(format_countdown(after(2, 0, 30), now), "2 days, 0 hours");
        assert_eq!(format_countdown(after(0, 5, 1), now), "5 hours, 1 min");
        assert_eq!(format_countdown(after(0, 1, 2), now), "1 hour, 2 mins");
        assert_eq!(format_countdown(after(0, 0, 45), now), "45 mins");
        assert_eq!(format_countdown(now.offset_millis(30 * MILLIS_PER_SECOND), now), "0 mins");
        assert_eq!(format_countdown(now, now), "Expired");
        assert_eq!(format_countdown(now.offset_millis(-5), now), "Expired");
    }

    #[test]
    fn remaining_decomposes_all_units() {
        let now = Timestamp::from_millis(0);
        let expiry = now.offset_millis(MILLIS_PER_DAY + 2 * MILLIS_PER_HOUR + 3 * MILLIS_PER_MINUTE + 4_500);
        let left = lock_time_remaining(expiry, now);
        assert_eq!((left.days, left.hours, left.minutes, left.seconds), (1, 2, 3, 4));
        assert!(!left.is_expired);
    }

    #[test]
    fn lock_expiry_format() {
        let expiry = Timestamp::from(next_sunday_expiry(&at(2025, 11, 1, 8, 0)));
        assert_eq!(format_lock_expiry(expiry, &Utc), "Sunday, Nov 2, 11:59 PM");
    }
}
