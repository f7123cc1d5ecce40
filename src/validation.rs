//! Field-level validation shared by the scoring and progress validators.
//!
//! Validators never fail: they return a [`ValidationReport`] listing one
//! human-readable message per missing or out-of-range field, in the canonical
//! field order.

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldProblem {
    Missing,
    OutOfRange,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::OutOfRange => write!(
                f,
                "{} must be an integer between {MIN_RATING} and {MAX_RATING}",
                self.field
            ),
        }
    }
}

/// Outcome of validating a partially filled form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rendered messages, one per rejected field.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Check one rating slot and record a problem if it is missing,
    /// fractional, or outside `[MIN_RATING, MAX_RATING]`.
    pub(crate) fn check_rating(&mut self, field: &'static str, value: Option<f64>) {
        let problem = match value {
            None => Some(FieldProblem::Missing),
            Some(v) if !is_rating(v) => Some(FieldProblem::OutOfRange),
            Some(_) => None,
        };
        if let Some(problem) = problem {
            self.errors.push(FieldError { field, problem });
        }
    }
}

/// A finite whole number inside the rating range.
fn is_rating(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= f64::from(MIN_RATING) && v <= f64::from(MAX_RATING)
}

/// Read one submitted rating without rejecting the whole form.
///
/// `null` counts as missing. Any other non-number (`"4"`, `true`, a list)
/// becomes NaN so [`ValidationReport::check_rating`] reports it against its
/// own field.
pub(crate) fn submitted_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    })
}

/// Narrow a value already accepted by [`ValidationReport::check_rating`].
pub(crate) fn rating_u8(value: Option<f64>) -> u8 {
    value.map(|v| v as u8).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_ratings_in_range() {
        let mut report = ValidationReport::default();
        for v in 1..=5 {
            report.check_rating("x", Some(f64::from(v)));
        }
        assert!(report.is_valid());
    }

    #[test]
    fn rejects_missing_fractional_and_out_of_range() {
        let mut report = ValidationReport::default();
        report.check_rating("a", None);
        report.check_rating("b", Some(2.5));
        report.check_rating("c", Some(0.0));
        report.check_rating("d", Some(6.0));
        report.check_rating("e", Some(f64::NAN));
        assert_eq!(
            report.messages(),
            vec![
                "a is required",
                "b must be an integer between 1 and 5",
                "c must be an integer between 1 and 5",
                "d must be an integer between 1 and 5",
                "e must be an integer between 1 and 5",
            ]
        );
    }
}
