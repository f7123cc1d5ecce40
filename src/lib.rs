// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # guardrail
//!
//! A personal idea-validation and weekly focus-lock tracker.
//!
//! ## Architecture
//!
//! - **Scoring** (`scoring`): ten 1–5 ratings become a 10–50 total and a GO / MODIFY / DROP verdict
//! - **Execution health** (`health`): five weekly ratings become a 0–100 score and Healthy / Stalled / Avoidance
//! - **Focus lock** (`focus`): at most two GO ideas active at once, each locked until Sunday 23:59:59.999 local time
//! - **Persistence** (`store`): redb tables for ideas, scoring, weekly snapshots, and progress logs
//! - **Flows** (`tracker`): the user-facing operations, one owner at a time
//!
//! ## Library usage
//!
//! ```no_run
//! use guardrail::clock::SystemClock;
//! use guardrail::scoring::{CriterionId, ScoringDraft};
//! use guardrail::store::Store;
//! use guardrail::tracker::Tracker;
//!
//! let tracker = Tracker::new(Store::in_memory().unwrap(), SystemClock, "guest");
//! let idea = tracker.create_idea("Invoice chaser", None, None).unwrap();
//! let draft = CriterionId::ALL
//!     .into_iter()
//!     .fold(ScoringDraft::default(), |d, id| d.with(id, 4.0));
//! let outcome = tracker.score_idea(idea.id, &draft).unwrap();
//! assert_eq!(outcome.result.total_score, 40);
//! tracker.activate(idea.id).unwrap();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod focus;
pub mod health;
pub mod model;
pub mod paths;
pub mod scoring;
pub mod store;
pub mod tracker;
pub mod validation;
