//! guardrail CLI: score ideas, lock weekly focus, track execution.

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;
use serde::de::DeserializeOwned;

use guardrail::clock::{Clock, SystemClock, Timestamp};
use guardrail::config::GuardrailConfig;
use guardrail::focus::{FocusLockValidation, format_countdown, format_lock_expiry};
use guardrail::health::{
    ExecutionHealthResult, MetricId, PROGRESS_METRICS, ProgressDraft, ProgressMetric,
    WeeklyProgress, calculate_execution_health,
};
use guardrail::model::{ExecutionStatus, Idea, IdeaId, Resource, ResourceKind, WeeklyExecution, status_label};
use guardrail::paths::GuardrailPaths;
use guardrail::scoring::{Criterion, CriterionId, SCORING_CRITERIA, ScoringDraft, ScoringResult, score_idea};
use guardrail::store::Store;
use guardrail::tracker::{IdeaEdit, ResourceProgress, Tracker};

#[derive(Parser)]
#[command(name = "guardrail", version, about = "Idea validation and weekly focus lock")]
struct Cli {
    /// Directory holding the database (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user (overrides the config file).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and data directory.
    Init,

    /// Show the scoring rubric and the weekly execution metrics.
    Rubric,

    /// Capture and manage ideas.
    Idea {
        #[command(subcommand)]
        action: IdeaAction,
    },

    /// Score an idea against the ten-criterion rubric.
    Score {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        #[command(flatten)]
        ratings: RatingArgs,
    },

    /// Weekly focus lock: at most two GO ideas at a time.
    Focus {
        #[command(subcommand)]
        action: FocusAction,
    },

    /// Weekly execution check-ins.
    Week {
        #[command(subcommand)]
        action: WeekAction,
    },

    /// Log completed work and attached resources.
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },

    /// Dump everything stored for the current user as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum IdeaAction {
    /// Capture a new idea.
    Add {
        title: String,
        #[arg(long)]
        notes: Option<String>,
        /// Link to a brainstorm conversation; logged as the first progress entry.
        #[arg(long)]
        brainstorm: Option<String>,
    },
    /// List ideas, newest first.
    List {
        /// Only ideas matching this filter: a status ("parked", "in progress",
        /// "new"), a decision ("go", "modify", "drop"), or "active".
        #[arg(long, alias = "status")]
        filter: Option<String>,
        /// Only ideas whose title contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one idea in detail.
    Show {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Change an idea's title or notes. Empty notes clear them.
    Edit {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Set the execution status.
    Status {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        status: String,
    },
    /// Park an idea for later.
    Park {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Abandon an idea. Nothing is deleted.
    Drop {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Set how many resource links the idea should collect (0 resets).
    Target {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        links: u32,
    },
}

#[derive(Subcommand)]
enum FocusAction {
    /// Show the ideas currently holding a lock.
    Status,
    /// Check whether an idea could be activated now.
    Check {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Commit a GO idea to this week's focus.
    Activate {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Release an idea's focus slot.
    Remove {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// Clear the active flag on ideas whose lock has expired.
    Release,
}

#[derive(Subcommand)]
enum WeekAction {
    /// Record this week's execution ratings.
    Record {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        #[command(flatten)]
        ratings: RatingArgs,
    },
    /// Show this week's check-in, or the ratings to start from.
    Show {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
    /// List every recorded week, most recent first.
    History {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
}

#[derive(Subcommand)]
enum ProgressAction {
    /// Log a unit of completed work.
    Log {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
        message: String,
        /// Attach a link as TITLE=URL. Repeatable.
        #[arg(long, value_name = "TITLE=URL")]
        link: Vec<String>,
        /// Attach a document as TITLE=URL. Repeatable.
        #[arg(long, value_name = "TITLE=URL")]
        doc: Vec<String>,
        /// Attach an image as TITLE=URL. Repeatable.
        #[arg(long, value_name = "TITLE=URL")]
        image: Vec<String>,
    },
    /// List progress logs, newest first.
    List {
        #[arg(value_parser = parse_id)]
        id: IdeaId,
    },
}

#[derive(Args)]
struct RatingArgs {
    /// JSON object of ratings, or a path to a file holding one.
    #[arg(long)]
    ratings: Option<String>,
    /// Set a single rating, e.g. `--set painIntensity=4`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let mut paths = GuardrailPaths::resolve()?;
    let config_file = paths.config_file();
    let mut config = GuardrailConfig::load_or_default(&config_file)?;
    if let Some(user) = cli.user {
        config.user = user;
    }
    if let Some(dir) = cli.data_dir.or_else(|| config.data_dir.clone()) {
        paths = paths.with_data_dir(dir);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;

    match cli.command {
        Commands::Init => {
            paths.ensure_dirs()?;
            let created = GuardrailConfig::init(&config_file)?;
            Store::open(&paths.data_dir)?;
            if created {
                println!("Wrote default config to {}", config_file.display());
            } else {
                println!("Config already exists at {}", config_file.display());
            }
            println!("Database at {}", paths.database_file().display());
        }

        Commands::Rubric => {
            #[derive(Serialize)]
            struct Rubric {
                criteria: &'static [Criterion],
                metrics: &'static [ProgressMetric],
            }
            let rubric = Rubric {
                criteria: &SCORING_CRITERIA,
                metrics: &PROGRESS_METRICS,
            };
            emit(json, &rubric, || print_rubric(rubric.criteria, rubric.metrics))?;
        }

        Commands::Idea { action } => {
            let tracker = open_tracker(&paths, &config)?;
            run_idea(&tracker, action, json)?;
        }

        Commands::Score { id, ratings } => {
            let tracker = open_tracker(&paths, &config)?;
            let mut draft: ScoringDraft = load_ratings(&ratings)?;
            for raw in &ratings.set {
                let (key, value) = parse_assignment(raw)?;
                let criterion = CriterionId::from_key(key)
                    .ok_or_else(|| miette!("unknown criterion \"{key}\"; see `guardrail rubric`"))?;
                draft.set(criterion, Some(value));
            }
            let outcome = tracker.score_idea(id, &draft)?;
            emit(json, &outcome, || {
                print_scoring(&outcome.result);
                if outcome.idea.is_active {
                    println!("\nThis idea holds a focus lock; the new verdict applies from now on.");
                }
            })?;
        }

        Commands::Focus { action } => {
            let tracker = open_tracker(&paths, &config)?;
            run_focus(&tracker, action, json)?;
        }

        Commands::Week { action } => {
            let tracker = open_tracker(&paths, &config)?;
            run_week(&tracker, action, json)?;
        }

        Commands::Progress { action } => {
            let tracker = open_tracker(&paths, &config)?;
            run_progress(&tracker, action, json)?;
        }

        Commands::Export { output } => {
            let tracker = open_tracker(&paths, &config)?;
            let export = tracker.export()?;
            let content = serde_json::to_string_pretty(&export).into_diagnostic()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, content).into_diagnostic()?;
                    println!(
                        "Exported {} ideas to {}",
                        export.ideas.len(),
                        path.display()
                    );
                }
                None => println!("{content}"),
            }
        }
    }

    Ok(())
}

fn open_tracker(paths: &GuardrailPaths, config: &GuardrailConfig) -> Result<Tracker> {
    let store = Store::open(&paths.data_dir)?;
    Ok(Tracker::from_config(store, SystemClock, config))
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn run_idea(tracker: &Tracker, action: IdeaAction, json: bool) -> Result<()> {
    let now = tracker.clock().timestamp();
    match action {
        IdeaAction::Add {
            title,
            notes,
            brainstorm,
        } => {
            let idea = tracker.create_idea(&title, notes.as_deref(), brainstorm.as_deref())?;
            emit(json, &idea, || {
                println!("Captured {} \"{}\"", idea.id, idea.title);
                println!("Score it next: guardrail score {} --ratings <json>", idea.id.get());
            })?;
        }
        IdeaAction::List { filter, search } => {
            let ideas = tracker.find_ideas(filter.as_deref(), search.as_deref())?;
            emit(json, &ideas, || {
                if ideas.is_empty() {
                    println!("No ideas yet.");
                }
                for idea in &ideas {
                    println!("{}", idea_line(idea, now));
                }
            })?;
        }
        IdeaAction::Show { id } => {
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct Details {
                idea: Idea,
                scoring: Option<ScoringResult>,
                resource_progress: ResourceProgress,
                current_week: Option<WeeklyExecution>,
            }
            let details = Details {
                idea: tracker.idea(id)?,
                scoring: tracker.scoring(id)?.map(|record| score_idea(&record.response)),
                resource_progress: tracker.resource_progress(id)?,
                current_week: tracker.current_week(id)?,
            };
            emit(json, &details, || {
                print_idea(&details.idea, now);
                if let Some(result) = &details.scoring {
                    println!();
                    print_scoring(result);
                }
                let rp = details.resource_progress;
                println!(
                    "\nResources: {} / {} expected ({:.0}%)",
                    rp.link_count, rp.expected_links, rp.percent
                );
                if let Some(week) = &details.current_week {
                    println!();
                    print_week(week, &calculate_execution_health(&week.progress));
                }
            })?;
        }
        IdeaAction::Edit { id, title, notes } => {
            let idea = tracker.edit_idea(id, IdeaEdit { title, notes })?;
            emit(json, &idea, || println!("Updated {} \"{}\"", idea.id, idea.title))?;
        }
        IdeaAction::Status { id, status } => {
            let status: ExecutionStatus = status.parse()?;
            let idea = tracker.set_status(id, status)?;
            emit(json, &idea, || println!("{} is now {status}", idea.id))?;
        }
        IdeaAction::Park { id } => {
            let idea = tracker.park(id)?;
            emit(json, &idea, || println!("Parked {} \"{}\"", idea.id, idea.title))?;
        }
        IdeaAction::Drop { id } => {
            let idea = tracker.abandon(id)?;
            emit(json, &idea, || println!("Abandoned {} \"{}\"", idea.id, idea.title))?;
        }
        IdeaAction::Target { id, links } => {
            let idea = tracker.set_expected_links(id, Some(links))?;
            let progress = tracker.resource_progress(id)?;
            emit(json, &idea, || {
                println!(
                    "{} now expects {} links ({} attached)",
                    idea.id, progress.expected_links, progress.link_count
                )
            })?;
        }
    }
    Ok(())
}

fn run_focus(tracker: &Tracker, action: FocusAction, json: bool) -> Result<()> {
    let now = tracker.clock().timestamp();
    match action {
        FocusAction::Status => {
            let board = tracker.focus_board()?;
            emit(json, &board, || {
                if board.is_empty() {
                    println!("No active focus. Two slots free.");
                }
                for active in &board {
                    let label = active.priority.map_or("FOCUS", |p| p.label());
                    println!("{label}: {} \"{}\"", active.id, active.title);
                    println!(
                        "  locked until {} ({} left)",
                        format_lock_expiry(active.lock_expires_at, &Local),
                        format_countdown(active.lock_expires_at, now)
                    );
                }
            })?;
        }
        FocusAction::Check { id } => {
            let validation = tracker.check_activation(id)?;
            emit(json, &validation, || match &validation {
                FocusLockValidation::Admitted { priority } => {
                    println!("{id} can be activated as {}", priority.label());
                }
                FocusLockValidation::Denied { reason, .. } => println!("{reason}"),
            })?;
        }
        FocusAction::Activate { id } => {
            let idea = tracker.activate(id)?;
            emit(json, &idea, || {
                let label = idea.priority.map_or("FOCUS", |p| p.label());
                println!("{label}: {} \"{}\"", idea.id, idea.title);
                if let Some(expiry) = idea.lock_expires_at {
                    println!("Locked until {}", format_lock_expiry(expiry, &Local));
                }
            })?;
        }
        FocusAction::Remove { id } => {
            let idea = tracker.deactivate(id)?;
            emit(json, &idea, || println!("Released focus on {} \"{}\"", idea.id, idea.title))?;
        }
        FocusAction::Release => {
            let released = tracker.release_expired()?;
            emit(json, &released, || match released.len() {
                0 => println!("No expired locks."),
                n => println!("Released {n} expired lock(s)."),
            })?;
        }
    }
    Ok(())
}

fn run_week(tracker: &Tracker, action: WeekAction, json: bool) -> Result<()> {
    match action {
        WeekAction::Record { id, ratings } => {
            let previous = tracker.prefill_metrics(id)?;
            let draft = week_draft(previous.as_ref(), &ratings)?;
            if previous.is_some() && ratings.ratings.is_none() && !json {
                eprintln!("Starting from last week's ratings.");
            }
            let outcome = tracker.record_week(id, &draft)?;
            emit(json, &outcome, || print_week(&outcome.record, &outcome.result))?;
        }
        WeekAction::Show { id } => match tracker.current_week(id)? {
            Some(week) => {
                let result = calculate_execution_health(&week.progress);
                emit(json, &week, || print_week(&week, &result))?;
            }
            None => {
                let prefill = tracker.prefill_metrics(id)?;
                emit(json, &prefill, || match &prefill {
                    Some(progress) => {
                        println!("Not recorded this week. Last week's ratings:");
                        for (metric, value) in progress.iter() {
                            println!("  {:<16} {value}", metric.metric().label);
                        }
                    }
                    None => println!("No weeks recorded yet."),
                })?;
            }
        },
        WeekAction::History { id } => {
            let history = tracker.weekly_history(id)?;
            emit(json, &history, || {
                if history.is_empty() {
                    println!("No weeks recorded yet.");
                }
                for week in &history {
                    let result = calculate_execution_health(&week.progress);
                    println!(
                        "week of {}  {:<9} {:>3}/100",
                        local_date(week.week_start),
                        result.health,
                        result.score
                    );
                }
            })?;
        }
    }
    Ok(())
}

fn run_progress(tracker: &Tracker, action: ProgressAction, json: bool) -> Result<()> {
    match action {
        ProgressAction::Log {
            id,
            message,
            link,
            doc,
            image,
        } => {
            let mut resources = Vec::new();
            for (kind, raws) in [
                (ResourceKind::Link, link),
                (ResourceKind::Document, doc),
                (ResourceKind::Image, image),
            ] {
                for raw in raws {
                    let (title, url) = raw
                        .split_once('=')
                        .ok_or_else(|| miette!("expected TITLE=URL, got \"{raw}\""))?;
                    resources.push(Resource::new(kind, title, url));
                }
            }
            let log = tracker.log_progress(id, &message, resources)?;
            let progress = tracker.resource_progress(id)?;
            emit(json, &log, || {
                println!("Logged: {}", log.message);
                println!(
                    "Resources: {} / {} expected ({:.0}%)",
                    progress.link_count, progress.expected_links, progress.percent
                );
            })?;
        }
        ProgressAction::List { id } => {
            let logs = tracker.progress_logs(id)?;
            emit(json, &logs, || {
                if logs.is_empty() {
                    println!("No progress logged yet.");
                }
                for log in &logs {
                    println!("{}  {}", local_datetime(log.logged_at), log.message);
                    for r in &log.resources {
                        println!("    [{}] {} <{}>", r.kind, r.title, r.url);
                    }
                }
            })?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

fn parse_id(raw: &str) -> std::result::Result<IdeaId, String> {
    raw.trim_start_matches('#')
        .parse::<u64>()
        .ok()
        .and_then(IdeaId::new)
        .ok_or_else(|| format!("\"{raw}\" is not a valid idea id"))
}

/// Read `--ratings`: inline JSON if it looks like an object, otherwise a file.
fn load_ratings<T: DeserializeOwned + Default>(args: &RatingArgs) -> Result<T> {
    let Some(source) = args.ratings.as_deref() else {
        return Ok(T::default());
    };
    let text = if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        std::fs::read_to_string(source).into_diagnostic()?
    };
    serde_json::from_str(&text).into_diagnostic()
}

/// This week's draft. `--ratings` replaces last week's ratings; `--set`
/// alone adjusts them. One of the two is required.
fn week_draft(previous: Option<&WeeklyProgress>, args: &RatingArgs) -> Result<ProgressDraft> {
    if args.ratings.is_none() && args.set.is_empty() {
        return Err(miette!(
            help = "pass --ratings, or --set KEY=VALUE to adjust last week's ratings",
            "nothing to record"
        ));
    }
    let mut draft = match previous {
        Some(previous) if args.ratings.is_none() => ProgressDraft::from(previous),
        _ => load_ratings(args)?,
    };
    for raw in &args.set {
        let (key, value) = parse_assignment(raw)?;
        let metric = MetricId::from_key(key)
            .ok_or_else(|| miette!("unknown metric \"{key}\"; see `guardrail rubric`"))?;
        draft.set(metric, Some(value));
    }
    Ok(draft)
}

fn parse_assignment(raw: &str) -> Result<(&str, f64)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| miette!("expected KEY=VALUE, got \"{raw}\""))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| miette!("rating for \"{key}\" is not a number"))?;
    Ok((key.trim(), value))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Print `value` as JSON, or run `text` for the human-readable form.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    } else {
        text();
    }
    Ok(())
}

fn local_date(ts: Timestamp) -> String {
    ts.to_datetime(&Local).format("%a %b %-d, %Y").to_string()
}

fn local_datetime(ts: Timestamp) -> String {
    ts.to_datetime(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn idea_line(idea: &Idea, now: Timestamp) -> String {
    let verdict = match (idea.decision, idea.total_score) {
        (Some(decision), Some(total)) => format!("{decision} {total}"),
        _ => "unscored".to_string(),
    };
    let focus = match idea.priority {
        Some(priority) if idea.holds_lock(now) => format!("  [{}]", priority.label()),
        _ => String::new(),
    };
    format!(
        "{:>5}  {:<10} {:<12} {}{focus}",
        idea.id.to_string(),
        verdict,
        status_label(idea.execution_status),
        idea.title
    )
}

fn print_idea(idea: &Idea, now: Timestamp) {
    println!("{} {}", idea.id, idea.title);
    if let Some(notes) = &idea.notes {
        println!("  {notes}");
    }
    println!("  status:   {}", status_label(idea.execution_status));
    println!("  created:  {}", local_datetime(idea.created_at));
    if let Some(scored) = idea.last_scored_at {
        println!("  scored:   {}", local_datetime(scored));
    }
    if let (Some(priority), Some(expiry)) = (idea.priority, idea.lock_expires_at) {
        if idea.holds_lock(now) {
            println!(
                "  focus:    {} until {} ({} left)",
                priority.label(),
                format_lock_expiry(expiry, &Local),
                format_countdown(expiry, now)
            );
        }
    }
}

fn print_scoring(result: &ScoringResult) {
    println!(
        "{} {}: {}/50",
        result.decision.emoji(),
        result.decision.label(),
        result.total_score
    );
    for entry in &result.criteria_scores {
        let criterion = entry.id.criterion();
        println!(
            "  {:<24} {}  {}",
            entry.name,
            entry.score,
            criterion.helper_for(entry.score).unwrap_or_default()
        );
    }
}

fn print_week(week: &WeeklyExecution, result: &ExecutionHealthResult) {
    println!(
        "Week of {}: {} ({}/100)",
        local_date(week.week_start),
        result.health,
        result.score
    );
    println!("  {}", result.message);
    for (metric, value) in week.progress.iter() {
        let info = metric.metric();
        let option = info.options.iter().find(|o| o.value == value);
        println!(
            "  {:<16} {value}  {}",
            info.label,
            option.map_or("", |o| o.label)
        );
    }
    if let Some(warning) = result.health.warning() {
        println!("\n{warning}");
    }
}

fn print_rubric(criteria: &[Criterion], metrics: &[ProgressMetric]) {
    println!("Scoring rubric (each 1-5; GO >= 40, MODIFY >= 30, else DROP)\n");
    for c in criteria {
        println!("{} ({})", c.name, c.id);
        println!("  {}", c.description);
        println!("  1 = {}, 5 = {}", c.low_label, c.high_label);
    }
    println!("\nWeekly execution metrics (each 1-5)\n");
    for m in metrics {
        println!("{} ({})", m.label, m.id);
        for o in &m.options {
            println!("  {} {:<28} {}", o.value, o.label, o.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail::health::validate_progress_metrics;

    fn args(ratings: Option<&str>, set: &[&str]) -> RatingArgs {
        RatingArgs {
            ratings: ratings.map(str::to_string),
            set: set.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn week_record_needs_a_rating_source() {
        let last_week = WeeklyProgress::uniform(3);
        assert!(week_draft(Some(&last_week), &args(None, &[])).is_err());
        assert!(week_draft(None, &args(None, &[])).is_err());
    }

    #[test]
    fn set_alone_adjusts_last_week() {
        let last_week = WeeklyProgress::uniform(3);
        let draft = week_draft(Some(&last_week), &args(None, &["signal=5"])).unwrap();
        assert_eq!(draft.get(MetricId::Signal), Some(5.0));
        assert_eq!(draft.get(MetricId::Exposure), Some(3.0));
    }

    #[test]
    fn ratings_json_replaces_last_week() {
        let last_week = WeeklyProgress::uniform(3);
        let draft = week_draft(Some(&last_week), &args(Some(r#"{"exposure":2}"#), &[])).unwrap();
        assert_eq!(draft.get(MetricId::Exposure), Some(2.0));
        assert_eq!(draft.get(MetricId::Signal), None);
    }

    #[test]
    fn mistyped_ratings_are_reported_per_field() {
        let json = r#"{"buildProgress":"4","exposure":true,"realUsage":3,"signal":3,"revenueAttempt":3}"#;
        let draft = week_draft(None, &args(Some(json), &[])).unwrap();
        assert_eq!(
            validate_progress_metrics(&draft).messages(),
            vec![
                "buildProgress must be an integer between 1 and 5",
                "exposure must be an integer between 1 and 5",
            ]
        );

        let draft: ScoringDraft = load_ratings(&args(Some(r#"{"painIntensity":"4"}"#), &[])).unwrap();
        assert!(draft.pain_intensity.is_some_and(f64::is_nan));
    }
}
