//! Revisit CLI
//!
//! Command-line front end for the review engine. Reads JSON snapshots of
//! tracked items or practice dates and prints the engine's view of them.
//! Nothing is written back.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use directories::ProjectDirs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use revisit_core::ledger::DEFAULT_WINDOW_DAYS;
use revisit_core::{
    DecayStatus, EngineConfig, ItemRef, PracticeHeatmap, PracticeLedger, ReviewEngine,
    TrackedItem, Urgency,
};

/// File name looked up in the platform config directory
const CONFIG_FILE_NAME: &str = "revisit.toml";

/// Longest heatmap window accepted, about ten years
const MAX_WINDOW_DAYS: i64 = 3660;

/// Revisit - spaced-repetition review scheduler
#[derive(Parser)]
#[command(name = "revisit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Review queues, decay alerts and practice streaks from JSON snapshots")]
#[command(long_about = "Revisit schedules reviews with SM-2, estimates forgetting with an exponential decay curve, \
and ranks what to practice next.\n\nItem snapshots are JSON arrays of tracked items; nothing is written back.")]
struct Cli {
    /// Configuration file (defaults to revisit.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one review to an item and print the result
    Review {
        /// JSON file with tracked items
        #[arg(long)]
        items: PathBuf,
        /// Item to review, as owner:kind:id
        #[arg(long)]
        item: String,
        /// Recall quality (0-5)
        #[arg(long)]
        quality: i32,
        /// Seconds spent on the review
        #[arg(long)]
        seconds: Option<u32>,
        /// Evaluation instant (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Show queue statistics and the ranked review queue
    Queue {
        /// JSON file with tracked items
        #[arg(long)]
        items: PathBuf,
        /// Maximum number of queue entries
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Evaluation instant (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Show the decay overview and items that need attention
    Decay {
        /// JSON file with tracked items
        #[arg(long)]
        items: PathBuf,
        /// Evaluation instant (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        now: Option<String>,
        /// Maximum number of alerts
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show practice streaks and a calendar heatmap
    Heatmap {
        /// JSON file with an array of practice dates or timestamps
        #[arg(long)]
        dates: PathBuf,
        /// Last day of the window (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end: Option<String>,
        /// Window length in days (1-3660)
        #[arg(
            long,
            default_value_t = DEFAULT_WINDOW_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS)
        )]
        days: u32,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Review {
            items,
            item,
            quality,
            seconds,
            now,
        } => run_review(config, &items, &item, quality, seconds, now.as_deref()),
        Commands::Queue { items, limit, now } => run_queue(config, &items, limit, now.as_deref()),
        Commands::Decay { items, now, limit } => run_decay(config, &items, now.as_deref(), limit),
        Commands::Heatmap { dates, end, days } => run_heatmap(&dates, end.as_deref(), days),
        Commands::Config => run_config(&config),
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// Explicit path, else the platform config file if present, else defaults
fn load_config(explicit: Option<&Path>) -> anyhow::Result<EngineConfig> {
    if let Some(path) = explicit {
        return EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    if let Some(dirs) = ProjectDirs::from("dev", "revisit", "revisit") {
        let path = dirs.config_dir().join(CONFIG_FILE_NAME);
        if path.exists() {
            debug!(path = %path.display(), "Loading platform config");
            return EngineConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()));
        }
    }

    Ok(EngineConfig::default())
}

/// RFC 3339 timestamp or a bare date (midnight UTC); `None` means now
fn parse_now(value: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match value {
        None => Ok(Utc::now()),
        Some(s) => parse_instant(s),
    }
}

fn parse_instant(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    bail!("Invalid time '{}': expected RFC 3339 or YYYY-MM-DD", s)
}

/// A practice date, either bare or as a timestamp bucketed by UTC date
fn parse_practice_date(s: &str) -> anyhow::Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_instant(s).map(|ts| ts.date_naive())
}

fn read_items(path: &Path) -> anyhow::Result<Vec<TrackedItem>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let items: Vec<TrackedItem> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse tracked items in {}", path.display()))?;
    debug!(count = items.len(), "Loaded tracked items");
    Ok(items)
}

fn read_dates(path: &Path) -> anyhow::Result<Vec<NaiveDate>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let raw: Vec<String> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse practice dates in {}", path.display()))?;
    raw.iter().map(|s| parse_practice_date(s)).collect()
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Run review command
fn run_review(
    config: EngineConfig,
    items_path: &Path,
    item: &str,
    quality: i32,
    seconds: Option<u32>,
    now: Option<&str>,
) -> anyhow::Result<()> {
    let engine = ReviewEngine::new(config)?;
    let now = parse_now(now)?;
    let items = read_items(items_path)?;
    let target: ItemRef = item.parse()?;

    let Some(tracked) = engine.find(&items, &target) else {
        bail!("Item {} not found in {}", target, items_path.display());
    };
    let outcome = engine.submit_timed_review(tracked, quality, seconds, now)?;
    let schedule = &outcome.item.schedule;

    println!("{}", "=== Review Submitted ===".cyan().bold());
    println!();
    println!("{}: {}", "Item".white().bold(), outcome.item.item);
    println!("{}", outcome.message.green());
    println!("{}: {}", "Status".white().bold(), schedule.status);
    println!("{}: {} days", "Interval".white().bold(), schedule.interval_days);
    println!("{}: {:.2}", "Ease".white().bold(), schedule.ease_factor);
    if schedule.total_time_seconds > 0 {
        println!("{}: {}s", "Time Spent".white().bold(), schedule.total_time_seconds);
    }
    println!(
        "{}: {}",
        "Next Review".white().bold(),
        schedule.next_review_at.format("%Y-%m-%d %H:%M:%S")
    );
    if outcome.graduated {
        println!("{}", "Graduated to review".green().bold());
    }
    if outcome.became_leech {
        println!("{}", "Flagged as a leech".red().bold());
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&outcome.item)?);
    Ok(())
}

/// Run queue command
fn run_queue(
    config: EngineConfig,
    items_path: &Path,
    limit: usize,
    now: Option<&str>,
) -> anyhow::Result<()> {
    let engine = ReviewEngine::new(config)?;
    let now = parse_now(now)?;
    let items = read_items(items_path)?;

    let stats = engine.queue_stats(&items, now);
    println!("{}", "=== Review Queue ===".cyan().bold());
    println!();
    println!("{}: {}", "Due Now".white().bold(), stats.due_now);
    println!("{}: {}", "Due Today".white().bold(), stats.due_today);
    println!("{}: {}", "Overdue".white().bold(), stats.overdue_count);
    println!("{}: {}", "Learning".white().bold(), stats.learning_count);
    println!("{}: {}", "Review".white().bold(), stats.review_count);
    println!("{}: ~{} min", "Estimated Time".white().bold(), stats.estimated_minutes);

    let queue = engine.build_queue(&items, now, limit);
    println!();
    if queue.is_empty() {
        println!("{}", "Nothing due. Come back later.".dimmed());
        return Ok(());
    }
    for entry in &queue {
        println!(
            "  {:>3}. {:40} {:>7.1}  {:>3}d overdue  {}",
            entry.position,
            entry.item.to_string(),
            entry.priority,
            entry.days_overdue.max(0),
            status_label(entry.decay_status, entry.decay_score)
        );
    }
    Ok(())
}

/// Run decay command
fn run_decay(
    config: EngineConfig,
    items_path: &Path,
    now: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let engine = ReviewEngine::new(config)?;
    let now = parse_now(now)?;
    let items = read_items(items_path)?;

    let overview = engine.decay_overview(&items, now);
    println!("{}", "=== Decay Overview ===".cyan().bold());
    println!();
    println!("{}: {}", "Tracked Items".white().bold(), overview.total);
    println!("{}: {:.1}", "Average Score".white().bold(), overview.average_score);
    println!("{}: {}", "Due Today".white().bold(), overview.items_due_today);
    println!();
    print_distribution_bar("Fresh", overview.fresh, overview.total, DecayStatus::Fresh);
    print_distribution_bar("Stable", overview.stable, overview.total, DecayStatus::Stable);
    print_distribution_bar("Decaying", overview.decaying, overview.total, DecayStatus::Decaying);
    print_distribution_bar("Critical", overview.critical, overview.total, DecayStatus::Critical);
    print_distribution_bar("Forgotten", overview.forgotten, overview.total, DecayStatus::Forgotten);

    let alerts = engine.critical_alerts(&items, now, limit);
    println!();
    println!("{}", "=== Needs Attention ===".yellow().bold());
    if alerts.is_empty() {
        println!("{}", "Everything is holding up.".dimmed());
    }
    for alert in &alerts {
        let urgency = match alert.urgency {
            Urgency::Critical => alert.urgency.as_str().red().bold(),
            Urgency::Urgent => alert.urgency.as_str().yellow().bold(),
            Urgency::Warning => alert.urgency.as_str().white(),
        };
        let since = alert
            .days_since_practice
            .map(|d| format!("{} days since practice", d))
            .unwrap_or_else(|| "never practiced".to_string());
        println!("  {:8} {:40} {:>3}  {}", urgency, alert.item.to_string(), alert.score, since.dimmed());
    }
    Ok(())
}

/// Run heatmap command
fn run_heatmap(dates_path: &Path, end: Option<&str>, days: u32) -> anyhow::Result<()> {
    let end = match end {
        Some(s) => parse_practice_date(s)?,
        None => Utc::now().date_naive(),
    };
    let (start, end) = PracticeLedger::trailing_window(end, days);
    let dates = read_dates(dates_path)?;
    let heatmap = PracticeLedger::new().build_heatmap(dates, start, end);

    println!("{}", "=== Practice ===".cyan().bold());
    println!();
    println!("{}: {} to {}", "Window".white().bold(), heatmap.start_date, heatmap.end_date);
    println!("{}: {}", "Days Practiced".white().bold(), heatmap.total_days_practiced);
    println!("{}: {}", "Current Streak".white().bold(), heatmap.current_streak);
    println!("{}: {}", "Longest Streak".white().bold(), heatmap.longest_streak);
    println!();
    for line in heatmap_rows(&heatmap) {
        println!("{}", line);
    }
    Ok(())
}

/// Run config command
fn run_config(config: &EngineConfig) -> anyhow::Result<()> {
    config.validate()?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn status_color(status: DecayStatus, text: &str) -> ColoredString {
    match status {
        DecayStatus::Fresh => text.green(),
        DecayStatus::Stable => text.cyan(),
        DecayStatus::Decaying => text.yellow(),
        DecayStatus::Critical => text.red(),
        DecayStatus::Forgotten => text.magenta(),
    }
}

fn status_label(status: DecayStatus, score: u8) -> ColoredString {
    status_color(status, &format!("{} ({})", status, score))
}

/// Print a distribution bar
fn print_distribution_bar(label: &str, count: usize, total: usize, status: DecayStatus) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));

    println!(
        "  {:10} [{:30}] {:>4} ({:>5.1}%)",
        label,
        status_color(status, &bar),
        count,
        percentage
    );
}

fn intensity_glyph(intensity: u8) -> char {
    match intensity {
        0 => '.',
        1 => '-',
        2 => '+',
        3 => '*',
        _ => '#',
    }
}

/// One line per week: the week's first date, then a glyph per day
fn heatmap_rows(heatmap: &PracticeHeatmap) -> Vec<String> {
    heatmap
        .days
        .chunks(7)
        .map(|week| {
            let glyphs: String = week.iter().map(|d| intensity_glyph(d.intensity)).collect();
            format!("  {} {}", week[0].date, glyphs)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
