//! Habitrack - Habit Tracking Core
//!
//! Command-line entry point. Opens the configured database and prints
//! reports as JSON:
//!
//! - `habitrack [ranking]` prints the general ranking with each user's level
//! - `habitrack agenda <user_id> [YYYY-MM-DD]` prints a user's agenda for a day

use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use habitrack::progression::LevelProgress;
use habitrack::storage::{load_config, parse_date};
use habitrack::{Database, HabitManager, LevelManager, RankingService};

#[derive(Serialize)]
struct RankingRow {
    position: u32,
    user_id: i64,
    username: String,
    points: i64,
    level: Option<String>,
    progress_percent: u8,
}

fn main() -> anyhow::Result<()> {
    let config = load_config().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Habitrack v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config.database_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    if config.progression.seed_default_levels {
        LevelManager::new(&db).initialize_levels()?;
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match args.first().map(String::as_str) {
        None | Some("ranking") => serde_json::to_string_pretty(&ranking_report(&db)?)?,
        Some("agenda") => {
            let user_id: i64 = args
                .get(1)
                .context("Usage: habitrack agenda <user_id> [YYYY-MM-DD]")?
                .parse()
                .context("User id must be an integer")?;
            let date = match args.get(2) {
                Some(value) => parse_date(value)?,
                None => Utc::now().date_naive(),
            };
            agenda_report(&db, user_id, date)?
        }
        Some(other) => bail!("Unknown command '{}'", other),
    };

    println!("{}", output);
    Ok(())
}

fn ranking_report(db: &Database) -> anyhow::Result<Vec<RankingRow>> {
    let levels = LevelManager::new(db).list_levels()?;
    let ranking = RankingService::new(db).general_ranking()?;

    Ok(ranking
        .into_iter()
        .map(|entry| {
            let progress = LevelProgress::compute(entry.points, &levels);
            RankingRow {
                position: entry.position,
                user_id: entry.user_id,
                username: entry.username,
                points: entry.points,
                level: progress.current.map(|level| level.name),
                progress_percent: progress.percent,
            }
        })
        .collect())
}

fn agenda_report(db: &Database, user_id: i64, date: NaiveDate) -> anyhow::Result<String> {
    let agenda = HabitManager::new(db).agenda(user_id, date)?;
    tracing::debug!("{} habits due for user {} on {}", agenda.len(), user_id, date);
    Ok(serde_json::to_string_pretty(&agenda)?)
}
