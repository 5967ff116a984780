mod dashboard;
mod history;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ecotrack_core::{
    parse_args, parse_human_date, parse_quantity, ActivityInput, AppConfig, ChallengeCategory,
    ChallengeDto, EcoError, EcoRepository, EmissionCategory, FileKeyValueStore, FootprintAggregator,
    FootprintRecord, HistoryUseCase, SampleData, SystemClock,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

pub type Engine = FootprintAggregator<FileKeyValueStore, SystemClock>;

#[derive(Parser)]
#[command(name = "ecotrack")]
#[command(about = "Track your daily carbon footprint", long_about = None)]
struct Cli {
    /// Data directory (overrides ECOTRACK_HOME)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log a day's activity (usage: log pub:10 elec:12 meat:0.2 date:yesterday)
    Log {
        /// Quantities as key:value; keys may be abbreviated
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show today's emission breakdown
    Today,
    /// Show the logged history grouped by week
    History,
    /// List challenges
    Challenges {
        /// Only show one category (transportation, energy, food, waste, lifestyle)
        #[arg(long)]
        category: Option<String>,
    },
    /// Start a challenge by ID prefix
    Start { id: String },
    /// Complete a challenge by ID prefix
    Complete { id: String },
    /// Show points, level, badges and rollups
    Profile,
    /// List the emission factors
    Factors,
    /// Open the weekly dashboard
    Dashboard,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ECOTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_engine(cli: &Cli) -> Result<Engine> {
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    let store = FileKeyValueStore::new(config.data_dir.clone())?;
    tracing::debug!(dir = %store.base_dir().display(), "using data directory");

    let engine = FootprintAggregator::open(EcoRepository::new(store), SystemClock, config.aggregator_options())
        .context("Could not load stored data")?;

    if config.seed_on_first_run {
        let sample = SampleData::demo(engine.now())?;
        report(engine.seed_if_empty(&sample))?;
    }
    Ok(engine)
}

/// Storage failures after a successful in-memory update are warnings; the
/// rest are fatal to the command.
fn report<T>(result: Result<T, EcoError>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(err) if err.is_degraded() => {
            eprintln!("Warning: {} (changes were not saved)", err);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let engine = open_engine(&cli)?;

    match cli.command {
        Some(Commands::Log { args }) => log_activity(&engine, &args)?,
        Some(Commands::Today) => {
            let record = engine.today_record();
            println!("Today ({}):", record.date().format("%Y-%m-%d"));
            print_record(&record);
        }
        Some(Commands::History) => {
            let histories = HistoryUseCase::new(&engine).get_weekly_history();
            history::show_history(&histories);
        }
        Some(Commands::Challenges { category }) => {
            let category = match category {
                Some(raw) => Some(ChallengeCategory::parse(&raw).ok_or_else(|| anyhow!("Unknown category: {}", raw))?),
                None => None,
            };
            show_challenges(&engine, category);
        }
        Some(Commands::Start { id }) => {
            let id = resolve_challenge(&engine, &id)?;
            if let Some(c) = report(engine.start_challenge(id))? {
                if c.is_completed {
                    println!("'{}' is already completed.", c.title);
                } else if let Some(end) = c.end_date {
                    println!("Started '{}' (ends {})", c.title, end.format("%Y-%m-%d"));
                }
            }
        }
        Some(Commands::Complete { id }) => {
            let id = resolve_challenge(&engine, &id)?;
            if let Some(c) = report(engine.complete_challenge(id))? {
                println!("Completed '{}' (+{} points)", c.title, c.points);
            }
            show_profile(&engine);
        }
        Some(Commands::Profile) | None => show_profile(&engine),
        Some(Commands::Factors) => show_factors(),
        Some(Commands::Dashboard) => dashboard::run(&engine)?,
    }
    Ok(())
}

fn log_activity(engine: &Engine, args: &[String]) -> Result<()> {
    let parsed = parse_args(args);
    if parsed.pairs.is_empty() {
        bail!("Nothing to log. Example: log pub:10 elec:12 meat:0.2");
    }
    if !parsed.words.is_empty() {
        println!("Warning: ignoring '{}'", parsed.words.join(" "));
    }

    let date = match parsed.get("date") {
        Some(raw) => parse_human_date(raw, engine.now())?,
        None => engine.now(),
    };

    let mut input = ActivityInput::default();
    for (key, value) in parsed.pairs.iter().filter(|(k, _)| k != "date") {
        let quantity = parse_quantity(value)?;
        input.set(key, quantity)?;
    }

    let record = input.into_record(date)?;
    let logged = record.clone();
    report(engine.add_record(record))?;

    println!("Logged {:.2} kg CO2e for {}", logged.total_emission(), logged.date().format("%Y-%m-%d"));
    print_record(&logged);
    Ok(())
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "kg CO2e")]
    emission: String,
}

fn print_record(record: &FootprintRecord) {
    let mut rows: Vec<BreakdownRow> = EmissionCategory::ALL
        .iter()
        .map(|c| BreakdownRow {
            category: c.label().to_string(),
            emission: format!("{:.2}", record.category_emission(*c)),
        })
        .collect();
    rows.push(BreakdownRow {
        category: "Total".to_string(),
        emission: format!("{:.2}", record.total_emission()),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

#[derive(Tabled)]
struct ChallengeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Points")]
    points: u32,
    #[tabled(rename = "Days")]
    days: u32,
    #[tabled(rename = "Status")]
    status: String,
}

fn show_challenges(engine: &Engine, category: Option<ChallengeCategory>) {
    let now = engine.now();
    let challenges = engine.challenges_in_category(category);
    if challenges.is_empty() {
        println!("No challenges found.");
        return;
    }

    let rows: Vec<ChallengeRow> = challenges
        .iter()
        .map(|c| {
            let dto = ChallengeDto::from_entity(c, now);
            let status = if dto.status == "In progress" {
                format!("{} ({:.0}%, {}d left)", dto.status, dto.progress * 100.0, dto.remaining_days)
            } else {
                dto.status
            };
            ChallengeRow {
                id: dto.id.to_string()[..8].to_string(),
                title: dto.title,
                category: dto.category,
                points: dto.points,
                days: dto.duration_days,
                status,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn resolve_challenge(engine: &Engine, prefix: &str) -> Result<Uuid> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Challenge ID is required");
    }
    let matches: Vec<Uuid> = engine
        .challenges()
        .iter()
        .map(|c| c.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(anyhow!("No challenge with ID '{}'", prefix)),
        _ => Err(anyhow!("Ambiguous challenge ID '{}' ({} matches)", prefix, matches.len())),
    }
}

fn show_profile(engine: &Engine) {
    let profile = engine.profile();
    println!("\x1b[1;36m{}\x1b[0m  Lv.{} {}", profile.username, profile.level, profile.level_title());
    match profile.points_to_next_level() {
        Some(n) => println!("  Points: {} ({} to next level)", profile.total_points, n),
        None => println!("  Points: {} (max level)", profile.total_points),
    }
    println!("  Member since {}", profile.join_date.format("%Y-%m-%d"));
    println!("  Weekly emission:  {:.1} kg CO2e", profile.weekly_emission);
    println!("  Monthly emission: {:.1} kg CO2e", profile.monthly_emission);
    println!("  Yearly emission:  {:.1} kg CO2e", profile.yearly_emission);

    if profile.badges.is_empty() {
        println!("  Badges: none yet");
    } else {
        println!("  Badges:");
        for badge in &profile.badges {
            println!("    - {} ({})", badge.name, badge.description);
        }
    }
}

#[derive(Tabled)]
struct FactorRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Input")]
    input: &'static str,
    #[tabled(rename = "Unit")]
    unit: &'static str,
    #[tabled(rename = "kg CO2e / unit")]
    factor: String,
}

fn show_factors() {
    let rows: Vec<FactorRow> = EmissionCategory::ALL
        .iter()
        .flat_map(|c| {
            c.factors().iter().map(move |f| FactorRow {
                category: c.label(),
                input: f.input,
                unit: f.unit,
                factor: format!("{:.2}", f.factor),
            })
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{}", table);
}
