use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use vitalis::error::InputError;
use vitalis::fatigue::suggest_focus;
use vitalis::logging::{init_logging, LogLevel};
use vitalis::models::{
    AiContext, BodyRegion, BodyStatus, DailyNutrition, ExerciseCatalogEntry, Goal, InsightKind,
    MuscleGroup, MuscleStatus, Sex, UserProfile, WorkoutRecord,
};
use vitalis::records::detect_personal_records;
use vitalis::streaks::{consistency_grid, current_streak, DEFAULT_GRID_DAYS};
use vitalis::targets::derive_targets;
use vitalis::{AppConfig, ExerciseCatalog, VitalisError};

/// Vitalis - Health insight engine CLI
///
/// Evaluates nutrition and training snapshots into insights, a recovery
/// score and a per-region body fatigue map.
#[derive(Parser)]
#[command(name = "vitalis")]
#[command(version)]
#[command(about = "Health insight and fatigue engine", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate insights and the recovery score for a context snapshot
    Insights {
        /// Context JSON file
        #[arg(short = 'i', long)]
        context: PathBuf,

        /// Maximum number of insights (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print only the recovery score for a context snapshot
    Score {
        /// Context JSON file
        #[arg(short = 'i', long)]
        context: PathBuf,
    },

    /// Derive body fatigue status from workout history
    Body {
        /// Workouts JSON file (array of workouts)
        #[arg(short, long)]
        workouts: PathBuf,

        /// Exercise catalog JSON file (built-in catalog if omitted)
        #[arg(short = 'k', long)]
        catalog: Option<PathBuf>,

        /// Evaluation instant, RFC 3339 (defaults to now)
        #[arg(short, long)]
        now: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Derive daily calorie and macro targets from biometrics
    Targets {
        #[arg(long)]
        age: u16,

        #[arg(long, value_enum)]
        sex: SexArg,

        /// Height in centimeters
        #[arg(long)]
        height: Decimal,

        /// Weight in kilograms
        #[arg(long)]
        weight: Decimal,

        #[arg(long, value_enum, default_value = "maintenance")]
        goal: GoalArg,

        /// Activity multiplier (1.2 sedentary .. 1.9 very active)
        #[arg(long, default_value = "1.55")]
        activity: Decimal,
    },

    /// Detect personal records set by a workout
    Records {
        /// Workout JSON file
        #[arg(short, long)]
        workout: PathBuf,

        /// History JSON file (array of workouts)
        #[arg(long)]
        history: PathBuf,
    },

    /// Show the consistency grid for recent days
    Streak {
        /// Workouts JSON file (array of workouts)
        #[arg(short, long)]
        workouts: PathBuf,

        /// Nutrition JSON file (array of daily totals)
        #[arg(short = 'u', long)]
        nutrition: Option<PathBuf>,

        /// Number of days to show
        #[arg(short, long, default_value_t = DEFAULT_GRID_DAYS)]
        days: u32,

        /// Last day of the grid, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },

    /// List exercises in the built-in catalog
    Catalog {
        /// Only show one muscle group (e.g. chest, upper_back)
        #[arg(short, long)]
        muscle: Option<MuscleGroup>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    Muscle,
    FatLoss,
    Maintenance,
}

#[derive(Tabled)]
struct InsightRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Insight")]
    message: String,
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Muscle Group")]
    muscle_group: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<VitalisError>() {
            Some(vitalis_err) => {
                if vitalis_err.severity().to_tracing_level() == tracing::Level::WARN {
                    tracing::warn!(error = %vitalis_err, "Command rejected input");
                } else {
                    tracing::error!(error = %vitalis_err, "Command failed");
                }
                eprintln!("{} {}", "Error:".red().bold(), vitalis_err.user_message());
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref());

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Insights {
            context,
            limit,
            json,
        } => {
            let ctx: AiContext = read_json(&context, "context")?;
            let engine = config.insight_engine();
            let mut evaluation = engine.evaluate(&ctx);
            if let Some(limit) = limit {
                evaluation.insights = engine.generate_insights(&ctx, limit);
            }
            tracing::info!(insights = evaluation.insights.len(), "Generated insights");

            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
                return Ok(());
            }

            let rows: Vec<InsightRow> = evaluation
                .insights
                .iter()
                .map(|insight| InsightRow {
                    kind: colorize_kind(insight.kind),
                    category: insight.category.to_string(),
                    message: insight.message.clone(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!(
                "Recovery score: {} ({})",
                evaluation.recovery_score.to_string().bold(),
                evaluation.recovery_band.description()
            );
            if let Some(avg) = ctx.weekly_average_calories() {
                println!("Weekly average intake: {} kcal", avg.round());
            }
        }

        Commands::Score { context } => {
            let ctx: AiContext = read_json(&context, "context")?;
            let score = config.insight_engine().calculate_recovery_score(&ctx);
            println!("{}", score);
        }

        Commands::Body {
            workouts,
            catalog,
            now,
            json,
        } => {
            let history: Vec<WorkoutRecord> = read_json(&workouts, "workouts")?;
            let catalog = match catalog {
                Some(path) => ExerciseCatalog::from_json(&read_text(&path)?)?,
                None => ExerciseCatalog::builtin(),
            };
            let now = match now {
                Some(raw) => parse_instant(&raw)?,
                None => Utc::now(),
            };

            let model = config.fatigue_model(catalog);
            let status = model.derive_body_status(&history, now);
            tracing::info!(workouts = history.len(), "Derived body status");

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }
            print_body_status(&status);
            println!("{}", suggest_focus(&status).cyan());
        }

        Commands::Targets {
            age,
            sex,
            height,
            weight,
            goal,
            activity,
        } => {
            let profile = UserProfile {
                name: None,
                age,
                sex: match sex {
                    SexArg::Male => Sex::Male,
                    SexArg::Female => Sex::Female,
                },
                height_cm: height,
                weight_kg: weight,
                goal: match goal {
                    GoalArg::Muscle => Goal::Muscle,
                    GoalArg::FatLoss => Goal::FatLoss,
                    GoalArg::Maintenance => Goal::Maintenance,
                },
                activity_level: activity,
                calorie_target: Decimal::ZERO,
                protein_target: Decimal::ZERO,
                carbs_target: Decimal::ZERO,
                fats_target: Decimal::ZERO,
            };
            let targets = derive_targets(&profile)?;

            println!("{}", format!("Daily targets ({})", profile.goal).green().bold());
            println!("  BMR:      {} kcal", targets.bmr);
            println!("  TDEE:     {} kcal", targets.tdee);
            println!("  Calories: {} kcal", targets.calories);
            println!("  Protein:  {} g", targets.macros.protein);
            println!("  Carbs:    {} g", targets.macros.carbs);
            println!("  Fats:     {} g", targets.macros.fats);
        }

        Commands::Records { workout, history } => {
            let workout: WorkoutRecord = read_json(&workout, "workout")?;
            let history: Vec<WorkoutRecord> = read_json(&history, "history")?;
            let records = detect_personal_records(&workout, &history);

            if records.is_empty() {
                println!("{}", "No personal records this session".dimmed());
            }
            for record in records {
                println!("{} {}", "🏆".yellow(), record);
            }
        }

        Commands::Streak {
            workouts,
            nutrition,
            days,
            today,
        } => {
            let history: Vec<WorkoutRecord> = read_json(&workouts, "workouts")?;
            let nutrition: Vec<DailyNutrition> = match nutrition {
                Some(path) => read_json(&path, "nutrition")?,
                None => Vec::new(),
            };
            let workout_days: Vec<NaiveDate> = history
                .iter()
                .filter(|w| w.is_completed())
                .map(WorkoutRecord::date)
                .collect();
            let nutrition_days: Vec<NaiveDate> = nutrition.iter().map(|n| n.date).collect();
            let today = today.unwrap_or_else(|| Utc::now().date_naive());

            let grid = consistency_grid(&workout_days, &nutrition_days, today, days);
            let cells: String = grid
                .iter()
                .map(|day| match day.activity_level {
                    3 => "■".green().to_string(),
                    2 => "■".blue().to_string(),
                    1 => "■".yellow().to_string(),
                    _ => "□".dimmed().to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", cells);
            println!("Current streak: {} days", current_streak(&grid));
        }

        Commands::Catalog { muscle } => {
            let catalog = ExerciseCatalog::builtin();
            let entries: Vec<&ExerciseCatalogEntry> = match muscle {
                Some(group) => catalog.by_muscle_group(group).collect(),
                None => catalog.iter().collect(),
            };
            let rows: Vec<ExerciseRow> = entries
                .into_iter()
                .map(|e| ExerciseRow {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    muscle_group: e.muscle_group.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Config {
            list,
            set,
            get,
            init,
        } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);

            if init {
                AppConfig::init_file(&path)?;
                println!("{} {}", "✓ Wrote default configuration to".green(), path.display());
            } else if list {
                for (key, value) in AppConfig::load_for_update(&path)?.entries()? {
                    println!("{} = {}", key.bold(), value);
                }
            } else if let Some(key_value) = set {
                let (key, value) = key_value.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("Expected key=value, got '{}'", key_value)
                })?;
                // Edit what is on disk, not the fallback used by other commands
                let mut stored = AppConfig::load_for_update(&path)?;
                stored.set(key.trim(), value.trim())?;
                stored.save_to_file(&path)?;
                println!("{} {} = {}", "✓".green(), key.trim(), value.trim());
            } else if let Some(key) = get {
                println!("{}", AppConfig::load_for_update(&path)?.get(&key)?);
            } else {
                println!("Configuration file: {}", path.display());
            }
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> vitalis::Result<String> {
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(std::fs::read_to_string(path)?)
}

fn read_json<T: DeserializeOwned>(path: &Path, document: &str) -> vitalis::Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| {
        InputError::Malformed {
            document: document.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn parse_instant(raw: &str) -> vitalis::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            InputError::InvalidTimestamp {
                value: raw.to_string(),
            }
            .into()
        })
}

fn colorize_kind(kind: InsightKind) -> String {
    match kind {
        InsightKind::Warning => kind.to_string().red().to_string(),
        InsightKind::Tip => kind.to_string().yellow().to_string(),
        InsightKind::Achievement => kind.to_string().green().to_string(),
    }
}

fn print_body_status(status: &BodyStatus) {
    let rows: Vec<RegionRow> = BodyRegion::ALL
        .iter()
        .map(|region| {
            let state = status.get(*region);
            let label = state.to_string();
            RegionRow {
                region: region.to_string(),
                status: match state {
                    MuscleStatus::Fresh => label.green().to_string(),
                    MuscleStatus::Recovering => label.yellow().to_string(),
                    MuscleStatus::Fatigued => label.red().to_string(),
                    MuscleStatus::Target => label.cyan().to_string(),
                },
            }
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}
