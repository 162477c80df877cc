//! Questlog - Gamified daily habit tracker
//!
//! Thin presentation layer over the progression engine: every subcommand
//! calls one engine entry point (plus read-only projections), prints the
//! outcome and persists the updated snapshot.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use questlog::achievements::{self, ACHIEVEMENTS};
use questlog::clock;
use questlog::config::{self, TrackerConfig};
use questlog::ledger;
use questlog::motivation;
use questlog::persistence::StateStore;
use questlog::progression::{self, Rank};
use questlog::registry;
use questlog::state::{season_info, Category};
use questlog::Difficulty;

#[derive(Parser)]
#[command(name = "questlog")]
#[command(version = "0.1.0")]
#[command(about = "Gamified daily habit tracker - levels, ranks, streaks and achievements", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "QUESTLOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Named save slot (defaults to the default slot)
    #[arg(long, global = true)]
    slot: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the level, rank and season dashboard
    Status,

    /// Manage the task catalog
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Complete a task for today
    Complete {
        /// Task id
        id: u32,
    },

    /// Undo one of today's completions (progression already granted stays)
    Undo {
        /// Task id
        id: u32,
    },

    /// Show today's quests and their completion state
    Today,

    /// Show the current completion streak
    Streak,

    /// Show statistics and history
    Stats,

    /// Show earned and locked achievements
    Achievements,

    /// Claim the once-a-day bonus
    Bonus,

    /// Export the snapshot to a file
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Import a snapshot from a previously exported file
    Import {
        /// Source file
        path: PathBuf,
    },

    /// Reset all progress to a fresh state
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        force: bool,
    },

    /// Start a new season (keeps tasks and lifetime counters)
    Season {
        /// Season number
        number: u32,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a new task
    Add {
        /// Task name
        name: String,

        /// Difficulty: common, rare, epic, or legendary
        #[arg(short, long, default_value = "common")]
        difficulty: Difficulty,

        /// Base experience (5-200), before the difficulty multiplier
        #[arg(short, long, default_value = "10")]
        exp: u32,

        /// Category, e.g. fitness or learning
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// List all tasks
    List,

    /// Delete a task (completion history is kept)
    Delete {
        /// Task id
        id: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "questlog=debug,info"
    } else {
        "questlog=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Resolve data directory: flag wins over the config override.
    let base_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(config::default_data_dir);
    let config = TrackerConfig::load(&base_dir)?;
    let data_dir = match (&cli.data_dir, &config.data_dir) {
        (Some(flag), _) => flag.clone(),
        (None, Some(configured)) => configured.clone(),
        (None, None) => base_dir,
    };

    let store = match &cli.slot {
        Some(slot) => StateStore::with_slot(&data_dir, slot),
        None => StateStore::new(&data_dir),
    };
    let mut state = store.load()?.unwrap_or_default();
    let today = clock::today();

    match cli.command {
        Commands::Status => {
            let best_before = state.best_streak;
            let streak = ledger::streak(&mut state, today);
            let season = season_info(state.season);
            let done_today = ledger::completions_for(&state, today).len();

            println!(
                "\n{} Season {}: {} ({} - {})",
                "Questlog".cyan().bold(),
                state.season,
                season.name,
                season.start,
                season.end
            );
            println!("{}", "─".repeat(50));
            println!(
                "   Level {}  {}  {}/{} EXP",
                state.level.to_string().bold(),
                progress_bar(state.experience, state.experience_needed, 20),
                state.experience,
                state.experience_needed
            );
            match Rank::points_to_next(state.rank_points) {
                Some(missing) => println!(
                    "   Rank {} ({} pts, {} to next tier)",
                    state.rank.to_string().yellow().bold(),
                    state.rank_points,
                    missing
                ),
                None => println!(
                    "   Rank {} ({} pts, top tier)",
                    state.rank.to_string().yellow().bold(),
                    state.rank_points
                ),
            }
            println!(
                "   Streak {} days (best {})",
                streak.to_string().bold(),
                state.best_streak
            );
            println!("   Today {}/{} quests done", done_today, state.tasks.len());

            if state.best_streak != best_before {
                store.save(&state)?;
            }
        }

        Commands::Task { action } => match action {
            TaskAction::Add {
                name,
                difficulty,
                exp,
                category,
            } => {
                let id = registry::add_task(&mut state, name, difficulty, exp, category)?;
                store.save(&state)?;
                let task = registry::find_task(&state, id).expect("task just added");
                println!(
                    "{} Quest #{} added: {} [{}] {} EXP",
                    "OK".green(),
                    id,
                    task.name,
                    task.difficulty,
                    registry::effective_experience(task)
                );
            }
            TaskAction::List => {
                if state.tasks.is_empty() {
                    println!("No quests yet. Add one with `questlog task add <name>`.");
                } else {
                    println!("\n{} Task catalog", "Questlog".cyan().bold());
                    println!("{}", "─".repeat(50));
                    for task in &state.tasks {
                        let category = task
                            .category
                            .map(|c| format!(" ({c})"))
                            .unwrap_or_default();
                        println!(
                            "   #{:<3} {} [{}] {} EXP{}",
                            task.id,
                            task.name.bold(),
                            task.difficulty,
                            registry::effective_experience(task),
                            category.dimmed()
                        );
                    }
                }
            }
            TaskAction::Delete { id } => {
                if registry::delete_task(&mut state, id) {
                    store.save(&state)?;
                    println!("{} Quest #{} deleted (history kept)", "OK".green(), id);
                } else {
                    println!("{} No quest with id {}", "Skip:".yellow(), id);
                }
            }
        },

        Commands::Complete { id } => {
            if registry::find_task(&state, id).is_none() {
                println!("{} No quest with id {}", "Skip:".yellow(), id);
            } else {
                let result =
                    ledger::record_completion(&mut state, id, today, config.dedupe_completions);
                if result.awarded == 0 {
                    println!("{} Quest #{} already done today", "Skip:".yellow(), id);
                } else {
                    println!(
                        "{} +{} EXP",
                        "Quest complete!".green().bold(),
                        result.awarded
                    );
                    if result.leveled_up {
                        let mut rng = rand::thread_rng();
                        println!(
                            "{} Welcome to level {}!",
                            "LEVEL UP!".magenta().bold(),
                            state.level
                        );
                        println!("   {}", motivation::pick_message(&mut rng).italic());
                    }
                    for unlocked in achievements::check_achievements(&mut state, today) {
                        let def = achievements::definition(unlocked);
                        println!(
                            "{} {} - {}",
                            "Achievement unlocked:".yellow().bold(),
                            def.name.bold(),
                            def.description
                        );
                    }
                }
                store.save(&state)?;
            }
        }

        Commands::Undo { id } => {
            if ledger::undo_completion(&mut state, id, today) {
                store.save(&state)?;
                println!(
                    "{} Quest #{} unmarked for today (earned progression stays)",
                    "OK".green(),
                    id
                );
            } else {
                println!("{} Quest #{} was not done today", "Skip:".yellow(), id);
            }
        }

        Commands::Today => {
            let done_today = ledger::completions_for(&state, today).to_vec();
            println!(
                "\n{} {} - {}/{} done",
                "Today's Quests".cyan().bold(),
                clock::day_key(today),
                done_today.len(),
                state.tasks.len()
            );
            println!("{}", "─".repeat(50));
            if state.tasks.is_empty() {
                println!("   No quests yet. Add one with `questlog task add <name>`.");
            }
            for task in &state.tasks {
                let marker = if done_today.contains(&task.id) {
                    "x".green()
                } else {
                    "·".normal()
                };
                println!(
                    "   [{}] #{:<3} {} [{}] {} EXP",
                    marker,
                    task.id,
                    task.name,
                    task.difficulty,
                    registry::effective_experience(task)
                );
            }
        }

        Commands::Streak => {
            let best_before = state.best_streak;
            let streak = ledger::streak(&mut state, today);
            println!(
                "{} {} days (best {})",
                "Streak:".cyan().bold(),
                streak,
                state.best_streak
            );
            if state.best_streak != best_before {
                store.save(&state)?;
            }
        }

        Commands::Stats => {
            let active_days = ledger::active_days(&state);
            let average = if active_days > 0 {
                state.total_tasks_completed as f64 / active_days as f64
            } else {
                0.0
            };

            println!("\n{} Statistics", "Questlog".cyan().bold());
            println!("{}", "─".repeat(50));
            println!("   Total completed: {}", state.total_tasks_completed);
            println!(
                "   Total experience earned: {}",
                state.total_experience_earned
            );
            println!("   Active days: {}", active_days);
            println!("   Average per day: {:.1}", average);

            println!("\n   {}", "Last 30 days".bold());
            for (day, count) in ledger::recent_activity(&state, today, 30) {
                if count > 0 {
                    println!(
                        "   {} {} {}",
                        clock::day_key(day),
                        "█".repeat(count.min(20)),
                        count
                    );
                }
            }

            let per_task = ledger::completion_counts(&state);
            if !per_task.is_empty() {
                println!("\n   {}", "Per quest".bold());
                for (id, count) in &per_task {
                    let name = registry::find_task(&state, *id)
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| format!("(deleted #{id})"));
                    println!("   {:<24} {}", name, count);
                }
            }

            let per_category = ledger::category_counts(&state);
            if !per_category.is_empty() {
                println!("\n   {}", "Per category".bold());
                for (category, count) in &per_category {
                    let label = category
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "uncategorized".to_string());
                    println!("   {:<24} {}", label, count);
                }
            }
        }

        Commands::Achievements => {
            println!(
                "\n{} Achievements ({}/{})",
                "Questlog".cyan().bold(),
                state.achievements.len(),
                ACHIEVEMENTS.len()
            );
            println!("{}", "─".repeat(50));
            for def in ACHIEVEMENTS {
                if state.achievements.contains(&def.id) {
                    println!("   {} {} - {}", "*".yellow(), def.name.bold(), def.description);
                } else {
                    println!("   {} {} - {}", " ", def.name.dimmed(), def.description.dimmed());
                }
            }
        }

        Commands::Bonus => {
            let bonus = progression::claim_daily_bonus(&mut state, today);
            if bonus == 0 {
                println!("{} Daily bonus already claimed today", "Skip:".yellow());
            } else {
                println!("{} +{} EXP daily bonus", "OK".green().bold(), bonus);
            }
            store.save(&state)?;
        }

        Commands::Export { path } => {
            StateStore::export(&state, &path)?;
            println!("{} Snapshot exported to {}", "OK".green(), path.display());
        }

        Commands::Import { path } => {
            let imported = StateStore::import(&path)?;
            let location = store.save(&imported)?;
            println!(
                "{} Snapshot imported from {} into {}",
                "OK".green(),
                path.display(),
                location.display()
            );
        }

        Commands::Reset { force } => {
            if !force {
                eprintln!(
                    "{} This will delete ALL progress. Use --force to confirm.",
                    "Warning:".yellow().bold()
                );
                std::process::exit(1);
            }
            state.reset();
            store.save(&state)?;
            println!("{} Progress reset", "OK".green().bold());
        }

        Commands::Season { number } => {
            state.start_season(number);
            store.save(&state)?;
            let season = season_info(state.season);
            println!(
                "{} Season {} started: {}",
                "OK".green().bold(),
                state.season,
                season.name
            );
        }
    }

    Ok(())
}

/// Renders a fixed-width experience bar.
fn progress_bar(current: u32, needed: u32, width: usize) -> String {
    let filled = if needed == 0 {
        width
    } else {
        (current as usize * width / needed as usize).min(width)
    };
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
