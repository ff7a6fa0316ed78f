use chrono::Duration;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use revise::RevisionScheduler;
use revise::domain::{DifficultyLevel, Problem, RevisionStore, SolvedEvent};
use revise::format::{relative_day, time_ago};
use revise::scheduler::calendar_link;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revise")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("revise.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_scheduler(config: &Config) -> Result<RevisionScheduler> {
    let storage = config.storage.open()?;
    Ok(RevisionScheduler::new(storage).with_policy(config.scheduling.policy))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let scheduler = build_scheduler(config)?;

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!(
            "  storage: {:?} at {}",
            config.storage.backend,
            config.storage.path.display()
        );
        println!("  policy: {}", scheduler.policy());
    }

    match &cli.command {
        // Default: what needs revising right now
        None | Some(Commands::Due) => handle_due_command(&scheduler),
        Some(Commands::Add {
            name,
            link,
            mistakes,
            minutes,
            solved_at,
        }) => {
            let mut event = SolvedEvent::new(name.as_str(), link.as_str(), *mistakes, *minutes);
            event.solved_date = *solved_at;
            handle_add_command(&scheduler, &event)
        }
        Some(Commands::Ingest { file }) => handle_ingest_command(&scheduler, file.as_deref()),
        Some(Commands::Complete { id, hard }) => handle_complete_command(&scheduler, id, !*hard),
        Some(Commands::Upcoming { days }) => {
            handle_upcoming_command(&scheduler, days.unwrap_or(config.scheduling.upcoming_days))
        }
        Some(Commands::List) => handle_list_command(&scheduler),
        Some(Commands::Stats) => handle_stats_command(&scheduler),
        Some(Commands::Show { id }) => handle_show_command(&scheduler, id, config.scheduling.projected_revisions),
        Some(Commands::Calendar { id }) => handle_calendar_command(&scheduler, id),
        Some(Commands::Tasks { id, count }) => {
            handle_tasks_command(&scheduler, id, count.unwrap_or(config.scheduling.projected_revisions))
        }
        Some(Commands::Remove { id }) => handle_remove_command(&scheduler, id),
        Some(Commands::Clear { yes }) => handle_clear_command(&scheduler, *yes),
        Some(Commands::Export { file }) => handle_export_command(&scheduler, file.as_deref()),
        Some(Commands::Import { file }) => handle_import_command(&scheduler, file),
    }
}

fn level_label(level: DifficultyLevel) -> ColoredString {
    match level {
        DifficultyLevel::Easy => level.as_str().green(),
        DifficultyLevel::Medium => level.as_str().yellow(),
        DifficultyLevel::Hard => level.as_str().red(),
    }
}

fn print_problem_line(problem: &Problem, scheduler: &RevisionScheduler) {
    let now = scheduler.now();
    let next = if problem.is_due(now) {
        "due now".red().bold()
    } else {
        relative_day(problem.next_revision_date, now).cyan()
    };
    println!(
        "  {}  {} [{}]  next: {}  solved {}",
        problem.id.dimmed(),
        problem.name.bold(),
        level_label(problem.difficulty_level),
        next,
        time_ago(problem.solved_date, now)
    );
}

fn print_problems(problems: &[Problem], scheduler: &RevisionScheduler, empty: &str) {
    if problems.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for problem in problems {
        print_problem_line(problem, scheduler);
    }
}

fn handle_add_command(scheduler: &RevisionScheduler, event: &SolvedEvent) -> Result<()> {
    info!("Adding problem: {}", event.link);
    let problem = scheduler.add_problem(event).context("Failed to add problem")?;
    println!(
        "{} {} ({}, score {})",
        "Tracking:".green(),
        problem.name,
        level_label(problem.difficulty_level),
        problem.difficulty_score
    );
    println!(
        "  next revision: {}",
        relative_day(problem.next_revision_date, scheduler.now()).cyan()
    );
    Ok(())
}

fn handle_ingest_command(scheduler: &RevisionScheduler, file: Option<&Path>) -> Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };
    let event: SolvedEvent = serde_json::from_str(&raw).context("Failed to parse solved event")?;
    handle_add_command(scheduler, &event)
}

fn handle_complete_command(scheduler: &RevisionScheduler, id: &str, was_easy: bool) -> Result<()> {
    info!("Completing revision: {} (easy: {})", id, was_easy);
    let problem = scheduler
        .complete_revision(id, was_easy)
        .context(format!("Failed to complete revision of {}", id))?;
    let verdict = if was_easy { "Revised:".green() } else { "Struggled:".yellow() };
    println!("{} {} (revision #{})", verdict, problem.name, problem.revision_history.len());
    println!(
        "  next revision: {}",
        relative_day(problem.next_revision_date, scheduler.now()).cyan()
    );
    Ok(())
}

fn handle_due_command(scheduler: &RevisionScheduler) -> Result<()> {
    let due = scheduler.problems_for_revision(scheduler.now())?;
    println!("{} {}", "Due for revision:".cyan(), due.len());
    print_problems(&due, scheduler, "  nothing to revise");
    Ok(())
}

fn handle_upcoming_command(scheduler: &RevisionScheduler, days: u32) -> Result<()> {
    let upcoming = scheduler.upcoming_problems(scheduler.now(), Duration::days(i64::from(days)))?;
    println!("{} {} (next {} days)", "Upcoming:".cyan(), upcoming.len(), days);
    print_problems(&upcoming, scheduler, "  nothing scheduled");
    Ok(())
}

fn handle_list_command(scheduler: &RevisionScheduler) -> Result<()> {
    let problems = scheduler.all_problems()?;
    println!("{} {}", "Tracked problems:".cyan(), problems.len());
    print_problems(&problems, scheduler, "  no problems tracked yet");
    Ok(())
}

fn handle_stats_command(scheduler: &RevisionScheduler) -> Result<()> {
    let stats = scheduler.revision_stats(scheduler.now())?;
    println!("{}", "Revision stats".cyan().bold());
    println!("  total problems:      {}", stats.total_problems);
    println!("  due for revision:    {}", stats.due_for_revision);
    println!("  completed revisions: {}", stats.completed_revisions);
    for (level, count) in &stats.difficulty_breakdown {
        println!("  {:<20} {}", format!("{}:", level_label(*level)), count);
    }
    Ok(())
}

fn handle_show_command(scheduler: &RevisionScheduler, id: &str, projected: usize) -> Result<()> {
    let problem = scheduler.problem(id).context(format!("Failed to load {}", id))?;
    let now = scheduler.now();

    println!("{} {}", problem.name.bold(), problem.id.dimmed());
    println!("  link:       {}", problem.link);
    println!(
        "  difficulty: {} (score {})",
        level_label(problem.difficulty_level),
        problem.difficulty_score
    );
    println!("  mistakes:   {}", problem.mistakes);
    println!("  time:       {} minutes", problem.time_in_minutes);
    println!("  solved:     {}", time_ago(problem.solved_date, now));
    println!("  revisions:  {}", problem.revision_count);
    if let Some(last) = problem.last_revised_date {
        println!("  last:       {}", time_ago(last, now));
    }
    println!("  next:       {}", relative_day(problem.next_revision_date, now).cyan());

    let dates = scheduler.projected_revisions(&problem, projected);
    if dates.len() > 1 {
        println!("  {}", "if every revision goes well:".dimmed());
        for date in dates.iter().skip(1) {
            println!("    {}", relative_day(*date, now));
        }
    }
    Ok(())
}

fn handle_calendar_command(scheduler: &RevisionScheduler, id: &str) -> Result<()> {
    let problem = scheduler.problem(id).context(format!("Failed to load {}", id))?;
    let task = scheduler.revision_task(&problem);
    println!(
        "{} {} ({})",
        "Next revision:".cyan(),
        task.title,
        relative_day(task.start, scheduler.now())
    );
    println!("{}", calendar_link(&problem));
    Ok(())
}

fn handle_tasks_command(scheduler: &RevisionScheduler, id: &str, count: usize) -> Result<()> {
    let problem = scheduler.problem(id).context(format!("Failed to load {}", id))?;
    let tasks = scheduler.revision_tasks(&problem, count);
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}

fn handle_remove_command(scheduler: &RevisionScheduler, id: &str) -> Result<()> {
    let removed = scheduler.remove_problem(id).context(format!("Failed to remove {}", id))?;
    println!("{} {}", "Removed:".red(), removed.name);
    Ok(())
}

fn handle_clear_command(scheduler: &RevisionScheduler, yes: bool) -> Result<()> {
    if !yes {
        println!("{}", "Refusing to clear without --yes".yellow());
        return Ok(());
    }
    scheduler.clear_all_data().context("Failed to clear revision data")?;
    println!("{}", "All revision data cleared".red());
    Ok(())
}

fn handle_export_command(scheduler: &RevisionScheduler, file: Option<&Path>) -> Result<()> {
    let store = scheduler.export()?;
    let json = serde_json::to_string_pretty(&store)?;
    match file {
        Some(path) => {
            fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
            println!("{} {} problems to {}", "Exported".green(), store.problems.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn handle_import_command(scheduler: &RevisionScheduler, file: &Path) -> Result<()> {
    let raw = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let store: RevisionStore = serde_json::from_str(&raw).context("Failed to parse revision store")?;
    let count = scheduler.import(store).context("Failed to import revision store")?;
    println!("{} {} problems", "Imported".green(), count);
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with the configured default level
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
