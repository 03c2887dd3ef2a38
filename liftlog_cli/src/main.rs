use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liftlog_core::stats::{level_progress, xp_floor};
use liftlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength training plan and progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the training split for a weekly availability
    Split {
        /// Training days per week (defaults to the saved availability)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show plan days with each pattern resolved to your exercise
    Plan {
        /// Training days per week (defaults to the saved availability)
        #[arg(long)]
        days: Option<u32>,
    },

    /// List predefined plans and their day ids
    Plans,

    /// Choose the exercise used for a movement pattern
    Prefer {
        pattern: String,
        exercise: String,
    },

    /// Save your weekly availability
    Availability { days: u32 },

    /// Log a session
    Log {
        /// Plan id (a predefined plan, or split-N for the generated split)
        #[arg(long)]
        plan: Option<String>,

        /// Day id within the plan, or its 1-based number
        #[arg(long)]
        day: Option<String>,

        /// Session date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Start from the exercises of a past session (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["plan", "day"])]
        template: Option<NaiveDate>,

        #[arg(long, default_value_t = 0.0)]
        body_weight: f64,

        /// Performed set as EXERCISE:WEIGHTxREPS[@RIR], exercise is 1-based
        #[arg(long = "set")]
        sets: Vec<String>,
    },

    /// Show logged sessions, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show level, personal bests and achievements
    Stats,

    /// Export history to CSV, one row per set
    Export { path: PathBuf },
}

impl Commands {
    /// View the command renders
    fn view(&self) -> ActiveView {
        match self {
            Commands::Split { .. }
            | Commands::Plan { .. }
            | Commands::Plans
            | Commands::Prefer { .. }
            | Commands::Availability { .. } => ActiveView::Plan,
            Commands::Log { .. } => ActiveView::Log,
            Commands::History { .. } | Commands::Export { .. } => ActiveView::History,
            Commands::Stats => ActiveView::Stats,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let session = StaticSession::new(cli.user.or_else(|| config.user.id.clone()));

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let store = JsonFileStore::new(data_dir);
    let mut tracker = match Tracker::open(store, catalog, &session) {
        Ok(tracker) => tracker,
        Err(Error::NotAuthenticated) => {
            eprintln!("Not signed in: pass --user or set [user] id in the config file.");
            return Err(Error::NotAuthenticated);
        }
        Err(e) => return Err(e),
    };
    let generator = SplitGenerator::new(catalog, &config.split)?;
    tracing::debug!("Showing {:?} view", cli.command.view());

    match cli.command {
        Commands::Split { days } => {
            let days = days.unwrap_or(tracker.stats().weekly_availability);
            cmd_split(&generator.generate(days));
        }
        Commands::Plan { days } => {
            let days = days.unwrap_or(tracker.stats().weekly_availability);
            cmd_plan(&generator.generate(days), &tracker.stats().exercise_preferences);
        }
        Commands::Plans => cmd_plans(tracker.plans()),
        Commands::Prefer { pattern, exercise } => cmd_prefer(&mut tracker, &pattern, &exercise)?,
        Commands::Availability { days } => {
            if !split::SUPPORTED_AVAILABILITY.contains(&days) {
                println!(
                    "Note: {} days is unsupported; the {}-day split will be used.",
                    days, config.split.fallback_days
                );
            }
            tracker.save_weekly_availability(days)?;
            println!("✓ Weekly availability set to {}", days);
        }
        Commands::Log {
            plan,
            day,
            date,
            template,
            body_weight,
            sets,
        } => {
            let generated = generator
                .generate(tracker.stats().weekly_availability)
                .to_training_plan();
            cmd_log(
                &mut tracker,
                &generated,
                LogArgs {
                    plan,
                    day,
                    date,
                    template,
                    body_weight,
                    sets,
                },
            )?
        }
        Commands::History { limit } => {
            let generated = generator
                .generate(tracker.stats().weekly_availability)
                .to_training_plan();
            cmd_history(&tracker, &generated, limit)
        }
        Commands::Stats => cmd_stats(tracker.stats(), &tracker.achievements()),
        Commands::Export { path } => {
            let rows = export::export_history(tracker.history(), &path)?;
            println!("✓ Exported {} sets to {}", rows, path.display());
        }
    }

    Ok(())
}

fn cmd_split(split: &Split) {
    println!("{}-day split", split.weekly_availability);
    for (i, day) in split.days.iter().enumerate() {
        println!();
        println!("Day {}: {}", i + 1, day.kind);
        for bucket in &day.buckets {
            let names: Vec<_> = bucket.patterns.iter().map(|p| p.name.as_str()).collect();
            println!("  {:<18} {}", bucket.group.to_string(), names.join(", "));
        }
    }
}

fn cmd_plan(split: &Split, prefs: &ExercisePreferences) {
    for (i, day) in split.days.iter().enumerate() {
        println!("Day {}: {}", i + 1, day.kind);
        for pattern in day.patterns() {
            let chosen = resolve(pattern, prefs);
            println!(
                "  {:<22} → {} ({} x {}, RIR {})",
                pattern.name, chosen.name, chosen.sets, chosen.reps, chosen.rir
            );
        }
        println!();
    }

    println!("Exercise options (change with `liftlog prefer <pattern> <exercise>`):");
    for pattern in unique_patterns(split) {
        let chosen = resolve(pattern, prefs);
        let options: Vec<_> = pattern
            .options()
            .map(|o| {
                if o.name == chosen.name {
                    format!("[{}]", o.name)
                } else {
                    o.name.clone()
                }
            })
            .collect();
        println!("  {:<22} {}", pattern.name, options.join(" | "));
    }
}

fn cmd_plans(plans: &[TrainingPlan]) {
    for plan in plans {
        println!("{} ({}): {}", plan.name, plan.id, plan.description);
        for (i, day) in plan.days.iter().enumerate() {
            println!("  {}. {} [{}]", i + 1, day.name, day.id);
        }
    }
}

fn cmd_prefer<S: DocumentStore>(tracker: &mut Tracker<'_, S>, pattern: &str, exercise: &str) -> Result<()> {
    if tracker.set_preference(pattern, exercise)? {
        println!("✓ {} → {}", pattern, exercise);
        return Ok(());
    }

    match tracker.catalog().pattern(pattern) {
        Some(p) => {
            let options: Vec<_> = p.options().map(|o| o.name.as_str()).collect();
            Err(Error::Other(format!(
                "'{}' is not an option for {}; choose one of: {}",
                exercise,
                pattern,
                options.join(", ")
            )))
        }
        None => Err(Error::Other(format!("Unknown movement pattern '{}'", pattern))),
    }
}

struct LogArgs {
    plan: Option<String>,
    day: Option<String>,
    date: Option<NaiveDate>,
    template: Option<NaiveDate>,
    body_weight: f64,
    sets: Vec<String>,
}

/// Parse `EXERCISE:WEIGHTxREPS[@RIR]`
fn parse_set(spec: &str) -> Result<(usize, SetEntry)> {
    let invalid = || Error::Other(format!("Invalid set '{}', expected e.g. 1:100x5@2", spec));

    let (index, rest) = spec.split_once(':').ok_or_else(invalid)?;
    let (load, rir) = match rest.split_once('@') {
        Some((load, rir)) => (load, rir.trim().parse().map_err(|_| invalid())?),
        None => (rest, 0),
    };
    let (weight, reps) = load.split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;

    let index: usize = index.trim().parse().map_err(|_| invalid())?;
    let weight: f64 = weight.trim().parse().map_err(|_| invalid())?;
    let reps: u32 = reps.trim().parse().map_err(|_| invalid())?;
    if index == 0 || weight < 0.0 || !weight.is_finite() {
        return Err(invalid());
    }
    Ok((index - 1, SetEntry::new(weight, reps, rir)))
}

fn cmd_log<S: DocumentStore>(tracker: &mut Tracker<'_, S>, generated: &TrainingPlan, args: LogArgs) -> Result<()> {
    let builder = SessionBuilder::new(tracker.catalog());

    let (mut draft, view) = if let Some(template_date) = args.template {
        let entry = tracker
            .history()
            .iter()
            .find(|e| e.date == template_date)
            .ok_or_else(|| Error::Other(format!("No session logged on {}", template_date)))?;
        builder.from_template(entry)
    } else {
        let plan = match args.plan.as_deref() {
            Some(id) if id == generated.id => Some(generated),
            Some(id) => Some(
                tracker
                    .plan(id)
                    .ok_or_else(|| Error::Other(format!("Unknown plan '{}'", id)))?,
            ),
            None => None,
        };
        let day = match (plan, args.day.as_deref()) {
            (Some(plan), Some(day)) => Some(
                plan.day(day)
                    .or_else(|| {
                        day.parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|i| plan.days.get(i))
                    })
                    .ok_or_else(|| {
                        Error::Other(format!("Unknown day '{}' in plan {}", day, plan.id))
                    })?,
            ),
            _ => None,
        };

        match (plan, day) {
            (Some(plan), Some(day)) => builder.start(plan, day, &tracker.stats().exercise_preferences),
            _ => (
                SessionDraft {
                    date: None,
                    body_weight: 0.0,
                    plan_id: plan.map(|p| p.id.clone()),
                    day_id: None,
                    exercises: Vec::new(),
                },
                ActiveView::Log,
            ),
        }
    };

    tracing::debug!(
        "Session draft with {} exercises, switching to {:?} view",
        draft.exercises.len(),
        view
    );
    draft.date = args.date;
    if args.body_weight > 0.0 {
        draft.body_weight = args.body_weight;
    }

    let mut filled = vec![0usize; draft.exercises.len()];
    for spec in &args.sets {
        let (index, set) = parse_set(spec)?;
        let Some(next_slot) = filled.get_mut(index) else {
            return Err(Error::Other(format!(
                "Set '{}' refers to exercise {}, session has {}",
                spec,
                index + 1,
                draft.exercises.len()
            )));
        };
        if *next_slot >= draft.exercises[index].logged_sets.len() {
            draft.add_set(index);
        }
        draft.fill_set(index, *next_slot, set);
        *next_slot += 1;
    }

    let exercises = draft.exercises.clone();
    let outcome = match tracker.submit(draft) {
        Ok(outcome) => outcome,
        Err(Error::Validation(reason)) => {
            eprintln!("Cannot log session: {}", reason);
            return Err(Error::Validation(reason));
        }
        Err(e) => {
            eprintln!("Saving failed; the session may be partially recorded. Run `liftlog history` to check, then retry.");
            return Err(e);
        }
    };

    for ex in &exercises {
        let done: Vec<_> = ex
            .logged_sets
            .iter()
            .filter(|s| s.reps > 0)
            .map(|s| format!("{}x{}", s.weight, s.reps))
            .collect();
        println!("  {:<32} {}", ex.name, done.join("  "));
    }
    println!();
    println!("✓ Session logged! +{} XP", outcome.experience_gained);
    for (lift, weight) in &outcome.new_personal_bests {
        println!("  ★ New personal best: {:?} {}", lift, weight);
    }
    if outcome.leveled_up {
        println!("  ▲ Level up! Now level {}", tracker.stats().level);
    }
    Ok(())
}

fn cmd_history<S: DocumentStore>(tracker: &Tracker<'_, S>, generated: &TrainingPlan, limit: Option<usize>) {
    let history = tracker.history();
    if history.is_empty() {
        println!("No sessions logged yet.");
        return;
    }

    let plans: Vec<TrainingPlan> = tracker
        .plans()
        .iter()
        .cloned()
        .chain(std::iter::once(generated.clone()))
        .collect();

    for entry in history.iter().take(limit.unwrap_or(usize::MAX)) {
        let context = match ledger::plan_context(entry, &plans) {
            PlanContext::Available { plan_name, day_name } => format!("{} / {}", plan_name, day_name),
            PlanContext::Unavailable => "(plan no longer available)".to_string(),
            PlanContext::NotSelected => "(no plan)".to_string(),
        };
        println!("{}  {}  bw {}", entry.date_key(), context, entry.body_weight);
        for ex in &entry.logged_exercises {
            let best = best_set(std::slice::from_ref(ex), &ex.name)
                .map(|s| format!("best {}x{}", s.weight, s.reps))
                .unwrap_or_else(|| "no sets".to_string());
            println!("    {:<32} {} sets, {}", ex.name, ex.logged_sets.len(), best);
        }
    }
}

fn cmd_stats(stats: &UserStats, achievements: &[Achievement]) {
    let next = xp_floor(stats.level + 1);
    println!(
        "Level {}  ({} / {} XP, {:.0}%)",
        stats.level,
        stats.experience,
        next,
        level_progress(stats.experience) * 100.0
    );
    println!("Workouts completed: {}", stats.workouts_completed);
    println!("Current streak:     {} days", stats.streak_days);
    println!();
    println!("Personal bests");
    println!("  Bench press: {}", stats.personal_bests.bench_press);
    println!("  Squat:       {}", stats.personal_bests.squat);
    println!("  Deadlift:    {}", stats.personal_bests.deadlift);
    println!();
    println!("Achievements");
    for a in achievements {
        let mark = if a.completed() { "✓" } else { " " };
        println!("  [{}] {:<18} {}/{}", mark, a.title, a.progress, a.target);
    }
}
