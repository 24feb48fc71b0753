use crate::Commands;
use habitkit_core::{
    Clock, HabitId, HabitRepository, HabitService, HabitStatistics, HabitUpdate, HabitView,
    NewHabit, PROGRESS_TARGET_DAYS,
};
use uuid::Uuid;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn dispatch<R: HabitRepository, C: Clock>(
    service: &HabitService<R, C>,
    command: Commands,
) -> CommandResult {
    match command {
        Commands::Add {
            name,
            description,
            color,
        } => {
            let view = service.create_habit(NewHabit {
                name,
                description,
                color,
            })?;
            println!("Habit created: {}", view.habit.id);
        }
        Commands::List { json } => {
            let views = service.list_habits()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if views.is_empty() {
                println!("No habits yet.");
            } else {
                for view in &views {
                    println!("{}", summary_line(view));
                }
            }
        }
        Commands::Show { id, json } => {
            let view = service.get_habit(parse_id(&id)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_detail(&view);
            }
        }
        Commands::Update {
            id,
            name,
            description,
            color,
        } => {
            let update = HabitUpdate {
                name,
                description,
                color,
            };
            let view = service.update_habit(parse_id(&id)?, &update)?;
            println!("{}", summary_line(&view));
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_habit(id)?;
            println!("Habit deleted: {id}");
        }
        Commands::CheckIn { id } => {
            let view = service.check_in(parse_id(&id)?)?;
            println!("{}", summary_line(&view));
        }
        Commands::Undo { id } => {
            let view = service.undo_check_in(parse_id(&id)?)?;
            println!("{}", summary_line(&view));
        }
        Commands::Stats { json } => {
            let stats = service.statistics()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
    }
    Ok(())
}

fn parse_id(text: &str) -> Result<HabitId, String> {
    Uuid::parse_str(text.trim()).map_err(|_| format!("invalid habit id `{text}`"))
}

fn summary_line(view: &HabitView) -> String {
    let mark = if view.checked_in_today { "x" } else { " " };
    format!(
        "[{mark}] {}  {}  streak={} total={}",
        view.habit.id,
        view.habit.name,
        view.streak,
        view.habit.check_ins.len()
    )
}

fn print_detail(view: &HabitView) {
    println!("{}", view.habit.name);
    println!("  id:          {}", view.habit.id);
    if !view.habit.description.is_empty() {
        println!("  description: {}", view.habit.description);
    }
    println!("  color:       {}", view.habit.color);
    println!("  streak:      {}", view.streak);
    println!("  longest:     {}", view.longest_streak);
    println!(
        "  check-ins:   {} ({}% of {PROGRESS_TARGET_DAYS} days)",
        view.habit.check_ins.len(),
        view.progress
    );
    if let Some(latest) = view.habit.check_ins.latest() {
        println!("  last:        {latest}");
    }
}

fn print_stats(stats: &HabitStatistics) {
    println!("Habits:           {}", stats.total_habits);
    println!("Total check-ins:  {}", stats.total_check_ins);
    println!("Best streak:      {} days", stats.best_current_streak);
    println!("Done today:       {}%", stats.completion_rate_today);
    if !stats.top_habits.is_empty() {
        println!("Top habits:");
        for top in &stats.top_habits {
            println!(
                "  {:>3}  {} ({} check-ins)",
                top.streak, top.name, top.total_check_ins
            );
        }
    }
    println!("Last 7 days:");
    for day in &stats.week_activity {
        println!("  {}  {}", day.date.format("%a %b %d"), day.check_ins);
    }
}
