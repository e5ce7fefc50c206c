//! Utility to record a daily goal from the command line
//!
//! Usage: set_daily_goal <calories> <protein> [user]

use nutrack::config::Config;
use nutrack::db::Database;
use nutrack::tools::session_user;
use nutrack::tracker::GoalTracker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <calories> <protein> [user]", args[0]);
        std::process::exit(2);
    }

    let calories: f64 = args[1].parse().map_err(|_| format!("invalid calories: {}", args[1]))?;
    let protein: f64 = args[2].parse().map_err(|_| format!("invalid protein: {}", args[2]))?;

    let config = Config::from_env();
    let user_name = args.get(3).cloned().unwrap_or_else(|| config.user.clone());
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = Database::open(&config.database_path)?;

    let user = session_user(&database, &user_name)?;
    let goal = GoalTracker::new(&database).create_goal(user.id, calories, protein)?;

    println!("Goal set for {}:", user.name);
    println!("  Calories: {}", goal.calorie_goal);
    println!("  Protein:  {}g", goal.protein_goal);
    println!("  Date:     {}", goal.date);

    Ok(())
}
