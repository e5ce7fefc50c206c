//! Goal tools

use serde::Serialize;

use crate::db::Database;
use crate::error::TrackerResult;
use crate::models::{DailyGoal, GoalTargets};
use crate::tracker::GoalTracker;

#[derive(Debug, Serialize)]
pub struct GoalSummary {
    pub id: i64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub date: String,
}

impl From<&DailyGoal> for GoalSummary {
    fn from(goal: &DailyGoal) -> Self {
        Self {
            id: goal.id,
            calorie_goal: goal.calorie_goal,
            protein_goal: goal.protein_goal,
            date: goal.date.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Current goal, or the fallback when none was ever set
#[derive(Debug, Serialize)]
pub struct CurrentGoalResponse {
    pub calorie_goal: f64,
    pub protein_goal: f64,
    /// Absent when the fallback is shown
    pub goal: Option<GoalSummary>,
    pub is_fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct GoalHistoryResponse {
    pub goals: Vec<GoalSummary>,
    pub count: usize,
}

pub fn get_goal(db: &Database, user_id: i64, fallback: GoalTargets) -> TrackerResult<CurrentGoalResponse> {
    let current = GoalTracker::new(db).current_goal(user_id)?;
    Ok(match current {
        Some(goal) => CurrentGoalResponse {
            calorie_goal: goal.calorie_goal,
            protein_goal: goal.protein_goal,
            goal: Some(GoalSummary::from(&goal)),
            is_fallback: false,
        },
        None => CurrentGoalResponse {
            calorie_goal: fallback.calorie_goal,
            protein_goal: fallback.protein_goal,
            goal: None,
            is_fallback: true,
        },
    })
}

pub fn set_goal(db: &Database, user_id: i64, calorie_goal: f64, protein_goal: f64) -> TrackerResult<GoalSummary> {
    let goal = GoalTracker::new(db).create_goal(user_id, calorie_goal, protein_goal)?;
    Ok(GoalSummary::from(&goal))
}

pub fn adjust_goal(db: &Database, user_id: i64, earned_calories: f64) -> TrackerResult<GoalSummary> {
    let goal = GoalTracker::new(db).adjust_goal(user_id, earned_calories)?;
    Ok(GoalSummary::from(&goal))
}

pub fn list_goal_history(db: &Database, user_id: i64, limit: i64) -> TrackerResult<GoalHistoryResponse> {
    let limit = limit.clamp(1, 500);
    let goals: Vec<GoalSummary> = GoalTracker::new(db)
        .history(user_id, limit)?
        .iter()
        .map(GoalSummary::from)
        .collect();
    let count = goals.len();
    Ok(GoalHistoryResponse { goals, count })
}
