//! Goal tracking
//!
//! Goals are never edited in place. Setting or adjusting a goal appends a new
//! record, and the newest record is the current goal. Each write runs in an
//! IMMEDIATE transaction and stamps the new record no earlier than the
//! current one, so the newest record always wins the `latest` ordering.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::info;

use crate::db::Database;
use crate::error::{ensure_positive, TrackerError, TrackerResult};
use crate::models::{local_now, DailyGoal, GoalTargets};

pub struct GoalTracker<'a> {
    db: &'a Database,
}

impl<'a> GoalTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The most recent goal, or `None` if the user never set one
    pub fn current_goal(&self, user_id: i64) -> TrackerResult<Option<DailyGoal>> {
        Ok(self.db.with_conn(|conn| DailyGoal::latest(conn, user_id))?)
    }

    pub fn create_goal(&self, user_id: i64, calorie_goal: f64, protein_goal: f64) -> TrackerResult<DailyGoal> {
        ensure_positive("calorie_goal", calorie_goal)?;
        ensure_positive("protein_goal", protein_goal)?;
        let targets = GoalTargets::new(calorie_goal, protein_goal);

        let goal = self.db.with_transaction(|tx| -> TrackerResult<DailyGoal> {
            let previous = DailyGoal::latest(tx, user_id)?;
            insert_after(tx, user_id, targets, previous.as_ref())
        })?;

        info!(user_id, calorie_goal, protein_goal, goal_id = goal.id, "goal set");
        Ok(goal)
    }

    /// Add `earned_calories` to the current calorie goal, keeping protein.
    pub fn adjust_goal(&self, user_id: i64, earned_calories: f64) -> TrackerResult<DailyGoal> {
        if !earned_calories.is_finite() {
            return Err(TrackerError::validation(format!(
                "earned_calories must be a finite number, got {}",
                earned_calories
            )));
        }

        let goal = self.db.with_transaction(|tx| -> TrackerResult<DailyGoal> {
            let current = DailyGoal::latest(tx, user_id)?
                .ok_or_else(|| TrackerError::not_found("no goal set; set a goal before adjusting it"))?;

            let calorie_goal = current.calorie_goal + earned_calories;
            if !calorie_goal.is_finite() || calorie_goal <= 0.0 {
                return Err(TrackerError::validation(format!(
                    "adjusting {} by {} would leave a calorie goal of {}",
                    current.calorie_goal, earned_calories, calorie_goal
                )));
            }

            let targets = GoalTargets::new(calorie_goal, current.protein_goal);
            insert_after(tx, user_id, targets, Some(&current))
        })?;

        info!(user_id, earned_calories, calorie_goal = goal.calorie_goal, goal_id = goal.id, "goal adjusted");
        Ok(goal)
    }

    /// Goal records, newest first
    pub fn history(&self, user_id: i64, limit: i64) -> TrackerResult<Vec<DailyGoal>> {
        Ok(self.db.with_conn(|conn| DailyGoal::history(conn, user_id, limit))?)
    }
}

fn insert_after(
    conn: &Connection,
    user_id: i64,
    targets: GoalTargets,
    previous: Option<&DailyGoal>,
) -> TrackerResult<DailyGoal> {
    let now = local_now();
    let date: NaiveDateTime = match previous {
        Some(prev) if prev.date > now => prev.date,
        _ => now,
    };
    Ok(DailyGoal::create(conn, user_id, targets, date)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn setup() -> (tempfile::TempDir, Database, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("goals.db")).unwrap();
        let user_id = db.with_conn(|conn| User::get_or_create(conn, "alice")).unwrap().id;
        (dir, db, user_id)
    }

    #[test]
    fn test_adjust_adds_earned_calories() {
        let (_dir, db, user_id) = setup();
        let goals = GoalTracker::new(&db);

        let original = goals.create_goal(user_id, 2000.0, 150.0).unwrap();
        let adjusted = goals.adjust_goal(user_id, 300.0).unwrap();

        assert_ne!(original.id, adjusted.id);
        assert_eq!(adjusted.calorie_goal, 2300.0);
        assert_eq!(adjusted.protein_goal, 150.0);

        let current = goals.current_goal(user_id).unwrap().unwrap();
        assert_eq!(current.id, adjusted.id);
        assert_eq!(goals.history(user_id, 10).unwrap().len(), 2);
    }

    #[test]
    fn test_adjust_without_goal_is_not_found() {
        let (_dir, db, user_id) = setup();
        let result = GoalTracker::new(&db).adjust_goal(user_id, 100.0);
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
    }

    #[test]
    fn test_non_positive_goals_rejected() {
        let (_dir, db, user_id) = setup();
        let goals = GoalTracker::new(&db);

        assert!(matches!(goals.create_goal(user_id, 0.0, 120.0), Err(TrackerError::Validation(_))));
        assert!(matches!(goals.create_goal(user_id, 2000.0, -1.0), Err(TrackerError::Validation(_))));
        assert!(goals.current_goal(user_id).unwrap().is_none());
    }

    #[test]
    fn test_adjust_cannot_drop_goal_to_zero() {
        let (_dir, db, user_id) = setup();
        let goals = GoalTracker::new(&db);
        goals.create_goal(user_id, 500.0, 80.0).unwrap();

        assert!(matches!(goals.adjust_goal(user_id, -500.0), Err(TrackerError::Validation(_))));
        assert!(matches!(goals.adjust_goal(user_id, f64::NAN), Err(TrackerError::Validation(_))));
        assert_eq!(goals.history(user_id, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_later_goal_wins_even_with_future_stamp() {
        let (_dir, db, user_id) = setup();
        let future = local_now() + chrono::Duration::days(1);
        db.with_conn(|conn| DailyGoal::create(conn, user_id, GoalTargets::new(1500.0, 90.0), future))
            .unwrap();

        let goals = GoalTracker::new(&db);
        let newer = goals.create_goal(user_id, 2500.0, 140.0).unwrap();
        assert_eq!(goals.current_goal(user_id).unwrap().unwrap().id, newer.id);
    }
}
