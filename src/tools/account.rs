//! Account deletion
//!
//! Removes a user and everything they own in one transaction, dependents
//! first: consumptions, foods, goals, then the user row.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Consumption, DailyGoal, Food, User};

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub user_id: i64,
    pub consumptions_deleted: usize,
    pub foods_deleted: usize,
    pub goals_deleted: usize,
}

pub fn delete_account(db: &Database, user_id: i64) -> TrackerResult<DeleteAccountResponse> {
    let response = db.with_transaction(|tx| -> TrackerResult<DeleteAccountResponse> {
        if User::get_by_id(tx, user_id)?.is_none() {
            return Err(TrackerError::not_found(format!("user {}", user_id)));
        }

        let consumptions_deleted = Consumption::delete_all_for_user(tx, user_id)?;
        let foods_deleted = Food::delete_all_for_user(tx, user_id)?;
        let goals_deleted = DailyGoal::delete_all_for_user(tx, user_id)?;
        User::delete(tx, user_id)?;

        Ok(DeleteAccountResponse {
            success: true,
            user_id,
            consumptions_deleted,
            foods_deleted,
            goals_deleted,
        })
    })?;

    info!(
        user_id,
        consumptions = response.consumptions_deleted,
        foods = response.foods_deleted,
        goals = response.goals_deleted,
        "account deleted"
    );
    Ok(response)
}
