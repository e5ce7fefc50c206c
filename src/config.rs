//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default so the server starts with zero configuration.

use std::path::PathBuf;

use tracing::warn;

use crate::models::GoalTargets;

pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GOAL: f64 = 120.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    /// Env: `NUTRACK_DATABASE_PATH`
    /// Default: `<project root>/data/nutrack.db`
    pub database_path: PathBuf,

    /// User the stdio session acts as. Authentication happens outside this process.
    /// Env: `NUTRACK_USER`
    /// Default: `default`
    pub user: String,

    /// Goal shown when the user has never set one. Never persisted.
    /// Env: `NUTRACK_FALLBACK_CALORIE_GOAL`, `NUTRACK_FALLBACK_PROTEIN_GOAL`
    /// Default: 2000 kcal / 120 g
    pub fallback_goal: GoalTargets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user: DEFAULT_USER.to_string(),
            fallback_goal: GoalTargets::new(DEFAULT_CALORIE_GOAL, DEFAULT_PROTEIN_GOAL),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_path = std::env::var("NUTRACK_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let user = std::env::var("NUTRACK_USER")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.user);

        let fallback_goal = GoalTargets::new(
            positive_from_env("NUTRACK_FALLBACK_CALORIE_GOAL", DEFAULT_CALORIE_GOAL),
            positive_from_env("NUTRACK_FALLBACK_PROTEIN_GOAL", DEFAULT_PROTEIN_GOAL),
        );

        Self {
            database_path,
            user,
            fallback_goal,
        }
    }
}

fn positive_from_env(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(raw) => parse_positive(&raw).unwrap_or_else(|| {
            warn!(key, value = %raw, default, "ignoring invalid goal override");
            default
        }),
        Err(_) => default,
    }
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// `<project root>/data/nutrack.db`, where the project root is found by
/// walking up out of `target/{debug,release}`.
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("nutrack.db");
    path
}
