//! Nutrack MCP Server Implementation
//!
//! Implements the MCP server with all Nutrack tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;

use crate::config::Config;
use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{FoodCreate, FoodUpdate};
use crate::tools::status::StatusTracker;
use crate::tools::{account, consumptions, foods, goals, history, session_user, DataRevision};
use crate::tracker::{parse_date, RangeSpec};

/// Nutrack MCP Service
#[derive(Clone)]
pub struct NutrackService {
    config: Arc<Config>,
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    revision: Arc<DataRevision>,
    tool_router: ToolRouter<NutrackService>,
}

impl NutrackService {
    pub fn new(config: Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path.clone()))),
            config: Arc::new(config),
            database,
            revision: Arc::new(DataRevision::new()),
            tool_router: Self::tool_router(),
        }
    }

    /// The session user, resolved on every call so a deleted account comes
    /// back empty instead of failing
    fn user_id(&self) -> Result<i64, McpError> {
        session_user(&self.database, &self.config.user)
            .map(|user| user.id)
            .map_err(to_mcp_error)
    }

    /// Serialize a read result
    fn respond<T: Serialize>(&self, value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Serialize a write result after bumping the data revision
    fn respond_changed<T: Serialize>(&self, value: &T) -> Result<CallToolResult, McpError> {
        self.revision.bump();
        self.respond(value)
    }
}

fn to_mcp_error(e: TrackerError) -> McpError {
    match e {
        TrackerError::Validation(msg) => McpError::invalid_params(msg, None),
        TrackerError::NotFound(msg) => McpError::resource_not_found(msg, None),
        TrackerError::Upstream(inner) => {
            error!(error = %inner, "storage failure");
            McpError::internal_error(format!("Database error: {}", inner), None)
        }
    }
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    pub name: String,
    /// Calories in one unit of this food
    pub calories_per_unit: f64,
    /// Grams of protein in one unit of this food
    pub protein_per_unit: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodParams {
    pub id: i64,
    pub name: Option<String>,
    pub calories_per_unit: Option<f64>,
    pub protein_per_unit: Option<f64>,
}

// ============================================================================
// Consumption Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogConsumptionParams {
    pub food_id: i64,
    /// Number of units eaten, greater than 0
    pub quantity: f64,
    /// YYYY-MM-DD HH:MM[:SS] local time, or YYYY-MM-DD for noon. Defaults to now.
    pub consumed_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListConsumptionsParams {
    /// First day, YYYY-MM-DD
    pub start: String,
    /// Last day (inclusive), YYYY-MM-DD
    pub end: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsumptionIdParams {
    pub id: i64,
}

// ============================================================================
// Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalParams {
    pub calorie_goal: f64,
    pub protein_goal: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustGoalParams {
    /// Calories to add to the current calorie goal (negative to subtract)
    pub earned_calories: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GoalHistoryParams {
    #[serde(default = "default_goal_history_limit")]
    pub limit: i64,
}

fn default_goal_history_limit() -> i64 { 50 }

// ============================================================================
// History Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RangeParams {
    /// current_week, trailing_week, trailing_month or custom
    pub range: String,
    /// Required for custom, YYYY-MM-DD
    pub start: Option<String>,
    /// Required for custom, YYYY-MM-DD
    pub end: Option<String>,
}

impl RangeParams {
    fn to_range(&self) -> Result<RangeSpec, McpError> {
        RangeSpec::parse(&self.range, self.start.as_deref(), self.end.as_deref()).map_err(to_mcp_error)
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StatsParams {
    #[serde(flatten)]
    pub range: RangeParams,
    /// Totals when true, daily averages when false
    #[serde(default)]
    pub show_totals: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SyntheticHistoryParams {
    #[serde(flatten)]
    pub range: RangeParams,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteAccountParams {
    /// Must be true; deletion cannot be undone
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrack service including build info, database status, and process information")]
    async fn nutrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.config.user, self.revision.current());
        self.respond(&status)
    }

    #[tool(description = "Get instructions for tracking foods, consumption and goals. Call this when starting a tracking session or when unsure how to use the tools.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Create a food with calories and protein per unit")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodCreate {
            name: p.name,
            calories_per_unit: p.calories_per_unit,
            protein_per_unit: p.protein_per_unit,
        };
        let result = foods::add_food(&self.database, self.user_id()?, data).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    #[tool(description = "List all foods, sorted by name")]
    fn list_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.database, self.user_id()?).map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Get a food with the number of consumptions that use it")]
    fn get_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::get_food(&self.database, self.user_id()?, p.id).map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Update a food. Only provided fields change. Changes apply to all past consumptions of the food.")]
    fn update_food(&self, Parameters(p): Parameters<UpdateFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodUpdate {
            name: p.name,
            calories_per_unit: p.calories_per_unit,
            protein_per_unit: p.protein_per_unit,
        };
        let result = foods::update_food(&self.database, self.user_id()?, p.id, data).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    #[tool(description = "Delete a food and every consumption that references it")]
    fn delete_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_food(&self.database, self.user_id()?, p.id).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    // --- Consumptions ---

    #[tool(description = "Log eating a quantity of a food")]
    fn log_consumption(&self, Parameters(p): Parameters<LogConsumptionParams>) -> Result<CallToolResult, McpError> {
        let result = consumptions::log_consumption(
            &self.database,
            self.user_id()?,
            p.food_id,
            p.quantity,
            p.consumed_at.as_deref(),
        )
        .map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    #[tool(description = "List consumptions between two dates (inclusive) with current nutrient values")]
    fn list_consumptions(&self, Parameters(p): Parameters<ListConsumptionsParams>) -> Result<CallToolResult, McpError> {
        let result = consumptions::list_consumptions(&self.database, self.user_id()?, &p.start, &p.end)
            .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Delete a logged consumption")]
    fn delete_consumption(&self, Parameters(p): Parameters<ConsumptionIdParams>) -> Result<CallToolResult, McpError> {
        let result = consumptions::delete_consumption(&self.database, self.user_id()?, p.id).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the current daily goal, or the default goal if none was set")]
    fn get_goal(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goal(&self.database, self.user_id()?, self.config.fallback_goal).map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Set a new daily calorie and protein goal")]
    fn set_goal(&self, Parameters(p): Parameters<SetGoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::set_goal(&self.database, self.user_id()?, p.calorie_goal, p.protein_goal)
            .map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    #[tool(description = "Add earned calories to the current calorie goal, keeping the protein goal")]
    fn adjust_goal(&self, Parameters(p): Parameters<AdjustGoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::adjust_goal(&self.database, self.user_id()?, p.earned_calories).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }

    #[tool(description = "List past goals, newest first")]
    fn list_goal_history(&self, Parameters(p): Parameters<GoalHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = goals::list_goal_history(&self.database, self.user_id()?, p.limit).map_err(to_mcp_error)?;
        self.respond(&result)
    }

    // --- History ---

    #[tool(description = "Today's consumptions, totals and remaining calories and protein")]
    fn get_today(&self) -> Result<CallToolResult, McpError> {
        let result = history::get_today(
            &self.database,
            self.user_id()?,
            self.config.fallback_goal,
            self.revision.current(),
        )
        .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Consumptions, totals and percent of goal for one date")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(&p.date).map_err(to_mcp_error)?;
        let result = history::get_day(
            &self.database,
            self.user_id()?,
            date,
            self.config.fallback_goal,
            self.revision.current(),
        )
        .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Day-by-day calories and protein against goal for a range, with totals and daily-average summaries")]
    fn get_history(&self, Parameters(p): Parameters<RangeParams>) -> Result<CallToolResult, McpError> {
        let range = p.to_range()?;
        let result = history::get_history(
            &self.database,
            self.user_id()?,
            range,
            self.config.fallback_goal,
            self.revision.current(),
        )
        .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Summary statistics for a range, as totals or daily averages")]
    fn get_stats(&self, Parameters(p): Parameters<StatsParams>) -> Result<CallToolResult, McpError> {
        let range = p.range.to_range()?;
        let result = history::get_stats(
            &self.database,
            self.user_id()?,
            range,
            p.show_totals,
            self.config.fallback_goal,
            self.revision.current(),
        )
        .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    #[tool(description = "Random placeholder history for a range, marked as synthetic. Only for demos or when real history is unavailable.")]
    fn get_synthetic_history(&self, Parameters(p): Parameters<SyntheticHistoryParams>) -> Result<CallToolResult, McpError> {
        let range = p.range.to_range()?;
        let result = history::get_synthetic_history(
            &self.database,
            self.user_id()?,
            range,
            self.config.fallback_goal,
            p.seed,
            self.revision.current(),
        )
        .map_err(to_mcp_error)?;
        self.respond(&result)
    }

    // --- Account ---

    #[tool(description = "Permanently delete the account with all foods, consumptions and goals. Requires confirm=true.")]
    fn delete_account(&self, Parameters(p): Parameters<DeleteAccountParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::invalid_params(
                "delete_account requires confirm=true; this cannot be undone",
                None,
            ));
        }
        let result = account::delete_account(&self.database, self.user_id()?).map_err(to_mcp_error)?;
        self.respond_changed(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrack - calorie and protein goal tracking. \
                 Call tracking_instructions first. \
                 Foods: add/list/get/update/delete_food. \
                 Logging: log_consumption/list_consumptions/delete_consumption. \
                 Goals: get_goal/set_goal/adjust_goal/list_goal_history. \
                 Progress: get_today/get_day/get_history/get_stats. \
                 get_synthetic_history returns placeholder data only. \
                 delete_account requires confirm=true."
                    .into(),
            ),
        }
    }
}
