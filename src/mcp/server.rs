//! Nutrilog MCP Server Implementation
//!
//! Implements the MCP server with all Nutrilog tools. Tool calls are
//! serialized through one lock around the session.

use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::MatchMode;
use crate::session::{lock_session, FoodRef, Session};
use crate::tools::status::StatusTracker;
use crate::tools::{foods, log, profile};
use crate::validation::parse_keywords;

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<StatusTracker>,
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(session: Session) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new()),
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    /// Shared handle to the session, used to flush it after the server stops
    pub fn session_handle(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        lock_session(&self.session)
    }
}

fn ledger_error(e: LedgerError) -> McpError {
    if e.is_user_error() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBasicFoodParams {
    /// Food name (no |, comma or ;)
    pub name: String,
    /// Calories per serving
    pub calories: u32,
    /// Search keywords, matched exactly
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    /// Catalog index of the ingredient (takes precedence over name)
    pub index: Option<usize>,
    /// Exact name of the ingredient
    pub name: Option<String>,
    /// Servings of the ingredient, at least 1
    pub servings: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateCompositeFoodParams {
    pub name: String,
    pub ingredients: Vec<IngredientParams>,
    /// Keywords; leave empty to derive them from the ingredients
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    pub index: Option<usize>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Keywords to match; an empty list returns every food
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Comma-separated keywords, merged with `keywords`
    pub keyword_text: Option<String>,
    /// "any" (default) or "all"
    #[serde(default = "default_match_mode")]
    pub match_mode: String,
}

fn default_match_mode() -> String { "any".to_string() }

// ============================================================================
// Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date as DD/MM/YYYY; empty for today
    #[serde(default)]
    pub date: String,
    /// Exact catalog food name
    pub food_name: String,
    pub servings: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveLogEntryParams {
    /// Date as DD/MM/YYYY; empty for today
    #[serde(default)]
    pub date: String,
    pub food_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date as DD/MM/YYYY; empty for today
    #[serde(default)]
    pub date: String,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Age in years (1-150)
    pub age: u32,
    /// Weight in kg (1-200)
    pub weight_kg: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetActivityLevelParams {
    /// sedentary, light, moderate, active or very_active
    pub activity_level: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCalorieMethodParams {
    /// harris-benedict, mifflin-st-jeor or katch-mcardle
    pub method: String,
}

fn food_ref(index: Option<usize>, name: Option<String>) -> Result<FoodRef, McpError> {
    match (index, name) {
        (Some(index), _) => Ok(FoodRef::Index(index)),
        (None, Some(name)) => Ok(FoodRef::Name(name)),
        (None, None) => Err(McpError::invalid_params("Provide a food index or name", None)),
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrilog service including build info, data files, and catalog/log sizes")]
    fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&self.status_tracker.get_status(&session))
    }

    #[tool(description = "Get instructions for using the food catalog and daily log tools. Call this at the start of a logging session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Add a basic food with calories per serving and keywords")]
    fn add_basic_food(&self, Parameters(p): Parameters<AddBasicFoodParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = foods::add_basic_food(&mut session, &p.name, p.calories, p.keywords).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Create a composite food from catalog foods and servings. Calories are the sum of ingredient calories times servings, fixed at creation.")]
    fn create_composite_food(&self, Parameters(p): Parameters<CreateCompositeFoodParams>) -> Result<CallToolResult, McpError> {
        let ingredients = p
            .ingredients
            .into_iter()
            .map(|i| food_ref(i.index, i.name).map(|food| (food, i.servings)))
            .collect::<Result<Vec<_>, _>>()?;
        let mut session = self.session();
        let result = foods::create_composite_food(&mut session, &p.name, ingredients, p.keywords).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a food by catalog index or exact name, including composite ingredients")]
    fn get_food(&self, Parameters(p): Parameters<GetFoodParams>) -> Result<CallToolResult, McpError> {
        let food = food_ref(p.index, p.name)?;
        let session = self.session();
        let result = foods::get_food(&session, &food).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Search foods by keywords, matching any or all of them exactly (case-sensitive). No keywords returns every food.")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let mode = MatchMode::parse(&p.match_mode)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown match mode '{}': use any or all", p.match_mode), None))?;
        let mut keywords = p.keywords;
        if let Some(text) = p.keyword_text.as_deref() {
            keywords.extend(parse_keywords(text));
        }
        let session = self.session();
        json_result(&foods::search_foods(&session, &keywords, mode))
    }

    #[tool(description = "List every food in the catalog in display order, flagging composites")]
    fn list_foods(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&foods::list_foods(&session))
    }

    #[tool(description = "Write the food catalog to disk")]
    fn save_food_database(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&foods::save_food_database(&session))
    }

    // --- Daily Log ---

    #[tool(description = "Log servings of a catalog food on a date (DD/MM/YYYY, empty for today). Adds to any servings already logged.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = log::log_food(&mut session, &p.date, &p.food_name, p.servings).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Remove all servings of a food from a date's log. Can be reversed with undo_log_entry.")]
    fn remove_log_entry(&self, Parameters(p): Parameters<RemoveLogEntryParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = log::remove_log_entry(&mut session, &p.date, &p.food_name).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Undo the most recent log or removal in this session")]
    fn undo_log_entry(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = log::undo_log_entry(&mut session).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "View the log for one date with calories per entry, total, target and excess")]
    fn view_log_by_date(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let result = log::view_log_by_date(&session, &p.date).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "View calorie summaries for every logged date")]
    fn view_all_logs(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&log::view_all_logs(&session))
    }

    #[tool(description = "Write the daily log to disk")]
    fn save_log(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&log::save_log(&session))
    }

    // --- Profile ---

    #[tool(description = "Get the latest profile record, calorie method, and today's target calories")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&profile::get_profile(&session))
    }

    #[tool(description = "Record today's age and weight, keeping height, sex and activity from the latest record")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = profile::update_profile(&mut session, p.age, p.weight_kg).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Record today's activity level")]
    fn set_activity_level(&self, Parameters(p): Parameters<SetActivityLevelParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = profile::set_activity_level(&mut session, &p.activity_level).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Choose the formula used for target calories for the rest of this session")]
    fn set_calorie_method(&self, Parameters(p): Parameters<SetCalorieMethodParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session();
        let result = profile::set_calorie_method(&mut session, &p.method).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Get target calories for a date (DD/MM/YYYY, empty for today)")]
    fn get_target_calories(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let result = profile::get_target_calories(&session, &p.date).map_err(ledger_error)?;
        json_result(&result)
    }

    #[tool(description = "Write the profile history to disk")]
    fn save_profile(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&profile::save_profile(&session))
    }

    // --- Persistence ---

    #[tool(description = "Write the food catalog, daily log and profile to disk")]
    fn save_all(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        json_result(&session.save_all())
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - food catalog and daily calorie log. \
                 Call logging_instructions first. \
                 Foods: add_basic_food, create_composite_food, get_food, search_foods, list_foods, save_food_database. \
                 Log: log_food, remove_log_entry, undo_log_entry, view_log_by_date, view_all_logs, save_log. \
                 Profile: get_profile, update_profile, set_activity_level, set_calorie_method, get_target_calories, save_profile. \
                 save_all writes every file; data is also saved when the server stops. Dates are DD/MM/YYYY."
                    .into(),
            ),
        }
    }
}
