//! Daily Log Tools
//!
//! Tools for logging servings, undoing changes and viewing calorie totals.

use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::{DaySummary, UndoOutcome};
use crate::session::{FileSaveResult, Session};

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub date: String,
    pub food_name: String,
    pub servings_added: u32,
    pub total_servings: i64,
}

/// Response for remove_log_entry
#[derive(Debug, Serialize)]
pub struct RemoveLogEntryResponse {
    pub date: String,
    pub food_name: String,
    pub servings_removed: i64,
}

/// Response for view_all_logs
#[derive(Debug, Serialize)]
pub struct AllLogsResponse {
    pub days: Vec<DaySummary>,
    pub total_days: usize,
    pub calorie_method: &'static str,
}

pub fn log_food(session: &mut Session, date: &str, food_name: &str, servings: u32) -> LedgerResult<LogFoodResponse> {
    let (date, total) = session.log_food(date, food_name, servings)?;
    Ok(LogFoodResponse {
        date,
        food_name: food_name.to_string(),
        servings_added: servings,
        total_servings: total,
    })
}

pub fn remove_log_entry(session: &mut Session, date: &str, food_name: &str) -> LedgerResult<RemoveLogEntryResponse> {
    let (date, removed) = session.remove_log_entry(date, food_name)?;
    Ok(RemoveLogEntryResponse {
        date,
        food_name: food_name.to_string(),
        servings_removed: removed,
    })
}

pub fn undo_log_entry(session: &mut Session) -> LedgerResult<UndoOutcome> {
    session.undo_log_entry()
}

pub fn view_log_by_date(session: &Session, date: &str) -> LedgerResult<DaySummary> {
    session.summarize_date(date)
}

pub fn view_all_logs(session: &Session) -> AllLogsResponse {
    let days = session.summarize_all();
    AllLogsResponse {
        total_days: days.len(),
        days,
        calorie_method: session.calorie_method().display_name(),
    }
}

pub fn save_log(session: &Session) -> FileSaveResult {
    let path = session.config().log_path().display().to_string();
    match session.save_log() {
        Ok(_) => FileSaveResult { path, saved: true, error: None },
        Err(e) => FileSaveResult { path, saved: false, error: Some(e.to_string()) },
    }
}
