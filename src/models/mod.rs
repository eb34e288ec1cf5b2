//! Data models
//!
//! The food catalog, the daily log with its undo history, and the user
//! profile that supplies daily calorie targets.

mod catalog;
mod catalog_file;
mod composite;
mod daily_log;
mod food;
mod load_report;
mod profile;
mod summary;
mod undo;

pub use catalog::{Catalog, FoodListing, MatchMode};
pub use composite::build_composite;
pub use daily_log::DailyLog;
pub use food::{Food, FoodId, FoodKind, Ingredient};
pub use load_report::LoadReport;
pub use profile::{
    ActivityLevel, CalorieMethod, DailyRecord, Sex, UserProfile, AGE_RANGE, HEIGHT_RANGE_CM,
    WEIGHT_RANGE_KG,
};
pub use summary::{DaySummary, EntrySummary};
pub use undo::{UndoEntry, UndoOutcome, UndoStack};
