//! Session state
//!
//! The catalog, the daily log and the profile are loaded whole when the
//! session starts and written whole on save. Nothing is written in between.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    build_composite, ActivityLevel, CalorieMethod, Catalog, DailyLog, DailyRecord, DaySummary,
    Food, FoodId, Ingredient, LoadReport, UndoOutcome, UserProfile,
};
use crate::store::{read_optional, write_atomic};
use crate::validation::{require_name, resolve_date, today};

/// How a caller points at an ingredient: by catalog index or by exact name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoodRef {
    Index(usize),
    Name(String),
}

/// Load reports for the three data files
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionLoadReport {
    pub catalog: LoadReport,
    pub log: LoadReport,
    pub profile: LoadReport,
}

/// Result of writing one data file
#[derive(Debug, Clone, Serialize)]
pub struct FileSaveResult {
    pub path: String,
    pub saved: bool,
    pub error: Option<String>,
}

pub struct Session {
    config: Config,
    calorie_method: CalorieMethod,
    pub catalog: Catalog,
    pub log: DailyLog,
    pub profile: UserProfile,
    load_report: SessionLoadReport,
}

impl Session {
    /// Empty session that will save into `config.data_dir`
    pub fn new(config: Config) -> Self {
        Self {
            calorie_method: config.calorie_method,
            config,
            catalog: Catalog::new(),
            log: DailyLog::new(),
            profile: UserProfile::new(),
            load_report: SessionLoadReport::default(),
        }
    }

    /// Load all data files. A missing or unreadable file yields an empty
    /// collection and a warning; it never fails the session.
    pub fn load(config: Config) -> Self {
        let mut session = Self::new(config);

        if let Some(text) = read_or_warn(&session.config.catalog_path(), "food database") {
            let (catalog, report) = Catalog::deserialize(&text);
            session.catalog = catalog;
            session.load_report.catalog = report;
        }
        if let Some(text) = read_or_warn(&session.config.log_path(), "daily log") {
            let (log, report) = DailyLog::deserialize(&text);
            session.log = log;
            session.load_report.log = report;
        }
        if let Some(text) = read_or_warn(&session.config.profile_path(), "profile") {
            let (profile, report) = UserProfile::deserialize(&text);
            session.profile = profile;
            session.load_report.profile = report;
        }

        info!(
            foods = session.catalog.len(),
            dates = session.log.dates().count(),
            profile_records = session.profile.len(),
            "session loaded"
        );
        session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_report(&self) -> &SessionLoadReport {
        &self.load_report
    }

    pub fn calorie_method(&self) -> CalorieMethod {
        self.calorie_method
    }

    pub fn set_calorie_method(&mut self, method: CalorieMethod) {
        info!(method = method.display_name(), "calorie method changed");
        self.calorie_method = method;
    }

    /// Target calories for a date from the profile and the current method
    pub fn target_calories(&self, date: &str) -> LedgerResult<i64> {
        let date = resolve_date(date, &today())?;
        Ok(self.profile.target_calories(&date, self.calorie_method))
    }

    // --- Catalog ---

    pub fn add_basic_food(&mut self, name: &str, calories: u32, keywords: Vec<String>) -> LedgerResult<FoodId> {
        let food = Food::basic(name, keywords, calories)?;
        self.catalog.add_food(food)
    }

    pub fn create_composite_food(
        &mut self,
        name: &str,
        ingredients: Vec<(FoodRef, u32)>,
        keywords: Vec<String>,
    ) -> LedgerResult<FoodId> {
        let ingredients = ingredients
            .into_iter()
            .map(|(food, servings)| {
                self.resolve_ref(&food)
                    .map(|food| Ingredient { food, servings })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let composite = build_composite(&self.catalog, name, ingredients, keywords)?;
        self.catalog.add_composite_food(composite)
    }

    pub fn resolve_ref(&self, food: &FoodRef) -> LedgerResult<FoodId> {
        match food {
            FoodRef::Index(index) => self
                .catalog
                .id_at(*index)
                .ok_or_else(|| LedgerError::not_found(format!("No food at catalog index {}", index))),
            FoodRef::Name(name) => self
                .catalog
                .find_id(name)
                .ok_or_else(|| LedgerError::not_found(format!("Food '{}' is not in the catalog", name))),
        }
    }

    // --- Daily log ---

    /// Log servings of a catalog food. Returns the resolved date and the new
    /// cumulative count.
    pub fn log_food(&mut self, date: &str, food_name: &str, servings: u32) -> LedgerResult<(String, i64)> {
        let date = resolve_date(date, &today())?;
        let food_name = require_name(food_name)?;
        let food = self
            .catalog
            .search_one_food(&food_name)
            .ok_or_else(|| LedgerError::not_found(format!("Food '{}' is not in the catalog", food_name)))?;
        let name = food.name().to_string();
        let total = self.log.log_servings(&date, &name, servings)?;
        Ok((date, total))
    }

    /// Returns the resolved date and the servings removed
    pub fn remove_log_entry(&mut self, date: &str, food_name: &str) -> LedgerResult<(String, i64)> {
        let date = resolve_date(date, &today())?;
        let removed = self.log.remove_all_servings(&date, food_name)?;
        Ok((date, removed))
    }

    pub fn undo_log_entry(&mut self) -> LedgerResult<UndoOutcome> {
        self.log.undo()
    }

    pub fn summarize_date(&self, date: &str) -> LedgerResult<DaySummary> {
        let method = self.calorie_method;
        self.log
            .summarize_date(date, &self.catalog, |d| self.profile.target_calories(d, method))
    }

    pub fn summarize_all(&self) -> Vec<DaySummary> {
        let method = self.calorie_method;
        self.log
            .summarize_all(&self.catalog, |d| self.profile.target_calories(d, method))
    }

    // --- Profile ---

    pub fn update_profile(&mut self, age: u32, weight_kg: u32) -> LedgerResult<DailyRecord> {
        self.profile.update_measurements(&today(), age, weight_kg)
    }

    pub fn set_activity_level(&mut self, activity: ActivityLevel) -> LedgerResult<DailyRecord> {
        self.profile.set_activity(&today(), activity)
    }

    // --- Persistence ---

    pub fn save_catalog(&self) -> LedgerResult<PathBuf> {
        let path = self.config.catalog_path();
        write_atomic(&path, &self.catalog.serialize())?;
        info!(path = %path.display(), foods = self.catalog.len(), "food database saved");
        Ok(path)
    }

    pub fn save_log(&self) -> LedgerResult<PathBuf> {
        let path = self.config.log_path();
        write_atomic(&path, &self.log.serialize())?;
        info!(path = %path.display(), "daily log saved");
        Ok(path)
    }

    pub fn save_profile(&self) -> LedgerResult<PathBuf> {
        let path = self.config.profile_path();
        write_atomic(&path, &self.profile.serialize())?;
        info!(path = %path.display(), "profile saved");
        Ok(path)
    }

    /// Write every data file. A failure on one file does not stop the
    /// others, and in-memory state is kept either way.
    pub fn save_all(&self) -> Vec<FileSaveResult> {
        [
            (self.config.catalog_path(), self.save_catalog()),
            (self.config.log_path(), self.save_log()),
            (self.config.profile_path(), self.save_profile()),
        ]
        .into_iter()
        .map(|(path, result)| {
            let error = result.err().map(|e| {
                warn!(path = %path.display(), error = %e, "save failed");
                e.to_string()
            });
            FileSaveResult {
                path: path.display().to_string(),
                saved: error.is_none(),
                error,
            }
        })
        .collect()
    }
}

/// Lock a shared session. A panic in an earlier holder poisons the mutex
/// but leaves the data intact, so the guard is recovered and used as is.
pub fn lock_session(handle: &Mutex<Session>) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(|poisoned| {
        warn!("session lock was poisoned by a panic, recovering in-memory state");
        poisoned.into_inner()
    })
}

fn read_or_warn(path: &Path, what: &str) -> Option<String> {
    match read_optional(path) {
        Ok(Some(text)) => Some(text),
        Ok(None) => {
            warn!(path = %path.display(), "no existing {} found, starting fresh", what);
            None
        }
        Err(e) => {
            warn!(error = %e, "could not read {}, starting fresh", what);
            None
        }
    }
}
