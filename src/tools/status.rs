//! Nutrilog Status Tool
//!
//! Provides runtime status information about the Nutrilog service.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::session::Session;

/// Usage guide returned by the logging_instructions tool
pub const LOGGING_INSTRUCTIONS: &str = r#"
# Nutrilog Logging Instructions

## Overview

1. **Foods** live in the catalog. A basic food has calories per serving and
   keywords. A composite food is built from catalog foods and servings; its
   calories are the sum of ingredient calories times servings, fixed when it
   is created.
2. **Log entries** record how many servings of a catalog food were eaten on a
   date. Logging the same food again on the same date adds to the count.

## Dates

All dates use `DD/MM/YYYY`, for example `01/06/2024`. Leave the date empty to
use today's date.

## Typical workflow

1. `search_foods` with keywords (match `any` or `all`) or `list_foods`.
2. If the food is missing, `add_basic_food` or `create_composite_food`.
3. `log_food` with the exact food name and a positive number of servings.
4. `view_log_by_date` to see totals against the target calories.
5. `undo_log_entry` reverses the most recent log or removal.
6. `save_all` writes everything to disk. Data is also saved on shutdown.

## Keywords

Keywords are matched exactly: `Fruit` and `fruit` are different keywords.
Names and keywords cannot contain `|`, `,` or `;`.

## Targets

Target calories come from the latest profile record on or before the date and
the selected method (`harris-benedict`, `mifflin-st-jeor`, `katch-mcardle`).
"#;

/// Size of one data file
#[derive(Debug, Serialize)]
pub struct DataFileStatus {
    pub path: String,
    pub size_bytes: Option<u64>,
}

impl DataFileStatus {
    fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            size_bytes: std::fs::metadata(path).ok().map(|m| m.len()),
        }
    }
}

/// Service status
#[derive(Debug, Serialize)]
pub struct NutrilogStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub catalog_file: DataFileStatus,
    pub log_file: DataFileStatus,
    pub profile_file: DataFileStatus,
    pub foods: usize,
    pub logged_dates: usize,
    pub undo_depth: usize,
    pub calorie_method: &'static str,
}

/// Tracks process start time for status reports
pub struct StatusTracker {
    start_time: Instant,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn get_status(&self, session: &Session) -> NutrilogStatus {
        let build_info = BuildInfo::current();
        let config = session.config();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            catalog_file: DataFileStatus::new(&config.catalog_path()),
            log_file: DataFileStatus::new(&config.log_path()),
            profile_file: DataFileStatus::new(&config.profile_path()),
            foods: session.catalog.len(),
            logged_dates: session.log.dates().count(),
            undo_depth: session.log.undo_history().len(),
            calorie_method: session.calorie_method().display_name(),
        }
    }
}
