//! Daily log model
//!
//! Maps a `DD/MM/YYYY` date to the cumulative servings of each food eaten
//! that day. Every add or removal is recorded on an undo stack that lives
//! only for the session.
//!
//! Dates are kept in string order, which for `DD/MM/YYYY` is not
//! chronological across months or years.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::{Catalog, DaySummary, EntrySummary, LoadReport, UndoEntry, UndoOutcome, UndoStack};
use crate::error::{LedgerError, LedgerResult};
use crate::validation::{is_valid_date, parse_positive_int, require_name, resolve_date, today};

#[derive(Debug, Clone, Default)]
pub struct DailyLog {
    days: BTreeMap<String, BTreeMap<String, i64>>,
    undo: UndoStack,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Dates with at least one entry, in log order
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    /// `(food, servings)` pairs for a date, sorted by food name
    pub fn entries(&self, date: &str) -> Vec<(&str, i64)> {
        self.days
            .get(date)
            .map(|foods| foods.iter().map(|(name, n)| (name.as_str(), *n)).collect())
            .unwrap_or_default()
    }

    pub fn servings(&self, date: &str, food_name: &str) -> Option<i64> {
        self.days.get(date).and_then(|foods| foods.get(food_name)).copied()
    }

    pub fn undo_history(&self) -> &[UndoEntry] {
        self.undo.entries()
    }

    /// Add servings of a food on a date (blank date means today).
    ///
    /// Returns the new cumulative count for the cell.
    pub fn log_servings(&mut self, date: &str, food_name: &str, servings: u32) -> LedgerResult<i64> {
        let date = resolve_date(date, &today())?;
        let food_name = require_name(food_name)?;
        if servings == 0 {
            return Err(LedgerError::validation("Servings must be greater than 0"));
        }

        let delta = i64::from(servings);
        let current = self.servings(&date, &food_name).unwrap_or(0);
        let total = current.checked_add(delta).ok_or_else(|| {
            LedgerError::validation(format!("Too many servings of '{}' on {}", food_name, date))
        })?;
        self.days
            .entry(date.clone())
            .or_default()
            .insert(food_name.clone(), total);

        info!(date = %date, food = %food_name, servings, total, "logged servings");
        self.undo.push(UndoEntry { date, food_name, delta });
        Ok(total)
    }

    /// Remove every serving of a food on a date (blank date means today).
    ///
    /// Returns the number of servings removed.
    pub fn remove_all_servings(&mut self, date: &str, food_name: &str) -> LedgerResult<i64> {
        let date = resolve_date(date, &today())?;
        let food_name = require_name(food_name)?;

        let foods = self
            .days
            .get_mut(&date)
            .ok_or_else(|| LedgerError::not_found(format!("No log entries found for {}", date)))?;
        let removed = foods.remove(&food_name).ok_or_else(|| {
            LedgerError::not_found(format!("'{}' is not logged on {}", food_name, date))
        })?;
        if foods.is_empty() {
            self.days.remove(&date);
        }

        info!(date = %date, food = %food_name, removed, "removed log entry");
        self.undo.push(UndoEntry {
            date,
            food_name,
            delta: -removed,
        });
        Ok(removed)
    }

    /// Reverse the most recent add or removal
    pub fn undo(&mut self) -> LedgerResult<UndoOutcome> {
        let entry = self.undo.pop().ok_or(LedgerError::EmptyStack)?;

        // A positive delta on a date that no longer exists re-creates the entry
        if !self.days.contains_key(&entry.date) && entry.delta > 0 {
            self.days
                .entry(entry.date.clone())
                .or_default()
                .insert(entry.food_name.clone(), entry.delta);
            info!(date = %entry.date, food = %entry.food_name, servings = entry.delta, "undo restored entry");
            let servings = entry.delta;
            return Ok(UndoOutcome::Restored { entry, servings });
        }

        let foods = self.days.entry(entry.date.clone()).or_default();
        let existed = foods.contains_key(&entry.food_name);
        let cell = foods.entry(entry.food_name.clone()).or_insert(0);
        *cell = cell.saturating_sub(entry.delta);
        let servings = *cell;

        let outcome = if servings <= 0 {
            foods.remove(&entry.food_name);
            UndoOutcome::Removed { entry }
        } else if existed {
            UndoOutcome::Changed { entry, servings }
        } else {
            UndoOutcome::Restored { entry, servings }
        };

        let date = &outcome.entry().date;
        if self.days.get(date).is_some_and(|foods| foods.is_empty()) {
            self.days.remove(date);
        }

        info!(
            date = %outcome.entry().date,
            food = %outcome.entry().food_name,
            servings = outcome.servings(),
            "undid log change"
        );
        Ok(outcome)
    }

    /// Calorie summary for one date (blank date means today).
    ///
    /// Foods missing from the catalog are listed with unknown calories and
    /// count as zero.
    pub fn summarize_date<F>(&self, date: &str, catalog: &Catalog, target: F) -> LedgerResult<DaySummary>
    where
        F: Fn(&str) -> i64,
    {
        let date = resolve_date(date, &today())?;
        let foods = self
            .days
            .get(&date)
            .filter(|foods| !foods.is_empty())
            .ok_or_else(|| LedgerError::not_found(format!("No log entries found for {}", date)))?;

        Ok(summarize(&date, foods, catalog, &target))
    }

    /// Summaries for every date with entries, in log order
    pub fn summarize_all<F>(&self, catalog: &Catalog, target: F) -> Vec<DaySummary>
    where
        F: Fn(&str) -> i64,
    {
        self.days
            .iter()
            .filter(|(_, foods)| !foods.is_empty())
            .map(|(date, foods)| summarize(date, foods, catalog, &target))
            .collect()
    }

    /// Render in file format: `<date>|<food>,<servings>;...` per line
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (date, foods) in &self.days {
            out.push_str(date);
            out.push('|');
            for (name, servings) in foods {
                out.push_str(name);
                out.push(',');
                out.push_str(&servings.to_string());
                out.push(';');
            }
            out.push('\n');
        }
        out
    }

    /// Parse file contents. Lines with an invalid date and malformed
    /// `food,servings` pieces are skipped; the undo stack starts empty.
    pub fn deserialize(text: &str) -> (DailyLog, LoadReport) {
        let mut log = DailyLog::new();
        let mut report = LoadReport::default();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let Some((date, rest)) = line.split_once('|') else {
                warn!(line = line_no, "skipping log line without a date separator");
                report.skipped_lines.push(line_no);
                continue;
            };
            if !is_valid_date(date) {
                warn!(line = line_no, date = %date, "skipping log line with invalid date");
                report.skipped_lines.push(line_no);
                continue;
            }

            let mut bad_piece = false;
            for piece in rest.split(';').filter(|p| !p.is_empty()) {
                let parsed = piece.rsplit_once(',').and_then(|(name, servings)| {
                    let name = require_name(name).ok()?;
                    let servings = parse_positive_int(servings).ok()?;
                    Some((name, servings))
                });
                match parsed {
                    Some((name, servings)) => {
                        let cell = log.days
                            .entry(date.to_string())
                            .or_default()
                            .entry(name)
                            .or_insert(0);
                        *cell = cell.saturating_add(i64::from(servings));
                        report.loaded += 1;
                    }
                    None => {
                        warn!(line = line_no, entry = %piece, "skipping malformed log entry");
                        bad_piece = true;
                    }
                }
            }
            if bad_piece {
                report.skipped_lines.push(line_no);
            }
        }

        debug!(
            dates = log.days.len(),
            entries = report.loaded,
            skipped = report.skipped_lines.len(),
            "daily log parsed"
        );
        (log, report)
    }
}

fn summarize<F>(date: &str, foods: &BTreeMap<String, i64>, catalog: &Catalog, target: &F) -> DaySummary
where
    F: Fn(&str) -> i64,
{
    let entries = foods
        .iter()
        .map(|(name, servings)| EntrySummary {
            food_name: name.clone(),
            servings: *servings,
            calories: catalog
                .search_one_food(name)
                .map(|food| i64::from(food.calories()).saturating_mul(*servings)),
        })
        .collect();
    DaySummary::new(date.to_string(), entries, target(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Food;

    const DAY: &str = "01/06/2024";

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_food(Food::basic("Apple", vec!["fruit".into()], 95).unwrap()).unwrap();
        catalog.add_food(Food::basic("Bread", vec!["carbs".into()], 80).unwrap()).unwrap();
        catalog
    }

    #[test]
    fn test_log_accumulates() {
        let mut log = DailyLog::new();
        assert_eq!(log.log_servings(DAY, "Apple", 2).unwrap(), 2);
        assert_eq!(log.log_servings(DAY, "Apple", 3).unwrap(), 5);
        assert_eq!(log.servings(DAY, "Apple"), Some(5));
        assert_eq!(log.undo_history().len(), 2);
    }

    #[test]
    fn test_log_validation_leaves_state_untouched() {
        let mut log = DailyLog::new();
        assert!(matches!(log.log_servings("31/04/2024", "Apple", 1), Err(LedgerError::Validation(_))));
        assert!(matches!(log.log_servings(DAY, "Apple", 0), Err(LedgerError::Validation(_))));
        assert!(matches!(log.log_servings(DAY, "", 1), Err(LedgerError::Validation(_))));
        assert!(log.is_empty());
        assert!(log.undo_history().is_empty());
    }

    #[test]
    fn test_blank_date_means_today() {
        let mut log = DailyLog::new();
        log.log_servings("", "Apple", 1).unwrap();
        assert_eq!(log.servings(&today(), "Apple"), Some(1));
    }

    #[test]
    fn test_undo_reverses_only_last_add() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 3).unwrap();
        log.log_servings(DAY, "Apple", 2).unwrap();

        let outcome = log.undo().unwrap();
        assert_eq!(outcome, UndoOutcome::Changed {
            entry: UndoEntry { date: DAY.into(), food_name: "Apple".into(), delta: 2 },
            servings: 3,
        });
        assert_eq!(log.servings(DAY, "Apple"), Some(3));
    }

    #[test]
    fn test_remove_then_undo_restores_count() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 4).unwrap();
        log.log_servings(DAY, "Bread", 1).unwrap();

        assert_eq!(log.remove_all_servings(DAY, "Apple").unwrap(), 4);
        assert_eq!(log.servings(DAY, "Apple"), None);
        assert_eq!(log.undo_history().last().unwrap().delta, -4);

        let outcome = log.undo().unwrap();
        assert!(matches!(outcome, UndoOutcome::Restored { servings: 4, .. }));
        assert_eq!(log.servings(DAY, "Apple"), Some(4));
    }

    #[test]
    fn test_undo_rehydrates_deleted_date() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 2).unwrap();
        log.remove_all_servings(DAY, "Apple").unwrap();
        assert!(log.is_empty());

        log.undo().unwrap();
        assert_eq!(log.servings(DAY, "Apple"), Some(2));
        assert_eq!(log.dates().collect::<Vec<_>>(), vec![DAY]);

        // Undoing the original add empties the date again
        let outcome = log.undo().unwrap();
        assert!(matches!(outcome, UndoOutcome::Removed { .. }));
        assert!(log.is_empty());
        assert!(matches!(log.undo(), Err(LedgerError::EmptyStack)));
    }

    #[test]
    fn test_undo_positive_delta_on_missing_date_recreates() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 2).unwrap();
        // Drop the date without going through the undo stack
        log.days.clear();

        let outcome = log.undo().unwrap();
        assert!(matches!(outcome, UndoOutcome::Restored { servings: 2, .. }));
        assert_eq!(log.servings(DAY, "Apple"), Some(2));
    }

    #[test]
    fn test_remove_missing_entry() {
        let mut log = DailyLog::new();
        assert!(matches!(log.remove_all_servings(DAY, "Apple"), Err(LedgerError::NotFound(_))));
        log.log_servings(DAY, "Apple", 1).unwrap();
        assert!(matches!(log.remove_all_servings(DAY, "Bread"), Err(LedgerError::NotFound(_))));
        assert!(matches!(log.remove_all_servings("99/99/2024", "Apple"), Err(LedgerError::Validation(_))));
        assert_eq!(log.undo_history().len(), 1);
    }

    #[test]
    fn test_empty_undo() {
        let mut log = DailyLog::new();
        assert!(matches!(log.undo(), Err(LedgerError::EmptyStack)));
    }

    #[test]
    fn test_summarize_date() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 2).unwrap();

        let summary = log.summarize_date(DAY, &catalog(), |_| 2000).unwrap();
        assert_eq!(summary.total_calories, 190);
        assert_eq!(summary.target_calories, 2000);
        assert_eq!(summary.excess, -1810);
        assert_eq!(summary.entries[0].calories, Some(190));
    }

    #[test]
    fn test_summarize_unknown_food() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 1).unwrap();
        log.log_servings(DAY, "Deleted Food", 3).unwrap();

        let summary = log.summarize_date(DAY, &catalog(), |_| 100).unwrap();
        assert_eq!(summary.total_calories, 95);
        assert_eq!(summary.excess, -5);
        let unknown: Vec<_> = summary.unknown_entries().collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].food_name, "Deleted Food");
    }

    #[test]
    fn test_summarize_missing_date() {
        let log = DailyLog::new();
        assert!(matches!(
            log.summarize_date(DAY, &catalog(), |_| 0),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_summarize_all_uses_string_order() {
        let mut log = DailyLog::new();
        log.log_servings("15/01/2024", "Bread", 1).unwrap();
        log.log_servings("02/03/2024", "Apple", 1).unwrap();
        log.log_servings("10/12/2023", "Apple", 2).unwrap();

        let summaries = log.summarize_all(&catalog(), |date| if date == "15/01/2024" { 1 } else { 0 });
        let dates: Vec<&str> = summaries.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["02/03/2024", "10/12/2023", "15/01/2024"]);
        assert_eq!(summaries[1].total_calories, 190);
        assert_eq!(summaries[2].target_calories, 1);
    }

    #[test]
    fn test_file_round_trip() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, "Apple", 2).unwrap();
        log.log_servings(DAY, "Bread", 1).unwrap();
        log.log_servings("02/06/2024", "PB Sandwich", 3).unwrap();

        let text = log.serialize();
        assert_eq!(text, "01/06/2024|Apple,2;Bread,1;\n02/06/2024|PB Sandwich,3;\n");

        let (loaded, report) = DailyLog::deserialize(&text);
        assert!(report.is_clean());
        assert_eq!(report.loaded, 3);
        assert_eq!(loaded.entries(DAY), vec![("Apple", 2), ("Bread", 1)]);
        assert_eq!(loaded.servings("02/06/2024", "PB Sandwich"), Some(3));
        assert!(loaded.undo_history().is_empty());
    }

    #[test]
    fn test_deserialize_skips_bad_input() {
        let text = "\
01/06/2024|Apple,2;Bread,x;
31/02/2024|Apple,1;
no separator here
02/06/2024|Apple,1;Apple,2
03/06/2024|
";
        let (log, report) = DailyLog::deserialize(text);
        assert_eq!(report.skipped_lines, vec![1, 2, 3]);
        assert_eq!(log.servings(DAY, "Apple"), Some(2));
        assert_eq!(log.servings(DAY, "Bread"), None);
        assert_eq!(log.servings("02/06/2024", "Apple"), Some(3));
        assert_eq!(log.dates().count(), 2);
    }

    #[test]
    fn test_summary_saturates_on_huge_values() {
        let mut catalog = catalog();
        catalog.add_food(Food::basic("Huge", vec![], u32::MAX).unwrap()).unwrap();

        let mut log = DailyLog::new();
        log.log_servings(DAY, "Huge", u32::MAX).unwrap();
        log.log_servings(DAY, "Apple", 1).unwrap();

        let summary = log.summarize_date(DAY, &catalog, |_| 2000).unwrap();
        assert_eq!(summary.entries[1].calories, Some(i64::MAX));
        assert_eq!(summary.total_calories, i64::MAX);
        assert_eq!(summary.excess, i64::MAX - 2000);

        let all = log.summarize_all(&catalog, |_| i64::MIN);
        assert_eq!(all[0].excess, i64::MAX);
    }

    #[test]
    fn test_log_rejects_servings_overflow() {
        let mut log = DailyLog::new();
        log.days.entry(DAY.into()).or_default().insert("Apple".into(), i64::MAX);

        assert!(matches!(log.log_servings(DAY, "Apple", 1), Err(LedgerError::Validation(_))));
        assert_eq!(log.servings(DAY, "Apple"), Some(i64::MAX));
        assert!(log.undo_history().is_empty());
    }

    #[test]
    fn test_names_are_trimmed_for_log_and_remove() {
        let mut log = DailyLog::new();
        log.log_servings(DAY, " Apple ", 2).unwrap();
        assert_eq!(log.servings(DAY, "Apple"), Some(2));

        assert_eq!(log.remove_all_servings(DAY, " Apple ").unwrap(), 2);
        assert_eq!(log.undo_history().last().unwrap().food_name, "Apple");

        log.undo().unwrap();
        assert_eq!(log.servings(DAY, "Apple"), Some(2));
        assert!(matches!(log.remove_all_servings(DAY, "  "), Err(LedgerError::Validation(_))));
    }
}
