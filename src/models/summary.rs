//! Calorie summaries for logged days

use serde::Serialize;

/// One logged food on a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub food_name: String,
    pub servings: i64,
    /// `None` when the food is no longer in the catalog
    pub calories: Option<i64>,
}

/// Totals for one day against the target. Calorie arithmetic saturates at
/// the `i64` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub entries: Vec<EntrySummary>,
    pub total_calories: i64,
    pub target_calories: i64,
    /// `total_calories - target_calories`; negative means under target
    pub excess: i64,
}

impl DaySummary {
    pub(crate) fn new(date: String, entries: Vec<EntrySummary>, target_calories: i64) -> Self {
        let total_calories = entries
            .iter()
            .filter_map(|e| e.calories)
            .fold(0i64, i64::saturating_add);
        Self {
            date,
            entries,
            total_calories,
            target_calories,
            excess: total_calories.saturating_sub(target_calories),
        }
    }

    /// Entries whose food could not be priced
    pub fn unknown_entries(&self) -> impl Iterator<Item = &EntrySummary> {
        self.entries.iter().filter(|e| e.calories.is_none())
    }
}
