//! User profile model
//!
//! Dated body measurements and the BMR formulas that turn them into a
//! target calorie count for a given day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::LoadReport;
use crate::error::{LedgerError, LedgerResult};
use crate::validation::{parse_date, DATE_FORMAT};

pub const AGE_RANGE: (u32, u32) = (1, 150);
pub const HEIGHT_RANGE_CM: (u32, u32) = (1, 300);
pub const WEIGHT_RANGE_KG: (u32, u32) = (1, 200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Label used in the profile file
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Light",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
            ActivityLevel::VeryActive => "Very Active",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Formula used to estimate daily energy needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalorieMethod {
    #[default]
    HarrisBenedict,
    MifflinStJeor,
    KatchMcArdle,
}

impl CalorieMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            CalorieMethod::HarrisBenedict => "Harris-Benedict",
            CalorieMethod::MifflinStJeor => "Mifflin-St Jeor",
            CalorieMethod::KatchMcArdle => "Katch-McArdle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "harrisbenedict" | "hb" => Some(CalorieMethod::HarrisBenedict),
            "mifflinstjeor" | "msj" => Some(CalorieMethod::MifflinStJeor),
            "katchmcardle" | "km" => Some(CalorieMethod::KatchMcArdle),
            _ => None,
        }
    }

    /// Basal metabolic rate before the activity multiplier
    pub fn bmr(&self, record: &DailyRecord) -> f64 {
        let age = f64::from(record.age);
        let height = f64::from(record.height_cm);
        let weight = f64::from(record.weight_kg);

        match self {
            CalorieMethod::HarrisBenedict => match record.sex {
                Sex::Male => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
                Sex::Female => 447.593 + 9.247 * weight + 3.098 * height - 4.330 * age,
            },
            CalorieMethod::MifflinStJeor => {
                let base = 10.0 * weight + 6.25 * height - 5.0 * age;
                match record.sex {
                    Sex::Male => base + 5.0,
                    Sex::Female => base - 161.0,
                }
            }
            CalorieMethod::KatchMcArdle => {
                // Body fat is estimated from BMI since it is not recorded
                let meters = height / 100.0;
                let bmi = weight / (meters * meters);
                let offset = match record.sex {
                    Sex::Male => 16.2,
                    Sex::Female => 5.4,
                };
                let body_fat = (1.20 * bmi + 0.23 * age - offset).clamp(5.0, 45.0);
                let lean_mass = weight * (1.0 - body_fat / 100.0);
                370.0 + 21.6 * lean_mass
            }
        }
    }

    /// Daily target calories, truncated to a whole number
    pub fn target_calories(&self, record: &DailyRecord) -> i64 {
        (self.bmr(record) * record.activity.multiplier()) as i64
    }
}

/// Measurements recorded on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub age: u32,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub sex: Sex,
    pub activity: ActivityLevel,
}

impl Default for DailyRecord {
    fn default() -> Self {
        Self {
            age: 25,
            height_cm: 175,
            weight_kg: 70,
            sex: Sex::Male,
            activity: ActivityLevel::Moderate,
        }
    }
}

impl DailyRecord {
    pub fn validate(&self) -> LedgerResult<()> {
        check_range("age", self.age, AGE_RANGE)?;
        check_range("height", self.height_cm, HEIGHT_RANGE_CM)?;
        check_range("weight", self.weight_kg, WEIGHT_RANGE_KG)?;
        Ok(())
    }
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> LedgerResult<()> {
    if value < min || value > max {
        return Err(LedgerError::validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// Date-keyed profile history
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, or the default profile when none exists
    pub fn latest(&self) -> DailyRecord {
        self.records.values().next_back().copied().unwrap_or_default()
    }

    /// Record that applies on `date`: the one dated that day, else the
    /// latest earlier one. Dates before the first record (or unparseable
    /// dates) fall back to the most recent record.
    pub fn record_for(&self, date: &str) -> DailyRecord {
        parse_date(date)
            .and_then(|d| self.records.range(..=d).next_back())
            .map(|(_, record)| *record)
            .unwrap_or_else(|| self.latest())
    }

    pub fn target_calories(&self, date: &str, method: CalorieMethod) -> i64 {
        method.target_calories(&self.record_for(date))
    }

    /// Store a full record for a date, replacing any existing one
    pub fn set_record(&mut self, date: &str, record: DailyRecord) -> LedgerResult<()> {
        let day = parse_date(date).ok_or_else(|| {
            LedgerError::validation(format!("Invalid date '{}': expected DD/MM/YYYY", date))
        })?;
        record.validate()?;
        self.records.insert(day, record);
        info!(date = %date, age = record.age, weight = record.weight_kg, "profile record set");
        Ok(())
    }

    /// Copy the latest record with new age and weight, dated `date`
    pub fn update_measurements(&mut self, date: &str, age: u32, weight_kg: u32) -> LedgerResult<DailyRecord> {
        let record = DailyRecord {
            age,
            weight_kg,
            ..self.latest()
        };
        self.set_record(date, record)?;
        Ok(record)
    }

    /// Copy the latest record with a new activity level, dated `date`
    pub fn set_activity(&mut self, date: &str, activity: ActivityLevel) -> LedgerResult<DailyRecord> {
        let record = DailyRecord {
            activity,
            ..self.latest()
        };
        self.set_record(date, record)?;
        Ok(record)
    }

    /// Render in file format: `DD/MM/YYYY|age|height|weight|sex|activity`
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (date, r) in &self.records {
            out.push_str(&format!(
                "{}|{}|{}|{}|{}|{}\n",
                date.format(DATE_FORMAT),
                r.age,
                r.height_cm,
                r.weight_kg,
                r.sex.as_str(),
                r.activity.as_str()
            ));
        }
        out
    }

    /// Parse file contents, skipping malformed lines
    pub fn deserialize(text: &str) -> (UserProfile, LoadReport) {
        let mut profile = UserProfile::new();
        let mut report = LoadReport::default();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match parse_record_line(line) {
                Some((date, record)) if record.validate().is_ok() => {
                    profile.records.insert(date, record);
                    report.loaded += 1;
                }
                _ => {
                    warn!(line = line_no, "skipping malformed profile line");
                    report.skipped_lines.push(line_no);
                }
            }
        }

        debug!(records = report.loaded, skipped = report.skipped_lines.len(), "profile parsed");
        (profile, report)
    }
}

fn parse_record_line(line: &str) -> Option<(NaiveDate, DailyRecord)> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 6 {
        return None;
    }
    let date = parse_date(fields[0])?;
    let record = DailyRecord {
        age: fields[1].trim().parse().ok()?,
        height_cm: fields[2].trim().parse().ok()?,
        weight_kg: fields[3].trim().parse().ok()?,
        sex: Sex::parse(fields[4])?,
        activity: ActivityLevel::parse(fields[5])?,
    };
    Some((date, record))
}
