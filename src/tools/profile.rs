//! Profile Tools
//!
//! Tools for viewing and updating the profile used for calorie targets.

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ActivityLevel, CalorieMethod, DailyRecord};
use crate::session::{FileSaveResult, Session};
use crate::validation::{resolve_date, today};

/// Response for get_profile and profile updates
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub record: DailyRecord,
    pub activity_label: &'static str,
    pub calorie_method: &'static str,
    pub target_calories_today: i64,
    pub records: usize,
}

/// Response for get_target_calories
#[derive(Debug, Serialize)]
pub struct TargetCaloriesResponse {
    pub date: String,
    pub calorie_method: &'static str,
    pub target_calories: i64,
    pub record: DailyRecord,
}

fn profile_response(session: &Session, record: DailyRecord) -> ProfileResponse {
    ProfileResponse {
        record,
        activity_label: record.activity.as_str(),
        calorie_method: session.calorie_method().display_name(),
        target_calories_today: session.calorie_method().target_calories(&record),
        records: session.profile.len(),
    }
}

pub fn get_profile(session: &Session) -> ProfileResponse {
    profile_response(session, session.profile.latest())
}

pub fn update_profile(session: &mut Session, age: u32, weight_kg: u32) -> LedgerResult<ProfileResponse> {
    let record = session.update_profile(age, weight_kg)?;
    Ok(profile_response(session, record))
}

pub fn set_activity_level(session: &mut Session, level: &str) -> LedgerResult<ProfileResponse> {
    let activity = ActivityLevel::parse(level).ok_or_else(|| {
        LedgerError::validation(format!(
            "Unknown activity level '{}': use sedentary, light, moderate, active or very_active",
            level
        ))
    })?;
    let record = session.set_activity_level(activity)?;
    Ok(profile_response(session, record))
}

pub fn set_calorie_method(session: &mut Session, method: &str) -> LedgerResult<ProfileResponse> {
    let method = CalorieMethod::parse(method).ok_or_else(|| {
        LedgerError::validation(format!(
            "Unknown calorie method '{}': use harris-benedict, mifflin-st-jeor or katch-mcardle",
            method
        ))
    })?;
    session.set_calorie_method(method);
    Ok(profile_response(session, session.profile.latest()))
}

pub fn get_target_calories(session: &Session, date: &str) -> LedgerResult<TargetCaloriesResponse> {
    let date = resolve_date(date, &today())?;
    Ok(TargetCaloriesResponse {
        target_calories: session.target_calories(&date)?,
        calorie_method: session.calorie_method().display_name(),
        record: session.profile.record_for(&date),
        date,
    })
}

pub fn save_profile(session: &Session) -> FileSaveResult {
    let path = session.config().profile_path().display().to_string();
    match session.save_profile() {
        Ok(_) => FileSaveResult { path, saved: true, error: None },
        Err(e) => FileSaveResult { path, saved: false, error: Some(e.to_string()) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(Config::with_data_dir(dir.path()));
        (dir, session)
    }

    #[test]
    fn test_default_profile() {
        let (_dir, session) = session();
        let profile = get_profile(&session);
        assert_eq!(profile.record, DailyRecord::default());
        assert_eq!(profile.calorie_method, "Harris-Benedict");
        assert_eq!(profile.target_calories_today, 2672);
        assert_eq!(profile.records, 0);
    }

    #[test]
    fn test_updates() {
        let (_dir, mut session) = session();
        let updated = update_profile(&mut session, 40, 80).unwrap();
        assert_eq!(updated.record.age, 40);
        assert_eq!(updated.records, 1);

        let updated = set_activity_level(&mut session, "very active").unwrap();
        assert_eq!(updated.activity_label, "Very Active");
        // Same day, so the record is replaced rather than added
        assert_eq!(updated.records, 1);

        assert!(set_activity_level(&mut session, "couch").is_err());
        assert!(update_profile(&mut session, 200, 80).is_err());
    }

    #[test]
    fn test_calorie_method_and_targets() {
        let (_dir, mut session) = session();
        let response = set_calorie_method(&mut session, "mifflin-st-jeor").unwrap();
        assert_eq!(response.calorie_method, "Mifflin-St Jeor");

        let target = get_target_calories(&session, "01/06/2024").unwrap();
        assert_eq!(target.target_calories, 2594);
        assert!(set_calorie_method(&mut session, "paleo").is_err());
        assert!(get_target_calories(&session, "1/6/2024").is_err());
    }
}
