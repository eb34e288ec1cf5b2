//! Utility to record today's profile from the command line
//!
//! Usage: set_profile <age> <height_cm> <weight_kg> <male|female> <activity>

use nutrilog::config::Config;
use nutrilog::models::{ActivityLevel, DailyRecord, Sex};
use nutrilog::session::Session;
use nutrilog::validation::{parse_positive_int, today};

const USAGE: &str = "usage: set_profile <age> <height_cm> <weight_kg> <male|female> <sedentary|light|moderate|active|very_active>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 5 {
        return Err(USAGE.into());
    }

    let record = DailyRecord {
        age: parse_positive_int(&args[0])?,
        height_cm: parse_positive_int(&args[1])?,
        weight_kg: parse_positive_int(&args[2])?,
        sex: Sex::parse(&args[3]).ok_or(USAGE)?,
        activity: ActivityLevel::parse(&args[4]).ok_or(USAGE)?,
    };

    let config = Config::from_env();
    println!("Data directory: {}", config.data_dir().display());

    let mut session = Session::load(config);
    let date = today();
    session.profile.set_record(&date, record)?;
    let path = session.save_profile()?;

    println!("Profile set for {}:", date);
    println!("  Age: {}", record.age);
    println!("  Height: {} cm", record.height_cm);
    println!("  Weight: {} kg", record.weight_kg);
    println!("  Sex: {}", record.sex.as_str());
    println!("  Activity: {}", record.activity.as_str());
    println!(
        "  Target: {} kcal ({})",
        session.target_calories(&date)?,
        session.calorie_method().display_name()
    );
    println!("Saved to {}", path.display());

    Ok(())
}
