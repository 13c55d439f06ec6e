use chore_core::error::CoreError;
use chore_core::models::CompletionAnchor;
use chore_core::timezone::{parse_timezone, validate_timezone};
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Config file looked up in the working directory. `CHORE_CONFIG` points elsewhere.
pub const CONFIG_FILE: &str = "chore.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// Where the signed-in user is remembered between runs
    pub session_path: String,
    /// IANA timezone whose calendar days decide Today and Tomorrow
    pub timezone: String,
    /// What the next due date is counted from when a chore is done
    pub completion_anchor: CompletionAnchor,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "chore.db".to_string(),
            session_path: "chore-session.json".to_string(),
            timezone: detect_system_timezone(),
            completion_anchor: CompletionAnchor::default(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        let file = std::env::var("CHORE_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed("CHORE_").ignore(&["config"]))
    }

    /// The configured timezone, with suggestions folded into the error when it is unknown.
    pub fn tz(&self) -> Result<Tz, CoreError> {
        parse_timezone(&self.timezone).map_err(|_| {
            CoreError::InvalidTimezone(format!(
                "'{}' in config. Did you mean one of: {}?",
                self.timezone,
                suggest_timezone(&self.timezone).join(", ")
            ))
        })
    }
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

const COMMON_TIMEZONES: [&str; 18] = [
    "UTC",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Sao_Paulo",
    "Europe/London",
    "Europe/Paris",
    "Europe/Berlin",
    "Europe/Rome",
    "Europe/Madrid",
    "Asia/Tokyo",
    "Asia/Shanghai",
    "Asia/Kolkata",
    "Asia/Dubai",
    "Australia/Sydney",
    "Australia/Melbourne",
    "Pacific/Auckland",
];

/// Suggests similar timezone names when validation fails
pub fn suggest_timezone(invalid_tz: &str) -> Vec<&'static str> {
    let lower_invalid = invalid_tz.trim().to_lowercase();

    let suggestions: Vec<&'static str> = COMMON_TIMEZONES
        .iter()
        .copied()
        .filter(|tz| {
            !lower_invalid.is_empty()
                && tz
                    .split('/')
                    .any(|part| part.to_lowercase().contains(&lower_invalid))
        })
        .collect();

    if suggestions.is_empty() {
        COMMON_TIMEZONES.iter().copied().take(5).collect()
    } else {
        suggestions
    }
}
