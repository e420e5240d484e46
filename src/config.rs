use std::env;

use crate::openweathermap;
use crate::windy;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub chat_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Table,
    Text,
    Both,
}

impl MessageFormat {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "text" => Ok(Self::Text),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown WEATHER_FORMAT value: {other}")),
        }
    }
}

/// Days use cron numbering (0 = Sunday). Times are UTC+3.
#[derive(Debug, Clone)]
pub struct ScheduleWindow {
    pub days: Vec<u8>,
    pub hour: u8,
    pub minute: u8,
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub summer: ScheduleWindow,
    pub default_window: ScheduleWindow,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub windy: ProviderConfig,
    pub openweathermap: ProviderConfig,
    pub locations: Vec<(String, Location)>,
    pub message_format: MessageFormat,
    pub schedule: ScheduleConfig,
}

impl WeatherConfig {
    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, location)| location)
    }
}

pub fn load_weather_config() -> Result<WeatherConfig, String> {
    let windy = ProviderConfig {
        key: env::var("WINDY_API_KEY").unwrap_or_default(),
        base_url: env::var("WINDY_BASE_URL")
            .unwrap_or_else(|_| windy::DEFAULT_BASE_URL.to_string()),
        timeout_secs: env_u64("WINDY_TIMEOUT", 10)?,
        retry_attempts: env_u32("WINDY_RETRY_ATTEMPTS", 3)?,
        retry_delay_secs: env_u64("WINDY_RETRY_DELAY", 5)?,
    };

    let openweathermap = ProviderConfig {
        key: env::var("OPENWEATHERMAP_API_KEY").unwrap_or_default(),
        base_url: env::var("OPENWEATHERMAP_BASE_URL")
            .unwrap_or_else(|_| openweathermap::DEFAULT_BASE_URL.to_string()),
        timeout_secs: env_u64("OPENWEATHERMAP_TIMEOUT", 10)?,
        retry_attempts: env_u32("OPENWEATHERMAP_RETRY_ATTEMPTS", 3)?,
        retry_delay_secs: env_u64("OPENWEATHERMAP_RETRY_DELAY", 5)?,
    };

    // Гагрский район, N43°10'26", E40°15'46"
    let default_location = Location {
        lat: env_f64("WEATHER_LAT", 43.1739)?,
        lon: env_f64("WEATHER_LON", 40.2628)?,
        name: env::var("WEATHER_LOCATION_NAME").unwrap_or_else(|_| "Алахадзы".to_string()),
        chat_id: env::var("TELEGRAM_CHAT_ID").ok().and_then(|value| value.parse().ok()),
    };

    let message_format =
        MessageFormat::parse(&env::var("WEATHER_FORMAT").unwrap_or_else(|_| "both".to_string()))?;

    Ok(WeatherConfig {
        windy,
        openweathermap,
        locations: vec![("default".to_string(), default_location)],
        message_format,
        schedule: default_schedule(),
    })
}

fn default_schedule() -> ScheduleConfig {
    ScheduleConfig {
        // June through September: Sunday, Tuesday, Thursday at 08:00.
        summer: ScheduleWindow {
            days: vec![0, 2, 4],
            hour: 8,
            minute: 0,
        },
        // Rest of the year: Sunday and Wednesday at 08:00.
        default_window: ScheduleWindow {
            days: vec![0, 3],
            hour: 8,
            minute: 0,
        },
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("{name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("{name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}
