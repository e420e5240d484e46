use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

use crate::buckets::{bucket_for, day_name, default_time_ranges, TimeRange};
use crate::config::WeatherConfig;
use crate::openweathermap;
use crate::windy;

/// All samples are grouped by calendar date and hour in this fixed zone.
pub const TARGET_UTC_OFFSET_SECS: i32 = 3 * 3600;

pub fn target_offset() -> FixedOffset {
    FixedOffset::east_opt(TARGET_UTC_OFFSET_SECS).unwrap()
}

/// One provider sample, already in metric units. A field the provider did
/// not report is `None` and contributes nothing to that field's average.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    pub timestamp: i64,
    pub temp: Option<f64>,
    pub wind: Option<f64>,
    pub wave: Option<f64>,
}

/// Averaged stats for one (day, bucket) pair. Temperature and wind are
/// rounded to whole units, wave height to one decimal. `None` means no
/// samples carried that field, which is distinct from a zero reading.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub day_name: String,
    pub temp: Option<f64>,
    pub wind: Option<f64>,
    pub wave: Option<f64>,
}

/// Day ordering comes from the outer map; bucket rendering order comes from
/// the configured range list, not from the inner map.
pub type Forecast = BTreeMap<NaiveDate, BTreeMap<String, BucketStats>>;

#[derive(Debug, Default)]
struct FieldLists {
    temps: Vec<f64>,
    winds: Vec<f64>,
    waves: Vec<f64>,
}

/// Reduces provider samples to the canonical day/bucket aggregate. Shared by
/// both providers; only sample extraction differs per source.
pub fn aggregate_samples<I>(samples: I, ranges: &[TimeRange]) -> Forecast
where
    I: IntoIterator<Item = RawSample>,
{
    let offset = target_offset();
    let mut lists: BTreeMap<NaiveDate, BTreeMap<String, FieldLists>> = BTreeMap::new();

    for sample in samples {
        let Some(utc) = DateTime::<Utc>::from_timestamp(sample.timestamp, 0) else {
            continue;
        };
        let local = utc.with_timezone(&offset);
        let Some(bucket) = bucket_for(local.hour(), ranges) else {
            continue;
        };

        let entry = lists
            .entry(local.date_naive())
            .or_default()
            .entry(bucket.to_string())
            .or_default();
        if let Some(temp) = sample.temp {
            entry.temps.push(temp);
        }
        if let Some(wind) = sample.wind {
            entry.winds.push(wind);
        }
        if let Some(wave) = sample.wave {
            entry.waves.push(wave);
        }
    }

    let mut forecast = Forecast::new();
    for (date, buckets) in lists {
        let name = day_name(date);
        let day = forecast.entry(date).or_default();
        for (key, fields) in buckets {
            day.insert(
                key,
                BucketStats {
                    day_name: name.to_string(),
                    temp: mean(&fields.temps).map(round_whole),
                    wind: mean(&fields.winds).map(round_whole),
                    wave: mean(&fields.waves).map(round_tenth),
                },
            );
        }
    }
    forecast
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round_whole(value: f64) -> f64 {
    value.round()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum WeatherError {
    AllProvidersFailed(Vec<ProviderFailure>),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::AllProvidersFailed(failures) => {
                let causes: Vec<String> = failures
                    .iter()
                    .map(|failure| format!("{}: {}", failure.provider, failure.message))
                    .collect();
                write!(
                    f,
                    "Не удалось получить прогноз погоды. Все API недоступны ({})",
                    causes.join("; ")
                )
            }
        }
    }
}

impl std::error::Error for WeatherError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Windy,
    OpenWeatherMap,
}

/// Fallback priority: primary first.
pub const PROVIDER_ORDER: [Provider; 2] = [Provider::Windy, Provider::OpenWeatherMap];

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Windy => "Windy",
            Provider::OpenWeatherMap => "OpenWeatherMap",
        }
    }

    async fn fetch(
        self,
        http: &reqwest::Client,
        cfg: &WeatherConfig,
        lat: f64,
        lon: f64,
        ranges: &[TimeRange],
    ) -> Result<Forecast, String> {
        match self {
            Provider::Windy => windy::get_forecast(http, &cfg.windy, lat, lon, ranges).await,
            Provider::OpenWeatherMap => {
                openweathermap::get_forecast(http, &cfg.openweathermap, lat, lon, ranges).await
            }
        }
    }
}

/// Tries each provider in order and returns the first forecast obtained.
/// Per-provider failures (after that provider's own retries) are logged and
/// swallowed; only total exhaustion reaches the caller.
pub async fn get_forecast(
    http: &reqwest::Client,
    cfg: &WeatherConfig,
    lat: f64,
    lon: f64,
) -> Result<Forecast, WeatherError> {
    let ranges = default_time_ranges();
    let mut failures = Vec::new();

    for provider in PROVIDER_ORDER {
        tracing::info!(provider = provider.name(), lat, lon, "requesting forecast");
        match provider.fetch(http, cfg, lat, lon, &ranges).await {
            Ok(forecast) => return Ok(forecast),
            Err(message) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %message,
                    "provider failed, trying next"
                );
                failures.push(ProviderFailure {
                    provider: provider.name(),
                    message,
                });
            }
        }
    }

    tracing::error!("no provider could deliver a forecast");
    Err(WeatherError::AllProvidersFailed(failures))
}

/// Cheap check used to skip the network entirely when no API key is set.
pub fn any_provider_configured(cfg: &WeatherConfig) -> bool {
    !cfg.windy.key.is_empty() || !cfg.openweathermap.key.is_empty()
}
