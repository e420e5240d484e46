use serde_json::Value;

use crate::buckets::TimeRange;
use crate::config::ProviderConfig;
use crate::forecast::{aggregate_samples, Forecast, RawSample};
use crate::http::get_json;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

// Wave estimation constants. The free tier has no wave data, so wave height
// is approximated from wind speed: 0.2 m per m/s with a 0.1 m floor. An
// estimate, not a measurement.
const WAVE_HEIGHT_PER_WIND: f64 = 0.2;
const WAVE_HEIGHT_FLOOR: f64 = 0.1;

pub async fn get_forecast(
    http: &reqwest::Client,
    cfg: &ProviderConfig,
    lat: f64,
    lon: f64,
    ranges: &[TimeRange],
) -> Result<Forecast, String> {
    let url = format!("{}/forecast", cfg.base_url);
    let params = [
        ("lat", lat.to_string()),
        ("lon", lon.to_string()),
        ("appid", cfg.key.clone()),
        ("units", "metric".to_string()),
        ("cnt", "40".to_string()),
    ];

    let data = get_json(http, cfg, &url, &params).await?;
    Ok(aggregate_samples(extract_samples(&data), ranges))
}

/// The 5-day forecast response is a `list` of per-timestamp records with
/// `dt`, `main.temp` and `wind.speed`. Records missing a field simply leave
/// it absent from the sample.
pub fn extract_samples(data: &Value) -> Vec<RawSample> {
    let Some(list) = data.get("list").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut samples = Vec::with_capacity(list.len());
    for record in list {
        let Some(timestamp) = record.get("dt").and_then(Value::as_i64) else {
            continue;
        };
        let temp = record
            .get("main")
            .and_then(|main| main.get("temp"))
            .and_then(Value::as_f64);
        let wind = record
            .get("wind")
            .and_then(|wind| wind.get("speed"))
            .and_then(Value::as_f64);
        samples.push(RawSample {
            timestamp,
            temp,
            wind,
            wave: wind.map(estimate_wave_height),
        });
    }
    samples
}

pub fn estimate_wave_height(wind_speed: f64) -> f64 {
    (wind_speed * WAVE_HEIGHT_PER_WIND).max(WAVE_HEIGHT_FLOOR)
}
