use serde_json::{json, Value};

use crate::buckets::TimeRange;
use crate::config::ProviderConfig;
use crate::forecast::{aggregate_samples, Forecast, RawSample};
use crate::http::post_json;

pub const DEFAULT_BASE_URL: &str = "https://api.windy.com/api/point-forecast/v2";

pub async fn get_forecast(
    http: &reqwest::Client,
    cfg: &ProviderConfig,
    lat: f64,
    lon: f64,
    ranges: &[TimeRange],
) -> Result<Forecast, String> {
    let body = json!({
        "lat": lat,
        "lon": lon,
        "model": "gfs",
        "parameters": ["wind", "temp", "waves"],
        "key": cfg.key,
        "levels": ["surface"],
    });

    let data = post_json(http, cfg, &cfg.base_url, &body).await?;
    Ok(aggregate_samples(extract_samples(&data), ranges))
}

/// The point-forecast response carries parallel arrays indexed by timestamp:
/// `ts`, `temp-surface`, `wind-surface`, `waves`. A missing array means that
/// field is absent from every sample; a short array leaves the tail absent.
pub fn extract_samples(data: &Value) -> Vec<RawSample> {
    let Some(timestamps) = data.get("ts").and_then(Value::as_array) else {
        return Vec::new();
    };
    let temps = data.get("temp-surface").and_then(Value::as_array);
    let winds = data.get("wind-surface").and_then(Value::as_array);
    let waves = data.get("waves").and_then(Value::as_array);

    let field_at = |field: Option<&Vec<Value>>, index: usize| {
        field.and_then(|values| values.get(index)).and_then(Value::as_f64)
    };

    let mut samples = Vec::with_capacity(timestamps.len());
    for (index, ts) in timestamps.iter().enumerate() {
        let Some(timestamp) = ts.as_i64() else {
            continue;
        };
        samples.push(RawSample {
            timestamp,
            temp: field_at(temps, index),
            wind: field_at(winds, index),
            wave: field_at(waves, index),
        });
    }
    samples
}
