use chrono::{NaiveDate, TimeZone};
use serde_json::json;

use pogodabot::buckets::default_time_ranges;
use pogodabot::forecast::{
    aggregate_samples, target_offset, ProviderFailure, RawSample, WeatherError,
};
use pogodabot::openweathermap;
use pogodabot::windy;

fn ts(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    target_offset()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
        .timestamp()
}

fn sample(timestamp: i64, temp: Option<f64>, wind: Option<f64>, wave: Option<f64>) -> RawSample {
    RawSample {
        timestamp,
        temp,
        wind,
        wave,
    }
}

#[test]
fn test_mean_rounding() {
    let ranges = default_time_ranges();
    let samples = vec![
        sample(ts(2025, 3, 3, 7), Some(20.0), None, Some(0.3)),
        sample(ts(2025, 3, 3, 8), Some(22.0), None, Some(0.7)),
        sample(ts(2025, 3, 3, 9), Some(24.0), None, None),
    ];
    let forecast = aggregate_samples(samples, &ranges);

    let day = &forecast[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()];
    let morning = &day["morning"];
    assert_eq!(morning.temp, Some(22.0));
    assert_eq!(morning.wave, Some(0.5));
}

#[test]
fn test_mean_rounds_half_away_from_zero() {
    let ranges = default_time_ranges();
    let samples = vec![
        sample(ts(2025, 3, 3, 7), Some(21.0), None, None),
        sample(ts(2025, 3, 3, 8), Some(22.0), None, None),
    ];
    let forecast = aggregate_samples(samples, &ranges);
    let morning = &forecast[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()]["morning"];
    assert_eq!(morning.temp, Some(22.0));
}

#[test]
fn test_empty_field_yields_no_data_marker() {
    let ranges = default_time_ranges();
    let samples = vec![sample(ts(2025, 3, 3, 12), Some(18.0), None, None)];
    let forecast = aggregate_samples(samples, &ranges);

    let noon = &forecast[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()]["noon"];
    assert_eq!(noon.temp, Some(18.0));
    assert_eq!(noon.wind, None);
    assert_eq!(noon.wave, None);
}

#[test]
fn test_out_of_bucket_samples_are_dropped() {
    let ranges = default_time_ranges();
    let samples = vec![
        sample(ts(2025, 3, 3, 3), Some(10.0), None, None),
        sample(ts(2025, 3, 3, 23), Some(10.0), None, None),
    ];
    let forecast = aggregate_samples(samples, &ranges);
    assert!(forecast.is_empty());
}

#[test]
fn test_day_name_is_set_per_day() {
    let ranges = default_time_ranges();
    let samples = vec![
        sample(ts(2025, 3, 3, 7), Some(10.0), None, None),
        sample(ts(2025, 3, 3, 19), Some(12.0), None, None),
    ];
    let forecast = aggregate_samples(samples, &ranges);
    let day = &forecast[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()];
    assert_eq!(day["morning"].day_name, "Понедельник");
    assert_eq!(day["evening"].day_name, "Понедельник");
}

#[test]
fn test_days_iterate_in_date_order() {
    let ranges = default_time_ranges();
    // Wednesday samples arrive before Monday samples.
    let samples = vec![
        sample(ts(2025, 3, 5, 12), Some(15.0), None, None),
        sample(ts(2025, 3, 3, 12), Some(15.0), None, None),
    ];
    let forecast = aggregate_samples(samples, &ranges);

    let dates: Vec<_> = forecast.keys().copied().collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        ]
    );
}

#[test]
fn test_wave_estimation() {
    assert_eq!(openweathermap::estimate_wave_height(5.0), 1.0);
    assert_eq!(openweathermap::estimate_wave_height(0.0), 0.1);
    assert_eq!(openweathermap::estimate_wave_height(0.2), 0.1);
}

#[test]
fn test_windy_extract_parallel_arrays() {
    let data = json!({
        "ts": [ts(2025, 3, 3, 7), ts(2025, 3, 3, 8)],
        "temp-surface": [20.0, 22.0],
        "wind-surface": [4.0],
        "waves": [0.4, 0.6],
    });
    let samples = windy::extract_samples(&data);

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].temp, Some(20.0));
    assert_eq!(samples[0].wind, Some(4.0));
    assert_eq!(samples[0].wave, Some(0.4));
    // Short wind array: second sample has no wind reading.
    assert_eq!(samples[1].wind, None);
    assert_eq!(samples[1].wave, Some(0.6));
}

#[test]
fn test_windy_extract_tolerates_missing_fields() {
    assert!(windy::extract_samples(&json!({})).is_empty());
    let data = json!({"ts": [ts(2025, 3, 3, 7)]});
    let samples = windy::extract_samples(&data);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].temp, None);
    assert_eq!(samples[0].wind, None);
    assert_eq!(samples[0].wave, None);
}

#[test]
fn test_openweathermap_extract_estimates_waves() {
    let data = json!({
        "list": [
            {"dt": ts(2025, 3, 3, 7), "main": {"temp": 18.0}, "wind": {"speed": 5.0}},
            {"dt": ts(2025, 3, 3, 19), "main": {"temp": 15.0}, "wind": {"speed": 2.0}},
        ]
    });
    let samples = openweathermap::extract_samples(&data);

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].wave, Some(1.0));
    assert_eq!(samples[1].wave, Some(0.4));
}

#[test]
fn test_openweathermap_extract_tolerates_missing_list() {
    assert!(openweathermap::extract_samples(&json!({})).is_empty());
    assert!(openweathermap::extract_samples(&json!({"list": "oops"})).is_empty());
}

#[test]
fn test_end_to_end_two_buckets_one_day() {
    let data = json!({
        "list": [
            {"dt": ts(2025, 3, 3, 7), "main": {"temp": 18.0}, "wind": {"speed": 5.0}},
            {"dt": ts(2025, 3, 3, 19), "main": {"temp": 15.0}, "wind": {"speed": 2.0}},
        ]
    });
    let ranges = default_time_ranges();
    let forecast = aggregate_samples(openweathermap::extract_samples(&data), &ranges);

    assert_eq!(forecast.len(), 1);
    let day = &forecast[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()];
    assert_eq!(day.len(), 2);

    let morning = &day["morning"];
    assert_eq!(morning.temp, Some(18.0));
    assert_eq!(morning.wind, Some(5.0));
    assert_eq!(morning.wave, Some(1.0));

    let evening = &day["evening"];
    assert_eq!(evening.temp, Some(15.0));
    assert_eq!(evening.wind, Some(2.0));
    assert_eq!(evening.wave, Some(0.4));
}

#[test]
fn test_weather_error_lists_every_failed_provider() {
    let err = WeatherError::AllProvidersFailed(vec![
        ProviderFailure {
            provider: "Windy",
            message: "HTTP status 500".to_string(),
        },
        ProviderFailure {
            provider: "OpenWeatherMap",
            message: "timeout".to_string(),
        },
    ]);
    let text = err.to_string();
    assert!(text.contains("Windy: HTTP status 500"));
    assert!(text.contains("OpenWeatherMap: timeout"));
    assert!(text.contains("Все API недоступны"));
}
