use crate::buckets::TimeRange;
use crate::forecast::Forecast;

const NO_DATA: &str = "Н/Д";

// Severity thresholds, ascending. Tuned for a Black Sea beach, not physics.
const TEMP_COLD_MAX: f64 = 10.0;
const TEMP_COMFORT_MAX: f64 = 25.0;
const WIND_CALM_MAX: f64 = 5.0;
const WIND_FRESH_MAX: f64 = 10.0;
const WAVE_CALM_MAX: f64 = 0.5;
const WAVE_MODERATE_MAX: f64 = 1.0;

fn temp_icon(value: f64) -> &'static str {
    if value < TEMP_COLD_MAX {
        "🔵"
    } else if value < TEMP_COMFORT_MAX {
        "🟢"
    } else {
        "🔴"
    }
}

fn wind_icon(value: f64) -> &'static str {
    if value < WIND_CALM_MAX {
        "🟢"
    } else if value < WIND_FRESH_MAX {
        "🟡"
    } else {
        "🔴"
    }
}

fn wave_icon(value: f64) -> &'static str {
    if value < WAVE_CALM_MAX {
        "🟢"
    } else if value < WAVE_MODERATE_MAX {
        "🟡"
    } else {
        "🔴"
    }
}

fn trim_float(value: f64, decimals: usize) -> String {
    let mut formatted = format!("{:.*}", decimals, value);
    if decimals > 0 {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    formatted
}

fn format_temp(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}°C", trim_float(v, 0)),
        None => NO_DATA.to_string(),
    }
}

fn format_wind(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} м/с", trim_float(v, 0)),
        None => NO_DATA.to_string(),
    }
}

fn format_wave(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} м", trim_float(v, 1)),
        None => NO_DATA.to_string(),
    }
}

/// Markdown table: one row per (day, bucket), the day name shown only on the
/// day's first row, each metric prefixed with its severity icon. Days render
/// in ascending date order, buckets in configured order; bucket keys not in
/// the configured list are skipped.
pub fn render_table(forecast: &Forecast, location_name: &str, ranges: &[TimeRange]) -> String {
    let mut message = format!("Прогноз погоды для {location_name} на неделю:\n");
    message.push_str("| День | Время | Температура | Ветер | Волны |\n");
    message.push_str("|------|-------|-------------|-------|-------|\n");

    for day in forecast.values() {
        let mut day_shown = false;
        for range in ranges {
            let Some(stats) = day.get(range.key) else {
                continue;
            };
            let day_cell = if day_shown { "" } else { stats.day_name.as_str() };
            day_shown = true;

            let temp = match stats.temp {
                Some(v) => format!("{} {}", temp_icon(v), format_temp(Some(v))),
                None => NO_DATA.to_string(),
            };
            let wind = match stats.wind {
                Some(v) => format!("{} {}", wind_icon(v), format_wind(Some(v))),
                None => NO_DATA.to_string(),
            };
            let wave = match stats.wave {
                Some(v) => format!("{} {}", wave_icon(v), format_wave(Some(v))),
                None => NO_DATA.to_string(),
            };

            message.push_str(&format!(
                "| {} | {} {} | {} | {} | {} |\n",
                day_cell, range.emoji, range.label, temp, wind, wave
            ));
        }
    }

    message
}

/// Plain text: a heading per day, one line per bucket with its hour range.
/// No severity icons. Same ordering contract as the table.
pub fn render_text(forecast: &Forecast, location_name: &str, ranges: &[TimeRange]) -> String {
    let mut message = format!("Прогноз погоды для {location_name} на неделю:\n\n");

    for day in forecast.values() {
        let Some(day_name) = ranges
            .iter()
            .find_map(|range| day.get(range.key))
            .map(|stats| stats.day_name.as_str())
        else {
            continue;
        };
        message.push_str(&format!("{day_name}:\n"));

        for range in ranges {
            let Some(stats) = day.get(range.key) else {
                continue;
            };
            message.push_str(&format!(
                "- {} {} ({}:00–{}:00): Температура: {}, Ветер: {}, Волны: {}\n",
                range.emoji,
                range.label,
                range.start,
                range.end,
                format_temp(stats.temp),
                format_wind(stats.wind),
                format_wave(stats.wave),
            ));
        }
        message.push('\n');
    }

    message
}
