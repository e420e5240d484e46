use chrono::{Datelike, NaiveDate, Weekday};

/// A named daily time window used to group hourly forecast samples.
/// Start hour is inclusive, end hour is exclusive.
#[derive(Debug, Clone)]
pub struct TimeRange {
    pub key: &'static str,
    pub start: u32,
    pub end: u32,
    pub emoji: &'static str,
    pub label: &'static str,
}

pub fn default_time_ranges() -> Vec<TimeRange> {
    vec![
        TimeRange {
            key: "morning",
            start: 6,
            end: 11,
            emoji: "🌞",
            label: "Утро",
        },
        TimeRange {
            key: "noon",
            start: 11,
            end: 16,
            emoji: "☀️",
            label: "Полдень",
        },
        TimeRange {
            key: "evening",
            start: 16,
            end: 22,
            emoji: "🌙",
            label: "Вечер",
        },
    ]
}

/// Maps an hour of day to its bucket key. Ranges are checked in configured
/// order, first match wins; hours outside every range yield `None` and the
/// caller drops the sample.
pub fn bucket_for(hour: u32, ranges: &[TimeRange]) -> Option<&'static str> {
    ranges
        .iter()
        .find(|range| hour >= range.start && hour < range.end)
        .map(|range| range.key)
}

pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Понедельник",
        Weekday::Tue => "Вторник",
        Weekday::Wed => "Среда",
        Weekday::Thu => "Четверг",
        Weekday::Fri => "Пятница",
        Weekday::Sat => "Суббота",
        Weekday::Sun => "Воскресенье",
    }
}
