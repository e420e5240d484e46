use crate::config::{ScheduleConfig, ScheduleWindow};

/// Months running the denser summer cadence.
pub const SUMMER_MONTHS: [u32; 4] = [6, 7, 8, 9];

pub fn is_summer_month(month: u32) -> bool {
    SUMMER_MONTHS.contains(&month)
}

pub fn active_window(month: u32, cfg: &ScheduleConfig) -> &ScheduleWindow {
    if is_summer_month(month) {
        &cfg.summer
    } else {
        &cfg.default_window
    }
}

/// Renders a window as the five-field cron expression the deployment cron
/// uses, e.g. `0 8 * * 0,3`.
pub fn cron_expression(window: &ScheduleWindow) -> String {
    let days = window
        .days
        .iter()
        .map(|day| day.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{} {} * * {}", window.minute, window.hour, days)
}
