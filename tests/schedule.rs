use pogodabot::config::{MessageFormat, ScheduleConfig, ScheduleWindow};
use pogodabot::schedule::{active_window, cron_expression, is_summer_month};

fn schedule_config() -> ScheduleConfig {
    ScheduleConfig {
        summer: ScheduleWindow {
            days: vec![0, 2, 4],
            hour: 8,
            minute: 0,
        },
        default_window: ScheduleWindow {
            days: vec![0, 3],
            hour: 8,
            minute: 0,
        },
    }
}

#[test]
fn test_summer_months() {
    for month in [6, 7, 8, 9] {
        assert!(is_summer_month(month), "month {month}");
    }
    for month in [1, 2, 3, 4, 5, 10, 11, 12] {
        assert!(!is_summer_month(month), "month {month}");
    }
}

#[test]
fn test_active_window_switches_by_month() {
    let cfg = schedule_config();
    assert_eq!(active_window(7, &cfg).days, vec![0, 2, 4]);
    assert_eq!(active_window(11, &cfg).days, vec![0, 3]);
}

#[test]
fn test_cron_expression_format() {
    let cfg = schedule_config();
    assert_eq!(cron_expression(&cfg.summer), "0 8 * * 0,2,4");
    assert_eq!(cron_expression(&cfg.default_window), "0 8 * * 0,3");
}

#[test]
fn test_message_format_parse() {
    assert_eq!(MessageFormat::parse("table").unwrap(), MessageFormat::Table);
    assert_eq!(MessageFormat::parse("TEXT").unwrap(), MessageFormat::Text);
    assert_eq!(MessageFormat::parse(" both ").unwrap(), MessageFormat::Both);
    assert!(MessageFormat::parse("markdown").is_err());
}
