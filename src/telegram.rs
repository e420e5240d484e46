use std::time::Duration;

use crate::buckets::TimeRange;
use crate::config::MessageFormat;
use crate::forecast::{target_offset, Forecast};
use crate::render::{render_table, render_text};

fn api_base(token: &str) -> String {
    format!("https://api.telegram.org/bot{token}")
}

pub async fn send_message(
    http: &reqwest::Client,
    token: &str,
    chat_id: i64,
    text: &str,
    parse_mode: Option<&str>,
) -> Result<bool, String> {
    let url = format!("{}/sendMessage", api_base(token));
    let mut payload = serde_json::json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(mode) = parse_mode {
        payload["parse_mode"] = serde_json::Value::from(mode);
    }

    let response = http
        .post(url)
        .json(&payload)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|err| err.to_string())?;

    Ok(body.get("ok").and_then(|value| value.as_bool()).unwrap_or(false))
}

/// Delivers the forecast in the configured format(s). When both formats go
/// out, a fixed one-second pause separates the two messages; the channel
/// rate-limits rapid sends.
pub async fn send_weather_forecast(
    http: &reqwest::Client,
    token: &str,
    chat_id: i64,
    forecast: &Forecast,
    location_name: &str,
    format: MessageFormat,
    ranges: &[TimeRange],
) -> bool {
    let mut success = true;

    if matches!(format, MessageFormat::Table | MessageFormat::Both) {
        let table = render_table(forecast, location_name, ranges);
        match send_message(http, token, chat_id, &table, Some("Markdown")).await {
            Ok(ok) => success &= ok,
            Err(err) => {
                tracing::error!(error = %err, chat_id, "failed to send table forecast");
                success = false;
            }
        }
    }

    if matches!(format, MessageFormat::Text | MessageFormat::Both) {
        if format == MessageFormat::Both {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        let text = render_text(forecast, location_name, ranges);
        match send_message(http, token, chat_id, &text, None).await {
            Ok(ok) => success &= ok,
            Err(err) => {
                tracing::error!(error = %err, chat_id, "failed to send text forecast");
                success = false;
            }
        }
    }

    success
}

/// Best-effort operator notification. Its own delivery failure is logged and
/// swallowed, never raised.
pub async fn send_error_notification(
    http: &reqwest::Client,
    token: &str,
    chat_id: i64,
    error_message: &str,
) -> bool {
    let message = format!("⚠️ *Ошибка в сервисе прогноза погоды*\n\n{error_message}");
    match send_message(http, token, chat_id, &message, Some("Markdown")).await {
        Ok(ok) => ok,
        Err(err) => {
            tracing::error!(error = %err, chat_id, "failed to send error notification");
            false
        }
    }
}

pub async fn send_test_message(
    http: &reqwest::Client,
    token: &str,
    chat_id: i64,
    source: &str,
) -> bool {
    let sent_at = chrono::Utc::now()
        .with_timezone(&target_offset())
        .format("%Y-%m-%d %H:%M:%S");
    let message = format!(
        "🔍 *Тестовое сообщение от сервиса прогноза погоды*\n\n\
         Источник данных: {source}\n\
         Время отправки: {sent_at} (UTC+3)\n\
         Это тестовое сообщение для проверки работоспособности сервиса."
    );
    match send_message(http, token, chat_id, &message, Some("Markdown")).await {
        Ok(ok) => ok,
        Err(err) => {
            tracing::error!(error = %err, chat_id, "failed to send test message");
            false
        }
    }
}
