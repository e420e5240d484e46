use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::Datelike;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pogodabot::buckets::default_time_ranges;
use pogodabot::{config, forecast, schedule, telegram};

#[derive(Clone)]
struct AppState {
    http: reqwest::Client,
    telegram_token: Option<String>,
    webhook_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    key: Option<String>,
    send_forecast: Option<String>,
    test_windy: Option<String>,
    test_openweathermap: Option<String>,
    schedule: Option<String>,
    location: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState {
        http: reqwest::Client::new(),
        telegram_token: std::env::var("TELEGRAM_TOKEN").ok(),
        webhook_key: std::env::var("WEBHOOK_AUTH_KEY").ok(),
    };

    match config::load_weather_config() {
        Ok(cfg) => {
            tracing::info!(
                format = ?cfg.message_format,
                providers_configured = forecast::any_provider_configured(&cfg),
                "weather config loaded"
            );
        }
        Err(err) => {
            tracing::warn!(error = %err, "weather config not loaded");
        }
    }

    let app = Router::new().route("/", get(handle_get)).with_state(state);

    let addr = "0.0.0.0:8080";
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app).await.expect("server failed");
}

async fn handle_get(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> (StatusCode, String) {
    let Some(key) = query.key else {
        return (StatusCode::OK, "No key".to_string());
    };
    if state.webhook_key.as_deref() != Some(key.as_str()) {
        return (StatusCode::BAD_REQUEST, "Wrong key".to_string());
    }

    if is_true(&query.schedule) {
        return handle_schedule();
    }

    if is_true(&query.test_windy) {
        return handle_test(&state, "Windy API").await;
    }

    if is_true(&query.test_openweathermap) {
        return handle_test(&state, "OpenWeatherMap API").await;
    }

    if is_true(&query.send_forecast) {
        let location_key = query.location.as_deref().unwrap_or("default");
        return handle_send_forecast(&state, location_key).await;
    }

    (StatusCode::OK, "Ok".to_string())
}

async fn handle_send_forecast(state: &AppState, location_key: &str) -> (StatusCode, String) {
    let cfg = match config::load_weather_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, "invalid weather configuration");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Config error".to_string());
        }
    };
    let Some(token) = state.telegram_token.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEGRAM_TOKEN not configured".to_string(),
        );
    };
    let Some(location) = cfg.location(location_key) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("Unknown location: {location_key}"),
        );
    };
    let Some(chat_id) = location.chat_id else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEGRAM_CHAT_ID not configured".to_string(),
        );
    };

    if !forecast::any_provider_configured(&cfg) {
        let message = "Не удалось запустить получение прогноза погоды. Отсутствуют ключи API.";
        tracing::error!("no provider API keys configured");
        telegram::send_error_notification(&state.http, token, chat_id, message).await;
        return (StatusCode::INTERNAL_SERVER_ERROR, "No API keys".to_string());
    }

    tracing::info!(
        location = %location.name,
        lat = location.lat,
        lon = location.lon,
        "fetching forecast"
    );

    match forecast::get_forecast(&state.http, &cfg, location.lat, location.lon).await {
        Ok(data) => {
            let ranges = default_time_ranges();
            let sent = telegram::send_weather_forecast(
                &state.http,
                token,
                chat_id,
                &data,
                &location.name,
                cfg.message_format,
                &ranges,
            )
            .await;
            if sent {
                tracing::info!(location = %location.name, chat_id, "forecast delivered");
                (StatusCode::OK, "Forecast sent".to_string())
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Forecast send error".to_string(),
                )
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "forecast retrieval failed");
            let message = format!("Ошибка при получении прогноза погоды: {err}");
            telegram::send_error_notification(&state.http, token, chat_id, &message).await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Forecast error".to_string(),
            )
        }
    }
}

async fn handle_test(state: &AppState, source: &str) -> (StatusCode, String) {
    let cfg = match config::load_weather_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, "invalid weather configuration");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Config error".to_string());
        }
    };
    let Some(token) = state.telegram_token.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEGRAM_TOKEN not configured".to_string(),
        );
    };
    let Some(chat_id) = cfg.location("default").and_then(|location| location.chat_id) else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEGRAM_CHAT_ID not configured".to_string(),
        );
    };

    if telegram::send_test_message(&state.http, token, chat_id, source).await {
        (StatusCode::OK, "Test message sent".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Test message error".to_string(),
        )
    }
}

fn handle_schedule() -> (StatusCode, String) {
    let cfg = match config::load_weather_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, "invalid weather configuration");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Config error".to_string());
        }
    };
    let month = chrono::Utc::now()
        .with_timezone(&forecast::target_offset())
        .month();
    let window = schedule::active_window(month, &cfg.schedule);
    (StatusCode::OK, schedule::cron_expression(window))
}

fn is_true(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("true") | Some("TRUE") | Some("True"))
}
