use std::time::Duration;

use serde_json::Value;

use crate::config::ProviderConfig;

pub async fn get_json(
    http: &reqwest::Client,
    cfg: &ProviderConfig,
    url: &str,
    params: &[(&str, String)],
) -> Result<Value, String> {
    request_with_retry(cfg, || {
        http.get(url)
            .query(params)
            .timeout(Duration::from_secs(cfg.timeout_secs))
    })
    .await
}

pub async fn post_json(
    http: &reqwest::Client,
    cfg: &ProviderConfig,
    url: &str,
    body: &Value,
) -> Result<Value, String> {
    request_with_retry(cfg, || {
        http.post(url)
            .json(body)
            .timeout(Duration::from_secs(cfg.timeout_secs))
    })
    .await
}

/// Sends the request up to `retry_attempts` times with a fixed delay between
/// attempts. A non-success status counts as a failed attempt. The error of
/// the last attempt is returned once all attempts are spent.
async fn request_with_retry<F>(cfg: &ProviderConfig, build: F) -> Result<Value, String>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let attempts = cfg.retry_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(Duration::from_secs(cfg.retry_delay_secs)).await;
        }
        match build().send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    last_error = format!("HTTP status {}", status.as_u16());
                    tracing::warn!(
                        attempt,
                        status = status.as_u16(),
                        "request returned non-success status"
                    );
                    continue;
                }
                return response
                    .json::<Value>()
                    .await
                    .map_err(|err| format!("invalid JSON body: {err}"));
            }
            Err(err) => {
                last_error = err.to_string();
                tracing::warn!(attempt, error = %err, "request failed");
            }
        }
    }

    Err(last_error)
}
