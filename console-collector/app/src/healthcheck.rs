use crate::app::HEALTH_PATH;
use crate::config::DEFAULT_HTTP_PORT;
use crate::error::CollectorError;
use std::time::Duration;

/// Perform a health check against the default port (1337)
pub async fn healthcheck() -> Result<(), CollectorError> {
    healthcheck_with_port(DEFAULT_HTTP_PORT).await
}

/// Perform a health check against a specific port
pub async fn healthcheck_with_port(port: u16) -> Result<(), CollectorError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| CollectorError::Healthcheck(format!("Failed to create HTTP client: {e}")))?;

    let url = format!("http://127.0.0.1:{port}{HEALTH_PATH}");

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| CollectorError::Healthcheck(format!("Request failed: {e}")))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(CollectorError::Healthcheck(format!(
            "Health endpoint returned status: {}",
            resp.status()
        )))
    }
}
