use std::time::Duration;

use anyhow::{Context, Result};

use crate::endpoint::Endpoint;

/// Verifies that the target host answers its health endpoint.
pub async fn healthcheck(host: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let url = format!("{}{}", host.trim_end_matches('/'), Endpoint::Health.path());

    tracing::debug!("sending healthcheck request to {}", url);
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;
    if !response.status().is_success() {
        anyhow::bail!("Bad Status: {}", response.status());
    }

    tracing::info!("{host} is healthy");
    Ok(())
}
