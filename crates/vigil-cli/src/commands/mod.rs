//! CLI commands implementation

use anyhow::Result;
use serde::Deserialize;
use vigil_core::EndpointSpec;

/// API client for communicating with the daemon
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Status response from API
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub endpoints: usize,
    pub tracked_urls: usize,
}

/// Failure record response from API
#[derive(Debug, Deserialize)]
pub struct FailureResponse {
    pub url: String,
    pub count: u32,
    pub last_failure_at: String,
}

/// Run one probing cycle and print the aggregate verdict
pub async fn check(client: &ApiClient) -> Result<()> {
    let response = client.client.get(client.url("/ping")).send().await?;

    match response.status().as_u16() {
        200 => println!("Service is healthy"),
        503 => println!("Service is unhealthy"),
        code => {
            let error = response.text().await?;
            eprintln!("Health check failed ({}): {}", code, error);
        }
    }

    Ok(())
}

/// Show daemon status
pub async fn status(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/status"))
        .send()
        .await?;

    if response.status().is_success() {
        let status: StatusResponse = response.json().await?;

        println!("vigil v{}", status.version);
        println!();
        println!("Monitored endpoints: {}", status.endpoints);
        println!("Urls with failure records: {}", status.tracked_urls);
    } else {
        let error = response.text().await?;
        eprintln!("Failed to get status: {}", error);
    }

    Ok(())
}

/// Show the configured endpoints
pub async fn endpoints(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/endpoints"))
        .send()
        .await?;

    if response.status().is_success() {
        let endpoints: Vec<EndpointSpec> = response.json().await?;

        if endpoints.is_empty() {
            println!("No endpoints configured");
        } else {
            println!("{:<60} {:<12}", "URL", "LATENCY(MS)");
            println!("{}", "-".repeat(72));
            for ep in endpoints {
                let threshold = if ep.response_timeout_threshold_ms == 0 {
                    "-".to_string()
                } else {
                    ep.response_timeout_threshold_ms.to_string()
                };
                println!("{:<60} {:<12}", ep.url, threshold);
            }
        }
    } else {
        let error = response.text().await?;
        eprintln!("Failed to get endpoints: {}", error);
    }

    Ok(())
}

/// Show the tracked failure records
pub async fn failures(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/failures"))
        .send()
        .await?;

    if response.status().is_success() {
        let failures: Vec<FailureResponse> = response.json().await?;

        if failures.is_empty() {
            println!("No failure records");
        } else {
            println!("{:<60} {:<8} {:<25}", "URL", "COUNT", "LAST FAILURE");
            println!("{}", "-".repeat(93));
            for f in failures {
                println!("{:<60} {:<8} {:<25}", f.url, f.count, f.last_failure_at);
            }
        }
    } else {
        let error = response.text().await?;
        eprintln!("Failed to get failures: {}", error);
    }

    Ok(())
}
