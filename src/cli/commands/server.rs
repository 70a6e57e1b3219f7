use std::time::Duration;

use anyhow::Context;
use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Show server information from API root endpoint")]
    Info {
        #[arg(long, env = "QUILL_API_URL", default_value = DEFAULT_URL, help = "Server base URL")]
        url: String,
    },

    #[command(about = "Check server health status from API /health endpoint")]
    Health {
        #[arg(long, env = "QUILL_API_URL", default_value = DEFAULT_URL, help = "Server base URL")]
        url: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;

    match cmd {
        ServerCommands::Info { url } => {
            let (_, body) = fetch_json(&client, &url, "/").await?;
            let name = body["data"]["name"].as_str().unwrap_or("unknown");
            let version = body["data"]["version"].as_str().unwrap_or("unknown");

            output_success(
                &output_format,
                &format!("{} {} at {}", name, version, url),
                Some(json!({ "server": body["data"] })),
            )
        }
        ServerCommands::Health { url } => {
            let (healthy, body) = fetch_json(&client, &url, "/health").await?;
            if !healthy {
                anyhow::bail!("{} is degraded: {}", url, body["error"].as_str().unwrap_or("unhealthy"));
            }

            let store = body["data"]["store"].as_str().unwrap_or("unknown");
            output_success(
                &output_format,
                &format!("{} is healthy ({} store)", url, store),
                Some(json!({ "health": body["data"] })),
            )
        }
    }
}

/// GET a JSON endpoint; returns whether the status was a success alongside the body
async fn fetch_json(client: &reqwest::Client, base_url: &str, path: &str) -> anyhow::Result<(bool, Value)> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    let healthy = response.status().is_success();
    let body = response
        .json::<Value>()
        .await
        .with_context(|| format!("{} did not return JSON", url))?;
    Ok((healthy, body))
}
