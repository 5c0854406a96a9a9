//! Waitline CLI - Command-line client for the Waitline queue service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "waitline")]
#[command(about = "Waitline queue service CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WAITLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new queue
    Create,

    /// Join a queue (a placeholder name is assigned when omitted)
    Join {
        queue_id: String,

        #[arg(short, long)]
        name: Option<String>,
    },

    /// Add a named person to a queue
    Add { queue_id: String, name: String },

    /// Call the person at the front of the queue
    Next { queue_id: String },

    /// Remove everyone from a queue
    Clear { queue_id: String },

    /// Show who is waiting and the estimated wait
    #[command(alias = "read")]
    Show { queue_id: String },

    /// Show system status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct QueueView {
    queue_id: String,
    users: Vec<String>,
    estimated_wait_secs: f64,
    average_service_secs: f64,
}

#[derive(Tabled)]
struct WaitingRow {
    #[tabled(rename = "#")]
    position: usize,
    name: String,
}

fn format_wait(secs: f64) -> String {
    let total = secs.round() as u64;
    if total < 60 {
        format!("{}s", total)
    } else {
        format!("{}m {:02}s", total / 60, total % 60)
    }
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create => {
            let result = call_rpc(&cli.rpc_url, "queue.create.v1", json!({})).await?;

            println!("{}", "✓ Queue created".green().bold());
            println!("  {} {}", "ID:".bold(), result["queue_id"].as_str().unwrap_or("?"));
            if let Some(url) = result.get("queue_url").and_then(|v| v.as_str()) {
                println!("  {} {}", "Link:".bold(), url);
            }
        }

        Commands::Join { queue_id, name } => {
            let params = json!({ "queue_id": queue_id, "name": name });
            let result = call_rpc(&cli.rpc_url, "queue.join.v1", params).await?;

            println!(
                "{}",
                format!(
                    "✓ {} joined at position {}",
                    result["name"].as_str().unwrap_or("?"),
                    result["position"]
                )
                .green()
                .bold()
            );
        }

        Commands::Add { queue_id, name } => {
            let params = json!({ "queue_id": queue_id, "name": name });
            call_rpc(&cli.rpc_url, "queue.add.v1", params).await?;

            println!("{}", format!("✓ {} added", name).green().bold());
        }

        Commands::Next { queue_id } => {
            let result = call_rpc(&cli.rpc_url, "queue.next.v1", json!({ "queue_id": queue_id })).await?;

            match result["removed"].as_str() {
                Some(name) => println!("{}", format!("→ Now serving {}", name).green().bold()),
                None => println!("{}", "Queue is empty".yellow()),
            }
        }

        Commands::Clear { queue_id } => {
            call_rpc(&cli.rpc_url, "queue.clear.v1", json!({ "queue_id": queue_id })).await?;

            println!("{}", format!("✓ Queue {} cleared", queue_id).green().bold());
        }

        Commands::Show { queue_id } => {
            let result = call_rpc(&cli.rpc_url, "queue.read.v1", json!({ "queue_id": queue_id })).await?;
            let view: QueueView = serde_json::from_value(result)?;

            println!("{}", format!("Queue {}", view.queue_id).cyan().bold());
            println!();

            if view.users.is_empty() {
                println!("  {}", "Nobody is waiting".yellow());
            } else {
                let rows: Vec<WaitingRow> = view
                    .users
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| WaitingRow {
                        position: i + 1,
                        name,
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }

            println!();
            println!(
                "  {} {}",
                "Estimated wait:".bold(),
                format_wait(view.estimated_wait_secs)
            );
            println!(
                "  {} {:.1}s",
                "Average service:".bold(),
                view.average_service_secs
            );
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Queues:".bold(), stats["queue_count"]);
                    println!("  {} {}", "Waiting:".bold(), stats["waiting_total"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wait() {
        assert_eq!(format_wait(0.0), "0s");
        assert_eq!(format_wait(45.4), "45s");
        assert_eq!(format_wait(125.0), "2m 05s");
    }

    #[test]
    fn test_cli_parses_join_without_name() {
        let cli = Cli::try_parse_from(["waitline", "join", "ab12cd34"]).unwrap();
        match cli.command {
            Commands::Join { queue_id, name } => {
                assert_eq!(queue_id, "ab12cd34");
                assert!(name.is_none());
            }
            _ => panic!("expected join"),
        }
    }

    #[test]
    fn test_read_is_alias_for_show() {
        let cli = Cli::try_parse_from(["waitline", "read", "ab12cd34"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { .. }));
    }
}
