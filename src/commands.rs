use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::calendar;
use crate::client::DanubitClient;
use crate::config;
use crate::models::{SeedConfig, Session};
use crate::seeder;

/// Which seeding steps to run under one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Asociations,
    Activities,
    Boards,
    All,
}

pub fn build_client(base_url_flag: Option<&str>, cfg: &SeedConfig) -> Result<DanubitClient> {
    let base_url = config::resolve_base_url(base_url_flag, cfg);
    let timeout = cfg.api.timeout_secs.map(Duration::from_secs);
    let client = DanubitClient::new(&base_url, cfg.api.auth_header, timeout)?;
    info!("Using API at {}", client.base_url());
    Ok(client)
}

/// Log in, turning a rejected login into an error so nothing else is sent.
pub async fn authenticate(client: &DanubitClient, cfg: &SeedConfig) -> Result<Session> {
    client
        .login(&cfg.admin)
        .await?
        .with_context(|| format!("Login as {} failed", cfg.admin.email))
}

/// Run `op` and return its result as JSON, ready to print.
pub async fn run(
    op: Operation,
    client: &DanubitClient,
    cfg: &SeedConfig,
) -> Result<serde_json::Value> {
    let session = authenticate(client, cfg).await?;

    let result = match op {
        Operation::Login => to_json(&session)?,
        Operation::Asociations => {
            to_json(&seeder::create_base_asociations(client, &session, &cfg.asociations).await?)?
        }
        Operation::Activities => to_json(
            &seeder::create_base_activities(client, &session, cfg, calendar::now()).await?,
        )?,
        Operation::Boards => to_json(&seeder::add_admin_to_boards(client, &session).await?)?,
        Operation::All => {
            let asociations =
                seeder::create_base_asociations(client, &session, &cfg.asociations).await?;
            let activities =
                seeder::create_base_activities(client, &session, cfg, calendar::now()).await?;
            let members = seeder::add_admin_to_boards(client, &session).await?;
            serde_json::json!({
                "asociations": asociations,
                "activities": activities,
                "members": members,
            })
        }
    };

    Ok(result)
}

pub fn print_result(result: &serde_json::Value) -> Result<()> {
    println!("Result: \n{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Summary of a seed file, without touching the network.
pub fn describe_config(cfg: &SeedConfig) -> Result<()> {
    println!("Admin: {}", cfg.admin.email);
    println!("\nAsociations ({}):", cfg.asociations.len());
    for (key, a) in &cfg.asociations {
        let joinable = if a.is_public_joinable { "public" } else { "closed" };
        println!("  {:<10} {} ({})", key, a.short_name, joinable);
    }
    println!("\nActivities ({}):", cfg.activities.len());
    let now = calendar::now();
    for seed in &cfg.activities {
        let initial_date = calendar::initial_date(now, seed.activity.days_from_now)
            .with_context(|| format!("Activity '{}'", seed.activity.name))?;
        println!(
            "  {} [{}] +{}d by {}",
            seed.activity.name,
            initial_date,
            seed.activity.days_from_now,
            seed.asociations.join(", ")
        );
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}
