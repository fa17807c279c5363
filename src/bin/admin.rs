//! CLI administration tool for snaplink.
//!
//! Provides commands for inspecting and deleting links, viewing statistics,
//! repairing click counters and performing database checks without requiring
//! HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links, optionally filtered
//! cargo run --bin admin -- links list --search promo --limit 20
//!
//! # Delete a link and its clicks
//! cargo run --bin admin -- links delete abc123
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Recompute click counters from the clicks table
//! cargo run --bin admin -- reconcile
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` / `REDIS_HOST` (optional): resolver cache to evict deleted links from

use snaplink::application::services::{ClickService, LinkService};
use snaplink::config::Config;
use snaplink::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use snaplink::server::connect_cache;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Recompute every link's click counter from its click rows
    Reconcile,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Case-insensitive substring of code or target URL
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        /// Number of links to skip
        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a link and all of its clicks
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Reconcile => handle_reconcile(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let service = LinkService::new(Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))));

    match action {
        LinksAction::List {
            search,
            limit,
            offset,
        } => list_links(&service, search, limit, offset).await?,
        LinksAction::Delete { code, yes } => delete_link(&service, code, yes).await?,
    }

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code     Clicks   Created            Target
///   ─────────────────────────────────────────────────────────────
///   abc123   12       2026-01-15 10:30   https://example.com/
/// ```
async fn list_links(
    service: &LinkService<PgLinkRepository>,
    search: Option<String>,
    limit: i64,
    offset: i64,
) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links(search, limit, offset)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<8} {:<8} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<PgLinkRepository>,
    code: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .find_by_code(&code, true)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code:   {}", link.code.cyan());
    println!("  Target: {}", link.target_url);
    println!("  Clicks: {}", link.clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link and all of its clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = service
        .delete_by_code(&code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
        evict_cached_link(&code).await;
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Drops the resolver cache entry so redirects stop serving the deleted target.
///
/// Uses the same `REDIS_URL` / `REDIS_HOST` settings as the server; without
/// them there is nothing to evict.
async fn evict_cached_link(code: &str) {
    let Some(redis_url) = Config::load_redis_url() else {
        return;
    };

    let cache = connect_cache(Some(&redis_url), 0).await;
    match cache.invalidate(code).await {
        Ok(()) => println!("  Cache entry cleared ({})", cache.backend().bright_black()),
        Err(e) => println!("{}", format!("⚠️  Failed to clear cache entry: {}", e).yellow()),
    }
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Total number of clicks
/// - Number of links whose counter disagrees with their click rows
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    let drifted_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM links l
        WHERE l.clicks <> (SELECT COUNT(*) FROM clicks c WHERE c.link_id = l.id)
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Links:           {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:          {}",
        clicks_count.to_string().bright_green().bold()
    );
    let drifted = if drifted_count == 0 {
        drifted_count.to_string().bright_green().bold()
    } else {
        drifted_count.to_string().yellow().bold()
    };
    println!("  Drifted counts:  {}", drifted);
    println!();

    Ok(())
}

/// Rewrites drifted `clicks` and `last_clicked` values.
async fn handle_reconcile(pool: &PgPool) -> Result<()> {
    println!("{}", "🧮 Reconciling click counters...".bright_blue());

    let service = ClickService::new(Arc::new(PgClickRepository::new(Arc::new(pool.clone()))));

    let report = service
        .reconcile()
        .await
        .map_err(|e| anyhow::anyhow!("Reconciliation failed: {}", e))?;

    println!();
    println!(
        "  Scanned:   {}",
        report.scanned.to_string().bright_white().bold()
    );
    println!(
        "  Corrected: {}",
        report.corrected.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
