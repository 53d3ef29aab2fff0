//! CLI command implementations.
//!
//! Commands run against a locally bootstrapped engine, not over HTTP, so
//! they work without a running server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use uuid::Uuid;

use crate::app::Engine;
use crate::config::ConfigLoader;
use crate::domain::models::{ChatMode, Config};

#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured port.
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args)]
pub struct MemorizeArgs {
    /// Text file to ingest.
    pub file: PathBuf,

    /// Page title; defaults to the file name.
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct PagesArgs {
    /// Case-insensitive substring filter over title and preview.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// The question to ask.
    pub message: String,

    /// Answer without retrieval context.
    #[arg(long)]
    pub free: bool,
}

#[derive(Args)]
pub struct ForgetArgs {
    /// Page id to delete.
    pub page_id: Uuid,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub async fn serve(args: ServeArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let engine = Arc::new(Engine::bootstrap(config).await?);
    crate::api::serve(engine).await
}

pub async fn memorize(args: MemorizeArgs, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = Engine::bootstrap(config).await?;

    let content = std::fs::read_to_string(&args.file)
        .context(format!("Failed to read {}", args.file.display()))?;
    let title = args.title.unwrap_or_else(|| {
        args.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    });

    let receipt = engine.memorize(&title, &content, Utc::now()).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "page_id": receipt.page_id,
                "chunk_count": receipt.chunk_count,
                "status": if receipt.deduplicated { "duplicate" } else { "success" },
            })
        );
    } else if receipt.deduplicated {
        println!("already memorized as {}", receipt.page_id);
    } else {
        println!("memorized {} ({} chunks)", receipt.page_id, receipt.chunk_count);
    }

    Ok(())
}

pub async fn pages(args: PagesArgs, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = Engine::bootstrap(config).await?;

    let pages = engine.pages(args.filter.as_deref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Title", "Captured", "Chunks"]);

    for page in &pages {
        table.add_row(vec![
            page.id.to_string(),
            page.title.clone(),
            page.captured_at.format("%Y-%m-%d %H:%M").to_string(),
            page.chunk_count.to_string(),
        ]);
    }

    println!("{table}");
    println!("{} page(s)", pages.len());
    Ok(())
}

pub async fn chat(args: ChatArgs, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = Engine::bootstrap(config).await?;

    let mode = if args.free { ChatMode::Free } else { ChatMode::Grounded };
    let answer = engine.chat(&args.message, mode).await?;

    if json {
        println!("{}", serde_json::json!({ "response": answer, "status": "success" }));
    } else {
        println!("{answer}");
    }

    Ok(())
}

pub async fn forget(args: ForgetArgs, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = Engine::bootstrap(config).await?;

    engine.forget(args.page_id).await?;

    if json {
        println!("{}", serde_json::json!({ "status": "deleted" }));
    } else {
        println!("forgot {}", args.page_id);
    }

    Ok(())
}
