//! CLI module for the knowledge base search gateway
//!
//! Provides subcommands:
//! - `serve`: HTTP server with the REST, JSON-RPC and invoke endpoints
//! - `invoke`: handle a single function-style event and print the response
//! - `list`: print the configured knowledge bases

pub mod invoke;
pub mod list;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::knowledge_base::KnowledgeBaseCatalog;

/// Knowledge Base Search Gateway - knowledge base retrieval as agent tools
#[derive(Parser)]
#[command(name = "kb-search-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML file with `[[knowledge_bases]]` entries, replacing the configured catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Handle one function-style event and print the response envelope
    Invoke(invoke::InvokeArgs),

    /// Print the configured knowledge bases
    List,
}

/// Load configuration and resolve the knowledge base catalog
pub fn load_context(catalog_path: Option<&Path>) -> anyhow::Result<(AppConfig, KnowledgeBaseCatalog)> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    let catalog = match catalog_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog file {}", path.display()))?;
            KnowledgeBaseCatalog::from_toml_str(&content)?
        }
        None => crate::build_catalog(&config)?,
    };

    Ok((config, catalog))
}
