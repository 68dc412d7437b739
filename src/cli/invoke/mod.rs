//! Invoke command - handles one function-style event from the command line

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde_json::Value;
use tracing::info;

use crate::infrastructure::logging;

/// Arguments for the invoke command
#[derive(Args, Clone, Debug)]
pub struct InvokeArgs {
    /// Event JSON, e.g. '{"action":"search","kb_name":"faq","query":"..."}'
    #[arg(long, conflicts_with = "file")]
    pub event: Option<String>,

    /// Read the event from a file; stdin is used when neither option is given
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Pretty-print the response envelope
    #[arg(long)]
    pub pretty: bool,
}

/// Run the invocation and print the `{statusCode, body}` envelope to stdout
pub async fn run(args: InvokeArgs, catalog: Option<&Path>) -> anyhow::Result<()> {
    let (config, catalog) = super::load_context(catalog)?;
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    let event = parse_event(&read_event(&args)?)?;
    let dispatcher = crate::create_dispatcher(&config, catalog).await?;

    let response = dispatcher.handle_event(event).await;
    info!(status_code = response.status_code, "Invocation finished");

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    if response.status_code >= 400 {
        anyhow::bail!("invocation failed with status {}", response.status_code);
    }

    Ok(())
}

fn read_event(args: &InvokeArgs) -> anyhow::Result<String> {
    if let Some(event) = &args.event {
        return Ok(event.clone());
    }

    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read event from stdin")?;

    Ok(buffer)
}

fn parse_event(raw: &str) -> anyhow::Result<Value> {
    let raw = raw.trim();

    if raw.is_empty() {
        anyhow::bail!("event is empty");
    }

    serde_json::from_str(raw).context("event is not valid JSON")
}
