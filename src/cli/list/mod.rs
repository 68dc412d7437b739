//! List command - prints the configured knowledge bases

use std::path::Path;

use crate::domain::knowledge_base::KnowledgeBaseCatalog;
use crate::infrastructure::logging;

/// Print the catalog as JSON, in configuration order
pub async fn run(catalog: Option<&Path>) -> anyhow::Result<()> {
    let (config, catalog) = super::load_context(catalog)?;
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    println!("{}", render(&catalog)?);

    Ok(())
}

fn render(catalog: &KnowledgeBaseCatalog) -> anyhow::Result<String> {
    let listing = serde_json::json!({
        "knowledgeBases": catalog.summaries(),
        "count": catalog.len(),
    });

    Ok(serde_json::to_string_pretty(&listing)?)
}
