use clap::Parser;
use kb_search_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref();

    match cli.command {
        Command::Serve => cli::serve::run(catalog).await,
        Command::Invoke(args) => cli::invoke::run(args, catalog).await,
        Command::List => cli::list::run(catalog).await,
    }
}
