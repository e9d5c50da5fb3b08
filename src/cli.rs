use std::error::Error;

use clap::{Parser, Subcommand};
use inquire::Text;

use crate::config::{AppConfig, ScrapeSettings};
use crate::runtime;

#[derive(Parser)]
#[command(name = "eventBot", about = "Creates Discord events from Partiful links")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve /createevent (default)
    Run,
    /// Overwrite the guild's slash commands
    Register,
    /// Scrape a link and print the event without creating it
    Preview { link: Option<String> },
}

pub async fn cli(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => runtime::run_api(&config).await,
        Commands::Register => runtime::register_commands(&config).await,
        Commands::Preview { link } => preview(&config, link).await,
    }
}

async fn preview(config: &AppConfig, link: Option<String>) -> Result<(), Box<dyn Error>> {
    let link = match link {
        Some(link) => link,
        None => specify_link()?,
    };
    let settings = ScrapeSettings::from_config(config)?;
    let pipeline = runtime::build_pipeline(&settings)?;
    let record = pipeline.create_event_from_link(link.trim()).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn specify_link() -> Result<String, Box<dyn Error>> {
    Ok(Text::new("Partiful event link:").prompt()?)
}
