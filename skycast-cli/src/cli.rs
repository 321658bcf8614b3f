use clap::{Parser, Subcommand};

use crate::commands;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a service, e.g. "openweather" or "pexels".
    Configure {
        /// Service short name.
        service: String,
    },

    /// Show current conditions and forecast for a city.
    Show {
        /// City name, e.g. "Berlin" or "Berlin,DE".
        city: String,

        /// Unit system for this request: "metric" or "imperial".
        #[arg(long)]
        units: Option<String>,
    },

    /// Show weather for your current (IP-derived) location.
    Here {
        /// Unit system for this request: "metric" or "imperial".
        #[arg(long)]
        units: Option<String>,
    },

    /// List recent searches.
    History {
        /// Forget all saved searches.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { service } => commands::configure(&service),
            Command::Show { city, units } => commands::show(&city, units.as_deref()).await,
            Command::Here { units } => commands::here(units.as_deref()).await,
            Command::History { clear } => commands::history(clear),
        }
    }
}
