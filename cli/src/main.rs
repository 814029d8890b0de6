use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relink_act::{commands, logging};
use relink_act_core::MeterConfigExt;
use relink_act_types::MeterConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let mut config = MeterConfig::load();
    cli.overrides.apply(&mut config);

    match cli.command {
        Commands::Watch { json } => commands::watch(config, json).await,
        Commands::Replay { path, json } => commands::replay(&path, &config, json).await,
        Commands::Mock { seconds, json } => commands::mock(seconds, json).await,
        Commands::Config { save } => commands::show_config(&config, save),
    }
}

#[derive(Parser)]
#[command(version, about = "Live damage meter for the relink-act websocket feed")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Command line values that take precedence over the stored configuration
#[derive(Args)]
struct ConfigOverrides {
    #[arg(long, global = true)]
    host: Option<String>,
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Minimum milliseconds between published snapshots
    #[arg(long, global = true)]
    interval: Option<u64>,
    /// Milliseconds to wait before reconnecting
    #[arg(long, global = true)]
    reconnect: Option<u64>,
    #[arg(long, global = true)]
    max_combats: Option<usize>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut MeterConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(interval) = self.interval {
            config.update_interval_ms = interval;
        }
        if let Some(reconnect) = self.reconnect {
            config.reconnect_delay_ms = reconnect;
        }
        if let Some(max_combats) = self.max_combats {
            config.max_combats = max_combats;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the feed and print snapshots until Ctrl-C
    Watch {
        #[arg(long)]
        json: bool,
    },
    /// Replay a file of newline-delimited payloads offline
    Replay {
        #[arg(short, long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print mock snapshots
    Mock {
        #[arg(short, long, default_value_t = 5)]
        seconds: u64,
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Persist it as the stored configuration
        #[arg(long)]
        save: bool,
    },
}
