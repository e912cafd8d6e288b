use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use doorman_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use doorman_slack::client::{NoopRtmClient, RtmClient};
use doorman_slack::supervisor::{Supervisor, SupervisorConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "doorman",
    version,
    about = "Welcomes users joining a chat channel",
    after_help = "Examples:\n  doorman -c general\n  doorman --message \"hello\"\n  doorman --announce -vv"
)]
pub struct Cli {
    /// The channel to welcome users to.
    #[arg(short, long)]
    channel: Option<String>,

    /// It goes to 11.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum reconnect attempts after a connection loss.
    #[arg(short, long)]
    retries: Option<u32>,

    /// Send this message to the channel and exit instead of listening.
    #[arg(long)]
    message: Option<String>,

    /// Announce to the channel when started.
    #[arg(long)]
    announce: bool,

    /// Path to the config file (defaults to doorman.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Map the flags onto config overrides; unset flags leave the config
    /// value (file, env, or default) in place.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_token: None,
            channel: self.channel.clone(),
            max_retries: self.retries,
            announce: self.announce.then_some(true),
            message: self.message.clone(),
            log_level: match self.verbose {
                0 => None,
                1 => Some("debug".to_string()),
                _ => Some("trace".to_string()),
            },
        }
    }
}

fn init_logging(config: &AppConfig) {
    use doorman_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("fatal: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose > 11 {
        anyhow::bail!("it doesn't go beyond 11");
    }

    let config = AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: false,
        overrides: cli.overrides(),
    })?;
    init_logging(&config);

    // TODO: wire a real SDK-backed RtmClient once one is selected; the noop
    // client keeps the binary runnable for dry runs.
    let client: Arc<dyn RtmClient> = Arc::new(NoopRtmClient);
    info!(transport = "noop", channel = %config.bot.channel, "chat client initialized");

    let mut supervisor = Supervisor::new(client, SupervisorConfig::from(&config.bot));

    tokio::select! {
        result = supervisor.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("received interrupt, shutting down");
        }
    }

    Ok(())
}
