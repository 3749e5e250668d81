mod cli;
mod commands;
mod controller;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

use controller::Controller;
use frustro::BoardConfig;

#[derive(Parser, Debug, Clone)]
#[command(about = "Share a story, react, reply. Everything is forgotten on exit.")]
pub struct CliArgs {
    /// TOML file with board settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for username generation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with an empty board.
    #[arg(long)]
    pub no_sample: bool,

    /// Skip the simulated posting delay.
    #[arg(long)]
    pub no_delay: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "frustro=info")]
    pub log: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)))
        .with_writer(std::io::stderr)
        .init();

    let config = board_config(&args)?;
    let interrupt = Arc::new(Notify::new());
    set_interrupt_handler(&interrupt);

    let controller = Controller::new(config);
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(controller.run(interrupt, &mut stdout()));
    // The stdin reader may still be parked in a blocking read after Ctrl-C.
    runtime.shutdown_background();
    result?;

    info!("board closed, nothing was saved");
    Ok(())
}

fn board_config(args: &CliArgs) -> Result<BoardConfig, frustro::BoardError> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };

    if args.seed.is_some() {
        config.identity_seed = args.seed;
    }
    if args.no_sample {
        config.seed_sample_data = false;
    }
    if args.no_delay {
        config.topic_delay_ms = 0;
        config.reply_delay_ms = 0;
    }
    Ok(config)
}

fn set_interrupt_handler(interrupt: &Arc<Notify>) {
    let weak = Arc::downgrade(interrupt);

    // notify_one keeps a permit, so an interrupt during a posting delay is not lost.
    let result = ctrlc::set_handler(move || match weak.upgrade() {
        Some(interrupt) => interrupt.notify_one(),
        None => eprintln!("Board no longer running, nothing to interrupt."),
    });

    match result {
        Ok(_) => {}

        Err(ctrlc::Error::NoSuchSignal(signal_type)) => {
            tracing::warn!("Signal {signal_type:?} not found, CTRL + C will not stop the board gracefully.")
        }

        Err(ctrlc::Error::MultipleHandlers) => {
            tracing::warn!("CTRL + C already has a handler, the board may not stop gracefully.")
        }

        Err(ctrlc::Error::System(err)) => {
            tracing::warn!("CTRL + C handler not set, the board may not stop gracefully. Reason: {err}.")
        }
    }
}
