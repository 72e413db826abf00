// Lircin Daemon
// Connects to lircd and feeds decoded remote-control events to the host

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use lircin_core::{InputSink, KeyEvent, RemoteDriver, Settings};

/// LIRC remote-control input driver
#[derive(Parser, Debug)]
#[command(name = "lircin")]
#[command(about = "LIRC remote-control input driver", long_about = None)]
struct Args {
    /// lircd socket path (overrides settings and the built-in defaults)
    #[arg(short, long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Settings file (default: ~/.config/lircin/settings.toml)
    #[arg(long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Validate the settings file and exit
    #[arg(long)]
    check_settings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Sink that reports dispatched events through the logging facade.
struct LogSink;

impl InputSink for LogSink {
    fn dispatch(&mut self, event: KeyEvent) {
        log::info!("{} {}", event.action, event.symbol);
    }
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    match &args.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("cannot load settings from {}", path.display())),
        None => Settings::load_default().context("cannot load default settings"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = load_settings(&args)?;
    if args.check_settings {
        println!("Settings are valid");
        return Ok(());
    }

    let mut config = settings.to_driver_config();
    if let Some(socket) = &args.socket {
        config.socket_path = Some(socket.clone());
    }

    let mut driver =
        RemoteDriver::spawn(config, Box::new(LogSink)).context("cannot start remote driver")?;
    log::info!("lircin is running. Press Ctrl+C to exit.");

    let mut signals = signal_hook::iterator::Signals::new([
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
    ])?;
    if signals.forever().next().is_some() {
        log::info!("received signal, shutting down");
    }

    driver.stop();
    Ok(())
}
