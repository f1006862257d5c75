use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

mod images;
mod settings;
mod terminal;

use settings::Settings;
use terminal::TerminalGame;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder of images to deal from, defaults to the configured image_dir
    folder: Option<PathBuf>,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Most distinct images to deal
    #[arg(long)]
    max_cards: Option<u8>,

    /// Most rows on the board
    #[arg(long)]
    max_rows: Option<u8>,

    /// How long a mismatched pair stays face-up, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Shuffle the cards when restarting
    #[arg(long)]
    reshuffle: bool,

    /// Do not ring the terminal bell
    #[arg(long)]
    no_bell: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(max_cards) = self.max_cards {
            settings.deal.max_cards = max_cards;
        }
        if let Some(max_rows) = self.max_rows {
            settings.deal.max_rows = max_rows;
        }
        settings.deal = settings.deal.sanitized();
        if let Some(delay_ms) = self.delay_ms {
            settings.session.mismatch_delay = std::time::Duration::from_millis(delay_ms);
        }
        settings.reshuffle_on_restart |= self.reshuffle;
        settings.bell &= !self.no_bell;
        Ok(settings)
    }
}

fn setup_logging(args: &Args) -> anyhow::Result<()> {
    TermLogger::init(
        args.verbose.log_level_filter(),
        ConfigBuilder::new()
            .set_target_level(log::LevelFilter::Error)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Error initializing logger")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args)?;

    let settings = args.settings()?;
    log::debug!("{settings:?}");
    let seed = args.seed.unwrap_or_else(rand::random);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut game = TerminalGame::new(settings, seed, stdin, stdout);
    game.run(args.folder.clone())
}
