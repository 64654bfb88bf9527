mod app;
mod bell;
mod simulate;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use reelspin_core::{
    DigitSource, RandDigits, SeededDigits, Settings, SoundFx, SpinController, TimingConfig,
    TimingProfile, DEFAULT_DIGITS,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bell::BellSink;

#[derive(Parser)]
#[command(name = "reelspin", about = "Digit slot-machine widget for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Number of reels (1-10)
    #[arg(long, default_value_t = DEFAULT_DIGITS, env = "REELSPIN_DIGITS")]
    digits: usize,
    /// Start with sound off
    #[arg(
        long,
        env = "REELSPIN_MUTE",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    mute: bool,
    /// Seed for replayable outcomes; random when unset
    #[arg(long, env = "REELSPIN_SEED")]
    seed: Option<String>,
    /// Timing preset
    #[arg(long, value_enum, default_value = "normal", env = "REELSPIN_PROFILE")]
    profile: Profile,
    /// Write logs here instead of discarding them (interactive mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive widget (default)
    Play,
    /// Run spins on a virtual clock and print events as JSON lines
    Simulate {
        #[arg(default_value_t = 1)]
        spins: u32,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Profile {
    Normal,
    Turbo,
}

impl From<Profile> for TimingProfile {
    fn from(p: Profile) -> Self {
        match p {
            Profile::Normal => TimingProfile::Normal,
            Profile::Turbo => TimingProfile::Turbo,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn digit_source(seed: Option<&str>) -> Box<dyn DigitSource> {
    match seed {
        Some(seed) => {
            let digits = SeededDigits::new(seed, "reelspin");
            info!(seed_hash = %digits.seed_hash_hex(), "replayable digits");
            Box::new(digits)
        }
        None => Box::new(RandDigits::thread()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings {
        digit_count: cli.digits,
        sound_enabled: !cli.mute,
    };
    let timing = TimingConfig::from_profile(cli.profile.into());

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            // The widget owns the terminal, so logs go to a file or nowhere.
            match &cli.log_file {
                Some(path) => {
                    let file = File::create(path)?;
                    tracing_subscriber::fmt()
                        .with_env_filter(env_filter())
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                        .init();
                }
                None => tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(std::io::sink)
                    .init(),
            }
            let sound = SoundFx::new(Box::new(BellSink), settings.sound_enabled);
            let ctl = SpinController::new(settings, timing, digit_source(cli.seed.as_deref()), sound)?;
            info!(?settings, timing = ?ctl.timing(), "widget mounted");
            app::run(ctl).await
        }
        Commands::Simulate { spins } => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
            let mut ctl = SpinController::new(
                settings,
                timing,
                digit_source(cli.seed.as_deref()),
                SoundFx::silent(),
            )?;
            let mut stdout = std::io::stdout().lock();
            simulate::run(&mut ctl, spins, &mut stdout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_flag_and_defaults() {
        let cli = Cli::try_parse_from(["reelspin", "--mute"]).unwrap();
        assert!(cli.mute);
        assert_eq!(cli.digits, DEFAULT_DIGITS);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["reelspin", "--digits", "7", "simulate", "3"]).unwrap();
        assert_eq!(cli.digits, 7);
        assert!(matches!(cli.command, Some(Commands::Simulate { spins: 3 })));
    }

    #[test]
    fn test_mute_env_accepts_common_spellings() {
        let cases = [
            ("1", true),
            ("true", true),
            ("yes", true),
            ("0", false),
            ("false", false),
        ];
        for (value, muted) in cases {
            std::env::set_var("REELSPIN_MUTE", value);
            let parsed = Cli::try_parse_from(["reelspin"]);
            std::env::remove_var("REELSPIN_MUTE");
            let cli = parsed.unwrap_or_else(|e| panic!("REELSPIN_MUTE={value}: {e}"));
            assert_eq!(cli.mute, muted, "REELSPIN_MUTE={value}");
        }
    }
}
