// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! chess-stego CLI
//!
//! Hide a file inside chess games, or recover it from them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use chess_stego::stego::MAX_PLIES;
use chess_stego::{decode_file, encode_file, EncodeOptions, GameHeaders};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default input size limit.
const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "chess-stego")]
#[command(version)]
#[command(about = "Hide data in legal chess games (PGN)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Largest accepted input file, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into PGN
    Encode {
        /// File to hide
        input: PathBuf,

        /// PGN file to write
        output: PathBuf,

        /// Self-destruct timer in seconds (0 disables)
        #[arg(long, env = "CHESS_STEGO_TIMER")]
        timer: Option<u64>,

        /// Maximum plies per game
        #[arg(long, default_value_t = MAX_PLIES)]
        max_plies: usize,

        #[command(flatten)]
        headers: HeaderArgs,
    },

    /// Decode a PGN file back into the hidden data
    Decode {
        /// PGN file to read
        input: PathBuf,

        /// File to write the recovered data to
        output: PathBuf,
    },
}

/// PGN headers. Flags override values from `--headers`.
#[derive(Args)]
struct HeaderArgs {
    /// TOML file with header values
    #[arg(long = "headers", value_name = "FILE")]
    file: Option<PathBuf>,

    #[arg(long)]
    event: Option<String>,
    #[arg(long)]
    site: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    round: Option<String>,
    #[arg(long)]
    white: Option<String>,
    #[arg(long)]
    black: Option<String>,
    #[arg(long)]
    white_elo: Option<String>,
    #[arg(long)]
    black_elo: Option<String>,
    #[arg(long)]
    result: Option<String>,
    #[arg(long)]
    eco: Option<String>,
}

impl HeaderArgs {
    fn resolve(self) -> anyhow::Result<GameHeaders> {
        let mut headers = match &self.file {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading headers from {}", path.display()))?;
                toml::from_str::<GameHeaders>(&text)
                    .with_context(|| format!("parsing headers in {}", path.display()))?
            }
            None => GameHeaders::default(),
        };

        let overrides = [
            (&mut headers.event, self.event),
            (&mut headers.site, self.site),
            (&mut headers.date, self.date),
            (&mut headers.round, self.round),
            (&mut headers.white, self.white),
            (&mut headers.black, self.black),
            (&mut headers.white_elo, self.white_elo),
            (&mut headers.black_elo, self.black_elo),
            (&mut headers.result, self.result),
            (&mut headers.eco, self.eco),
        ];
        for (slot, value) in overrides {
            if value.is_some() {
                *slot = value;
            }
        }
        Ok(headers)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn check_size(path: &Path, max_size: u64) -> anyhow::Result<()> {
    // A missing file is reported by the codec itself.
    if let Ok(meta) = fs::metadata(path) {
        if meta.len() > max_size {
            bail!("{} is {} bytes, limit is {} bytes", path.display(), meta.len(), max_size);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode { input, output, timer, max_plies, headers } => {
            check_size(&input, cli.max_size)?;
            let opts = EncodeOptions {
                headers: headers.resolve()?,
                self_destruct: timer.map(Duration::from_secs),
                max_plies,
            };
            let games = encode_file(&input, &output, &opts)
                .with_context(|| format!("encoding {}", input.display()))?;
            println!("Wrote {} game(s) to {}", games, output.display());
        }
        Commands::Decode { input, output } => {
            check_size(&input, cli.max_size)?;
            let bytes = decode_file(&input, &output)
                .with_context(|| format!("decoding {}", input.display()))?;
            println!("Recovered {} byte(s) to {}", bytes, output.display());
        }
    }

    Ok(())
}
