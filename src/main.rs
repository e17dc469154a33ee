mod logger;

use clap::{Parser, Subcommand};
use huffpack::{CodecConfig, CountWidth, Strategy};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "huffpack", version = "0.1.0")]
#[command(about = "Lossless single-file compression with Huffman codes.", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Strategy::Huffman)]
        strategy: Strategy,
        /// Width in bytes of the original-length header field
        #[arg(long, default_value_t = 4)]
        count_width: u8,
        /// Apply the byte-delta filter before coding
        #[arg(long)]
        delta: bool,
        /// Decompress the written file and compare it with the input
        #[arg(long)]
        verify: bool,
    },
    /// Decompress a file
    #[command(alias = "x")]
    Decompress {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 4)]
        count_width: u8,
        #[arg(long)]
        delta: bool,
    },
}

fn run(command: Commands) -> huffpack::Result<()> {
    match command {
        Commands::Compress {
            input,
            output,
            strategy,
            count_width,
            delta,
            verify,
        } => {
            let config = CodecConfig {
                strategy,
                count_width: CountWidth::new(count_width)?,
                delta,
            };
            let report = huffpack::compress_file(&input, &output, &config, verify)?;
            tracing::info!(symbols = report.symbols, ratio = report.ratio(), "done");
        }
        Commands::Decompress {
            input,
            output,
            count_width,
            delta,
        } => {
            let config = CodecConfig {
                count_width: CountWidth::new(count_width)?,
                delta,
                ..CodecConfig::default()
            };
            huffpack::decompress_file(&input, &output, &config)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("huffpack: {e}");
            ExitCode::FAILURE
        }
    }
}
