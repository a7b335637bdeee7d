// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use sorrel_cli::{decode, encode, overlay, stats};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Encode(encode::EncodeArgs),
    Decode(decode::DecodeArgs),
    Overlay(overlay::OverlayArgs),
    Stats(stats::StatsArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Encode(encode_args)) => encode::encode(encode_args),
        Some(Commands::Decode(decode_args)) => decode::decode(decode_args),
        Some(Commands::Overlay(overlay_args)) => overlay::overlay(overlay_args),
        Some(Commands::Stats(stats_args)) => stats::stats(stats_args),
        None => {}
    }
}
