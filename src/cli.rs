use clap::Parser;
use std::path::PathBuf;

use tempocheck::{ChannelSelect, Transform};

#[derive(Parser, Debug)]
#[command(name = "tempocheck", about = "Estimate the tempo (BPM) of audio files")]
pub struct Cli {
    /// Audio files to analyse (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (defaults to ./tempocheck.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// How multi-channel audio is reduced to mono
    #[arg(long, value_enum)]
    pub channel: Option<ChannelSelect>,

    /// DFT implementation used for the magnitude spectra
    #[arg(long, value_enum)]
    pub transform: Option<Transform>,

    /// Number of files analysed in parallel (defaults to one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
