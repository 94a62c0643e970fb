mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;

use cli::Cli;
use tempocheck::config::{self, Config};
use tempocheck::{AnalysisSession, SessionError, SymphoniaDecoder, TempoReport};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut cfg = match config::discover_config_path(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) if cli.config.is_some() => return Err(err),
            Err(err) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), err);
                Config::default()
            }
        },
        None => Config::default(),
    };
    // Flags given on the command line win over the config file.
    if let Some(channel) = cli.channel {
        cfg.decode.channel = channel;
    }
    if let Some(transform) = cli.transform {
        cfg.analysis.transform = transform;
    }
    cfg.analysis.validate().context("Invalid analysis settings")?;

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    log::info!(
        "tempocheck - {} file(s), {:?} transform, {:?} channel",
        cli.inputs.len(),
        cfg.analysis.transform,
        cfg.decode.channel
    );

    let pb = if cli.inputs.len() > 1 {
        let pb = ProgressBar::new(cli.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
                .context("Invalid progress bar template")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // One session per file: every analysis gets its own buffers.
    let results: Vec<(PathBuf, Result<TempoReport, SessionError>)> = cli
        .inputs
        .par_iter()
        .map(|path| {
            let session = AnalysisSession::new(
                SymphoniaDecoder::new(cfg.decode.channel),
                cfg.analysis.clone(),
            );
            let result = session.analyze_path(path);
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();
    pb.finish_and_clear();

    let total = results.len();
    let mut reports = Vec::with_capacity(total);
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                failures += 1;
                log::error!("{}: {}", path.display(), err);
                eprintln!("{}: {}", path.display(), describe_failure(&err));
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}\n", report.render_text());
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) could not be analysed", failures, total);
    }
    Ok(())
}

fn describe_failure(err: &SessionError) -> String {
    match err {
        SessionError::Decode(cause) => format!(
            "Error loading audio file. Please try a different format. ({})",
            cause
        ),
        other => format!("Error analyzing audio. ({})", other),
    }
}
