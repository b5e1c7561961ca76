//! tagscore CLI for image tagging evaluation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagscore_core::Config;
use tagscore_data::{load_dataset, load_label_config, write_json};
use tagscore_eval::{default_nproc, evaluate_tagging};

#[derive(Parser)]
#[command(name = "tagscore")]
#[command(author, version)]
#[command(about = "Tagging evaluation - score predicted frame tags against ground truth")]
#[command(long_about = "tagscore: per-class precision, recall, F1-score and accuracy for image tagging.

Every parent category of the label config is a tag and its leaf categories are
the tag's classes. Frames are JSON lists, or objects with \"frames\" and an
optional \"config\"; a directory of such files is read in file-name order.

EXAMPLES:
  # Evaluate with the config embedded in the ground truth
  tagscore --gt gt.json --result preds.json

  # Use an explicit config and save the result
  tagscore -g gt/ -r preds.json -c configs.toml --out-file out/tagging.json")]
struct Cli {
    /// Path to tagging ground truth
    #[arg(short, long, value_name = "PATH")]
    gt: PathBuf,

    /// Path to tagging results
    #[arg(short, long, value_name = "PATH")]
    result: PathBuf,

    /// Path to config toml (or json) file with the category definitions;
    /// overrides the config embedded in the ground truth
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output file for tagging evaluation results
    #[arg(long, value_name = "PATH")]
    out_file: Option<PathBuf>,

    /// Number of threads for tagging evaluation
    #[arg(short = 'p', long, default_value_t = default_nproc(), value_name = "N")]
    nproc: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    run(cli)
}

fn resolve_config(embedded: Option<Config>, path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        return load_label_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    match embedded {
        Some(config) => Ok(config),
        None => bail!(
            "Dataset config is not specified. Please use --config to specify a config for this dataset."
        ),
    }
}

fn run(cli: Cli) -> Result<()> {
    let dataset = load_dataset(&cli.gt)
        .with_context(|| format!("Failed to load ground truth from {}", cli.gt.display()))?;
    let preds = load_dataset(&cli.result)
        .with_context(|| format!("Failed to load results from {}", cli.result.display()))?
        .frames;
    let config = resolve_config(dataset.config, cli.config.as_ref())?;

    tracing::info!(
        n_gt = dataset.frames.len(),
        n_pred = preds.len(),
        "loaded frames"
    );

    let result = evaluate_tagging(&dataset.frames, &preds, &config, cli.nproc)
        .context("Tagging evaluation failed")?;

    println!("{}", result);
    println!("Summary:");
    for (key, value) in result.summary().iter() {
        println!("  {:<24}{:>10.2}", key, value);
    }

    if let Some(out_file) = &cli.out_file {
        write_json(out_file, &result)
            .with_context(|| format!("Failed to write results to {}", out_file.display()))?;
        println!("\nResults saved to {}", out_file.display());
    }

    Ok(())
}
