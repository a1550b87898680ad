//! scsplit - split single-cell data into generation and validation sets
//!
//! Reads a genes-by-cells count matrix and a per-cell label table, removes
//! unclassified and rare cell types, and writes four aligned tables.

use clap::{Parser, ValueEnum};
use scsplit::error::Result;
use scsplit::filter::AlignOrder;
use scsplit::pipeline::{SplitConfig, Splitter};
use std::path::PathBuf;

/// CLI-friendly alignment order
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAlignOrder {
    /// Keep the label table's row order
    Labels,
    /// Keep the count matrix's cell order
    Counts,
}

impl From<CliAlignOrder> for AlignOrder {
    fn from(order: CliAlignOrder) -> Self {
        match order {
            CliAlignOrder::Labels => AlignOrder::Labels,
            CliAlignOrder::Counts => AlignOrder::Counts,
        }
    }
}

/// Split single-cell counts and labels into generation and validation sets
#[derive(Parser)]
#[command(name = "scsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Count matrix (genes as rows, cells as columns)
    counts: PathBuf,

    /// Label table (cells as rows)
    labels: PathBuf,

    /// Directory receiving the four output files
    out_dir: PathBuf,

    /// YAML configuration; options given on the command line take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of each cell type assigned to the generation set
    #[arg(long)]
    generation_fraction: Option<f64>,

    /// Shuffle each cell type before splitting
    #[arg(long, overrides_with = "no_shuffle")]
    shuffle: bool,

    /// Cut each cell type in row order, even if the config enables shuffling
    #[arg(long, overrides_with = "shuffle")]
    no_shuffle: bool,

    /// Index of the label column, counted after the cell ID column
    #[arg(long)]
    label_column: Option<usize>,

    /// Cell types need more cells than this to be kept
    #[arg(long)]
    min_category_size: Option<usize>,

    /// Label value marking unclassified cells
    #[arg(long)]
    unclassified: Option<String>,

    /// Row order of the outputs
    #[arg(long, value_enum)]
    align_order: Option<CliAlignOrder>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let summary = Splitter::from_config(config).run_files(&cli.counts, &cli.labels, &cli.out_dir)?;

    eprint!("{}", summary);
    if let Some(path) = &cli.summary {
        summary.write_json(path)?;
        log::info!("Wrote summary to {}", path.display());
    }
    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            SplitConfig::from_file(path)?
        }
        None => SplitConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.split.seed = seed;
    }
    if let Some(fraction) = cli.generation_fraction {
        config.split.generation_fraction = fraction;
    }
    if cli.shuffle {
        config.split.shuffle = true;
    } else if cli.no_shuffle {
        config.split.shuffle = false;
    }
    if let Some(column) = cli.label_column {
        config.label_column = column;
    }
    if let Some(min) = cli.min_category_size {
        config.min_category_size = min;
    }
    if let Some(label) = &cli.unclassified {
        config.unclassified_label = label.clone();
    }
    if let Some(order) = cli.align_order {
        config.align_order = order.into();
    }

    config.validate()?;
    Ok(config)
}
