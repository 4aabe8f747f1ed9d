use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use radcorr_core::batch::compute_curves_with;
use tracing::info;

use super::{AnalysisArgs, InputArgs};
use crate::loader::discover_experiments;
use crate::progress::BarReporter;
use crate::summary::{print_analysis_summary, print_batch};

#[derive(Args)]
pub struct BatchArgs {
    /// Directory whose subdirectories are experiments
    pub root: PathBuf,

    /// Path inside each experiment directory that holds the images (e.g. "ReSTIRN=1")
    #[arg(long)]
    pub subdir: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write all curves to a TOML file keyed by experiment
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let config = args.analysis.resolve()?;
    print_analysis_summary(&config, &args.root);

    let found = discover_experiments(&args.root, args.subdir.as_deref())?;
    if found.is_empty() {
        bail!("No experiment directories under {}", args.root.display());
    }

    println!("Processing {} experiments...", found.len());
    let load = |id: &str, dir: &PathBuf| {
        info!(id, dir = %dir.display(), "Loading experiment");
        args.input
            .load_stack(dir)
            .with_context(|| format!("Failed to load experiment {id}"))
    };

    let reporter = BarReporter::new()?;
    let results = compute_curves_with(&found, load, &config, &reporter)?;
    reporter.finish();

    let mut failures = Vec::new();
    let mut curves = BTreeMap::new();
    for (id, result) in results {
        match result {
            Ok(curve) => {
                curves.insert(id, curve);
            }
            Err(e) => failures.push((id, format!("{e:#}"))),
        }
    }

    println!();
    print_batch(&curves, &failures);

    if let Some(ref path) = args.output {
        let text = toml::to_string_pretty(&curves)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write curves to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
