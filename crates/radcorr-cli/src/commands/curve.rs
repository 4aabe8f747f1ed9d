use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use radcorr_core::curve::CorrelationCurveBuilder;

use super::{AnalysisArgs, InputArgs};
use crate::progress::BarReporter;
use crate::summary::{print_analysis_summary, print_curve};

#[derive(Args)]
pub struct CurveArgs {
    /// Directory holding the ensemble images
    pub dir: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write the curve to a TOML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CurveArgs) -> Result<()> {
    let config = args.analysis.resolve()?;
    print_analysis_summary(&config, &args.dir);

    println!("Loading images...");
    let stack = args.input.load_stack(&args.dir)?;
    let (h, w, c) = stack.image_shape();
    println!("Loaded {} images ({}x{}x{})", stack.len(), h, w, c);

    let builder = CorrelationCurveBuilder::new(config)?;
    let reporter = BarReporter::new()?;
    let curve = builder.build_reported(&stack, &reporter)?;
    reporter.finish();

    println!();
    print_curve(&args.dir.display().to_string(), &curve);

    if let Some(ref path) = args.output {
        let text = toml::to_string_pretty(&curve)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write curve to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
