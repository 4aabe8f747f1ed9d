use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use radcorr_core::metrics::ensemble_error;

use super::InputArgs;
use crate::summary::print_error_summary;

#[derive(Args)]
pub struct ErrorArgs {
    /// Directory holding the ensemble images
    pub dir: PathBuf,

    /// Converged reference image
    #[arg(short, long)]
    pub reference: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &ErrorArgs) -> Result<()> {
    let reference = args.input.load_reference(&args.reference)?;
    let stack = args.input.load_stack(&args.dir)?;
    println!("Comparing {} images against {}", stack.len(), args.reference.display());

    let summary = ensemble_error(&stack, &reference)?;
    print_error_summary(&summary);
    Ok(())
}
