pub mod batch;
pub mod config;
pub mod curve;
pub mod reference_error;

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use ndarray::Array3;
use radcorr_core::config::{AnalysisConfig, AveragingMode, DegeneratePolicy};
use radcorr_core::stack::{CropRegion, ImageStack};

use crate::loader::{load_cropped, load_stack};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Ring,
    Disk,
}

impl From<ModeArg> for AveragingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ring => AveragingMode::Ring,
            ModeArg::Disk => AveragingMode::Disk,
        }
    }
}

/// Options shared by every command that computes curves. Flags override
/// values from `--config`.
#[derive(Args)]
pub struct AnalysisArgs {
    /// Analysis config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated Chebyshev radii
    #[arg(long)]
    pub radii: Option<String>,

    /// Aggregation over displacements at each radius
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Only subtract the mean (covariance instead of correlation)
    #[arg(long)]
    pub center_only: bool,

    /// Treat pixels with stddev at or below this as constant
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Report undefined displacements as NaN instead of skipping them
    #[arg(long)]
    pub pass_through: bool,
}

impl AnalysisArgs {
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config: AnalysisConfig = if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid analysis config")?
        } else {
            AnalysisConfig::default()
        };

        if let Some(ref radii) = self.radii {
            config.radii = parse_radii(radii)?;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.center_only {
            config.normalize_variance = false;
        }
        if let Some(threshold) = self.threshold {
            config.degenerate_threshold = threshold;
        }
        if self.pass_through {
            config.degenerate_policy = DegeneratePolicy::PassThrough;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Which files of a directory make up the ensemble, and how to decode them.
#[derive(Args)]
pub struct InputArgs {
    /// Only load files whose name contains this (e.g. ".output.exr")
    #[arg(long)]
    pub filter: Option<String>,

    /// Collapse color images to luminance
    #[arg(long)]
    pub mono: bool,

    /// Restrict every image to a region, as ROW0:ROW1,COL0:COL1 (end exclusive)
    #[arg(long, value_parser = parse_crop)]
    pub crop: Option<CropRegion>,
}

impl InputArgs {
    pub fn load_stack(&self, dir: &Path) -> Result<ImageStack> {
        load_stack(dir, self.filter.as_deref(), self.mono, self.crop.as_ref())
    }

    pub fn load_reference(&self, path: &Path) -> Result<Array3<f64>> {
        Ok(load_cropped(path, self.mono, self.crop.as_ref())?.mapv(f64::from))
    }
}

fn parse_crop(text: &str) -> Result<CropRegion> {
    let (rows, cols) = text
        .split_once(',')
        .with_context(|| format!("Expected ROW0:ROW1,COL0:COL1, got {text:?}"))?;
    Ok(CropRegion::new(parse_span(rows)?, parse_span(cols)?))
}

fn parse_span(text: &str) -> Result<Range<usize>> {
    let text = text.trim();
    let (start, end) = text
        .split_once(':')
        .with_context(|| format!("Expected START:END, got {text:?}"))?;
    let start: usize = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid crop bound {start:?}"))?;
    let end: usize = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid crop bound {end:?}"))?;
    if end <= start {
        bail!("Empty crop span {text:?}");
    }
    Ok(start..end)
}

fn parse_radii(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid radius {:?}", s.trim()))
        })
        .collect()
}
