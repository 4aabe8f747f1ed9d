use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::consts::PARALLEL_EXPERIMENT_THRESHOLD;
use crate::curve::{CorrelationCurve, CorrelationCurveBuilder};
use crate::error::{CorrelationError, Result};
use crate::progress::{CurveStage, ProgressReporter};
use crate::stack::ImageStack;

/// An ensemble tagged with the identifier of the experiment it came from.
#[derive(Clone, Debug)]
pub struct Experiment {
    pub id: String,
    pub stack: ImageStack,
}

impl Experiment {
    pub fn new(id: impl Into<String>, stack: ImageStack) -> Self {
        Self {
            id: id.into(),
            stack,
        }
    }
}

/// Compute one curve per in-memory experiment.
///
/// Experiments share nothing, so they run in parallel. A failure is recorded
/// against its own id and does not stop the others. `reporter` sees one
/// `Correlating` stage advanced once per finished experiment.
pub fn compute_curves(
    experiments: &[Experiment],
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<BTreeMap<String, Result<CorrelationCurve>>> {
    let builder = CorrelationCurveBuilder::new(config.clone())?;
    Ok(run_batch(experiments, reporter, |experiment| {
        (experiment.id.clone(), builder.build(&experiment.stack))
    }))
}

/// Compute one curve per `(id, source)` pair, loading each stack with `load`
/// only when its curve is about to be computed.
///
/// A stack is dropped as soon as its curve is built, so at most one stack per
/// worker thread is resident. Load failures are recorded against their id
/// like computation failures.
pub fn compute_curves_with<S, F, E>(
    sources: &[(String, S)],
    load: F,
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<BTreeMap<String, std::result::Result<CorrelationCurve, E>>>
where
    S: Sync,
    F: Fn(&str, &S) -> std::result::Result<ImageStack, E> + Sync,
    E: From<CorrelationError> + Display + Send,
{
    let builder = CorrelationCurveBuilder::new(config.clone())?;
    Ok(run_batch(sources, reporter, |(id, source)| {
        let curve = load(id.as_str(), source).and_then(|stack| {
            debug!(id = %id, images = stack.len(), "Experiment loaded");
            builder.build(&stack).map_err(E::from)
        });
        (id.clone(), curve)
    }))
}

fn run_batch<T, E>(
    items: &[T],
    reporter: &dyn ProgressReporter,
    job: impl Fn(&T) -> (String, std::result::Result<CorrelationCurve, E>) + Sync,
) -> BTreeMap<String, std::result::Result<CorrelationCurve, E>>
where
    T: Sync,
    E: Display + Send,
{
    info!(experiments = items.len(), "Batch correlation started");

    reporter.begin_stage(CurveStage::Correlating, Some(items.len()));
    let done = AtomicUsize::new(0);
    let run = |item: &T| {
        let (id, curve) = job(item);
        if let Err(ref e) = curve {
            warn!(id = %id, error = %e, "Experiment failed");
        }
        let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(completed);
        (id, curve)
    };

    let results = if items.len() >= PARALLEL_EXPERIMENT_THRESHOLD {
        items.par_iter().map(run).collect()
    } else {
        items.iter().map(run).collect()
    };
    reporter.finish_stage();

    results
}
