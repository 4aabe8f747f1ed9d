/// Curve computation stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveStage {
    Statistics,
    Standardizing,
    Correlating,
}

impl std::fmt::Display for CurveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Statistics => write!(f, "Estimating statistics"),
            Self::Standardizing => write!(f, "Standardizing"),
            Self::Correlating => write!(f, "Correlating"),
        }
    }
}

/// Thread-safe progress reporting for curve computations.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g. radius count), if known.
    fn begin_stage(&self, _stage: CurveStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
