pub mod cache;
pub mod displacement;
pub mod offset;
pub mod radial;

pub use cache::CorrelationCache;
pub use displacement::{ring_cardinality, ring_displacements, Displacement};
pub use offset::OffsetCorrelationEvaluator;
pub use radial::RadialAverager;
