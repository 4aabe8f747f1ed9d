pub mod batch;
pub mod config;
pub mod consts;
pub mod correlation;
pub mod curve;
pub mod error;
pub mod metrics;
pub mod progress;
pub mod stack;
pub mod standardize;
pub mod statistics;
