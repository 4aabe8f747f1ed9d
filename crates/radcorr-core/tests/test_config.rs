use radcorr_core::config::{AnalysisConfig, AveragingMode, DegeneratePolicy};
use radcorr_core::consts::DEFAULT_RADII;
use radcorr_core::progress::CurveStage;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_averaging_mode_display() {
    assert_eq!(format!("{}", AveragingMode::Ring), "ring");
    assert_eq!(format!("{}", AveragingMode::Disk), "disk");
}

#[test]
fn test_degenerate_policy_display() {
    assert_eq!(format!("{}", DegeneratePolicy::Exclude), "Exclude");
    assert_eq!(format!("{}", DegeneratePolicy::PassThrough), "Pass Through");
}

#[test]
fn test_curve_stage_display() {
    assert_eq!(format!("{}", CurveStage::Statistics), "Estimating statistics");
    assert_eq!(format!("{}", CurveStage::Correlating), "Correlating");
}

// ---------------------------------------------------------------------------
// Defaults and validation
// ---------------------------------------------------------------------------

#[test]
fn test_defaults() {
    let config = AnalysisConfig::default();
    assert_eq!(config.radii, DEFAULT_RADII.to_vec());
    assert_eq!(config.mode, AveragingMode::Ring);
    assert!(config.normalize_variance);
    assert_eq!(config.degenerate_threshold, 0.0);
    assert_eq!(config.degenerate_policy, DegeneratePolicy::Exclude);
    assert!(config.validate().is_ok());
}

#[test]
fn test_sorted_radii() {
    let config = AnalysisConfig {
        radii: vec![8, 2, 2, 0, 5],
        ..Default::default()
    };
    assert_eq!(config.sorted_radii(), vec![0, 2, 5, 8]);
}

#[test]
fn test_positive_threshold_is_valid() {
    let config = AnalysisConfig {
        degenerate_threshold: 1e-6,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_toml_roundtrip() {
    let config = AnalysisConfig {
        radii: vec![1, 4, 9],
        mode: AveragingMode::Disk,
        normalize_variance: false,
        degenerate_threshold: 0.5,
        degenerate_policy: DegeneratePolicy::PassThrough,
    };
    let text = toml::to_string_pretty(&config).unwrap();
    assert!(text.contains("mode = \"disk\""), "got: {text}");
    assert!(text.contains("degenerate_policy = \"pass-through\""), "got: {text}");
    let parsed: AnalysisConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let parsed: AnalysisConfig = toml::from_str("mode = \"disk\"\nradii = [2, 1]\n").unwrap();
    assert_eq!(parsed.mode, AveragingMode::Disk);
    assert_eq!(parsed.radii, vec![2, 1]);
    assert!(parsed.normalize_variance);
    assert_eq!(parsed.degenerate_policy, DegeneratePolicy::Exclude);
}

#[test]
fn test_unknown_mode_rejected() {
    assert!(toml::from_str::<AnalysisConfig>("mode = \"square\"").is_err());
}
