use std::collections::BTreeMap;
use std::path::Path;

use console::Style;
use radcorr_core::config::AnalysisConfig;
use radcorr_core::curve::CorrelationCurve;
use radcorr_core::metrics::ErrorSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_analysis_summary(config: &AnalysisConfig, input: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Radial Correlation"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Mode"),
        s.method.apply_to(config.mode)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Standardize"),
        s.value.apply_to(if config.normalize_variance {
            "center + scale"
        } else {
            "center only"
        })
    );
    if config.degenerate_threshold > 0.0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Threshold"),
            s.value.apply_to(config.degenerate_threshold)
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Threshold"),
            s.disabled.apply_to("exact zero")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Degenerate"),
        s.value.apply_to(config.degenerate_policy)
    );
    println!(
        "  {:<14}{:?}",
        s.label.apply_to("Radii"),
        config.sorted_radii()
    );
    println!();
}

pub fn print_curve(title: &str, curve: &CorrelationCurve) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to(title));
    println!(
        "    {:>8}  {}",
        s.label.apply_to("Radius"),
        s.label.apply_to(curve.label())
    );
    for point in &curve.points {
        match point.value {
            Some(v) => println!("    {:>8}  {}", point.radius, s.value.apply_to(format!("{v:.6}"))),
            None => println!(
                "    {:>8}  {}",
                point.radius,
                s.disabled.apply_to("undefined")
            ),
        }
    }
    println!();
}

pub fn print_batch(curves: &BTreeMap<String, CorrelationCurve>, failures: &[(String, String)]) {
    let s = Styles::new();

    for (id, curve) in curves {
        print_curve(id, curve);
    }
    if !failures.is_empty() {
        println!("  {}", s.header.apply_to("Failed"));
        for (id, reason) in failures {
            println!("    {}  {}", s.value.apply_to(id), s.disabled.apply_to(reason));
        }
        println!();
    }
}

pub fn print_error_summary(summary: &ErrorSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Reference Error"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Members"),
        s.value.apply_to(summary.members)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("RMSE"),
        s.value.apply_to(format!("{:.6}", summary.rmse))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("MAPE"),
        s.value.apply_to(format!("{:.3}%", summary.mape))
    );
    println!();
}
