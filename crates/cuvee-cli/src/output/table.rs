use cuvee_core::deviation::{chart_points, DeviationResult};
use cuvee_core::predict::Assessment;
use cuvee_core::Evaluation;

/// Longest bar in the deviation chart, in characters.
const BAR_WIDTH: usize = 20;
/// Percent deviation drawn as a full bar.
const BAR_FULL_SCALE: f64 = 50.0;

pub fn print(evaluation: &Evaluation, verbose: bool) {
    print!("{}", format_evaluation(evaluation, verbose));
}

pub fn format_evaluation(evaluation: &Evaluation, verbose: bool) -> String {
    let mut out = String::new();

    out.push_str("=== Quality analysis ===\n\n");
    let prediction = &evaluation.prediction;
    match prediction.assessment {
        Assessment::Rated(_) => {
            out.push_str(&format!("  Total quality score: {}\n\n", prediction.message()));
        }
        Assessment::OutOfRange => {
            out.push_str(&format!("  Warning: {}\n\n", prediction.message()));
        }
    }

    out.push_str("=== Component analysis ===\n\n");
    let judgments = &evaluation.classification.judgments;
    let label_width = judgments.iter().map(|j| j.label.len()).max().unwrap_or(10);
    for j in judgments {
        let marker = if j.is_positive() { "ok" } else { "!!" };
        out.push_str(&format!(
            "  [{}] {:<width$}  {:<17} {}\n",
            marker,
            j.label,
            j.status.to_string(),
            j.value,
            width = label_width
        ));
        if verbose {
            out.push_str(&format!("       {}\n", j.explanation));
            for failed in &j.failed_conditions {
                out.push_str(&format!("       - {}\n", failed));
            }
        }
    }
    out.push('\n');

    out.push_str("=== Recommendations ===\n\n");
    let advisories = &evaluation.classification.advisories;
    if advisories.is_empty() {
        out.push_str("  All components are within optimal values!\n");
    } else {
        for a in advisories {
            out.push_str(&format!("  - {}\n", a.recommendation));
        }
    }
    out.push('\n');

    out.push_str("=== Deviation from ideal ===\n\n");
    out.push_str(&format_chart(&evaluation.deviations));
    let significant = evaluation.significant_deviations();
    if !significant.is_empty() {
        out.push_str("\n  Significant deviations:\n");
        for d in significant {
            out.push_str(&format!("    {}\n", d.describe()));
        }
    }
    if verbose {
        out.push_str(&format!(
            "\n  Rules: {} (v{})\n",
            evaluation.classification.rules_name, evaluation.classification.rules_version
        ));
    }

    out
}

/// Horizontal bar chart of percent deviations.
fn format_chart(deviations: &[DeviationResult]) -> String {
    let points = chart_points(deviations);
    let label_width = points.iter().map(|(l, _)| l.len()).max().unwrap_or(10);

    let mut out = String::new();
    for (label, pct) in points {
        let filled = ((pct.abs() / BAR_FULL_SCALE) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let (left, right) = if pct < 0.0 {
            (
                format!("{:>width$}", "#".repeat(filled), width = BAR_WIDTH),
                String::new(),
            )
        } else {
            (" ".repeat(BAR_WIDTH), "#".repeat(filled))
        };
        out.push_str(&format!(
            "  {:<lw$}  {:>+7.1}%  {}|{}\n",
            label,
            pct,
            left,
            right,
            lw = label_width
        ));
    }

    for d in deviations.iter().filter(|d| d.percent_deviation.is_none()) {
        out.push_str(&format!(
            "  {:<lw$}  undefined (ideal is zero)\n",
            d.attribute.label(),
            lw = label_width
        ));
    }
    out
}
