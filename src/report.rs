use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{ColorDiscriminator, HoverLabel, Quadrant, QuadrantSummary, ScoredRequest};
use crate::palette::ColorMap;
use crate::scoring;
use crate::weights::CRITERIA_LABELS;

pub fn summarize_by_quadrant(scored: &[ScoredRequest]) -> Vec<QuadrantSummary> {
    let total = scored.len();

    Quadrant::ALL
        .iter()
        .map(|quadrant| {
            let count = scored.iter().filter(|s| s.quadrant == *quadrant).count();
            QuadrantSummary {
                quadrant: *quadrant,
                count,
                percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                },
            }
        })
        .collect()
}

pub struct ReportOptions<'a> {
    pub generated_on: NaiveDate,
    pub operator_weights: &'a [i64],
    pub discriminator: ColorDiscriminator,
    pub hover: HoverLabel,
    pub limit: usize,
}

pub fn build_report(
    options: &ReportOptions<'_>,
    total_rows: usize,
    view: &[ScoredRequest],
    colors: Result<&ColorMap, String>,
) -> String {
    let summaries = summarize_by_quadrant(view);
    let mut output = String::new();

    let _ = writeln!(output, "# Backlog Prioritization Report");
    let _ = writeln!(
        output,
        "Generated on {} ({} of {} requests after filters)",
        options.generated_on,
        view.len(),
        total_rows
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weights");
    for (label, weight) in CRITERIA_LABELS.iter().zip(options.operator_weights) {
        let _ = writeln!(output, "- {label}: {weight}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Quadrant Mix");
    if view.is_empty() {
        let _ = writeln!(output, "No requests match the current filters.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} requests ({:.1}%)",
                summary.quadrant, summary.count, summary.percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Colors by {}", options.discriminator.title());
    match colors {
        Ok(map) if map.is_empty() => {
            let _ = writeln!(output, "No categories to color.");
        }
        Ok(map) => {
            for (value, color) in map {
                let _ = writeln!(output, "- {value}: {color}");
            }
        }
        Err(message) => {
            let _ = writeln!(output, "{message}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Priority Requests");
    if view.is_empty() {
        let _ = writeln!(output, "No requests match the current filters.");
    } else {
        let _ = writeln!(output, "| Request | Quadrant | xscore | yscore | score |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for request in scoring::rank(view).iter().take(options.limit) {
            let _ = writeln!(
                output,
                "| {} | {} | {:.2} | {:.3} | {:.2} |",
                request.hover_label(options.hover),
                request.quadrant,
                request.xscore,
                request.yscore,
                request.score
            );
        }
    }

    output
}
