//! Renders experiment reports for the terminal.

use collinear_ml::ExperimentReport;
use comfy_table::{Cell, CellAlignment, Table};

const PRESET: &str = "||--+-++|    ++++++";

pub fn render_table(report: &ExperimentReport) -> String {
    let mut out = String::new();

    let mut summary = Table::new();
    summary.load_preset(PRESET);
    summary.set_header(vec!["target", "train rows", "test rows", "rank", "metric", "R²"]);
    summary.add_row(vec![
        Cell::new(&report.target),
        Cell::new(report.train_rows),
        Cell::new(report.test_rows),
        Cell::new(format!(
            "{}{}",
            report.model.rank(),
            if report.model.is_rank_deficient() {
                " (deficient)"
            } else {
                ""
            }
        )),
        Cell::new(format!(
            "{} = {:.4} ({} is better)",
            report.metric,
            report.score,
            if report.metric.is_larger_better() {
                "higher"
            } else {
                "lower"
            }
        )),
        Cell::new(format!("{:.4}", report.r2)),
    ]);
    out.push_str(&summary.to_string());
    out.push('\n');

    let mut coefficients = Table::new();
    coefficients.load_preset(PRESET);
    coefficients.set_header(vec!["feature", "coefficient", "correlation", "VIF", "reversed"]);
    coefficients.add_row(vec![
        Cell::new("(intercept)"),
        Cell::new(format!("{:.4}", report.model.intercept())),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]);
    for (j, reversal) in report.sign_reversals.iter().enumerate() {
        let vif = report
            .variance_inflation
            .as_ref()
            .and_then(|v| v.get(j))
            .map(|v| format_vif(*v))
            .unwrap_or_default();
        coefficients.add_row(vec![
            Cell::new(&reversal.feature),
            Cell::new(format!("{:.4}", reversal.coefficient)),
            Cell::new(format_correlation(reversal.correlation)),
            Cell::new(vif),
            Cell::new(if reversal.reversed { "yes" } else { "" }),
        ]);
    }
    coefficients.column_iter_mut().skip(1).for_each(|c| {
        c.set_cell_alignment(CellAlignment::Right);
    });
    out.push_str(&coefficients.to_string());

    if report.feature_correlations.len() >= 2 {
        let mut correlations = Table::new();
        correlations.load_preset(PRESET);
        let mut header = vec![String::new()];
        header.extend(report.features.iter().cloned());
        correlations.set_header(header);
        for (feature, row) in report.features.iter().zip(&report.feature_correlations) {
            let mut cells = vec![Cell::new(feature)];
            cells.extend(row.iter().map(|r| Cell::new(format_correlation(*r))));
            correlations.add_row(cells);
        }
        correlations.column_iter_mut().skip(1).for_each(|c| {
            c.set_cell_alignment(CellAlignment::Right);
        });
        out.push('\n');
        out.push_str(&correlations.to_string());
    }
    out
}

pub fn render_json(report: &ExperimentReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn format_correlation(value: Option<f64>) -> String {
    value.map(|r| format!("{r:.4}")).unwrap_or_default()
}

fn format_vif(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{value:.2}")
    }
}
