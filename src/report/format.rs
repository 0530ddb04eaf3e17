//! Formatted terminal output.

use crate::domain::{FitQuality, FitResult, ModelKind, Residual};
use crate::fit::batch::SeriesFit;
use crate::io::ingest::DatasetStats;

/// Format the run summary: dataset stats, fitted model and its quality.
pub fn format_fit_summary(
    source: &str,
    series: Option<&str>,
    stats: &DatasetStats,
    fit: &FitResult,
    quality: &FitQuality,
) -> String {
    let mut out = String::new();

    out.push_str("=== trendfit - Regression Fit ===\n");
    out.push_str(&format!("Source: {source}\n"));
    if let Some(series) = series {
        out.push_str(&format!("Series: {series}\n"));
    }
    out.push_str(&format!(
        "Samples: n={} (missing={}) | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        stats.n_samples, stats.n_missing, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));

    out.push_str("\nModel:\n");
    out.push_str(&format!("- {}\n", fit.model.label()));
    out.push_str(&format!("- equation: {}\n", format_equation(fit)));
    out.push_str(&format!("- coefficients: {}\n", fmt_vec(&fit.coefficients)));
    if fit.degenerate {
        out.push_str("- degenerate: normal equations are singular; trailing coefficients set to 0\n");
    }

    out.push_str("\nFit quality:\n");
    out.push_str(&format!(
        "n={} SSE={:.6} RMSE={:.6} R²={:.6}\n",
        quality.n, quality.sse, quality.rmse, quality.r_squared
    ));
    out.push('\n');

    out
}

/// One line per series of a batch run.
pub fn format_batch_summary(fits: &[SeriesFit]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<16} {:>6} {:<48}", "series", "n", "result").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<6} {:-<48}", "", "", "").trim_end());
    out.push('\n');

    for fit in fits {
        let name = fit
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", fit.series));
        let line = match &fit.result {
            Ok(result) => format!(
                "{:<16} {:>6} {}",
                truncate(&name, 16),
                result.n,
                fmt_vec(&result.coefficients)
            ),
            Err(err) => format!("{:<16} {:>6} error: {err}", truncate(&name, 16), "-"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Table of residuals (typically the largest few).
pub fn format_residuals(rows: &[Residual]) -> String {
    let mut out = String::new();
    out.push_str(
        format!("{:>12} {:>12} {:>12} {:>12}", "x", "y", "y_fit", "residual").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                r.sample.x, r.sample.y, r.y_fit, r.residual
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Human-readable equation, e.g. `y = 1.5 + 2·x`.
pub fn format_equation(fit: &FitResult) -> String {
    let c = &fit.coefficients;
    match fit.model.kind {
        ModelKind::Linear if c.len() == 2 => format!("y = {} + {}·x", fmt_num(c[0]), fmt_num(c[1])),
        ModelKind::Power if c.len() == 2 => format!("y = {}·x^{}", fmt_num(c[0]), fmt_num(c[1])),
        _ => {
            let terms: Vec<String> = c
                .iter()
                .enumerate()
                .map(|(i, a)| match i {
                    0 => fmt_num(*a),
                    1 => format!("{}·x", fmt_num(*a)),
                    _ => format!("{}·x^{i}", fmt_num(*a)),
                })
                .collect();
            format!("y = {}", terms.join(" + "))
        }
    }
}

fn fmt_num(v: f64) -> String {
    format!("{v:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinearFit, ModelSpec, PowerFit};
    use crate::error::FitError;

    #[test]
    fn equations_per_model() {
        let line: FitResult = LinearFit { intercept: 2.0, slope: 3.0, n: 4 }.into();
        assert_eq!(format_equation(&line), "y = 2 + 3·x");

        let power: FitResult = PowerFit { a: 5.0, b: 2.0, n: 4 }.into();
        assert_eq!(format_equation(&power), "y = 5·x^2");

        let poly = FitResult {
            model: ModelSpec::polynomial(2),
            coefficients: vec![1.0, 2.0, 3.5],
            r_squared: Some(1.0),
            degenerate: false,
            n: 4,
        };
        assert_eq!(format_equation(&poly), "y = 1 + 2·x + 3.5·x^2");
    }

    #[test]
    fn batch_summary_lists_errors() {
        let fits = vec![
            SeriesFit {
                series: 0,
                name: Some("a".to_string()),
                result: Ok(LinearFit { intercept: 0.0, slope: 1.0, n: 3 }.into()),
            },
            SeriesFit {
                series: 1,
                name: None,
                result: Err(FitError::InsufficientData { got: 1, min: 2 }),
            },
        ];
        let text = format_batch_summary(&fits);
        assert!(text.contains("[0.000000, 1.000000]"));
        assert!(text.contains("#1"));
        assert!(text.contains("need at least 2"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
