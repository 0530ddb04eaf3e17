//! Debug bundle writer for inspecting a polynomial solve.
//!
//! The bundle is a markdown file with the normal-equation matrix as built, the
//! reduced (upper-triangular) matrix, the solved coefficients, R² and per-sample
//! residuals. File names carry a local timestamp so repeated runs don't clobber
//! each other.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::Local;
use nalgebra::DMatrix;

use crate::domain::{FitQuality, FitResult, Residual};
use crate::error::AppError;
use crate::fit::fitter::EliminationTrace;

/// Everything a bundle reports on.
pub struct DebugContext<'a> {
    pub source: &'a str,
    pub series: Option<&'a str>,
    pub fit: &'a FitResult,
    pub quality: &'a FitQuality,
    pub residuals: &'a [Residual],
    /// Only polynomial fits go through the elimination.
    pub trace: Option<&'a EliminationTrace>,
}

/// Write a bundle into `dir` and return its path.
pub fn write_debug_bundle(dir: &Path, ctx: &DebugContext<'_>) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(2, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!(
        "trendfit_debug_{}_{ts}.md",
        ctx.fit.model.kind.display_name().to_ascii_lowercase()
    ));

    std::fs::write(&path, render_debug_bundle(ctx))
        .map_err(|e| AppError::new(2, format!("Failed to write debug file '{}': {e}", path.display())))?;
    Ok(path)
}

/// Markdown body of a bundle.
pub fn render_debug_bundle(ctx: &DebugContext<'_>) -> String {
    let mut out = String::new();

    out.push_str("# trendfit debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", ctx.source));
    if let Some(series) = ctx.series {
        out.push_str(&format!("- series: {series}\n"));
    }
    out.push_str(&format!("- model: {}\n", ctx.fit.model.label()));
    out.push_str(&format!("- samples used: {}\n", ctx.fit.n));
    out.push_str(&format!("- degenerate: {}\n", ctx.fit.degenerate));

    if let Some(trace) = ctx.trace {
        out.push_str("\n## Normal equations\n");
        out.push_str(&matrix_table(&trace.normal));
        out.push_str("\n## Reduced system\n");
        out.push_str(&matrix_table(&trace.reduced));
    }

    out.push_str("\n## Coefficients\n");
    out.push_str("| index | value |\n| - | - |\n");
    for (i, c) in ctx.fit.coefficients.iter().enumerate() {
        out.push_str(&format!("| {i} | {} |\n", fmt_num(*c)));
    }

    out.push_str("\n## Quality\n");
    out.push_str(&format!(
        "- n={} sse={} rmse={} r_squared={}\n",
        ctx.quality.n,
        fmt_num(ctx.quality.sse),
        fmt_num(ctx.quality.rmse),
        fmt_num(ctx.quality.r_squared)
    ));

    out.push_str("\n## Residuals\n");
    out.push_str("| x | y | y_fit | residual |\n| - | - | - | - |\n");
    for r in ctx.residuals {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            fmt_num(r.sample.x),
            fmt_num(r.sample.y),
            fmt_num(r.y_fit),
            fmt_num(r.residual)
        ));
    }

    out
}

fn matrix_table(m: &DMatrix<f64>) -> String {
    let cols = m.ncols();
    let mut out = String::new();

    let header: Vec<String> = (0..cols)
        .map(|c| if c + 1 == cols { "rhs".to_string() } else { format!("c{c}") })
        .collect();
    out.push_str(&format!("| row | {} |\n", header.join(" | ")));
    out.push_str(&format!("| - |{}\n", " - |".repeat(cols)));

    for r in 0..m.nrows() {
        let cells: Vec<String> = m.row(r).iter().map(|v| fmt_num(*v)).collect();
        out.push_str(&format!("| {r} | {} |\n", cells.join(" | ")));
    }
    out
}

fn fmt_num(v: f64) -> String {
    if v.is_finite() { format!("{v:.6e}") } else { format!("{v}") }
}
