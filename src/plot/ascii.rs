//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - optional highlights: `X` (e.g. the largest residuals)

use crate::domain::{FitFile, FitResult, Observation, Residual};
use crate::models::predict_fit;

/// Render a plot for an in-memory fit result.
///
/// Samples with a NaN coordinate are not drawn.
pub fn render_ascii_plot(
    samples: &[Observation],
    fit: &FitResult,
    width: usize,
    height: usize,
    highlight: Option<&[Residual]>,
) -> String {
    let (x_min, x_max) = x_range_from_samples(samples).unwrap_or((0.0, 1.0));
    let curve = sample_curve(fit, x_min, x_max, width.max(2));
    render_plot(samples, &curve, x_min, x_max, width, height, highlight)
}

/// Render a plot from a saved fit file (curve only, no overlay points).
pub fn render_ascii_plot_from_fit_file(fit_file: &FitFile, width: usize, height: usize) -> String {
    let (x_min, x_max) = x_range(fit_file.grid.x.iter().copied()).unwrap_or((0.0, 1.0));
    let curve: Vec<(f64, f64)> = fit_file
        .grid
        .x
        .iter()
        .zip(fit_file.grid.y.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    render_plot(&[], &curve, x_min, x_max, width, height, None)
}

fn render_plot(
    samples: &[Observation],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
    highlight: Option<&[Residual]>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(samples, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so points overlay it.
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    let highlighted = |s: &Observation| {
        highlight.is_some_and(|rows| rows.iter().any(|r| r.sample == *s))
    };

    for s in samples.iter().filter(|s| is_drawable(s.x, s.y)) {
        let x = map_x(s.x, x_min, x_max, width);
        let y = map_y(s.y, y_min, y_max, height);
        grid[y][x] = if highlighted(s) { 'X' } else { 'o' };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn is_drawable(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

fn x_range_from_samples(samples: &[Observation]) -> Option<(f64, f64)> {
    x_range(samples.iter().filter(|s| is_drawable(s.x, s.y)).map(|s| s.x))
}

fn x_range(xs: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for x in xs.filter(|x| x.is_finite()) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn sample_curve(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        out.push((x, predict_fit(fit, x)));
    }
    out
}

fn y_range(samples: &[Observation], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let ys = samples
        .iter()
        .map(|s| (s.x, s.y))
        .chain(curve.iter().copied())
        .filter(|&(x, y)| is_drawable(x, y))
        .map(|(_, y)| y);
    for y in ys {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

/// Widen `[lo, hi]` by `frac` of its span on each side.
fn pad_range(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    let pad = ((hi - lo).abs() * frac).max(1e-12);
    (lo - pad, hi + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let last = (width.max(2) - 1) as f64;
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * last).round() as usize
}

/// Row 0 is the top of the plot, i.e. `y_max`.
fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let last = (height.max(2) - 1) as f64;
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    (last - u * last).round() as usize
}

/// Connect consecutive curve points; a non-finite point breaks the line.
fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !is_drawable(x, y) {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some(prev) => draw_line(grid, prev, (col, row), '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Bresenham line between two cells; only blank cells are painted.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut col, mut row) = (from.0 as isize, from.1 as isize);
    let (end_col, end_row) = (to.0 as isize, to.1 as isize);

    let dx = (end_col - col).abs();
    let dy = -(end_row - row).abs();
    let step_col = if col < end_col { 1 } else { -1 };
    let step_row = if row < end_row { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
            .filter(|cell| **cell == ' ')
        {
            *cell = ch;
        }
        if col == end_col && row == end_row {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            col += step_col;
        }
        if e2 <= dx {
            err += dx;
            row += step_row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitGrid, FitQuality, LinearFit};

    #[test]
    fn plot_golden_snapshot_small() {
        let samples = [Observation::new(1.0, 100.0), Observation::new(10.0, 110.0)];
        let fit: FitResult = LinearFit { intercept: 100.0, slope: 0.0, n: 2 }.into();

        let txt = render_ascii_plot(&samples, &fit, 10, 5, None);
        let expected = concat!(
            "Plot: x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn highlights_and_missing_samples() {
        let samples = [
            Observation::new(1.0, 100.0),
            Observation::new(5.0, f64::NAN),
            Observation::new(10.0, 110.0),
        ];
        let fit: FitResult = LinearFit { intercept: 100.0, slope: 0.0, n: 2 }.into();
        let worst = [Residual { sample: samples[2], y_fit: 100.0, residual: 10.0 }];

        let txt = render_ascii_plot(&samples, &fit, 10, 5, Some(worst.as_slice()));
        assert_eq!(txt.lines().nth(1), Some("         X"));
        let body: String = txt.lines().skip(1).collect();
        assert_eq!(body.matches('o').count(), 1);
    }

    #[test]
    fn fit_file_curve_skips_non_finite_grid_points() {
        let fit: FitResult = LinearFit { intercept: 0.0, slope: 1.0, n: 2 }.into();
        let fit_file = FitFile {
            tool: "trendfit".to_string(),
            source: "in.csv".to_string(),
            series: None,
            fit,
            quality: FitQuality { n: 2, sse: 0.0, rmse: 0.0, r_squared: 1.0 },
            grid: FitGrid {
                x: vec![0.0, 1.0, 2.0, 3.0],
                y: vec![0.0, f64::NAN, 2.0, 3.0],
            },
        };
        let txt = render_ascii_plot_from_fit_file(&fit_file, 10, 5);
        assert!(txt.starts_with("Plot: x=[0.000, 3.000]"));
        let body: String = txt.lines().skip(1).collect();
        assert!(body.contains('-'));
        assert!(!body.contains('o'));
    }
}
