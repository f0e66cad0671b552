//! # Trapezoidal rule
//!
//! Composite trapezoidal rule on a uniform grid of `n + 1` points:
//! ```text
//!  h = (b - a) / n
//!  I ≈ h * (Σ y[i] - (y[0] + y[n]) / 2)
//! ```
//! which is the sum of the areas of `n` trapezoids with heights `y[i]`, `y[i+1]`.
//! The formula is signed: with `a > b` the width `h` is negative and the result changes sign.
//!
//! The module also carries a convergence study (the same function integrated with a doubling
//! number of sub-intervals), useful to see the O(h²) behaviour of the rule.
use crate::symbolic::symbolic_lambdify::Evaluator;
use log::{debug, info};
use nalgebra::DVector;
use tabled::{builder::Builder, settings::Style};

/// integration interval, `lower > upper` is allowed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Bounds { lower, upper }
    }

    /// signed width `upper - lower`
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn reversed(&self) -> Bounds {
        Bounds::new(self.upper, self.lower)
    }
}

/// `n_points` equally spaced points from `start` to `end`, both included.
/// The last point is set to `end` exactly, so rounding never moves the right endpoint.
pub fn linspace(start: f64, end: f64, n_points: usize) -> DVector<f64> {
    match n_points {
        0 => DVector::zeros(0),
        1 => DVector::from_element(1, start),
        _ => {
            let step = (end - start) / (n_points - 1) as f64;
            DVector::from_fn(n_points, |i, _| {
                if i == n_points - 1 {
                    end
                } else {
                    start + i as f64 * step
                }
            })
        }
    }
}

/// grid, function values on it and the resulting approximation
#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidSolution {
    pub grid: DVector<f64>,
    pub values: DVector<f64>,
    pub h: f64,
    pub integral: f64,
}

/// Composite trapezoidal rule with `n` sub-intervals.
///
/// `n >= 1` is a precondition checked where the input is accepted (task loader, CLI).
/// NaN or infinite function values are not filtered: they propagate into the result.
///
/// # Examples
/// ```
/// use RustedTrapezoid::numerical::trapezoid::{Bounds, trapezoidal_rule};
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
/// let f = Evaluator::compile(&Expr::parse_expression("x").unwrap(), "x").unwrap();
/// let solution = trapezoidal_rule(&f, Bounds::new(0.0, 1.0), 10);
/// assert!((solution.integral - 0.5).abs() < 1e-12);
/// assert_eq!(solution.grid.len(), 11);
/// ```
pub fn trapezoidal_rule(f: &Evaluator, bounds: Bounds, n: usize) -> TrapezoidSolution {
    debug_assert!(n >= 1, "number of sub-intervals must be at least 1");
    let grid = linspace(bounds.lower, bounds.upper, n + 1);
    let values = f.evaluate(&grid);
    let h = bounds.width() / n as f64;
    let integral = h * (values.sum() - 0.5 * (values[0] + values[values.len() - 1]));
    debug!(
        "trapezoidal rule: {} sub-intervals on [{}, {}], h = {}, integral = {}",
        n, bounds.lower, bounds.upper, h, integral
    );
    TrapezoidSolution {
        grid,
        values,
        h,
        integral,
    }
}

/// one line of the convergence study
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceRow {
    pub intervals: usize,
    pub integral: f64,
    pub absolute_error: Option<f64>,
}

/// `count` sub-interval counts starting at `start` and doubling each time
pub fn doubling_sequence(start: usize, count: usize) -> Vec<usize> {
    let mut n = start.max(1);
    let mut sequence = Vec::with_capacity(count);
    for _ in 0..count {
        sequence.push(n);
        n = n.saturating_mul(2);
    }
    sequence
}

/// Integrates the same function with every sub-interval count in `n_values`.
pub fn convergence_study(
    f: &Evaluator,
    bounds: Bounds,
    n_values: &[usize],
    exact: Option<f64>,
) -> Vec<ConvergenceRow> {
    let rows: Vec<ConvergenceRow> = n_values
        .iter()
        .filter(|&&n| n >= 1)
        .map(|&n| {
            let integral = trapezoidal_rule(f, bounds, n).integral;
            ConvergenceRow {
                intervals: n,
                integral,
                absolute_error: exact.map(|e| (e - integral).abs()),
            }
        })
        .collect();
    info!(
        "convergence study of {} d{} on [{}, {}]: {} runs",
        f.expression(),
        f.variable(),
        bounds.lower,
        bounds.upper,
        rows.len()
    );
    rows
}

/// pretty table of a convergence study
pub fn convergence_table(rows: &[ConvergenceRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec![
        "n".to_string(),
        "trapezoidal integral".to_string(),
        "absolute error".to_string(),
    ]);
    for row in rows {
        builder.push_record(vec![
            row.intervals.to_string(),
            format!("{:.10}", row.integral),
            row.absolute_error
                .map(|e| format!("{:.3e}", e))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
