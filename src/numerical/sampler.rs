//! point sequences for drawing the function and its trapezoidal approximation
use crate::numerical::trapezoid::{Bounds, TrapezoidSolution, linspace};
use crate::symbolic::symbolic_lambdify::Evaluator;
use log::debug;
use nalgebra::DVector;

/// number of points of the smooth curve
pub const DENSE_POINTS: usize = 1000;

/// Dense curve plus the trapezoid vertices (the integration grid and its values).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub dense_x: DVector<f64>,
    pub dense_y: DVector<f64>,
    pub trapezoid_x: DVector<f64>,
    pub trapezoid_y: DVector<f64>,
}

impl PlotData {
    /// Samples `f` densely on `bounds` and takes the trapezoid vertices from `solution`,
    /// which must come from the same evaluator.
    pub fn sample(f: &Evaluator, bounds: Bounds, solution: &TrapezoidSolution) -> PlotData {
        let dense_x = linspace(bounds.lower, bounds.upper, DENSE_POINTS);
        let dense_y = f.evaluate(&dense_x);
        debug!(
            "sampled {} on {} dense points and {} grid points",
            f.expression(),
            dense_x.len(),
            solution.grid.len()
        );
        PlotData {
            dense_x,
            dense_y,
            trapezoid_x: solution.grid.clone(),
            trapezoid_y: solution.values.clone(),
        }
    }

    /// Corners of every trapezoid, counter-clockwise from the left foot:
    /// `(x_i, 0), (x_{i+1}, 0), (x_{i+1}, y_{i+1}), (x_i, y_i)`.
    /// Trapezoids touching a non-finite value are skipped.
    pub fn trapezoids(&self) -> Vec<[(f64, f64); 4]> {
        let x = &self.trapezoid_x;
        let y = &self.trapezoid_y;
        (0..x.len().saturating_sub(1))
            .filter(|&i| y[i].is_finite() && y[i + 1].is_finite())
            .map(|i| [(x[i], 0.0), (x[i + 1], 0.0), (x[i + 1], y[i + 1]), (x[i], y[i])])
            .collect()
    }

    /// Smallest and largest finite value among all sampled points, `None` if there is none.
    pub fn finite_y_range(&self) -> Option<(f64, f64)> {
        self.dense_y
            .iter()
            .chain(self.trapezoid_y.iter())
            .filter(|y| y.is_finite())
            .fold(None, |range, &y| match range {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::trapezoid::trapezoidal_rule;
    use crate::symbolic::symbolic_engine::Expr;

    fn plot_data(input: &str, bounds: Bounds, n: usize) -> PlotData {
        let f = Evaluator::compile(&Expr::parse_expression(input).unwrap(), "x").unwrap();
        let solution = trapezoidal_rule(&f, bounds, n);
        PlotData::sample(&f, bounds, &solution)
    }

    #[test]
    fn test_sizes() {
        let plot = plot_data("sin(x)", Bounds::new(0.0, 3.0), 10);
        assert_eq!(plot.dense_x.len(), DENSE_POINTS);
        assert_eq!(plot.dense_y.len(), DENSE_POINTS);
        assert_eq!(plot.trapezoid_x.len(), 11);
        assert_eq!(plot.trapezoid_y.len(), 11);
        assert_eq!(plot.dense_x[0], 0.0);
        assert_eq!(plot.dense_x[DENSE_POINTS - 1], 3.0);
    }

    #[test]
    fn test_curve_and_trapezoids_agree() {
        // same evaluator: the dense curve passes through every trapezoid vertex
        let plot = plot_data("x^2", Bounds::new(0.0, 999.0), 9);
        for (x, y) in plot.trapezoid_x.iter().zip(plot.trapezoid_y.iter()) {
            let i = plot.dense_x.iter().position(|d| d == x).unwrap();
            assert_eq!(plot.dense_y[i], *y);
        }
    }

    #[test]
    fn test_trapezoids() {
        let plot = plot_data("x + 1", Bounds::new(0.0, 2.0), 2);
        let trapezoids = plot.trapezoids();
        assert_eq!(trapezoids.len(), 2);
        assert_eq!(
            trapezoids[1],
            [(1.0, 0.0), (2.0, 0.0), (2.0, 3.0), (1.0, 2.0)]
        );
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let plot = plot_data("1/x", Bounds::new(-1.0, 1.0), 2);
        // the grid hits x = 0
        assert!(plot.trapezoid_y[1].is_infinite());
        assert!(plot.trapezoids().is_empty());
        let (lo, hi) = plot.finite_y_range().unwrap();
        assert!(lo.is_finite() && hi.is_finite());
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn test_range_of_nan_function() {
        let plot = plot_data("ln(x)", Bounds::new(-2.0, -1.0), 4);
        assert_eq!(plot.finite_y_range(), None);
    }
}
