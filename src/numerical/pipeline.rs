//! # Integration pipeline
//!
//! One request runs every stage from scratch:
//! ```text
//!  function text ─► parse ─► compile ─┬─► trapezoidal rule ─┬─► report
//!                     │               └─► sampler ──────────┤
//!                     └─► exact integral (best effort) ─────┘
//! ```
//! Parse and compile errors abort the request; an unavailable exact integral does not.
use crate::error::PipelineError;
use crate::numerical::report::{IntegrationReport, IntegrationResult, Presentation};
use crate::numerical::sampler::PlotData;
use crate::numerical::trapezoid::{Bounds, trapezoidal_rule};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Evaluator;
use log::{info, warn};
use std::f64::consts::PI;

pub const DEFAULT_FUNCTION: &str = "sin(x)";
pub const DEFAULT_VARIABLE: &str = "x";
pub const DEFAULT_LOWER: f64 = 0.0;
pub const DEFAULT_UPPER: f64 = PI;
pub const DEFAULT_INTERVALS: usize = 10;

/// Inputs of one integration request.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationRequest {
    pub function: String,
    pub variable: String,
    pub bounds: Bounds,
    /// number of sub-intervals, at least 1
    pub intervals: usize,
}

impl Default for IntegrationRequest {
    fn default() -> Self {
        IntegrationRequest {
            function: DEFAULT_FUNCTION.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            bounds: Bounds::new(DEFAULT_LOWER, DEFAULT_UPPER),
            intervals: DEFAULT_INTERVALS,
        }
    }
}

impl IntegrationRequest {
    pub fn new(function: &str, lower: f64, upper: f64, intervals: usize) -> Self {
        IntegrationRequest {
            function: function.to_string(),
            bounds: Bounds::new(lower, upper),
            intervals,
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }
}

/// Runs the whole pipeline for one request.
///
/// # Examples
/// ```
/// use RustedTrapezoid::numerical::pipeline::{IntegrationRequest, run};
/// let report = run(&IntegrationRequest::new("x", 0.0, 1.0, 10)).unwrap();
/// assert!((report.result.numerical_value - 0.5).abs() < 1e-12);
/// assert_eq!(report.result.exact_value(), Some(0.5));
/// assert!(run(&IntegrationRequest::new("sin(x", 0.0, 1.0, 10)).is_err());
/// ```
pub fn run(request: &IntegrationRequest) -> Result<IntegrationReport, PipelineError> {
    info!(
        "integrating {} d{} on [{}, {}] with {} sub-intervals",
        request.function,
        request.variable,
        request.bounds.lower,
        request.bounds.upper,
        request.intervals
    );
    let expr = Expr::parse_expression(&request.function)?;
    let evaluator = Evaluator::compile(&expr, &request.variable)?;

    let solution = trapezoidal_rule(&evaluator, request.bounds, request.intervals);
    let plot = PlotData::sample(&evaluator, request.bounds, &solution);
    let exact = expr.definite_integral(
        &request.variable,
        request.bounds.lower,
        request.bounds.upper,
    );
    let result = IntegrationResult::new(solution.integral, exact);

    let report = IntegrationReport {
        function: request.function.clone(),
        variable: request.variable.clone(),
        bounds: request.bounds,
        intervals: request.intervals,
        h: solution.h,
        result,
        plot,
    };
    info!("\n{}", report.summary_table());
    Ok(report)
}

/// The single error boundary: full results, or only the error message.
pub fn present(request: &IntegrationRequest) -> Presentation {
    let outcome = run(request);
    if let Err(e) = &outcome {
        warn!("request failed: {}", e);
    }
    Presentation::from_outcome(outcome)
}
