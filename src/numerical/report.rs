//! results of one integration request and their text presentation
use crate::error::PipelineError;
use crate::numerical::sampler::PlotData;
use crate::numerical::trapezoid::Bounds;
use crate::symbolic::symbolic_integration::ExactIntegral;
use std::fmt;
use tabled::{builder::Builder, settings::Style};

pub const UNAVAILABLE_NOTICE: &str = "Could not be calculated symbolically.";

/// Numerical value, exact value when one was found, and their distance.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub numerical_value: f64,
    pub exact: ExactIntegral,
    /// `|exact - numerical|`, only present together with the exact value
    pub absolute_error: Option<f64>,
}

impl IntegrationResult {
    pub fn new(numerical_value: f64, exact: ExactIntegral) -> Self {
        let absolute_error = exact.value().map(|e| (e - numerical_value).abs());
        IntegrationResult {
            numerical_value,
            exact,
            absolute_error,
        }
    }

    pub fn exact_value(&self) -> Option<f64> {
        self.exact.value()
    }
}

/// Everything a successful request produces: inputs echo, numbers and chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationReport {
    /// the function as the user typed it
    pub function: String,
    pub variable: String,
    pub bounds: Bounds,
    pub intervals: usize,
    pub h: f64,
    pub result: IntegrationResult,
    pub plot: PlotData,
}

impl IntegrationReport {
    /// Results block, values with 6 decimals:
    /// ```text
    /// Numerical integral (Trapezoidal Rule): 1.983524
    /// Exact integral: 2.000000
    /// Absolute error: 0.016476
    /// ```
    pub fn results_text(&self) -> String {
        let result = &self.result;
        let mut lines = vec![format!(
            "Numerical integral (Trapezoidal Rule): {:.6}",
            result.numerical_value
        )];
        match (result.exact_value(), result.absolute_error) {
            (Some(exact), Some(error)) => {
                lines.push(format!("Exact integral: {:.6}", exact));
                lines.push(format!("Absolute error: {:.6}", error));
            }
            _ => lines.push(format!("Exact integral: {}", UNAVAILABLE_NOTICE)),
        }
        lines.join("\n")
    }

    /// the inputs and results as a pretty table, for logs
    pub fn summary_table(&self) -> String {
        let result = &self.result;
        let mut rows = vec![
            ("function", self.function.clone()),
            ("variable", self.variable.clone()),
            ("lower bound", self.bounds.lower.to_string()),
            ("upper bound", self.bounds.upper.to_string()),
            ("sub-intervals", self.intervals.to_string()),
            ("step h", self.h.to_string()),
            ("trapezoidal integral", format!("{:.6}", result.numerical_value)),
        ];
        match &result.exact {
            ExactIntegral::Available {
                value,
                antiderivative,
            } => {
                rows.push(("antiderivative", antiderivative.to_string()));
                rows.push(("exact integral", format!("{:.6}", value)));
            }
            ExactIntegral::Unavailable { reason } => {
                rows.push(("exact integral", format!("unavailable ({})", reason)));
            }
        }
        if let Some(error) = result.absolute_error {
            rows.push(("absolute error", format!("{:.6}", error)));
        }
        let mut builder = Builder::default();
        for (key, value) in rows {
            builder.push_record(vec![key.to_string(), value]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// What the user gets for one request: the full results or a single error message, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Results(Box<IntegrationReport>),
    Error(String),
}

impl Presentation {
    pub fn from_outcome(outcome: Result<IntegrationReport, PipelineError>) -> Self {
        match outcome {
            Ok(report) => Presentation::Results(Box::new(report)),
            Err(e) => Presentation::Error(format!("Error: {}", e)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Presentation::Error(_))
    }

    pub fn report(&self) -> Option<&IntegrationReport> {
        match self {
            Presentation::Results(report) => Some(report),
            Presentation::Error(_) => None,
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Presentation::Results(report) => write!(f, "{}", report.results_text()),
            Presentation::Error(message) => write!(f, "{}", message),
        }
    }
}
