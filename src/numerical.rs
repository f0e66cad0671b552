//! # Numerical integration
//!
//! Trapezoidal rule on a uniform grid, samples for charts, the report of one request and the
//! pipeline running all stages.
//!
/// Example#1
/// ```
/// use RustedTrapezoid::numerical::pipeline::{IntegrationRequest, present};
/// // integrate sin(x) on [0, pi] with 10 trapezoids
/// let presentation = present(&IntegrationRequest::default());
/// println!("{}", presentation);
/// assert!(!presentation.is_error());
/// ```
/// Example#2
/// ```
/// use RustedTrapezoid::numerical::trapezoid::{Bounds, trapezoidal_rule};
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
/// // the bare rule: parse, compile, integrate
/// let expr = Expr::parse_expression("x^2").unwrap();
/// let f = Evaluator::compile(&expr, "x").unwrap();
/// let solution = trapezoidal_rule(&f, Bounds::new(0.0, 3.0), 30);
/// assert!((solution.integral - 9.005).abs() < 1e-10);
/// ```
pub mod trapezoid;
/// dense curve and trapezoid vertices for charts
pub mod sampler;
/// numerical and exact values, text of the results block
pub mod report;
/// parse -> compile -> integrate -> sample -> report
pub mod pipeline;
