//! turns a symbolic expression of one variable into a Rust closure
use crate::error::PipelineError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_engine_derivatives::real_pow;
use log::debug;
use nalgebra::DVector;
use std::f64::consts::PI;
use std::fmt;

/// compiled function of one real variable
pub type Function1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

impl Expr {
    /// Converts the expression into a closure of the variable `var`.
    ///
    /// Every symbol other than `var` is looked up nowhere, so the caller must check the free
    /// symbols first ([`Evaluator::compile`] does).
    ///
    /// # Examples
    /// ```
    /// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D("x");
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Function1D {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Box::new(|x| x)
                } else {
                    Box::new(|_| f64::NAN)
                }
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D(var);
                match **exp {
                    // x^2, x^3 ... are the common case
                    Expr::Const(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                        let n = n as i32;
                        Box::new(move |x| base_fn(x).powi(n))
                    }
                    _ => {
                        let exp_fn = exp.lambdify1D(var);
                        Box::new(move |x| real_pow(base_fn(x), exp_fn(x)))
                    }
                }
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::ctg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| 1.0 / expr_fn(x).tan())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).atan())
            }
            Expr::arcctg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| PI / 2.0 - expr_fn(x).atan())
            }
            Expr::abs(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).abs())
            }
        } // end of match
    } // end of lambdify1D
}

/// Numeric evaluator: an expression compiled once into a closure of its integration variable.
///
/// The same instance feeds the trapezoidal rule and the plot sampler, so the plotted curve and
/// the plotted trapezoids always come from one function.
///
/// # Examples
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
/// use nalgebra::DVector;
/// let expr = Expr::parse_expression("x^2 + 1").unwrap();
/// let f = Evaluator::compile(&expr, "x").unwrap();
/// let y = f.evaluate(&DVector::from_vec(vec![0.0, 1.0, 2.0]));
/// assert_eq!(y.as_slice(), &[1.0, 2.0, 5.0]);
/// ```
pub struct Evaluator {
    expression: Expr,
    variable: String,
    func: Function1D,
}

impl Evaluator {
    /// Compiles `expression` as a function of `variable`. Constant expressions are accepted;
    /// any other free symbol is an error naming the offending symbols.
    pub fn compile(expression: &Expr, variable: &str) -> Result<Evaluator, PipelineError> {
        let extra: Vec<String> = expression
            .all_arguments_are_variables()
            .into_iter()
            .filter(|name| name != variable)
            .collect();
        if !extra.is_empty() {
            return Err(PipelineError::Compile {
                expression: expression.to_string(),
                variable: variable.to_string(),
                cause: format!("unexpected free symbols: {}", extra.join(", ")),
            });
        }
        debug!("compiled {} as a function of {}", expression, variable);
        Ok(Evaluator {
            expression: expression.clone(),
            variable: variable.to_string(),
            func: expression.lambdify1D(variable),
        })
    }

    /// value at a single point
    pub fn call(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    /// Elementwise application: `output[i] = f(input[i])`. NaN and infinities pass through.
    pub fn evaluate(&self, x: &DVector<f64>) -> DVector<f64> {
        x.map(|xi| self.call(xi))
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("expression", &self.expression.to_string())
            .field("variable", &self.variable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn compile(input: &str) -> Evaluator {
        let expr = Expr::parse_expression(input).unwrap();
        Evaluator::compile(&expr, "x").unwrap()
    }

    #[test]
    fn test_lambdify_matches_eval_expression() {
        let expr = Expr::parse_expression(
            "x^2.3 * ln(x + 1) - exp(-x) / (x + 2) + tg(x) - ctg(x) + arcctg(x) + abs(x - 2)",
        )
        .unwrap();
        let f = expr.lambdify1D("x");
        for &x in &[0.1, 0.5, 1.3, 2.7] {
            assert_relative_eq!(
                f(x),
                expr.eval_expression("x", x).unwrap(),
                max_relative = 1e-14
            );
        }
    }

    #[test]
    fn test_cotangent_conventions() {
        let f = compile("ctg(x)");
        assert_relative_eq!(f.call(0.3), 1.0 / 0.3_f64.tan());
        let f = compile("arcctg(x)");
        assert_relative_eq!(f.call(1.0), PI / 4.0);
    }

    #[test]
    fn test_constant_expression_compiles() {
        let f = compile("2*pi");
        let y = f.evaluate(&DVector::from_vec(vec![-1.0, 0.0, 5.0]));
        assert!(y.iter().all(|&v| v == 2.0 * PI));
    }

    #[test]
    fn test_extra_symbols_are_rejected() {
        let expr = Expr::parse_expression("x * y + z").unwrap();
        match Evaluator::compile(&expr, "x") {
            Err(PipelineError::Compile { cause, .. }) => {
                assert_eq!(cause, "unexpected free symbols: y, z")
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_other_variable_name() {
        let expr = Expr::parse_expression("t^2").unwrap();
        let f = Evaluator::compile(&expr, "t").unwrap();
        assert_eq!(f.call(3.0), 9.0);
        assert_eq!(f.variable(), "t");
        assert!(Evaluator::compile(&expr, "x").is_err());
    }

    #[test]
    fn test_evaluate_keeps_length_and_order() {
        let f = compile("1/x");
        let x = DVector::from_vec(vec![-1.0, 0.0, 2.0]);
        let y = f.evaluate(&x);
        assert_eq!(y.len(), 3);
        assert_eq!(y[0], -1.0);
        assert!(y[1].is_infinite());
        assert_eq!(y[2], 0.5);
    }

    #[test]
    fn test_domain_errors_give_nan() {
        let f = compile("ln(x) + sqrt(x)");
        assert!(f.call(-1.0).is_nan());
        let f = compile("x^3");
        assert_eq!(f.call(-2.0), -8.0);
    }
}
