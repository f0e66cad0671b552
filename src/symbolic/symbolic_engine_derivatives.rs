//! # Symbolic Engine Derivatives Module
//!
//! Extends [`Expr`] with analytical differentiation and with direct (closure-free) evaluation.
//!
//! ## Key Methods
//! - `diff(var)` - analytical derivative using the product, quotient and chain rules
//! - `eval_expression(var, value)` - one-shot evaluation of a function of one variable
//! - `eval_constant()` - evaluation of an expression without free symbols (bounds like `pi/2`)
//!
//! Direct evaluation walks the tree on every call; use the compiled evaluator from
//! `symbolic_lambdify` when the same expression is evaluated many times.

use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// # Examples
    /// ```
    /// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x
    /// assert_eq!(df_dx.eval_expression("x", 3.0).unwrap(), 6.0);
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => lhs.diff(var) + rhs.diff(var),
            Expr::Sub(lhs, rhs) => lhs.diff(var) - rhs.diff(var),
            Expr::Mul(lhs, rhs) => lhs.diff(var) * *rhs.clone() + *lhs.clone() * rhs.diff(var),
            Expr::Div(lhs, rhs) => {
                (lhs.diff(var) * *rhs.clone() - rhs.diff(var) * *lhs.clone())
                    / (*rhs.clone() * *rhs.clone())
            }
            Expr::Pow(base, exp) => {
                if exp.contains_variable(var) {
                    // d(u^v) = u^v * (v' ln(u) + v u'/u)
                    self.clone()
                        * (exp.diff(var) * base.clone().ln()
                            + *exp.clone() * base.diff(var) / *base.clone())
                } else {
                    *exp.clone() * base.clone().pow(*exp.clone() - Expr::Const(1.0))
                        * base.diff(var)
                }
            }
            Expr::Exp(arg) => Expr::Exp(arg.clone()) * arg.diff(var),
            Expr::Ln(arg) => arg.diff(var) / *arg.clone(),
            Expr::sin(arg) => Expr::cos(arg.clone()) * arg.diff(var),
            Expr::cos(arg) => -Expr::sin(arg.clone()) * arg.diff(var),
            Expr::tg(arg) => arg.diff(var) / squared(&Expr::cos(arg.clone())),
            Expr::ctg(arg) => -arg.diff(var) / squared(&Expr::sin(arg.clone())),
            Expr::arcsin(arg) => {
                arg.diff(var) / (Expr::Const(1.0) - squared(arg)).pow(Expr::Const(0.5))
            }
            Expr::arccos(arg) => {
                -arg.diff(var) / (Expr::Const(1.0) - squared(arg)).pow(Expr::Const(0.5))
            }
            Expr::arctg(arg) => arg.diff(var) / (Expr::Const(1.0) + squared(arg)),
            Expr::arcctg(arg) => -arg.diff(var) / (Expr::Const(1.0) + squared(arg)),
            // d|u| = u'·u/|u|, undefined at u = 0
            Expr::abs(arg) => arg.diff(var) * *arg.clone() / Expr::abs(arg.clone()),
        }
    } // end of diff

    /// Evaluates a function of one variable at `value` without building a closure.
    ///
    /// Returns an error if the expression contains a symbol other than `var`.
    /// Domain errors are not errors here: `ln(-1)` gives NaN, `1/0` gives infinity.
    pub fn eval_expression(&self, var: &str, value: f64) -> Result<f64, String> {
        let res = match self {
            Expr::Var(name) => {
                if name == var {
                    value
                } else {
                    return Err(format!("unknown symbol '{}', expected '{}'", name, var));
                }
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(var, value)? + rhs.eval_expression(var, value)?
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(var, value)? - rhs.eval_expression(var, value)?
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(var, value)? * rhs.eval_expression(var, value)?
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(var, value)? / rhs.eval_expression(var, value)?
            }
            Expr::Pow(base, exp) => {
                real_pow(base.eval_expression(var, value)?, exp.eval_expression(var, value)?)
            }
            Expr::Exp(arg) => arg.eval_expression(var, value)?.exp(),
            Expr::Ln(arg) => arg.eval_expression(var, value)?.ln(),
            Expr::sin(arg) => arg.eval_expression(var, value)?.sin(),
            Expr::cos(arg) => arg.eval_expression(var, value)?.cos(),
            Expr::tg(arg) => arg.eval_expression(var, value)?.tan(),
            Expr::ctg(arg) => 1.0 / arg.eval_expression(var, value)?.tan(),
            Expr::arcsin(arg) => arg.eval_expression(var, value)?.asin(),
            Expr::arccos(arg) => arg.eval_expression(var, value)?.acos(),
            Expr::arctg(arg) => arg.eval_expression(var, value)?.atan(),
            Expr::arcctg(arg) => PI / 2.0 - arg.eval_expression(var, value)?.atan(),
            Expr::abs(arg) => arg.eval_expression(var, value)?.abs(),
        };
        Ok(res)
    } // end of eval_expression

    /// Evaluates an expression that has no free symbols, e.g. `pi/2` or `-E`.
    pub fn eval_constant(&self) -> Result<f64, String> {
        let vars = self.all_arguments_are_variables();
        if !vars.is_empty() {
            return Err(format!(
                "expression '{}' is not constant, it depends on {}",
                self,
                vars.join(", ")
            ));
        }
        // no symbols left, the variable name is never looked up
        self.eval_expression("", 0.0)
    }
}

fn squared(e: &Expr) -> Expr {
    e.clone().pow(Expr::Const(2.0))
}

/// Real power: negative bases with integer exponents keep their sign, as `powi` does;
/// other negative bases give NaN exactly like `powf`.
pub fn real_pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    /// central difference used to check analytical derivatives
    fn numerical_derivative(f: &Expr, at: f64) -> f64 {
        let h = 1e-6;
        (f.eval_expression("x", at + h).unwrap() - f.eval_expression("x", at - h).unwrap())
            / (2.0 * h)
    }

    #[test]
    fn test_diff_polynomial() {
        let f = x().pow(Expr::Const(3.0)) + Expr::Const(2.0) * x();
        let df = f.diff("x");
        assert_relative_eq!(df.eval_expression("x", 2.0).unwrap(), 14.0);
    }

    #[test]
    fn test_diff_matches_numerical_derivative() {
        let functions = vec![
            Expr::sin(x().boxed()) * Expr::Exp(x().boxed()),
            Expr::Ln(Box::new(x().pow(Expr::Const(2.0)) + Expr::Const(1.0))),
            Expr::tg(x().boxed()) / x(),
            Expr::ctg(x().boxed()),
            Expr::arcsin(Box::new(x() / Expr::Const(2.0))),
            Expr::arccos(Box::new(x() / Expr::Const(2.0))),
            Expr::arctg(x().boxed()),
            Expr::arcctg(x().boxed()),
            Expr::abs(Box::new(x() - Expr::Const(3.0))),
            Expr::Const(2.0).pow(x()),
            x().pow(x()),
        ];
        for f in functions {
            let analytical = f.diff("x").eval_expression("x", 0.7).unwrap();
            assert_relative_eq!(analytical, numerical_derivative(&f, 0.7), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_eval_expression_unknown_symbol() {
        let f = x() * Expr::Var("y".to_string());
        assert!(f.eval_expression("x", 1.0).is_err());
    }

    #[test]
    fn test_eval_expression_domain_errors_are_values() {
        assert!(Expr::Ln(x().boxed()).eval_expression("x", -1.0).unwrap().is_nan());
        assert!(
            (Expr::Const(1.0) / x())
                .eval_expression("x", 0.0)
                .unwrap()
                .is_infinite()
        );
    }

    #[test]
    fn test_eval_constant() {
        let expr = Expr::Const(PI) / Expr::Const(2.0);
        assert_relative_eq!(expr.eval_constant().unwrap(), PI / 2.0);
        assert!(x().eval_constant().is_err());
    }

    #[test]
    fn test_real_pow_negative_base() {
        assert_eq!(real_pow(-2.0, 3.0), -8.0);
        assert_eq!(real_pow(-2.0, -1.0), -0.5);
        assert!(real_pow(-2.0, 0.5).is_nan());
        assert_relative_eq!(real_pow(4.0, 0.5), 2.0);
    }
}
