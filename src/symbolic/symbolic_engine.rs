//! # Symbolic Engine Module
//!
//! Core expression tree for the integration pipeline. A parsed function of one variable is held
//! as an immutable [`Expr`]; the other symbolic modules extend it with
//! - numeric compilation (`symbolic_lambdify`)
//! - closed-form integration (`symbolic_integration`)
//! - differentiation and direct evaluation (`symbolic_engine_derivatives`)
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "t"
//! - **Constants**: `Const(f64)` - numerical constants (π and e are folded into constants at parse time)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, ... - elementary functions of one argument
//!
//! ### Key Methods
//! - `contains_variable(var)` - does the tree depend on a variable
//! - `all_arguments_are_variables()` - sorted list of free symbols
//! - `depth()` - number of tree levels, computed without recursion
//!
//! Operator overloading (`+ - * /` and unary `-`) builds trees with natural syntax: `x.clone() * x + c`.
//! Trigonometric variants keep the mathematical notation (tg, ctg, arctg, arcctg).

#![allow(non_camel_case_types)]

use std::fmt;

/// Symbolic expression tree.
///
/// # Examples
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(format!("{}", expr), "(x + 2)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y", "velocity")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Absolute value: |x|
    abs(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
            Expr::abs(expr) => write!(f, "abs({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Number of levels of the tree, a leaf being 1. Walks the tree without recursion, so it
    /// is safe on trees too deep for the recursive methods.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            match node {
                Expr::Var(_) | Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    stack.push((lhs, level + 1));
                    stack.push((rhs, level + 1));
                }
                other => {
                    if let Some(arg) = other.function_argument() {
                        stack.push((arg, level + 1));
                    }
                }
            }
        }
        deepest
    }

    /// Returns the single argument of a function node, `None` for leaves and binary operations.
    pub fn function_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::ctg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg)
            | Expr::arcctg(arg)
            | Expr::abs(arg) => Some(arg),
            _ => None,
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            other => other
                .function_argument()
                .is_some_and(|arg| arg.contains_variable(var_name)),
        }
    }

    /// Extracts all unique variable names from the expression, sorted and deduplicated.
    ///
    /// # Examples
    /// ```
    /// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
    /// let x = Expr::Var("x".to_string());
    /// let y = Expr::Var("y".to_string());
    /// let expr = y * x.clone() + x;
    /// assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y"]);
    /// ```
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            other => {
                if let Some(arg) = other.function_argument() {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_display_nested() {
        let expr = Expr::sin(Box::new(x() * Expr::Const(2.0))) + x().pow(Expr::Const(3.0));
        assert_eq!(format!("{}", expr), "(sin((x * 2)) + (x ^ 3))");
    }

    #[test]
    fn test_neg_is_multiplication_by_minus_one() {
        let expr = -x();
        assert_eq!(
            expr,
            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(Expr::Var("x".to_string())))
        );
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::Exp(Box::new(x() + Expr::Const(1.0)));
        assert!(expr.contains_variable("x"));
        assert!(!expr.contains_variable("y"));
        assert!(!Expr::Const(3.0).contains_variable("x"));
    }

    #[test]
    fn test_all_arguments_are_variables_dedup() {
        let t = Expr::Var("t".to_string());
        let expr = Expr::cos(Box::new(t.clone())) * x() + x() / t;
        assert_eq!(expr.all_arguments_are_variables(), vec!["t", "x"]);
        assert!(Expr::Const(1.0).all_arguments_are_variables().is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(x().depth(), 1);
        let expr = x().pow(Expr::Const(2.0)) + Expr::abs(Box::new(Expr::sin(Box::new(x()))));
        assert_eq!(expr.depth(), 4);
        let chain = (0..1000).fold(x(), |acc, _| acc + x());
        assert_eq!(chain.depth(), 1001);
    }

    #[test]
    fn test_is_zero() {
        assert!(Expr::Const(0.0).is_zero());
        assert!(!Expr::Const(1e-300).is_zero());
        assert!(!x().is_zero());
    }
}
