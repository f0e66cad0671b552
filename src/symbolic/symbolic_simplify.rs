//! # Symbolic Expression Simplification Module
//!
//! Light algebraic clean-up for generated expressions (antiderivatives, derivatives):
//!
//! 1. **Constant Folding**: arithmetic on numerical constants is evaluated
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x * 0 = 0, x ^ 1 = x, x ^ 0 = 1
//! 3. **Sign Handling**: (-1) * (-1) * x = x, a - (-1) * b = a + b
//!
//! Functions of constant arguments are folded too, so `sin(0)` becomes `0`.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_engine_derivatives::real_pow;

const MAX_PASSES: usize = 50;

impl Expr {
    /// Simplifies the expression bottom-up until nothing changes.
    ///
    /// # Examples
    /// ```
    /// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
    /// let x = Expr::Var("x".to_string());
    /// let expr = (Expr::Const(2.0) * Expr::Const(3.0)) * x.clone() + Expr::Const(0.0);
    /// assert_eq!(expr.simplify_(), Expr::Const(6.0) * x);
    /// ```
    pub fn simplify_(&self) -> Expr {
        let mut current = self.clone();
        // NaN constants never compare equal, so the number of passes is capped
        for _ in 0..MAX_PASSES {
            let next = current.simplify_once();
            if next == current {
                return next;
            }
            current = next;
        }
        current
    }

    fn simplify_once(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                (l, r) if l.is_zero() => r,
                (l, r) if r.is_zero() => l,
                (l, Expr::Const(b)) if b < 0.0 => l - Expr::Const(-b),
                (l, r) => match negated(&r) {
                    Some(positive) => l - positive,
                    None => l + r,
                },
            },
            Expr::Sub(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                (l, r) if r.is_zero() => l,
                (l, r) if l.is_zero() => -r,
                (l, r) if l == r => Expr::Const(0.0),
                (l, r) => match negated(&r) {
                    Some(positive) => l + positive,
                    None => l - r,
                },
            },
            Expr::Mul(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                (l, r) if l.is_zero() || r.is_zero() => Expr::Const(0.0),
                (Expr::Const(a), r) if a == 1.0 => r,
                (l, Expr::Const(b)) if b == 1.0 => l,
                // constants to the left
                (l, Expr::Const(b)) => Expr::Const(b) * l,
                (Expr::Const(a), Expr::Mul(inner_l, inner_r)) => match *inner_l {
                    Expr::Const(b) => Expr::Const(a * b) * *inner_r,
                    other => Expr::Const(a) * (other * *inner_r),
                },
                (l, r) => l * r,
            },
            Expr::Div(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Expr::Const(a), Expr::Const(b)) if b != 0.0 => Expr::Const(a / b),
                (l, r) if l.is_zero() && !r.is_zero() => Expr::Const(0.0),
                (l, Expr::Const(b)) if b == 1.0 => l,
                (l, r) => l / r,
            },
            Expr::Pow(base, exp) => match (base.simplify_once(), exp.simplify_once()) {
                (Expr::Const(a), Expr::Const(b)) if real_pow(a, b).is_finite() => {
                    Expr::Const(real_pow(a, b))
                }
                (_, Expr::Const(b)) if b == 0.0 => Expr::Const(1.0),
                (l, Expr::Const(b)) if b == 1.0 => l,
                (l, r) => l.pow(r),
            },
            other => {
                // a function node: fold when its argument is constant
                let rebuilt = other.map_argument(|arg| arg.simplify_once());
                match rebuilt.function_argument() {
                    Some(Expr::Const(_)) => match rebuilt.eval_constant() {
                        Ok(value) if value.is_finite() => Expr::Const(value),
                        _ => rebuilt,
                    },
                    _ => rebuilt,
                }
            }
        }
    }

    /// Applies `f` to the argument of a function node, other nodes are returned unchanged.
    pub fn map_argument(&self, f: impl Fn(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Exp(arg) => Expr::Exp(f(arg).boxed()),
            Expr::Ln(arg) => Expr::Ln(f(arg).boxed()),
            Expr::sin(arg) => Expr::sin(f(arg).boxed()),
            Expr::cos(arg) => Expr::cos(f(arg).boxed()),
            Expr::tg(arg) => Expr::tg(f(arg).boxed()),
            Expr::ctg(arg) => Expr::ctg(f(arg).boxed()),
            Expr::arcsin(arg) => Expr::arcsin(f(arg).boxed()),
            Expr::arccos(arg) => Expr::arccos(f(arg).boxed()),
            Expr::arctg(arg) => Expr::arctg(f(arg).boxed()),
            Expr::arcctg(arg) => Expr::arcctg(f(arg).boxed()),
            Expr::abs(arg) => Expr::abs(f(arg).boxed()),
            other => other.clone(),
        }
    }
}

/// `(-1) * e` or `(-c) * e` written as the positive part, if the expression has that shape
fn negated(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Mul(lhs, rhs) => match **lhs {
            Expr::Const(c) if c == -1.0 => Some(*rhs.clone()),
            Expr::Const(c) if c < 0.0 => Some(Expr::Const(-c) * *rhs.clone()),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_constant_folding() {
        let expr = (Expr::Const(2.0) + Expr::Const(3.0)) * Expr::Const(4.0);
        assert_eq!(expr.simplify_(), Expr::Const(20.0));
        let expr = Expr::Const(2.0).pow(Expr::Const(10.0));
        assert_eq!(expr.simplify_(), Expr::Const(1024.0));
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() * Expr::Const(1.0)).simplify_(), x());
        assert_eq!((x() + Expr::Const(0.0)).simplify_(), x());
        assert_eq!((Expr::Const(0.0) * x()).simplify_(), Expr::Const(0.0));
        assert_eq!(x().pow(Expr::Const(1.0)).simplify_(), x());
        assert_eq!((x() - x()).simplify_(), Expr::Const(0.0));
        assert_eq!((x() / Expr::Const(1.0)).simplify_(), x());
    }

    #[test]
    fn test_signs() {
        let expr = -(-x());
        assert_eq!(expr.simplify_(), x());
        let expr = x() - (-Expr::sin(x().boxed()));
        assert_eq!(expr.simplify_(), x() + Expr::sin(x().boxed()));
        let expr = x() + Expr::Const(-2.0) * Expr::cos(x().boxed());
        assert_eq!(
            expr.simplify_(),
            x() - Expr::Const(2.0) * Expr::cos(x().boxed())
        );
    }

    #[test]
    fn test_constants_move_left() {
        let expr = x() * Expr::Const(3.0);
        assert_eq!(expr.simplify_(), Expr::Const(3.0) * x());
    }

    #[test]
    fn test_function_of_constant_is_folded() {
        let expr = Expr::sin(Box::new(Expr::Const(0.0))) + x();
        assert_eq!(expr.simplify_(), x());
        // ln(0) is not finite and stays symbolic
        let expr = Expr::Ln(Box::new(Expr::Const(0.0)));
        assert_eq!(expr.simplify_(), expr);
    }
}
