#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// let input = "x^2.3 * log(x + 1)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D("x");
/// println!("{}, Rust function: {}  \n", input, parsed_function(1.0));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree of a function of one variable
/// 2) builds trees with operators `+ - * /` and unary `-`
/// 3) prints a symbolic expression for logs and reports
///# Example#
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// let input = "exp(x) + log(x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // return vec of all arguments
/// let all = parsed_expression.all_arguments_are_variables();
/// assert_eq!(all, vec!["x"]);
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x");
/// println!("df_dx = {}", df_dx);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
///________________________________________________________________________________________________________________________________________________
/// compile an expression into a closure and evaluate it on vectors
/// Example#
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
/// use nalgebra::DVector;
/// let f = Expr::parse_expression("sin(x)").unwrap();
/// let evaluator = Evaluator::compile(&f, "x").unwrap();
/// let y = evaluator.evaluate(&DVector::from_vec(vec![0.0, 1.0]));
/// assert_eq!(y[0], 0.0);
/// ```
pub mod symbolic_lambdify;
///________________________________________________________________________________________________________________________________________________
/// closed-form (best-effort) integration
/// Example#
/// ```
/// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*exp(x)").unwrap();
/// let exact = f.definite_integral("x", 0.0, 1.0);
/// assert!((exact.value().unwrap() - 1.0).abs() < 1e-12);
/// ```
pub mod symbolic_integration;
/// constant folding and algebraic identities for generated expressions
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and error positions
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
