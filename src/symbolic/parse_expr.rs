//! turns a String expression into a symbolic expression
//!
//! Grammar, lowest to highest precedence:
//! ```text
//!  expression := term (("+" | "-") term)*
//!  term       := unary (("*" | "/") unary)*
//!  unary      := ("-" | "+") unary | power
//!  power      := atom (("^" | "**") unary)?          right associative
//!  atom       := number | "(" expression ")" | name "(" expression ")" | name
//! ```
//! `pi` and `E` are folded into constants, `sqrt(u)` becomes `u^0.5`.
//!
//! # Example
//! ```
//! use RustedTrapezoid::symbolic::parse_expr::parse_expression_func;
//! use RustedTrapezoid::symbolic::symbolic_engine::Expr;
//! let expr = parse_expression_func("x^2 + sin(x)").unwrap();
//! assert_eq!(
//!     expr,
//!     Expr::Var("x".to_string()).pow(Expr::Const(2.0))
//!         + Expr::sin(Box::new(Expr::Var("x".to_string())))
//! );
//! assert!(parse_expression_func("sin(x").is_err());
//! ```
use crate::error::PipelineError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{BracketIssue, check_brackets, excerpt, position_of_suffix};
use itertools::Itertools;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{map_res, not, opt, recognize, value},
    error::{ErrorKind, FromExternalError, ParseError},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// deepest chain of brackets, signs and exponents the parser follows
pub const MAX_NESTING: usize = 128;
/// deepest expression tree handed to the evaluator and the exact integrator
pub const MAX_TREE_DEPTH: usize = 256;

/// Elementary functions of one argument known to the parser, with their accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, EnumString, Display, EnumIter)]
pub enum ElementaryFunction {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Arcsin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Arccos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    Arctan,
    #[strum(to_string = "acot", serialize = "arccot", serialize = "arcctg")]
    Arccot,
    #[strum(to_string = "exp")]
    Exp,
    #[strum(to_string = "log", serialize = "ln")]
    Ln,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "abs", serialize = "Abs")]
    Abs,
}

impl ElementaryFunction {
    /// Builds the expression node of this function applied to `arg`.
    pub fn apply(self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            ElementaryFunction::Sin => Expr::sin(arg),
            ElementaryFunction::Cos => Expr::cos(arg),
            ElementaryFunction::Tan => Expr::tg(arg),
            ElementaryFunction::Cot => Expr::ctg(arg),
            ElementaryFunction::Arcsin => Expr::arcsin(arg),
            ElementaryFunction::Arccos => Expr::arccos(arg),
            ElementaryFunction::Arctan => Expr::arctg(arg),
            ElementaryFunction::Arccot => Expr::arcctg(arg),
            ElementaryFunction::Exp => Expr::Exp(arg),
            ElementaryFunction::Ln => Expr::Ln(arg),
            ElementaryFunction::Sqrt => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
            ElementaryFunction::Abs => Expr::abs(arg),
        }
    }

    fn supported_names() -> String {
        ElementaryFunction::iter().map(|f| f.to_string()).join(", ")
    }
}

/// What went wrong at a given place of the input.
#[derive(Debug, Clone, PartialEq)]
enum ExprErrorKind {
    Nom(ErrorKind),
    UnknownFunction(String),
    MissingArgument(String),
    TooDeep,
}

/// nom error carrying the position (as the remaining input) and a domain-specific cause
#[derive(Debug, Clone, PartialEq)]
struct ExprParseError<'a> {
    input: &'a str,
    kind: ExprErrorKind,
}

impl<'a> ExprParseError<'a> {
    fn new(input: &'a str, kind: ExprErrorKind) -> Self {
        Self { input, kind }
    }
}

impl<'a> ParseError<&'a str> for ExprParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, ExprErrorKind::Nom(kind))
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for ExprParseError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        Self::new(input, ExprErrorKind::Nom(kind))
    }
}

type Res<'a, O> = IResult<&'a str, O, ExprParseError<'a>>;

fn sp(input: &str) -> Res<'_, &str> {
    multispace0(input)
}

/// wraps a parser so that surrounding whitespace is ignored
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = ExprParseError<'a>>
where
    F: Parser<&'a str, Output = O, Error = ExprParseError<'a>>,
{
    delimited(sp, inner, sp)
}

/// identifiers: a letter or '_' followed by letters, digits or '_'
fn identifier(input: &str) -> Res<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// unsigned decimal literal: `2`, `2.`, `2.5`, `.5`, optionally followed by an exponent `e-3`
fn number(input: &str) -> Res<'_, Expr> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = recognize(pair(one_of("eE"), pair(opt(one_of("+-")), digit1)));
    map_res(recognize(pair(mantissa, opt(exponent))), |s: &str| {
        s.parse::<f64>().map(Expr::Const)
    })
    .parse(input)
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Const(c) => Expr::Const(-c),
        other => -other,
    }
}

fn expression(input: &str, depth: usize) -> Res<'_, Expr> {
    let (input, first) = term(input, depth)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), |i| term(i, depth))).parse(input)?;
    check_chain_length(input, rest.len())?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

fn term(input: &str, depth: usize) -> Res<'_, Expr> {
    let (input, first) = unary(input, depth)?;
    // a single '*' only, '**' belongs to the power rule
    let operator = ws(alt((
        value('*', terminated(char('*'), not(char('*')))),
        value('/', char('/')),
    )));
    let (input, rest) = many0(pair(operator, |i| unary(i, depth))).parse(input)?;
    check_chain_length(input, rest.len())?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

/// every sign, exponent and bracket goes one level deeper
fn deeper(input: &str, depth: usize) -> Result<usize, nom::Err<ExprParseError<'_>>> {
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(ExprParseError::new(
            input,
            ExprErrorKind::TooDeep,
        )));
    }
    Ok(depth + 1)
}

/// a chain `a + b + ...` folds into a tree as deep as it is long
fn check_chain_length(input: &str, length: usize) -> Result<(), nom::Err<ExprParseError<'_>>> {
    if length >= MAX_TREE_DEPTH {
        return Err(nom::Err::Failure(ExprParseError::new(
            input,
            ExprErrorKind::TooDeep,
        )));
    }
    Ok(())
}

fn unary(input: &str, depth: usize) -> Res<'_, Expr> {
    let (input, _) = sp(input)?;
    if let Ok((rest, _)) = char::<&str, ExprParseError>('-').parse(input) {
        let (rest, operand) = unary(rest, deeper(input, depth)?)?;
        return Ok((rest, negate(operand)));
    }
    if let Ok((rest, _)) = char::<&str, ExprParseError>('+').parse(input) {
        return unary(rest, deeper(input, depth)?);
    }
    power(input, depth)
}

fn power(input: &str, depth: usize) -> Res<'_, Expr> {
    let (input, base) = atom(input, depth)?;
    let (rest, operator) = opt(ws(alt((tag("**"), tag("^"))))).parse(input)?;
    if operator.is_none() {
        return Ok((input, base));
    }
    // a dangling operator is left for the caller to report
    match unary(rest, deeper(input, depth)?) {
        Ok((rest, exponent)) => Ok((rest, base.pow(exponent))),
        Err(nom::Err::Error(_)) => Ok((input, base)),
        Err(e) => Err(e),
    }
}

fn atom(input: &str, depth: usize) -> Res<'_, Expr> {
    let (input, _) = sp(input)?;
    alt((
        number,
        |i| parenthesized(i, depth),
        |i| function_or_symbol(i, depth),
    ))
    .parse(input)
}

fn parenthesized(input: &str, depth: usize) -> Res<'_, Expr> {
    let depth = deeper(input, depth)?;
    delimited(char('('), |i| expression(i, depth), ws(char(')'))).parse(input)
}

fn function_or_symbol(input: &str, depth: usize) -> Res<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (after_space, _) = sp(rest)?;
    let known = ElementaryFunction::from_str(name);
    if after_space.starts_with('(') {
        let function = known.map_err(|_| {
            nom::Err::Failure(ExprParseError::new(
                input,
                ExprErrorKind::UnknownFunction(name.to_string()),
            ))
        })?;
        let (rest, arg) = parenthesized(after_space, depth)?;
        return Ok((rest, function.apply(arg)));
    }
    if known.is_ok() {
        return Err(nom::Err::Failure(ExprParseError::new(
            input,
            ExprErrorKind::MissingArgument(name.to_string()),
        )));
    }
    let expr = match name {
        "pi" => Expr::Const(PI),
        "E" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

/// human-readable cause for input left over after the longest valid prefix
fn describe_leftover(input: &str, rest: &str) -> String {
    let rest = rest.trim_start();
    let pos = position_of_suffix(input, rest);
    if rest.is_empty() {
        return "unexpected end of expression".to_string();
    }
    let operator: String = rest.chars().take_while(|c| "+-*/^".contains(*c)).collect();
    if !operator.is_empty() && rest[operator.len()..].trim().is_empty() {
        return format!("missing operand after '{}' at position {}", operator, pos);
    }
    format!("unexpected input at position {}: '{}'", pos, excerpt(rest))
}

fn describe_error(input: &str, err: &ExprParseError) -> String {
    let pos = position_of_suffix(input, err.input);
    match &err.kind {
        ExprErrorKind::UnknownFunction(name) => format!(
            "unknown function '{}' at position {}, supported functions: {}",
            name,
            pos,
            ElementaryFunction::supported_names()
        ),
        ExprErrorKind::MissingArgument(name) => format!(
            "function '{}' at position {} needs an argument in brackets",
            name, pos
        ),
        ExprErrorKind::TooDeep => format!(
            "expression nested too deeply at position {} (at most {} levels of brackets, signs \
             and powers, and {} operands in a row)",
            pos, MAX_NESTING, MAX_TREE_DEPTH
        ),
        ExprErrorKind::Nom(_) => describe_leftover(input, err.input),
    }
}

/// Parses `input` into an expression. The whole input must be consumed.
pub fn parse_expression_func(input: &str) -> Result<Expr, PipelineError> {
    let fail = |cause: String| PipelineError::Parse {
        input: input.to_string(),
        cause,
    };
    if input.trim().is_empty() {
        return Err(fail("empty expression".to_string()));
    }
    match check_brackets(input) {
        Err(BracketIssue::Unclosed(pos)) => {
            return Err(fail(format!("bracket at position {} is never closed", pos)));
        }
        Err(BracketIssue::UnexpectedClosing(pos)) => {
            return Err(fail(format!(
                "closing bracket at position {} has no opening pair",
                pos
            )));
        }
        Ok(()) => {}
    }
    match expression(input, 0) {
        Ok((rest, expr)) if rest.trim().is_empty() => {
            if expr.depth() > MAX_TREE_DEPTH {
                return Err(fail(format!(
                    "expression nested too deeply: {} levels, at most {}",
                    expr.depth(),
                    MAX_TREE_DEPTH
                )));
            }
            Ok(expr)
        }
        Ok((rest, _)) => Err(fail(describe_leftover(input, rest))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(fail(describe_error(input, &e))),
        Err(nom::Err::Incomplete(_)) => Err(fail("unexpected end of expression".to_string())),
    }
}

impl Expr {
    /// Parses a mathematical expression from its string representation.
    ///
    /// # Examples
    /// ```
    /// use RustedTrapezoid::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("x**2 - 2*x + 1").unwrap();
    /// assert_eq!(expr.all_arguments_are_variables(), vec!["x"]);
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, PipelineError> {
        let parsed = parse_expression_func(input);
        match &parsed {
            Ok(expr) => debug!("parsed '{}' into {}", input, expr),
            Err(err) => debug!("{}", err),
        }
        parsed
    }
}
