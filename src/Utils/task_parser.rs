/// parse task document with structure like
/// ```text
/// integration
/// function: sin(x) + x^2
/// lower: 0
/// upper: pi
/// output
/// plot: chart.png
/// ```
/// i.e. titles on their own line followed by `key: value` lines, into
/// HashMap<String, HashMap<String, String>>. A value runs to the end of its line, so expressions
/// with spaces need no quoting. Lines starting with //, #, % or ; are comments.
use crate::error::TaskError;
use crate::numerical::pipeline::IntegrationRequest;
use crate::numerical::trapezoid::Bounds;
use crate::symbolic::symbolic_engine::Expr;
use crate::Utils::logger::parse_loglevel;
use log::{debug, info, warn};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, line_ending, not_line_ending, space0},
    combinator::{eof, map, recognize},
    multi::{many0, many1},
    sequence::{delimited, pair, terminated},
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub type SectionMap = HashMap<String, String>;
pub type DocumentMap = HashMap<String, SectionMap>;

pub const INTEGRATION_SECTION: &str = "integration";
pub const OUTPUT_SECTION: &str = "output";
/// largest accepted number of sub-intervals
pub const MAX_INTERVALS: usize = 100;

const INTEGRATION_KEYS: [&str; 5] = ["function", "variable", "lower", "upper", "intervals"];
const OUTPUT_KEYS: [&str; 4] = ["plot", "csv", "loglevel", "logfile"];

/// Parses a name: letter or underscore, then letters, digits, underscores
fn parse_name(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Parses a title line: a bare name and nothing else on the line
pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    terminated(parse_name, (space0, alt((line_ending, eof)))).parse(input)
}

/// Parses `key: value` up to the end of the line
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, String)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let (input, (key, _, value, _)) = (
        parse_name,
        colon_separator,
        not_line_ending,
        alt((line_ending, eof)),
    )
        .parse(input)?;
    Ok((input, (key, value.trim().to_string())))
}

/// Parses a title followed by its key-value lines
pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_title(input)?;
    let (input, pairs) = many0(parse_key_value_pair).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Drops comment and blank lines and trims the rest
pub(crate) fn filter_comments(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("//")
                && !line.starts_with('#')
                && !line.starts_with('%')
                && !line.starts_with(';')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap. Sections appearing twice are merged,
/// later keys win.
pub fn parse_document(input: &str) -> Result<DocumentMap, TaskError> {
    let filtered = filter_comments(input);
    if filtered.is_empty() {
        return Ok(DocumentMap::new());
    }
    let (remaining, sections) = many1(parse_section)
        .parse(filtered.as_str())
        .map_err(|e| {
            TaskError::Syntax(format!("cannot parse '{}': {:?}", first_line(&filtered), e))
        })?;
    if !remaining.trim().is_empty() {
        return Err(TaskError::Syntax(format!(
            "unexpected line '{}', expected a section title or 'key: value'",
            first_line(remaining)
        )));
    }
    let mut document = DocumentMap::new();
    for (title, section) in sections {
        document.entry(title).or_default().extend(section);
    }
    debug!("task document parsed: {:?}", document);
    Ok(document)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// Evaluates a bound given as a constant expression (`1.5`, `pi`, `-pi/2`, `E^2`).
pub fn parse_bound(key: &str, text: &str) -> Result<f64, TaskError> {
    let invalid = |reason: String| TaskError::InvalidValue {
        key: key.to_string(),
        reason,
    };
    let expr = Expr::parse_expression(text).map_err(|e| invalid(e.to_string()))?;
    let value = expr.eval_constant().map_err(invalid)?;
    if !value.is_finite() {
        return Err(invalid(format!("'{}' is not a finite number", text)));
    }
    Ok(value)
}

pub fn parse_intervals(text: &str) -> Result<usize, TaskError> {
    let n = text
        .trim()
        .parse::<usize>()
        .map_err(|e| TaskError::InvalidValue {
            key: "intervals".to_string(),
            reason: format!("'{}' is not a positive integer: {}", text, e),
        })?;
    check_intervals(n)?;
    Ok(n)
}

pub fn check_intervals(n: usize) -> Result<(), TaskError> {
    if (1..=MAX_INTERVALS).contains(&n) {
        Ok(())
    } else {
        Err(TaskError::InvalidValue {
            key: "intervals".to_string(),
            reason: format!("{} is outside 1..={}", n, MAX_INTERVALS),
        })
    }
}

/// where results go besides the terminal
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub plot: Option<String>,
    pub csv: Option<String>,
    pub loglevel: String,
    pub logfile: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            plot: None,
            csv: None,
            loglevel: "info".to_string(),
            logfile: None,
        }
    }
}

/// A complete task: the integration request plus output options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskConfig {
    pub request: IntegrationRequest,
    pub output: OutputOptions,
}

impl TaskConfig {
    /// Builds a task from a parsed document on top of the defaults. The `integration` section
    /// and its `function` key are required, everything else is optional.
    pub fn from_document(document: &DocumentMap) -> Result<TaskConfig, TaskError> {
        for (title, section) in document {
            let known: &[&str] = match title.as_str() {
                INTEGRATION_SECTION => &INTEGRATION_KEYS,
                OUTPUT_SECTION => &OUTPUT_KEYS,
                _ => {
                    warn!("unknown section '{}' ignored", title);
                    continue;
                }
            };
            for key in section.keys().filter(|key| !known.contains(&key.as_str())) {
                warn!("unknown key '{}' in section '{}' ignored", key, title);
            }
        }

        let integration = document
            .get(INTEGRATION_SECTION)
            .ok_or_else(|| TaskError::MissingKey {
                section: INTEGRATION_SECTION.to_string(),
                key: "function".to_string(),
            })?;
        let value = |section: &SectionMap, key: &str| -> Option<String> {
            section.get(key).filter(|v| !v.is_empty()).cloned()
        };

        let mut config = TaskConfig::default();
        config.request.function =
            value(integration, "function").ok_or_else(|| TaskError::MissingKey {
                section: INTEGRATION_SECTION.to_string(),
                key: "function".to_string(),
            })?;
        if let Some(variable) = value(integration, "variable") {
            config.request.variable = variable;
        }
        let lower = match value(integration, "lower") {
            Some(text) => parse_bound("lower", &text)?,
            None => config.request.bounds.lower,
        };
        let upper = match value(integration, "upper") {
            Some(text) => parse_bound("upper", &text)?,
            None => config.request.bounds.upper,
        };
        config.request.bounds = Bounds::new(lower, upper);
        if let Some(text) = value(integration, "intervals") {
            config.request.intervals = parse_intervals(&text)?;
        }

        if let Some(output) = document.get(OUTPUT_SECTION) {
            config.output.plot = value(output, "plot");
            config.output.csv = value(output, "csv");
            config.output.logfile = value(output, "logfile");
            if let Some(level) = value(output, "loglevel") {
                config.output.loglevel = level;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn parse_task(input: &str) -> Result<TaskConfig, TaskError> {
        TaskConfig::from_document(&parse_document(input)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TaskConfig, TaskError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TaskError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("task loaded from {}", path.display());
        TaskConfig::parse_task(&content)
    }

    /// Checks what the core relies on: finite bounds, `1 <= n <= 100`, a usable variable
    /// name and a known loglevel.
    pub fn validate(&self) -> Result<(), TaskError> {
        let request = &self.request;
        for (key, bound) in [("lower", request.bounds.lower), ("upper", request.bounds.upper)] {
            if !bound.is_finite() {
                return Err(TaskError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("{} is not a finite number", bound),
                });
            }
        }
        check_intervals(request.intervals)?;
        match parse_name(&request.variable) {
            Ok(("", _)) => {}
            _ => {
                return Err(TaskError::InvalidValue {
                    key: "variable".to_string(),
                    reason: format!("'{}' is not a valid name", request.variable),
                });
            }
        }
        parse_loglevel(&self.output.loglevel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("integration\nfunction: x").unwrap();
        assert_eq!(title, "integration");
        assert_eq!(remaining, "function: x");

        let (remaining, title) = parse_title("output  ").unwrap();
        assert_eq!(title, "output");
        assert_eq!(remaining, "");

        assert!(parse_title("function: x").is_err());
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, value)) =
            parse_key_value_pair("function : sin(x) + 2*x \nlower: 0").unwrap();
        assert_eq!(key, "function");
        assert_eq!(value, "sin(x) + 2*x");
        assert_eq!(remaining, "lower: 0");

        let (remaining, (key, value)) = parse_key_value_pair("plot:").unwrap();
        assert_eq!(key, "plot");
        assert_eq!(value, "");
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_section() {
        let (remaining, (title, section)) =
            parse_section("integration\nfunction: x^2\nlower: 1\noutput\nplot: a.png").unwrap();
        assert_eq!(title, "integration");
        assert_eq!(section.len(), 2);
        assert_eq!(section["function"], "x^2");
        assert_eq!(section["lower"], "1");
        assert_eq!(remaining, "output\nplot: a.png");
    }

    #[test]
    fn test_filter_comments() {
        let text = "// header\n  integration\n# note\n\n% matlab style\n;; lisp style\n  function: x";
        assert_eq!(filter_comments(text), "integration\nfunction: x");
    }

    #[test]
    fn test_parse_document() {
        let text = "integration\nfunction: exp(x)\nupper: 2\noutput\ncsv: out.csv\nintegration\nlower: -1";
        let document = parse_document(text).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document["integration"].len(), 3);
        assert_eq!(document["integration"]["lower"], "-1");
        assert_eq!(document["output"]["csv"], "out.csv");
        assert!(parse_document("// only a comment").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            parse_document("integration\nfunction: x\n= 3"),
            Err(TaskError::Syntax(_))
        ));
        assert!(matches!(
            parse_document("function: x"),
            Err(TaskError::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("lower", "1.5").unwrap(), 1.5);
        assert_relative_eq!(parse_bound("upper", "pi").unwrap(), PI);
        assert_relative_eq!(parse_bound("upper", "-pi/2").unwrap(), -PI / 2.0);
        assert!(matches!(
            parse_bound("upper", "x + 1"),
            Err(TaskError::InvalidValue { .. })
        ));
        assert!(parse_bound("upper", "1/0").is_err());
        assert!(parse_bound("upper", "(2").is_err());
    }

    #[test]
    fn test_parse_intervals() {
        assert_eq!(parse_intervals("1").unwrap(), 1);
        assert_eq!(parse_intervals(" 100 ").unwrap(), 100);
        assert!(parse_intervals("0").is_err());
        assert!(parse_intervals("101").is_err());
        assert!(parse_intervals("-3").is_err());
        assert!(parse_intervals("ten").is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(TaskConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TaskConfig::default();
        config.request.bounds = Bounds::new(0.0, f64::INFINITY);
        assert!(config.validate().is_err());

        let mut config = TaskConfig::default();
        config.request.intervals = 0;
        assert!(config.validate().is_err());

        let mut config = TaskConfig::default();
        config.request.variable = "2x".to_string();
        assert!(config.validate().is_err());

        let mut config = TaskConfig::default();
        config.output.loglevel = "chatty".to_string();
        assert!(config.validate().is_err());
    }
}
