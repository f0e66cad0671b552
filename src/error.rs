//! error types shared by the integration pipeline, the task loader and the output adapters
use thiserror::Error;

/// Fatal errors of a single integration request. Either one aborts the whole request: no
/// numbers and no chart are produced, only the message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// input text is not a valid expression
    #[error("could not parse '{input}': {cause}")]
    Parse { input: String, cause: String },
    /// expression cannot be turned into a numeric function of the integration variable
    #[error("could not compile '{expression}' as a function of {variable}: {cause}")]
    Compile {
        expression: String,
        variable: String,
        cause: String,
    },
}

/// Errors of loading and validating a task (function text, bounds, sub-interval count, outputs).
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("cannot read task file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed task document: {0}")]
    Syntax(String),
    #[error("missing key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Errors of writing results to disk (csv table, png chart).
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("plotting error: {0}")]
    Plot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = PipelineError::Parse {
            input: "sin(x".to_string(),
            cause: "bracket at position 3 is never closed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not parse 'sin(x': bracket at position 3 is never closed"
        );
    }

    #[test]
    fn test_compile_error_message() {
        let err = PipelineError::Compile {
            expression: "(x * y)".to_string(),
            variable: "x".to_string(),
            cause: "unexpected free symbols: y".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not compile '(x * y)' as a function of x: unexpected free symbols: y"
        );
    }

    #[test]
    fn test_task_error_messages() {
        let err = TaskError::InvalidValue {
            key: "intervals".to_string(),
            reason: "must be between 1 and 100, got 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for 'intervals': must be between 1 and 100, got 0"
        );
        let err = TaskError::MissingKey {
            section: "integration".to_string(),
            key: "function".to_string(),
        };
        assert!(err.to_string().contains("'function'"));
    }
}
