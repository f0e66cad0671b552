//! examples of usage of RustedTrapezoid
/// trapezoidal rule examples: closed forms, missing closed forms, poles, malformed input, charts
pub mod trapezoid_examples;
