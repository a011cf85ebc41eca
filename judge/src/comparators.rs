//! The comparator registry: pure `(actual, expected) -> bool` equivalence checks, selected by
//! name from the exercise specification.
//!
//! The registry used to be a string-keyed map of function pointers; it is re-architected here as a
//! closed tagged variant so that selecting an unknown comparator fails once, at parse time, rather
//! than being re-checked on every test case.
//!

use crate::{Error, ErrorKind, Result};
use crate::types::IoBlock;

/// Default rounding precision used by the `float` comparator when none is specified.
pub const DEFAULT_FLOAT_PRECISION: i32 = 8;

const STRIP_CHARS: &[char] = &[' ', '\t'];

/// A comparator policy, parsed once from an exercise specification's `judge` field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Comparator {
    /// Byte-identical comparison: every line, and the line count, must match exactly.
    Identical,

    /// Tolerates leading/trailing ASCII space and tab on every line; otherwise identical.
    Default,

    /// Tokenizes each line on whitespace and compares tokens as decimal numbers rounded to
    /// `precision` fractional digits.
    Float { precision: i32 },
}

impl Comparator {
    /// Resolve a comparator by its registered name. Unknown names are a `ConfigurationError`.
    pub fn parse(name: &str) -> Result<Comparator> {
        match name {
            "identical" => Ok(Comparator::Identical),
            "default" => Ok(Comparator::Default),
            "float" => Ok(Comparator::Float { precision: DEFAULT_FLOAT_PRECISION }),
            other => Err(Error::from(ErrorKind::ConfigurationError(format!(
                "unknown comparator: \"{}\"",
                other
            )))),
        }
    }

    /// Construct the `float` comparator with an explicit rounding precision.
    pub fn float(precision: i32) -> Comparator {
        Comparator::Float { precision }
    }

    /// The registered name of this comparator, as accepted by `parse`.
    pub fn name(self) -> &'static str {
        match self {
            Comparator::Identical => "identical",
            Comparator::Default => "default",
            Comparator::Float { .. } => "float",
        }
    }

    /// Evaluate this comparator's equivalence relation between the judgee's actual output and the
    /// test case's expected output. Pure: never observes or mutates any state beyond its
    /// arguments.
    pub fn evaluate(self, actual: &IoBlock, expected: &IoBlock) -> bool {
        match self {
            Comparator::Identical => identical(actual, expected),
            Comparator::Default => default(actual, expected),
            Comparator::Float { precision } => float(actual, expected, precision),
        }
    }
}

fn identical(actual: &IoBlock, expected: &IoBlock) -> bool {
    actual.len() == expected.len() && actual.iter().eq(expected.iter())
}

fn default(actual: &IoBlock, expected: &IoBlock) -> bool {
    if actual.len() != expected.len() {
        return false;
    }

    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.trim_matches(STRIP_CHARS) == e.trim_matches(STRIP_CHARS))
}

fn float(actual: &IoBlock, expected: &IoBlock, precision: i32) -> bool {
    if actual.len() != expected.len() {
        return false;
    }

    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| float_line(a, e, precision))
}

fn float_line(actual: &str, expected: &str, precision: i32) -> bool {
    let actual_tokens: Vec<&str> = actual.split_whitespace().collect();
    let expected_tokens: Vec<&str> = expected.split_whitespace().collect();

    if actual_tokens.len() != expected_tokens.len() {
        return false;
    }

    actual_tokens
        .iter()
        .zip(expected_tokens.iter())
        .all(|(a, e)| float_token(a, e, precision))
}

fn float_token(actual: &str, expected: &str, precision: i32) -> bool {
    let (a, e) = match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(e)) if a.is_finite() && e.is_finite() => (a, e),
        _ => return false,
    };

    round_decimal(a, precision) == round_decimal(e, precision)
}

/// Round `value` to `precision` fractional decimal digits, ties away from zero (`f64::round`'s
/// native behavior, unlike the banker's rounding of some language's built-in `round`).
fn round_decimal(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}
