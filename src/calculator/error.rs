//! Evaluation errors and the terminal labels shown in their place.
//!
//! Callers never see the detail message of a [`CalcError`], only its
//! [`label`](CalcError::label). The detail is kept for logging.

use thiserror::Error;

pub const SYNTAX_ERROR: &str = "Syntax Error";
pub const TOO_LARGE: &str = "Too Large";
pub const DIV_BY_ZERO: &str = "Div by 0";
pub const OVERFLOW: &str = "Overflow";
pub const TOO_COMPLEX: &str = "Too Complex";
pub const UNDEFINED: &str = "Undefined";
pub const INFINITY: &str = "Infinity";
pub const INPUT_ERROR: &str = "Input Error";
/// Generic failure label used by the finance formulas.
pub const ERROR: &str = "Error";
/// Shown by the quadratic formula when the roots are not real.
pub const COMPLEX_SOLUTION: &str = "Complex Sol";

const TERMINAL_LABELS: &[&str] = &[
    SYNTAX_ERROR,
    TOO_LARGE,
    DIV_BY_ZERO,
    OVERFLOW,
    TOO_COMPLEX,
    UNDEFINED,
    INFINITY,
    INPUT_ERROR,
    ERROR,
    COMPLEX_SOLUTION,
];

/// Check whether a display string is one of the terminal labels rather
/// than a number the user may keep editing.
pub fn is_terminal_label(text: &str) -> bool {
    TERMINAL_LABELS.contains(&text)
}

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Malformed input or a construct outside the permitted grammar.
    #[error("{0}")]
    Syntax(String),

    /// The syntax tree has more nodes than the evaluator accepts.
    #[error("expression has more than {max} nodes")]
    TooComplex { max: usize },

    /// A magnitude guard tripped.
    #[error("{0}")]
    Overflow(&'static str),

    /// Division (or a negative power) of exactly zero.
    #[error("division by zero")]
    DivByZero,
}

impl CalcError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// The user-visible label for this error.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Syntax(_) => SYNTAX_ERROR,
            Self::TooComplex { .. } => TOO_COMPLEX,
            Self::Overflow(_) => OVERFLOW,
            Self::DivByZero => DIV_BY_ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(CalcError::syntax("bad").label(), "Syntax Error");
        assert_eq!(CalcError::TooComplex { max: 500 }.label(), "Too Complex");
        assert_eq!(CalcError::Overflow("Power too large").label(), "Overflow");
        assert_eq!(CalcError::DivByZero.label(), "Div by 0");
    }

    #[test]
    fn test_detail_message_is_kept() {
        assert_eq!(
            CalcError::Overflow("Result too large").to_string(),
            "Result too large"
        );
        assert_eq!(
            CalcError::syntax("Unknown function: foo").to_string(),
            "Unknown function: foo"
        );
    }

    #[test]
    fn test_terminal_labels() {
        assert!(is_terminal_label("Syntax Error"));
        assert!(is_terminal_label("Div by 0"));
        assert!(is_terminal_label("Too Large"));
        assert!(is_terminal_label("Complex Sol"));
        assert!(!is_terminal_label("42"));
        assert!(!is_terminal_label(""));
        assert!(!is_terminal_label("syntax error"));
    }
}
