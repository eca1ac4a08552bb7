//! Guarded evaluation of calculator expressions.
//!
//! Runs the whole pipeline: preprocessing, parsing (with the node-count
//! guard), a depth- and magnitude-bounded tree walk, and formatting.

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::error::CalcError;
use super::format::format_result;
use super::parser::parse;
use super::preprocess::preprocess;
use crate::history::HistorySink;
use tracing::{debug, warn};

/// Deepest node the evaluator will visit; the root is at depth 0.
pub const MAX_DEPTH: usize = 100;

/// Largest exponent accepted for any base.
pub const MAX_POWER: f64 = 10_000.0;

/// Largest exponent accepted when the base's magnitude exceeds 1.
pub const MAX_POWER_LARGE_BASE: f64 = 500.0;

/// Largest magnitude any binary operation may produce.
pub const MAX_RESULT: f64 = 1e100;

/// Evaluate a syntax tree.
pub fn evaluate(expr: &Expr) -> Result<f64, CalcError> {
    eval_node(expr, 0)
}

fn eval_node(expr: &Expr, depth: usize) -> Result<f64, CalcError> {
    if depth > MAX_DEPTH {
        return Err(CalcError::syntax("Expression too complex"));
    }

    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Binary { op, left, right } => {
            let left = eval_node(left, depth + 1)?;
            let right = eval_node(right, depth + 1)?;
            apply_binary(*op, left, right)
        }
        Expr::Unary { op, operand } => {
            let operand = eval_node(operand, depth + 1)?;
            Ok(match op {
                UnaryOp::Neg => -operand,
                UnaryOp::Pos => operand,
            })
        }
        Expr::Call { function, argument } => {
            let argument = eval_node(argument, depth + 1)?;
            apply_function(*function, argument)
        }
    }
}

fn apply_binary(op: BinaryOp, left: f64, right: f64) -> Result<f64, CalcError> {
    let result = match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => {
            if right == 0.0 {
                return Err(CalcError::DivByZero);
            }
            left / right
        }
        BinaryOp::Pow => {
            // Checked before computing anything.
            if right > MAX_POWER || (left.abs() > 1.0 && right > MAX_POWER_LARGE_BASE) {
                return Err(CalcError::Overflow("Power too large"));
            }
            if left == 0.0 && right < 0.0 {
                return Err(CalcError::DivByZero);
            }
            left.powf(right)
        }
    };

    if result.abs() > MAX_RESULT {
        return Err(CalcError::Overflow("Result too large"));
    }
    Ok(result)
}

fn apply_function(function: Function, x: f64) -> Result<f64, CalcError> {
    let domain_error = || CalcError::syntax("math domain error");

    match function {
        Function::Sqrt if x < 0.0 => Err(domain_error()),
        Function::Sqrt => Ok(x.sqrt()),
        Function::Log | Function::Ln if x <= 0.0 => Err(domain_error()),
        Function::Log | Function::Ln => Ok(x.ln()),
        Function::Exp => {
            let result = x.exp();
            if result.is_infinite() && x.is_finite() {
                return Err(CalcError::Overflow("math range error"));
            }
            Ok(result)
        }
        Function::Abs => Ok(x.abs()),
        Function::Sin | Function::Cos | Function::Tan if x.is_infinite() => Err(domain_error()),
        Function::Sin => Ok(x.sin()),
        Function::Cos => Ok(x.cos()),
        Function::Tan => Ok(x.tan()),
    }
}

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcResult {
    /// The expression produced a value. NaN and infinities land here too;
    /// they display as `Undefined` and `Infinity`.
    Success {
        /// The original expression.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for display.
        display_result: String,
    },
    /// A guard or the parser rejected the expression.
    Error {
        /// The original expression.
        expression: String,
        error: CalcError,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string (formatted result or error label).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { error, .. } => error.label(),
        }
    }

    /// Get the clipboard string (only for finite results).
    pub fn clipboard(&self) -> Option<&str> {
        match self {
            Self::Success {
                value,
                display_result,
                ..
            } if value.is_finite() => Some(display_result),
            _ => None,
        }
    }
}

/// Evaluate a raw expression as typed by the user.
pub fn evaluate_expression(input: &str) -> CalcResult {
    let expression = input.trim().to_string();

    match run_pipeline(&expression) {
        Ok(value) => CalcResult::Success {
            display_result: format_result(value),
            expression,
            value,
        },
        Err(error) => {
            warn!(%expression, %error, "Calc error");
            CalcResult::Error { expression, error }
        }
    }
}

fn run_pipeline(expression: &str) -> Result<f64, CalcError> {
    let canonical = preprocess(expression);
    debug!(%canonical, "Preprocessed expression");

    let tree = parse(&canonical)?;
    debug!(nodes = tree.node_count(), %tree, "Parsed expression");

    evaluate(&tree)
}

/// Evaluates expressions and records the successful ones in a history.
pub struct Calculator<H> {
    history: H,
}

impl<H: HistorySink> Calculator<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }

    /// Evaluate `raw` and append it to the history on success.
    ///
    /// Empty input and a lone `0` show `0` without touching the history.
    pub fn calculate(&mut self, raw: &str) -> CalcResult {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "0" {
            return CalcResult::Success {
                expression: trimmed.to_string(),
                value: 0.0,
                display_result: "0".to_string(),
            };
        }

        let result = evaluate_expression(trimmed);
        if result.is_success() {
            self.history.append(trimmed);
        }
        result
    }
}
