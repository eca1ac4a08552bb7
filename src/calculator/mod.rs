//! Calculator module for evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Normalize keypad shorthand (`9(9)`, `√16`, `2π`, `×`, `÷`, `^`)
//! - Parse into a closed syntax tree and evaluate it under resource guards
//! - Format results for display
//! - Model the editable display, including history browsing
//! - Copy results to the clipboard

pub mod ast;
mod clipboard;
mod entry;
mod error;
mod evaluation;
mod format;
mod parser;
mod preprocess;

pub use clipboard::{copy_result, copy_to_clipboard};
pub use entry::{Direction, Entry};
pub use error::{
    COMPLEX_SOLUTION, CalcError, DIV_BY_ZERO, ERROR, INFINITY, INPUT_ERROR, OVERFLOW,
    SYNTAX_ERROR, TOO_COMPLEX, TOO_LARGE, UNDEFINED, is_terminal_label,
};
pub use evaluation::{
    CalcResult, Calculator, MAX_DEPTH, MAX_POWER, MAX_POWER_LARGE_BASE, MAX_RESULT, evaluate,
    evaluate_expression,
};
pub use format::{format_result, format_with_separators};
pub use parser::{MAX_NESTING, MAX_NODES, parse};
pub use preprocess::preprocess;
