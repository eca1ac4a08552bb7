//! Textual normalization of user input.
//!
//! Rewrites the shorthand accepted on the calculator keypad (implicit
//! multiplication, display operators, the root and pi symbols, the constant
//! `e`) into a canonical string the parser understands, then closes any
//! parentheses left open.

use lazy_static::lazy_static;
use regex::Regex;
use std::f64::consts::{E, PI};

lazy_static! {
    /// A digit directly followed by a group, a root or pi: `9(`, `9√`, `9π`.
    static ref DIGIT_BEFORE_GROUP: Regex = Regex::new(r"(\d)([√π(])").unwrap();

    /// A closing parenthesis directly followed by a digit: `)9`.
    static ref GROUP_BEFORE_DIGIT: Regex = Regex::new(r"(\))(\d)").unwrap();

    /// Two adjacent groups: `)(`.
    static ref ADJACENT_GROUPS: Regex = Regex::new(r"(\))(\()").unwrap();
}

/// Rewrite raw input into canonical form.
///
/// No evaluation happens here; the result may still be unparseable.
pub fn preprocess(raw: &str) -> String {
    let clean = DIGIT_BEFORE_GROUP.replace_all(raw, "$1*$2");
    let clean = GROUP_BEFORE_DIGIT.replace_all(&clean, "$1*$2");
    let clean = ADJACENT_GROUPS.replace_all(&clean, "$1*$2");

    let clean = clean
        .replace('×', "*")
        .replace('÷', "/")
        .replace('^', "**")
        .replace('√', "sqrt(")
        .replace('π', &PI.to_string());

    balance_parentheses(substitute_euler(&clean))
}

/// Replace each standalone `e` with Euler's number.
///
/// An `e` touching another letter belongs to a name (`exp`, `sec`) and is
/// left alone. A digit or group on either side of a substituted constant
/// gets an explicit multiplication, so `2e` reads as `2*e`.
fn substitute_euler(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let literal = E.to_string();
    let mut result = String::with_capacity(input.len());

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();

        if c != 'e' || prev.is_some_and(is_name_char) || next.is_some_and(is_name_char) {
            result.push(c);
            continue;
        }

        if prev.is_some_and(|p| p.is_ascii_digit() || p == ')' || p == '.') {
            result.push('*');
        }
        result.push_str(&literal);
        if next.is_some_and(|n| n.is_ascii_digit() || n == '(' || n == '.') {
            result.push('*');
        }
    }

    result
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Append the closing parentheses needed to match every opener.
///
/// Excess closers are left for the parser to reject.
fn balance_parentheses(mut input: String) -> String {
    let open = input.matches('(').count();
    let close = input.matches(')').count();
    if open > close {
        input.push_str(&")".repeat(open - close));
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(preprocess("9(9)"), "9*(9)");
        assert_eq!(preprocess("(2)3"), "(2)*3");
        assert_eq!(preprocess("(2)(3)"), "(2)*(3)");
        assert_eq!(preprocess("(1)(2)(3)"), "(1)*(2)*(3)");
    }

    #[test]
    fn test_display_operators() {
        assert_eq!(preprocess("6×7"), "6*7");
        assert_eq!(preprocess("8÷2"), "8/2");
        assert_eq!(preprocess("2^10"), "2**10");
    }

    #[test]
    fn test_root_is_balanced() {
        assert_eq!(preprocess("√16"), "sqrt(16)");
        assert_eq!(preprocess("9√4"), "9*sqrt(4)");
        assert_eq!(preprocess("√(√16"), "sqrt((sqrt(16)))");
    }

    #[test]
    fn test_pi() {
        assert_eq!(preprocess("π"), "3.141592653589793");
        assert_eq!(preprocess("2π"), "2*3.141592653589793");
    }

    #[test]
    fn test_euler_constant() {
        assert_eq!(preprocess("e"), "2.718281828459045");
        assert_eq!(preprocess("2e"), "2*2.718281828459045");
        assert_eq!(preprocess("e(1)"), "2.718281828459045*(1)");
        assert_eq!(preprocess("e^2"), "2.718281828459045**2");
    }

    #[test]
    fn test_function_names_are_not_corrupted() {
        assert_eq!(preprocess("exp(1)"), "exp(1)");
        assert_eq!(preprocess("sqrt(e)"), "sqrt(2.718281828459045)");
    }

    #[test]
    fn test_only_openers_are_balanced() {
        assert_eq!(preprocess("((1+2"), "((1+2))");
        assert_eq!(preprocess("1+2))"), "1+2))");
        assert_eq!(preprocess(""), "");
    }
}
