use fincalc::calculator::{
    CalcError, CalcResult, Calculator, Entry, MAX_NODES, evaluate, evaluate_expression, parse,
    preprocess,
};
use fincalc::history::{FileHistory, History, HistorySink, MAX_ENTRIES};
use pretty_assertions::assert_eq;

fn display(input: &str) -> String {
    evaluate_expression(input).display().to_string()
}

#[test]
fn implicit_multiplication_scenario() {
    assert_eq!(preprocess("9(9)"), "9*(9)");
    assert_eq!(evaluate(&parse("9*(9)").unwrap()), Ok(81.0));
    assert_eq!(display("9(9)"), "81");
}

#[test]
fn square_root_scenario() {
    assert_eq!(preprocess("√16"), "sqrt(16)");
    assert_eq!(evaluate(&parse("sqrt(16)").unwrap()), Ok(4.0));
    assert_eq!(display("√16"), "4");
}

#[test]
fn one_third_keeps_ten_significant_digits() {
    assert_eq!(display("1/3"), "0.3333333333");
}

#[test]
fn guard_boundaries() {
    assert_eq!(display("2^10001"), "Overflow");
    assert_eq!(display("2^501"), "Overflow");
    assert_eq!(display("2^2000"), "Overflow");
    // Allowed by the power guard, caught by the result guard.
    assert_eq!(
        evaluate(&parse("2**500").unwrap()),
        Err(CalcError::Overflow("Result too large"))
    );
    assert_eq!(display("1/0"), "Div by 0");
    assert_eq!(display("abc"), "Syntax Error");
}

/// Parenthesized sums of ones, the groups themselves added together.
fn grouped_ones(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(|&n| format!("({})", vec!["1"; n].join("+")))
        .collect::<Vec<_>>()
        .join("+")
}

#[test]
fn node_limit_boundary() {
    // 167 ones in shallow groups: 3 * 167 - 1 = 500 nodes.
    let at_limit = grouped_ones(&[50, 50, 50, 17]);
    assert_eq!(parse(&preprocess(&at_limit)).unwrap().node_count(), MAX_NODES);
    assert_eq!(display(&at_limit), "167");

    // 166 ones plus a double negation: 501 nodes.
    let over_limit = format!("--{}", grouped_ones(&[50, 50, 50, 16]));
    assert_eq!(
        evaluate_expression(&over_limit),
        CalcResult::Error {
            expression: over_limit.clone(),
            error: CalcError::TooComplex { max: MAX_NODES },
        }
    );
}

#[test]
fn wide_expressions_are_too_complex() {
    assert_eq!(display(&grouped_ones(&[50, 50, 50, 50])), "Too Complex");

    // The node limit trips before the depth guard would.
    assert_eq!(display(&vec!["1"; 168].join("+")), "Too Complex");

    let input = vec!["2"; MAX_NODES].join("-");
    assert_eq!(display(&input), "Too Complex");
}

#[test]
fn evaluation_is_deterministic() {
    for input in ["2π", "√2", "(1+2)(3+4)", "10÷4", "e^2", "-3^2"] {
        assert_eq!(evaluate_expression(input), evaluate_expression(input));
    }
}

#[test]
fn repeated_calculation_is_recorded_once() {
    let mut calculator = Calculator::new(History::new());
    assert_eq!(calculator.calculate("2+3").display(), "5");
    assert_eq!(calculator.calculate("2+3").display(), "5");
    assert_eq!(calculator.history().read_all(), ["2+3"]);
}

#[test]
fn fifty_first_expression_evicts_the_oldest() {
    let mut calculator = Calculator::new(History::new());
    for i in 1..=MAX_ENTRIES + 1 {
        calculator.calculate(&format!("{}*2", i));
    }
    let history = calculator.history().read_all();
    assert_eq!(history.len(), MAX_ENTRIES);
    assert_eq!(history.first().map(String::as_str), Some("2*2"));
    assert_eq!(history.last().map(String::as_str), Some("51*2"));
}

#[test]
fn failures_are_not_recorded() {
    let mut calculator = Calculator::new(History::new());
    for input in ["1/0", "2^2000", "abc", "sqrt(-1)"] {
        assert!(!calculator.calculate(input).is_success());
    }
    assert!(calculator.history().read_all().is_empty());
}

#[test]
fn history_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut calculator = Calculator::new(FileHistory::open(&path).unwrap());
    let mut entry = Entry::new();
    entry.insert("9(9)");
    entry.calculate(&mut calculator);
    assert_eq!(entry.text(), "81");
    drop(calculator);

    let calculator = Calculator::new(FileHistory::open(&path).unwrap());
    assert_eq!(calculator.history().read_all(), ["9(9)"]);
}
