//! Finance formulas offered next to the free-form calculator.
//!
//! Rates and volatilities are entered as percentages (`4.2` for 4.2%).
//! Each formula returns a typed value; [`FormulaOutput`] renders it the way
//! the calculator display shows it.

use crate::calculator::{COMPLEX_SOLUTION, ERROR, INPUT_ERROR, format_with_separators};
use clap::ValueEnum;
use std::fmt;
use thiserror::Error;

/// Unit of a duration input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TimeUnit {
    #[default]
    Years,
    Months,
}

/// A duration as entered: a number and its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    pub value: f64,
    pub unit: TimeUnit,
}

impl Term {
    pub fn years(value: f64) -> Self {
        Self {
            value,
            unit: TimeUnit::Years,
        }
    }

    pub fn months(value: f64) -> Self {
        Self {
            value,
            unit: TimeUnit::Months,
        }
    }

    pub fn in_years(self) -> f64 {
        match self.unit {
            TimeUnit::Years => self.value,
            TimeUnit::Months => self.value / 12.0,
        }
    }

    pub fn in_months(self) -> f64 {
        match self.unit {
            TimeUnit::Years => self.value * 12.0,
            TimeUnit::Months => self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Failure of a formula whose display reports bad input: Black-Scholes,
    /// compound interest, CAPM and break-even.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Failure of ROI, loan payment, CAGR, present value or the quadratic.
    #[error("{0}")]
    Math(&'static str),

    /// The quadratic has no real roots.
    #[error("no real roots")]
    ComplexRoots,
}

impl FormulaError {
    /// The user-visible label for this error.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => INPUT_ERROR,
            Self::Math(_) => ERROR,
            Self::ComplexRoots => COMPLEX_SOLUTION,
        }
    }
}

type Result<T> = std::result::Result<T, FormulaError>;

/// Builds the error a given formula reports; each formula fails with a
/// single label whatever went wrong.
type Fail = fn(&'static str) -> FormulaError;

const INVALID: Fail = FormulaError::InvalidInput;
const MATH: Fail = FormulaError::Math;

fn require_finite(inputs: &[f64], fail: Fail) -> Result<()> {
    if inputs.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(fail("inputs must be finite numbers"))
    }
}

fn finite(value: f64, fail: Fail) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(fail("result is not a finite number"))
    }
}

/// Standard normal cumulative distribution function.
fn norm_cdf(x: f64) -> f64 {
    (1.0 + libm::erf(x / std::f64::consts::SQRT_2)) / 2.0
}

/// European option prices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionPrices {
    pub call: f64,
    pub put: f64,
}

/// Black-Scholes prices of a European call and put.
///
/// A non-positive term or volatility prices both options at zero.
pub fn black_scholes(
    spot: f64,
    strike: f64,
    volatility_pct: f64,
    rate_pct: f64,
    term: Term,
) -> Result<OptionPrices> {
    require_finite(&[spot, strike, volatility_pct, rate_pct, term.value], INVALID)?;

    let t = term.in_years();
    let sigma = volatility_pct / 100.0;
    let r = rate_pct / 100.0;
    if t <= 0.0 || sigma <= 0.0 {
        return Ok(OptionPrices {
            call: 0.0,
            put: 0.0,
        });
    }
    if strike == 0.0 || spot / strike <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "spot and strike must be positive",
        ));
    }

    let d1 = ((spot / strike).ln() + (r + 0.5 * sigma.powi(2)) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    let discounted_strike = strike * (-r * t).exp();

    Ok(OptionPrices {
        call: finite(spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2), INVALID)?,
        put: finite(discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1), INVALID)?,
    })
}

/// Value of `principal` compounded annually at `rate_pct` over `term`.
pub fn compound_interest(principal: f64, rate_pct: f64, term: Term) -> Result<f64> {
    require_finite(&[principal, rate_pct, term.value], INVALID)?;
    finite(principal * (1.0 + rate_pct / 100.0).powf(term.in_years()), INVALID)
}

/// Expected return under the capital asset pricing model, in percent.
pub fn capm(risk_free_pct: f64, beta: f64, market_return_pct: f64) -> Result<f64> {
    require_finite(&[risk_free_pct, beta, market_return_pct], INVALID)?;
    finite(risk_free_pct + beta * (market_return_pct - risk_free_pct), INVALID)
}

/// Units to sell before revenue covers costs, truncated toward zero.
pub fn break_even(fixed_costs: f64, price_per_unit: f64, variable_cost_per_unit: f64) -> Result<i64> {
    require_finite(&[fixed_costs, price_per_unit, variable_cost_per_unit], INVALID)?;
    let margin = price_per_unit - variable_cost_per_unit;
    if margin == 0.0 {
        return Err(FormulaError::InvalidInput(
            "price per unit equals variable cost",
        ));
    }
    Ok(finite(fixed_costs / margin, INVALID)?.trunc() as i64)
}

/// Real roots of `a*x^2 + b*x + c`, the larger-numerator root first.
pub fn quadratic(a: f64, b: f64, c: f64) -> Result<(f64, f64)> {
    require_finite(&[a, b, c], MATH)?;
    let discriminant = b.powi(2) - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(FormulaError::ComplexRoots);
    }
    if a == 0.0 {
        return Err(FormulaError::Math("division by zero"));
    }
    let root = discriminant.sqrt();
    Ok((
        finite((-b + root) / (2.0 * a), MATH)?,
        finite((-b - root) / (2.0 * a), MATH)?,
    ))
}

/// Return on investment, in percent.
pub fn roi(cost: f64, gain: f64) -> Result<f64> {
    require_finite(&[cost, gain], MATH)?;
    if cost == 0.0 {
        return Err(FormulaError::Math("division by zero"));
    }
    finite((gain - cost) / cost * 100.0, MATH)
}

/// Monthly payment of an amortized loan.
///
/// Without a positive rate the principal is simply spread over the months.
pub fn loan_payment(principal: f64, annual_rate_pct: f64, term: Term) -> Result<f64> {
    require_finite(&[principal, annual_rate_pct, term.value], MATH)?;
    let r = annual_rate_pct / 100.0 / 12.0;
    let n = term.in_months();

    if r > 0.0 {
        let growth = (1.0 + r).powf(n);
        if growth == 1.0 {
            return Err(FormulaError::Math("division by zero"));
        }
        finite(principal * (r * growth) / (growth - 1.0), MATH)
    } else {
        if n == 0.0 {
            return Err(FormulaError::Math("division by zero"));
        }
        finite(principal / n, MATH)
    }
}

/// Compound annual growth rate, in percent.
pub fn cagr(initial: f64, last: f64, term: Term) -> Result<f64> {
    require_finite(&[initial, last, term.value], MATH)?;
    let years = term.in_years();
    if initial == 0.0 || years == 0.0 {
        return Err(FormulaError::Math("division by zero"));
    }
    finite(((last / initial).powf(1.0 / years) - 1.0) * 100.0, MATH)
}

/// Present value of a single future cash flow.
pub fn present_value(future_value: f64, discount_rate_pct: f64, term: Term) -> Result<f64> {
    require_finite(&[future_value, discount_rate_pct, term.value], MATH)?;
    let discount = (1.0 + discount_rate_pct / 100.0).powf(term.in_years());
    if discount == 0.0 {
        return Err(FormulaError::Math("division by zero"));
    }
    finite(future_value / discount, MATH)
}

/// A formula result as shown on the calculator display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormulaOutput {
    /// `C:$<call> P:$<put>`
    OptionPrices(OptionPrices),
    /// `$1,234.57`
    Currency(f64),
    /// `12.50%`
    Percent(f64),
    /// `42 Units`
    Units(i64),
    /// `<x1>, <x2>`
    Roots(f64, f64),
    /// `$123.45/mo`
    MonthlyPayment(f64),
}

impl fmt::Display for FormulaOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OptionPrices(prices) => write!(f, "C:${:.2} P:${:.2}", prices.call, prices.put),
            Self::Currency(value) => write!(f, "${}", format_with_separators(*value, 2)),
            Self::Percent(value) => write!(f, "{:.2}%", value),
            Self::Units(units) => write!(f, "{} Units", units),
            Self::Roots(x1, x2) => write!(f, "{:.2}, {:.2}", x1, x2),
            Self::MonthlyPayment(value) => write!(f, "${:.2}/mo", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_term_conversion() {
        assert_close(Term::months(18.0).in_years(), 1.5);
        assert_close(Term::years(2.0).in_months(), 24.0);
    }

    #[test]
    fn test_black_scholes() {
        let prices = black_scholes(100.0, 100.0, 20.0, 5.0, Term::years(1.0)).unwrap();
        assert_eq!(
            FormulaOutput::OptionPrices(prices).to_string(),
            "C:$10.45 P:$5.57"
        );
    }

    #[test]
    fn test_black_scholes_degenerate_inputs() {
        let zero = OptionPrices {
            call: 0.0,
            put: 0.0,
        };
        assert_eq!(black_scholes(100.0, 90.0, 0.0, 5.0, Term::years(1.0)), Ok(zero));
        assert_eq!(black_scholes(100.0, 90.0, 20.0, 5.0, Term::months(0.0)), Ok(zero));
        assert_eq!(
            black_scholes(100.0, 0.0, 20.0, 5.0, Term::years(1.0))
                .unwrap_err()
                .label(),
            "Input Error"
        );
    }

    #[test]
    fn test_compound_interest() {
        let value = compound_interest(1000.0, 5.0, Term::years(10.0)).unwrap();
        assert_eq!(FormulaOutput::Currency(value).to_string(), "$1,628.89");

        let monthly = compound_interest(1000.0, 12.0, Term::months(6.0)).unwrap();
        assert_close(monthly, 1000.0 * 1.12f64.powf(0.5));
    }

    #[test]
    fn test_capm() {
        let r = capm(4.2, 1.2, 10.0).unwrap();
        assert_eq!(FormulaOutput::Percent(r).to_string(), "11.16%");
    }

    #[test]
    fn test_break_even() {
        assert_eq!(break_even(1000.0, 25.0, 10.0), Ok(66));
        assert_eq!(FormulaOutput::Units(66).to_string(), "66 Units");
        assert_eq!(
            break_even(1000.0, 10.0, 10.0).unwrap_err().label(),
            "Input Error"
        );
    }

    #[test]
    fn test_quadratic() {
        let (x1, x2) = quadratic(1.0, -3.0, 2.0).unwrap();
        assert_eq!(FormulaOutput::Roots(x1, x2).to_string(), "2.00, 1.00");
        assert_eq!(quadratic(1.0, 0.0, 1.0), Err(FormulaError::ComplexRoots));
        assert_eq!(quadratic(1.0, 0.0, 1.0).unwrap_err().label(), "Complex Sol");
        assert_eq!(quadratic(0.0, 2.0, 1.0).unwrap_err().label(), "Error");
    }

    #[test]
    fn test_roi() {
        assert_close(roi(200.0, 250.0).unwrap(), 25.0);
        assert_eq!(roi(0.0, 10.0).unwrap_err().label(), "Error");
    }

    #[test]
    fn test_loan_payment() {
        let payment = loan_payment(10_000.0, 6.0, Term::years(1.0)).unwrap();
        assert_eq!(FormulaOutput::MonthlyPayment(payment).to_string(), "$860.66/mo");

        assert_close(loan_payment(1200.0, 0.0, Term::months(12.0)).unwrap(), 100.0);
        assert!(loan_payment(1200.0, 0.0, Term::months(0.0)).is_err());
    }

    #[test]
    fn test_cagr() {
        let growth = cagr(100.0, 121.0, Term::years(2.0)).unwrap();
        assert_eq!(FormulaOutput::Percent(growth).to_string(), "10.00%");
        assert_eq!(cagr(0.0, 121.0, Term::years(2.0)).unwrap_err().label(), "Error");
        assert_eq!(cagr(-100.0, 121.0, Term::years(2.0)).unwrap_err().label(), "Error");
    }

    #[test]
    fn test_present_value() {
        let pv = present_value(1100.0, 10.0, Term::years(1.0)).unwrap();
        assert_eq!(FormulaOutput::Currency(pv).to_string(), "$1,000.00");
    }

    #[test]
    fn test_labels_follow_the_formula() {
        assert_eq!(capm(f64::NAN, 1.0, 1.0).unwrap_err().label(), "Input Error");
        assert_eq!(
            compound_interest(f64::INFINITY, 5.0, Term::years(1.0))
                .unwrap_err()
                .label(),
            "Input Error"
        );
        // Overflowing division in break-even still reads as bad input.
        assert_eq!(
            break_even(1e308, 1.0, 0.9999999999).unwrap_err().label(),
            "Input Error"
        );

        assert_eq!(roi(f64::NAN, 1.0).unwrap_err().label(), "Error");
        assert_eq!(cagr(100.0, f64::INFINITY, Term::years(1.0)).unwrap_err().label(), "Error");
        assert_eq!(
            present_value(f64::NAN, 5.0, Term::years(1.0)).unwrap_err().label(),
            "Error"
        );
        assert_eq!(
            loan_payment(1000.0, f64::NAN, Term::years(1.0)).unwrap_err().label(),
            "Error"
        );
        assert_eq!(quadratic(f64::NAN, 1.0, 1.0).unwrap_err().label(), "Error");
    }
}
