use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fincalc::calculator::{CalcResult, Calculator, copy_result};
use fincalc::config::Config;
use fincalc::formulas::{self, FormulaError, FormulaOutput, Term, TimeUnit};
use fincalc::history::{FileHistory, History, HistorySink};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fincalc", version, about = "Calculator with finance formulas")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the history file, overriding the config.
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// Do not read or record history.
    #[arg(long, global = true)]
    no_history: bool,

    /// Copy a successful result to the clipboard.
    #[arg(long)]
    copy: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Expression to evaluate. Reads expressions from stdin when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expression: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the calculation history, oldest first.
    History,
    /// Run a finance formula.
    #[command(subcommand)]
    Formula(Formula),
}

#[derive(Subcommand)]
enum Formula {
    /// Black-Scholes price of a European call and put.
    #[command(allow_negative_numbers = true)]
    BlackScholes {
        spot: f64,
        strike: f64,
        /// Volatility in percent.
        volatility: f64,
        duration: f64,
        #[arg(long, value_enum, default_value_t)]
        unit: TimeUnit,
        /// Risk-free rate in percent; defaults to the configured rate.
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Value of a principal compounded annually.
    #[command(allow_negative_numbers = true)]
    Compound {
        principal: f64,
        /// Annual rate in percent.
        rate: f64,
        duration: f64,
        #[arg(long, value_enum, default_value_t)]
        unit: TimeUnit,
    },
    /// Expected return under CAPM.
    #[command(allow_negative_numbers = true)]
    Capm {
        beta: f64,
        /// Market return in percent.
        market_return: f64,
        /// Risk-free rate in percent; defaults to the configured rate.
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Monthly payment of an amortized loan.
    #[command(allow_negative_numbers = true)]
    Pmt {
        principal: f64,
        /// Annual rate in percent.
        rate: f64,
        duration: f64,
        #[arg(long, value_enum, default_value_t)]
        unit: TimeUnit,
    },
    /// Compound annual growth rate.
    #[command(allow_negative_numbers = true)]
    Cagr {
        initial: f64,
        last: f64,
        duration: f64,
        #[arg(long, value_enum, default_value_t)]
        unit: TimeUnit,
    },
    /// Return on investment.
    #[command(allow_negative_numbers = true)]
    Roi { cost: f64, gain: f64 },
    /// Units needed to break even.
    #[command(allow_negative_numbers = true)]
    BreakEven {
        fixed_costs: f64,
        price_per_unit: f64,
        variable_cost_per_unit: f64,
    },
    /// Real roots of a*x^2 + b*x + c.
    #[command(allow_negative_numbers = true)]
    Quadratic { a: f64, b: f64, c: f64 },
    /// Present value of a future cash flow.
    #[command(allow_negative_numbers = true)]
    Npv {
        future_value: f64,
        /// Discount rate in percent.
        rate: f64,
        duration: f64,
        #[arg(long, value_enum, default_value_t)]
        unit: TimeUnit,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::default_path);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_logging(config.debug);
    debug!(?config_path, ?config, "Loaded configuration");

    if let Some(Command::Formula(formula)) = &cli.command {
        return Ok(run_formula(formula, &config));
    }

    if cli.no_history {
        return run(&cli, Calculator::new(History::new()));
    }

    let history_path = cli
        .history_file
        .clone()
        .or_else(|| config.history_path())
        .context("Could not determine a history file location; pass --history-file")?;
    let history = FileHistory::open(&history_path)?;
    info!(path = %history.path().display(), "Using history file");
    run(&cli, Calculator::new(history))
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run<H: HistorySink>(cli: &Cli, mut calculator: Calculator<H>) -> Result<ExitCode> {
    if let Some(Command::History) = cli.command {
        for (i, expression) in calculator.history().read_all().iter().enumerate() {
            println!("{:>3}  {}", i + 1, expression);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.expression.is_empty() {
        let result = calculator.calculate(&cli.expression.join(" "));
        println!("{}", result.display());
        if cli.copy && copy_result(&result)? {
            debug!("Copied result to clipboard");
        }
        return Ok(exit_code(&result));
    }

    repl(&mut calculator)?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluate each line of stdin until EOF.
fn repl<H: HistorySink>(calculator: &mut Calculator<H>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let result = calculator.calculate(&line);
        writeln!(stdout, "{}", result.display()).context("Failed to write result")?;
    }

    Ok(())
}

fn exit_code(result: &CalcResult) -> ExitCode {
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_formula(formula: &Formula, config: &Config) -> ExitCode {
    match evaluate_formula(formula, config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = %e, "Formula failed");
            println!("{}", e.label());
            ExitCode::FAILURE
        }
    }
}

fn evaluate_formula(formula: &Formula, config: &Config) -> Result<FormulaOutput, FormulaError> {
    let term = |value: f64, unit: TimeUnit| Term { value, unit };

    Ok(match *formula {
        Formula::BlackScholes {
            spot,
            strike,
            volatility,
            duration,
            unit,
            rate,
        } => FormulaOutput::OptionPrices(formulas::black_scholes(
            spot,
            strike,
            volatility,
            rate.unwrap_or(config.risk_free_rate),
            term(duration, unit),
        )?),
        Formula::Compound {
            principal,
            rate,
            duration,
            unit,
        } => FormulaOutput::Currency(formulas::compound_interest(
            principal,
            rate,
            term(duration, unit),
        )?),
        Formula::Capm {
            beta,
            market_return,
            rate,
        } => FormulaOutput::Percent(formulas::capm(
            rate.unwrap_or(config.risk_free_rate),
            beta,
            market_return,
        )?),
        Formula::Pmt {
            principal,
            rate,
            duration,
            unit,
        } => FormulaOutput::MonthlyPayment(formulas::loan_payment(
            principal,
            rate,
            term(duration, unit),
        )?),
        Formula::Cagr {
            initial,
            last,
            duration,
            unit,
        } => FormulaOutput::Percent(formulas::cagr(initial, last, term(duration, unit))?),
        Formula::Roi { cost, gain } => FormulaOutput::Percent(formulas::roi(cost, gain)?),
        Formula::BreakEven {
            fixed_costs,
            price_per_unit,
            variable_cost_per_unit,
        } => FormulaOutput::Units(formulas::break_even(
            fixed_costs,
            price_per_unit,
            variable_cost_per_unit,
        )?),
        Formula::Quadratic { a, b, c } => {
            let (x1, x2) = formulas::quadratic(a, b, c)?;
            FormulaOutput::Roots(x1, x2)
        }
        Formula::Npv {
            future_value,
            rate,
            duration,
            unit,
        } => FormulaOutput::Currency(formulas::present_value(
            future_value,
            rate,
            term(duration, unit),
        )?),
    })
}
