//! assert-extensions: CLI entry point.
//!
//! Computes digits of agreement (LRE) for value pairs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

use assert_extensions::cases::{load_cases, measure, CaseResult, NumericKind, DEFAULT_LRE};
use assert_extensions::Digits;

#[derive(Parser)]
#[command(name = "assert-extensions")]
#[command(about = "Digits-of-agreement (LRE) checks for numeric values")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare one expected/actual pair.
    #[command(allow_negative_numbers = true)]
    Compare {
        /// Expected (certified) value.
        expected: String,

        /// Actual (computed) value.
        actual: String,

        /// Required digits of agreement.
        #[arg(short, long, default_value_t = DEFAULT_LRE)]
        lre: i32,

        /// Compare as arbitrary-precision decimals instead of floats.
        #[arg(long)]
        decimal: bool,

        /// Print JSON instead of colored text.
        #[arg(long)]
        json: bool,
    },

    /// Check a case file or a directory of case files.
    Check {
        /// Path to a YAML case file or directory.
        #[arg(default_value = "tests/cases")]
        path: PathBuf,

        /// Print JSON instead of colored text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Comparison<'a> {
    expected: &'a str,
    actual: &'a str,
    numeric: NumericKind,
    lre: i32,
    agreement: Digits,
    pass: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compare {
            expected,
            actual,
            lre,
            decimal,
            json,
        } => run_compare(&expected, &actual, lre, decimal, json),
        Command::Check { path, json } => run_check(&path, json),
    }
}

fn run_compare(expected: &str, actual: &str, lre: i32, decimal: bool, json: bool) -> anyhow::Result<()> {
    let numeric = if decimal {
        NumericKind::Decimal
    } else {
        NumericKind::Float
    };
    let agreement = measure(expected, actual, numeric)?;
    let pass = agreement.meets(lre);

    if json {
        let comparison = Comparison {
            expected,
            actual,
            numeric,
            lre,
            agreement,
            pass,
        };
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else if pass {
        println!("  {} {agreement} (required {lre})", "PASS".green());
    } else {
        println!("  {} {agreement} (required {lre})", "FAIL".red());
        println!("      expected={expected}, actual={actual}");
    }

    if !pass {
        std::process::exit(1);
    }
    Ok(())
}

fn run_check(path: &Path, json: bool) -> anyhow::Result<()> {
    let loaded = load_cases(path)?;
    let start = Instant::now();

    if !json {
        println!("{}", "assert-extensions".bold());
        println!("  Cases: {}", path.display());
        println!();
        println!("Loaded {} cases", loaded.cases.len());
        if !loaded.broken.is_empty() {
            println!("  {} {} files failed to parse", "!".red(), loaded.broken.len());
        }
        println!();
        println!("{}", "Checking agreement...".cyan());
    }

    let results: Vec<CaseResult> = loaded.evaluate();
    let failed = results.iter().filter(|r| r.is_fail() || r.is_error()).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(result);
        }
        print_summary(&results, start.elapsed().as_secs_f64());
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(results: &[CaseResult], elapsed: f64) {
    println!();
    println!("{}", "=".repeat(60));

    let passed = results.iter().filter(|r| r.is_pass()).count();
    let failed = results.iter().filter(|r| r.is_fail() || r.is_error()).count();
    let skipped = results.iter().filter(|r| r.is_skip()).count();

    if failed == 0 {
        println!(
            "  {} {} passed, {} skipped in {:.2}s",
            "PASS".green(),
            passed.to_string().green(),
            skipped,
            elapsed
        );
    } else {
        println!(
            "  {} {} passed, {} failed, {} skipped in {:.2}s",
            "FAIL".red(),
            passed,
            failed.to_string().red(),
            skipped,
            elapsed
        );
    }

    println!("{}", "=".repeat(60));
}

fn print_result(result: &CaseResult) {
    match result {
        CaseResult::Pass { name, details } => {
            println!("  {} {} {}", "✓".green(), name, details.dimmed());
        }
        CaseResult::Fail { name, reason } => {
            println!("  {} {}", "✗".red(), name.red());
            println!("      {reason}");
        }
        CaseResult::Error { name, error } => {
            println!("  {} {} (error)", "✗".red(), name.red());
            println!("      {error}");
        }
        CaseResult::Skip { name, reason } => {
            println!("  {} {} ({})", "○".yellow(), name.dimmed(), reason.dimmed());
        }
    }
}
