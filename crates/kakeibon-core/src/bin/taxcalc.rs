//! # Tax Calculator
//!
//! Runs the reconciliation engine from the command line.
//!
//! ## Usage
//! ```bash
//! # Forward: tax-excluded amount at the default rate
//! cargo run -p kakeibon-core --bin taxcalc -- --excluding 1000
//!
//! # Reverse at 8% with half-up rounding
//! cargo run -p kakeibon-core --bin taxcalc -- --including 1080 --rate 8 --rounding 1
//!
//! # Show derivation details
//! RUST_LOG=debug cargo run -p kakeibon-core --bin taxcalc -- --including 366
//! ```
//!
//! Defaults come from `CoreConfig::from_env`.

use std::env;
use std::process::ExitCode;

use kakeibon_core::money::{format_amount, parse_amount};
use kakeibon_core::tax::{calculate_from_excluding, calculate_from_including};
use kakeibon_core::{CoreConfig, RoundingPolicy, TaxRate};
use tracing::{debug, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log directives used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

enum Amount {
    Excluding(i64),
    Including(i64),
}

fn print_help() {
    println!("KakeiBon Tax Calculator");
    println!();
    println!("Usage: taxcalc (--excluding <N> | --including <N>) [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -e, --excluding <N>   Tax-excluded amount");
    println!("  -i, --including <N>   Tax-included amount");
    println!("  -r, --rate <PCT>      Tax rate in percent (default: KAKEIBON_TAX_RATE or 10)");
    println!("  -m, --rounding <0|1|2> Rounding: 0 down, 1 half up, 2 up");
    println!("  -h, --help            Show this help message");
}

/// Log lines go to stderr so stdout carries only the result.
fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    subscriber(filter).init();
}

fn main() -> ExitCode {
    init_tracing();

    let config = CoreConfig::from_env();
    let args: Vec<String> = env::args().collect();

    let mut amount = None;
    let mut rate = config.default_tax_rate;
    let mut rounding = config.default_rounding;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).map(String::as_str);
        match (args[i].as_str(), value) {
            ("--excluding" | "-e", Some(v)) => match parse_amount(v) {
                Some(n) => amount = Some(Amount::Excluding(n)),
                None => return usage_error(&format!("invalid amount: {v}")),
            },
            ("--including" | "-i", Some(v)) => match parse_amount(v) {
                Some(n) => amount = Some(Amount::Including(n)),
                None => return usage_error(&format!("invalid amount: {v}")),
            },
            ("--rate" | "-r", Some(v)) => match v.trim_end_matches('%').parse::<u32>() {
                Ok(pct) => rate = TaxRate::from_percent(pct),
                Err(_) => return usage_error(&format!("invalid rate: {v}")),
            },
            ("--rounding" | "-m", Some(v)) => match v.parse::<i64>() {
                Ok(code) => rounding = RoundingPolicy::from_code(code),
                Err(_) => return usage_error(&format!("invalid rounding code: {v}")),
            },
            ("--help" | "-h", _) => {
                print_help();
                return ExitCode::SUCCESS;
            }
            (flag @ ("--excluding" | "-e" | "--including" | "-i" | "--rate" | "-r" | "--rounding" | "-m"), None) => {
                return usage_error(&format!("{flag} needs a value"));
            }
            (flag, _) => return usage_error(&format!("unexpected argument: {flag}")),
        }
        i += 2;
    }

    let Some(amount) = amount else {
        return usage_error("one of --excluding or --including is required");
    };

    debug!(%rate, ?rounding, "calculating");

    match amount {
        Amount::Excluding(excluding) => {
            let forward = calculate_from_excluding(excluding, rate, rounding);
            println!("Rate:      {rate}");
            println!("Excluding: ¥{}", format_amount(excluding));
            println!("Tax:       ¥{}", format_amount(forward.tax));
            println!("Including: ¥{}", format_amount(forward.including));
        }
        Amount::Including(including) => {
            let reverse = calculate_from_including(including, rate, rounding);
            println!("Rate:      {rate}");
            println!("Including: ¥{}", format_amount(including));
            println!("Tax:       ¥{}", format_amount(reverse.tax));
            println!("Excluding: ¥{}", format_amount(reverse.excluding));
            if let Some(discrepancy) = reverse.discrepancy {
                println!();
                println!(
                    "⚠ ¥{} recalculates to ¥{} (difference {:+})",
                    format_amount(discrepancy.user_input),
                    format_amount(discrepancy.recalculated),
                    discrepancy.difference()
                );
            }
        }
    }

    ExitCode::SUCCESS
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    eprintln!();
    print_help();
    ExitCode::from(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_filter_sets_max_level() {
        assert_eq!(
            subscriber(EnvFilter::new("error")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
        assert_eq!(
            subscriber(EnvFilter::new("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_default_filter_is_info() {
        assert_eq!(
            subscriber(EnvFilter::new(DEFAULT_LOG_FILTER)).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
