use std::fs;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use thenable::Engine;

use crate::cli::Cli;
use crate::execution::{SuiteSummary, init_thread_pool, run_suite};
use crate::report::write_report;
use crate::stats::print_analysis;
use crate::suite;

const DEFAULT_MAX_STEPS: usize = 1_000_000;

pub fn run() -> i32 {
    let cli = Cli::parse();
    let start = Instant::now();

    let engine = match load_engine(&cli) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return 2;
        }
    };

    init_thread_pool();
    let cases = suite::cases();
    println!("{} {} cases...\n", "Running".bold().cyan(), cases.len());

    let summary = run_suite(&cases, &engine, cli.filter.as_deref(), cli.verbose);
    let elapsed_secs = start.elapsed().as_secs_f64();
    print_totals(&summary, elapsed_secs);

    if cli.analyze {
        print_analysis(&summary.analysis);
    }

    if summary.failed > 0 && !cli.verbose {
        print_failure_sample(&summary.failures);
    }

    if let Some(path) = &cli.json {
        if let Err(err) = write_report(path, &engine, &summary, elapsed_secs) {
            eprintln!("{} {err}", "error:".red().bold());
            return 2;
        }
        println!("Report written to {}", path.display());
    }

    if summary.failed > 0 { 1 } else { 0 }
}

fn load_engine(cli: &Cli) -> Result<Engine, String> {
    let Some(path) = &cli.engine else {
        return Ok(Engine::new().with_max_steps(DEFAULT_MAX_STEPS));
    };
    let source = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_str(&source)
        .map_err(|err| format!("invalid engine settings in {}: {err}", path.display()))
}

fn print_totals(summary: &SuiteSummary, elapsed_secs: f64) {
    println!("\n{}", "=".repeat(60));
    println!(
        "Passed: {} | Failed: {} | Skipped: {}",
        summary.passed.to_string().green().bold(),
        summary.failed.to_string().red().bold(),
        summary.skipped.to_string().yellow().bold()
    );
    println!("Completed in {:.2}s", elapsed_secs);
    println!("{}", "=".repeat(60));
}

fn print_failure_sample(failures: &[(String, String)]) {
    let max_rows = 10;
    let shown = failures.len().min(max_rows);

    println!("\n{}", "Sample failures:".red().bold());
    for (id, reason) in failures.iter().take(shown) {
        println!("  {id} - {reason}");
    }
    if failures.len() > shown {
        println!(
            "  ... and {} more (use --verbose for all)",
            failures.len() - shown
        );
    }
}
