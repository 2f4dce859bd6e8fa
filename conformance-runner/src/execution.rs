use std::panic::{self, AssertUnwindSafe};

use colored::Colorize;
use rayon::prelude::*;
use thenable::Engine;

use crate::panic_message::format_panic;
use crate::runner::{TestResult, run_test};
use crate::stats::Analysis;
use crate::suite::Case;

pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<(String, String)>,
    pub records: Vec<CaseRecord>,
    pub analysis: Analysis,
}

pub struct CaseRecord {
    pub id: String,
    pub section: &'static str,
    pub result: TestResult,
}

pub fn init_thread_pool() {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(8);

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Runs every case on the rayon pool. Each case builds its own context on
/// the worker thread, since promises never cross threads.
pub fn run_suite(
    cases: &[Case],
    engine: &Engine,
    filter: Option<&str>,
    verbose: bool,
) -> SuiteSummary {
    let records: Vec<_> = cases
        .par_iter()
        .map(|case| run_case(case, engine, filter))
        .collect();
    let mut summary = SuiteSummary {
        passed: 0,
        failed: 0,
        skipped: 0,
        failures: Vec::new(),
        records: Vec::with_capacity(records.len()),
        analysis: Analysis::default(),
    };

    for record in records {
        summary.analysis.record(record.section, &record.result);
        apply_record(&mut summary, &record, verbose);
        summary.records.push(record);
    }

    summary
}

fn run_case(case: &Case, engine: &Engine, filter: Option<&str>) -> CaseRecord {
    let id = case.id();
    if let Some(filter) = filter
        && !id.contains(filter)
    {
        return CaseRecord {
            id,
            section: case.section,
            result: TestResult::Skipped("filtered out".into()),
        };
    }

    log::debug!("running {id}");
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_test(case, engine)))
        .unwrap_or_else(|panic_payload| TestResult::Failed(format_panic(panic_payload)));

    CaseRecord {
        id,
        section: case.section,
        result,
    }
}

fn apply_record(summary: &mut SuiteSummary, record: &CaseRecord, verbose: bool) {
    match &record.result {
        TestResult::Passed => {
            summary.passed += 1;
            if verbose {
                println!("{} {}", "PASS".green(), record.id);
            }
        }
        TestResult::Failed(reason) => {
            summary.failed += 1;
            if verbose {
                println!("{} {} - {}", "FAIL".red(), record.id, reason);
            }
            summary.failures.push((record.id.clone(), reason.clone()));
        }
        TestResult::Skipped(reason) => {
            summary.skipped += 1;
            if verbose {
                println!("{} {} - {}", "SKIP".yellow(), record.id, reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;

    fn passing(_: &Harness) -> Result<(), String> {
        Ok(())
    }

    fn failing(_: &Harness) -> Result<(), String> {
        Err("wrong value".into())
    }

    fn panicking(_: &Harness) -> Result<(), String> {
        panic!("boom")
    }

    #[test]
    fn summary_counts_each_outcome() {
        let cases = [
            Case::new("1.0", "passes", passing),
            Case::new("1.0", "fails", failing),
            Case::new("1.1", "panics", panicking),
            Case::new("2.0", "passes too", passing),
        ];
        let summary = run_suite(&cases, &Engine::new(), None, false);

        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.records.len(), 4);
        assert!(
            summary
                .failures
                .iter()
                .any(|(id, reason)| id == "1.1 panics" && reason.contains("boom"))
        );
    }

    #[test]
    fn filter_skips_other_cases() {
        let cases = [
            Case::new("2.2", "kept", passing),
            Case::new("2.3", "dropped", failing),
        ];
        let summary = run_suite(&cases, &Engine::new(), Some("2.2"), false);

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped, 1);
    }
}
