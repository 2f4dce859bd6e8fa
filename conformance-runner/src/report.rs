use std::fs;
use std::path::Path;

use serde::Serialize;
use thenable::Engine;

use crate::execution::SuiteSummary;

#[derive(Serialize)]
struct Report<'a> {
    engine: &'a Engine,
    passed: usize,
    failed: usize,
    skipped: usize,
    elapsed_secs: f64,
    cases: Vec<CaseReport<'a>>,
}

#[derive(Serialize)]
struct CaseReport<'a> {
    id: &'a str,
    section: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

fn build_report<'a>(
    engine: &'a Engine,
    summary: &'a SuiteSummary,
    elapsed_secs: f64,
) -> Report<'a> {
    Report {
        engine,
        passed: summary.passed,
        failed: summary.failed,
        skipped: summary.skipped,
        elapsed_secs,
        cases: summary
            .records
            .iter()
            .map(|record| CaseReport {
                id: &record.id,
                section: record.section,
                status: record.result.label(),
                reason: record.result.reason(),
            })
            .collect(),
    }
}

pub fn write_report(
    path: &Path,
    engine: &Engine,
    summary: &SuiteSummary,
    elapsed_secs: f64,
) -> Result<(), String> {
    let report = build_report(engine, summary, elapsed_secs);
    let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
    fs::write(path, json).map_err(|err| format!("failed to write {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::CaseRecord;
    use crate::runner::TestResult;
    use crate::stats::Analysis;

    #[test]
    fn report_lists_cases_with_reasons_only_on_failure() {
        let summary = SuiteSummary {
            passed: 1,
            failed: 1,
            skipped: 0,
            failures: vec![("2.1.2 b".into(), "wrong".into())],
            records: vec![
                CaseRecord {
                    id: "2.1.2 a".into(),
                    section: "2.1.2",
                    result: TestResult::Passed,
                },
                CaseRecord {
                    id: "2.1.2 b".into(),
                    section: "2.1.2",
                    result: TestResult::Failed("wrong".into()),
                },
            ],
            analysis: Analysis::default(),
        };
        let engine = Engine::new().with_max_steps(10);

        let json = serde_json::to_value(build_report(&engine, &summary, 0.5)).unwrap();
        assert_eq!(json["engine"]["max_steps"], 10);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["cases"][0]["status"], "passed");
        assert!(json["cases"][0].get("reason").is_none());
        assert_eq!(json["cases"][1]["reason"], "wrong");
    }
}
