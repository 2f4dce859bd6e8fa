use thenable::Engine;

use crate::harness::Harness;
use crate::suite::Case;

#[derive(Debug, Clone)]
pub enum TestResult {
    Passed,
    Failed(String),
    Skipped(String),
}

impl TestResult {
    pub fn label(&self) -> &'static str {
        match self {
            TestResult::Passed => "passed",
            TestResult::Failed(_) => "failed",
            TestResult::Skipped(_) => "skipped",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TestResult::Passed => None,
            TestResult::Failed(reason) | TestResult::Skipped(reason) => Some(reason),
        }
    }
}

pub fn run_test(case: &Case, engine: &Engine) -> TestResult {
    let harness = Harness::new(engine);
    if let Err(reason) = (case.run)(&harness) {
        return TestResult::Failed(reason);
    }

    // Work the case left queued must still drain cleanly.
    match harness.drain() {
        Ok(()) => TestResult::Passed,
        Err(reason) => TestResult::Failed(reason),
    }
}
