use std::collections::HashMap;

use crate::runner::TestResult;

#[derive(Default, Clone, Copy)]
pub struct SectionStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Default)]
pub struct Analysis {
    pub sections: HashMap<String, SectionStats>,
    pub failure_messages: HashMap<String, usize>,
    pub skip_reasons: HashMap<String, usize>,
}

impl Analysis {
    pub fn record(&mut self, section: &str, result: &TestResult) {
        let stats = self.sections.entry(top_section(section)).or_default();
        stats.total += 1;

        match result {
            TestResult::Passed => stats.passed += 1,
            TestResult::Failed(reason) => {
                stats.failed += 1;
                *self
                    .failure_messages
                    .entry(normalize_message(reason))
                    .or_insert(0) += 1;
            }
            TestResult::Skipped(reason) => {
                stats.skipped += 1;
                *self.skip_reasons.entry(reason.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Groups numbered sections by their first three levels, so `2.3.3.3.4`
/// is counted under `2.3.3`.
fn top_section(section: &str) -> String {
    section.split('.').take(3).collect::<Vec<_>>().join(".")
}

fn normalize_message(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default().trim();
    let compact = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    let max_chars = 140;

    if compact.chars().count() <= max_chars {
        compact
    } else {
        let clipped: String = compact.chars().take(max_chars).collect();
        format!("{clipped}...")
    }
}
