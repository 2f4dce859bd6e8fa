use colored::Colorize;

use super::Analysis;
use super::analysis::SectionStats;

pub(super) fn print_sections(analysis: &Analysis) {
    let mut sections: Vec<(&String, &SectionStats)> = analysis.sections.iter().collect();
    sections.sort_by(|a, b| compare_pass_rate(a.1, b.1).then_with(|| a.0.cmp(b.0)));

    println!("\n{}", "Sections by pass rate:".bold());
    for (name, stats) in sections {
        let line = format!(
            "  {:12} {:>4} cases | pass {:>6} | fail {:>6} | skip {:>6}",
            name,
            stats.total,
            rate(stats.passed, stats.total),
            rate(stats.failed, stats.total),
            rate(stats.skipped, stats.total)
        );
        if stats.failed > 0 {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}

fn compare_pass_rate(a: &SectionStats, b: &SectionStats) -> std::cmp::Ordering {
    let a_rate = a.passed as f64 / a.total.max(1) as f64;
    let b_rate = b.passed as f64 / b.total.max(1) as f64;
    a_rate
        .partial_cmp(&b_rate)
        .unwrap_or(std::cmp::Ordering::Equal)
}

fn rate(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", numerator as f64 * 100.0 / denominator as f64)
}
