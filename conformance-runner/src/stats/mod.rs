//! Per-section tallies for `--analyze`.

mod analysis;
mod issues;
mod sections;

use colored::Colorize;

pub use analysis::Analysis;

pub fn print_analysis(analysis: &Analysis) {
    let count = analysis.sections.len();
    println!(
        "\n{} {}",
        "Breakdown over".bold().cyan(),
        format!("{count} sections").bold()
    );
    sections::print_sections(analysis);
    issues::print_common_failures(analysis);
    issues::print_common_skips(analysis);
}
