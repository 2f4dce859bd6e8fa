use std::cmp::Reverse;

use colored::Colorize;

use super::Analysis;

pub(super) fn print_common_failures(analysis: &Analysis) {
    print_ranked("Most common failure messages:", &analysis.failure_messages, 10);
}

pub(super) fn print_common_skips(analysis: &Analysis) {
    print_ranked("Most common skip reasons:", &analysis.skip_reasons, 5);
}

fn print_ranked(title: &str, counts: &std::collections::HashMap<String, usize>, limit: usize) {
    let mut ranked: Vec<_> = counts.iter().map(|(msg, count)| (msg.as_str(), *count)).collect();
    if ranked.is_empty() {
        return;
    }
    ranked.sort_by_key(|&(msg, count)| (Reverse(count), msg));

    println!("\n{}", title.bold());
    for (message, count) in ranked.into_iter().take(limit) {
        println!("  {:>4}x {}", count, message);
    }
}
