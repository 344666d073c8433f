//! Console report of completed domains.

use crate::models::{DomainRecord, DomainReport};

/// Formats one completed domain for the console.
///
/// A domain with an error is a single `ERROR` line; otherwise a `DONE` line
/// is followed by one line per MX target.
pub fn format_domain(report: &DomainReport) -> String {
    if let Some(error) = &report.error {
        return format!("ERROR {error} FOR {}", report.domain);
    }
    let mut lines = vec![format!("DONE {}", report.domain)];
    for mx in &report.mx_array {
        lines.push(match &mx.error {
            None => format!(
                "\tOK\t{}\t{}\t{}",
                mx.preference,
                mx.exchange_ip.as_deref().unwrap_or_default(),
                mx.exchange
            ),
            Some(error) => format!("ERROR {error} FOR ({}) {}", mx.preference, mx.exchange),
        });
    }
    lines.join("\n")
}

/// Prints a completed domain to standard output.
pub fn print_domain(record: &DomainRecord) {
    println!("{}", format_domain(&record.report()));
}
