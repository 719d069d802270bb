use super::{RuleCategory, ValidationReport};
use std::fmt::Write;

/// Formats validation reports into human-readable summaries.
pub struct ReportFormatter;

impl ReportFormatter {
    /// One line per rule grouped by category, followed by any diagnostics.
    pub fn format_report(report: &ValidationReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::headline(report));

        let mut current: Option<RuleCategory> = None;
        for result in &report.results {
            if current != Some(result.category) {
                current = Some(result.category);
                let _ = writeln!(out, "\n[{}]", result.category);
            }
            let mark = if result.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "  {} {}: {}", mark, result.rule_id, result.message);
        }

        if !report.diagnostics.is_empty() {
            let _ = writeln!(out, "\ndiagnostics:");
            for diagnostic in &report.diagnostics {
                let _ = writeln!(out, "  - {}", diagnostic);
            }
        }
        out
    }

    /// Single-line verdict, e.g. `15/17 rules passed (1 blocking), 5 nodes`.
    pub fn headline(report: &ValidationReport) -> String {
        let total = report.results.len();
        let passed = report.results.iter().filter(|r| r.passed).count();
        let blocking = report.blocking_failures().count();
        let verdict = if report.passed() {
            "Workflow is valid"
        } else if blocking > 0 {
            "Workflow is NOT executable"
        } else {
            "Workflow is executable with open issues"
        };
        format!(
            "{}: {}/{} rules passed ({} blocking), {} nodes",
            verdict, passed, total, blocking, report.node_count
        )
    }
}
