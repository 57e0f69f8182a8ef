// crates/policy-probe-cli/src/report.rs
// ============================================================================
// Module: Report Renderers
// Description: Console, JSON, and JUnit renderings of a run summary.
// Purpose: Turn one finished summary into the selected output format.
// Dependencies: colored, policy-probe-config, policy-probe-core, serde_json
// ============================================================================

//! ## Overview
//! Renderers are pure consumers of a finished [`RunSummary`]: the console
//! format targets humans, JSON targets programmatic analysis, and JUnit XML
//! targets CI ingestion. None of them influence execution or exit codes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use colored::Colorize;
use policy_probe_config::ReportFormat;
use policy_probe_core::CheckResult;
use policy_probe_core::CheckStatus;
use policy_probe_core::RunSummary;
use serde_json::json;

// ============================================================================
// SECTION: Reporter Trait
// ============================================================================

/// Renders a finished summary into one output document.
pub(crate) trait Reporter {
    /// Produces the report text for the summary.
    fn render(&self, summary: &RunSummary) -> String;
}

/// Returns the renderer for the selected format.
pub(crate) fn reporter_for(format: ReportFormat) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Console => Box::new(ConsoleReporter),
        ReportFormat::Json => Box::new(JsonReporter),
        ReportFormat::Junit => Box::new(JunitReporter),
    }
}

// ============================================================================
// SECTION: Console
// ============================================================================

/// Maximum result count for which the console report lists every check.
const CONSOLE_FULL_LISTING_LIMIT: usize = 20;

/// Human-readable colored console report.
pub(crate) struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn render(&self, summary: &RunSummary) -> String {
        let mut lines = Vec::new();

        lines.push(format!("\n{}", "Policy Probe Results".bold()));
        lines.push("=".repeat(60));

        lines.push(format!("\n{}", "Summary:".bold()));
        lines.push(format!("  Total Checks: {}", summary.total));
        lines.push(format!("  {}", format!("Passed: {}", summary.passed).green()));
        lines.push(format!("  {}", format!("Failed: {}", summary.failed).red()));
        lines.push(format!("  {}", format!("Skipped: {}", summary.skipped).yellow()));
        lines.push(format!("  {}", format!("Errors: {}", summary.errors).red()));
        lines.push(format!("  Duration: {:.2}s", summary.duration_seconds()));

        if summary.success() {
            lines.push(format!("\n{}", "✓ ALL CHECKS PASSED".green().bold()));
        } else {
            lines.push(format!("\n{}", "✗ CHECKS FAILED".red().bold()));
        }

        let failed: Vec<&CheckResult> =
            summary.results.iter().filter(|result| result.status.is_failure()).collect();
        if !failed.is_empty() {
            lines.push(format!("\n{}", "Failed Checks:".bold()));
            for result in failed {
                lines.push(format!("\n  {}", format!("✗ {}", result.name).red()));
                lines.push(format!("    {}", result.message));
                if let Some(details) = &result.details {
                    lines.push(format!("    Details: {details}"));
                }
                lines.push(format!("    Duration: {:.2}ms", result.duration_ms()));
            }
        }

        if summary.total <= CONSOLE_FULL_LISTING_LIMIT {
            lines.push(format!("\n{}", "All Checks:".bold()));
            for result in &summary.results {
                let symbol = match result.status {
                    CheckStatus::Pass => "✓".green().to_string(),
                    CheckStatus::Skip => "○".yellow().to_string(),
                    CheckStatus::Fail | CheckStatus::Error => "✗".red().to_string(),
                };
                lines.push(format!(
                    "  {symbol} {} ({:.2}ms)",
                    result.name,
                    result.duration_ms()
                ));
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

// ============================================================================
// SECTION: JSON
// ============================================================================

/// Machine-readable JSON report.
pub(crate) struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, summary: &RunSummary) -> String {
        let report = json!({
            "summary": {
                "total": summary.total,
                "passed": summary.passed,
                "failed": summary.failed,
                "skipped": summary.skipped,
                "errors": summary.errors,
                "duration_seconds": summary.duration_seconds(),
                "success": summary.success(),
            },
            "results": summary.results.iter().map(|result| {
                json!({
                    "name": result.name,
                    "status": result.status.as_str(),
                    "duration_ms": result.duration_ms(),
                    "message": result.message,
                    "details": result.details,
                })
            }).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// SECTION: JUnit
// ============================================================================

/// JUnit XML report for CI ingestion.
pub(crate) struct JunitReporter;

impl Reporter for JunitReporter {
    fn render(&self, summary: &RunSummary) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<testsuite name=\"Policy Probe\" tests=\"{}\" failures=\"{}\" errors=\"{}\" \
             skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total,
            summary.failed,
            summary.errors,
            summary.skipped,
            summary.duration_seconds()
        ));
        for result in &summary.results {
            let name = xml_escape(&result.name);
            let time = result.duration.as_secs_f64();
            match result.status {
                CheckStatus::Pass => {
                    out.push_str(&format!("  <testcase name=\"{name}\" time=\"{time:.3}\"/>\n"));
                }
                CheckStatus::Fail => {
                    push_testcase_with_child(&mut out, &name, time, "failure", result);
                }
                CheckStatus::Error => {
                    push_testcase_with_child(&mut out, &name, time, "error", result);
                }
                CheckStatus::Skip => {
                    out.push_str(&format!("  <testcase name=\"{name}\" time=\"{time:.3}\">\n"));
                    out.push_str(&format!(
                        "    <skipped message=\"{}\"/>\n",
                        xml_escape(&result.message)
                    ));
                    out.push_str("  </testcase>\n");
                }
            }
        }
        out.push_str("</testsuite>\n");
        out
    }
}

/// Appends a testcase carrying a failure or error child element.
fn push_testcase_with_child(
    out: &mut String,
    name: &str,
    time: f64,
    child: &str,
    result: &CheckResult,
) {
    out.push_str(&format!("  <testcase name=\"{name}\" time=\"{time:.3}\">\n"));
    let message = xml_escape(&result.message);
    let body = result.details.as_ref().map(ToString::to_string).unwrap_or_default();
    out.push_str(&format!(
        "    <{child} message=\"{message}\">{}</{child}>\n",
        xml_escape(&body)
    ));
    out.push_str("  </testcase>\n");
}

/// Escapes text for XML attribute and element content.
pub(crate) fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
