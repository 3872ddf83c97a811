//! Human-readable report for a type-safety scan.

use super::type_scan::{Issue, ScanResult};

const BLOCKING_LISTING_CAP: usize = 10;
const WARNING_LISTING_CAP: usize = 5;

fn push_section(
    lines: &mut Vec<String>,
    heading: &str,
    issues: &[&Issue],
    cap: usize,
    overflow_noun: &str,
) {
    if issues.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.push("-".repeat(40));
    for issue in issues.iter().take(cap) {
        lines.push(format!("  {}:{}", issue.file.display(), issue.line));
        lines.push(format!("    {}", issue.message));
        lines.push(String::new());
    }
    if issues.len() > cap {
        lines.push(format!("  ... and {} more {}", issues.len() - cap, overflow_noun));
    }
    lines.push(String::new());
}

/// Render the banner, counters, issue listings and recommendations.
/// Lines are joined with `\n` and carry no trailing newline.
pub fn render(result: &ScanResult) -> String {
    let stats = &result.stats;
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        "TypeScript Type Safety Validation Report".to_string(),
        rule.clone(),
        String::new(),
        format!("Files Checked: {}", stats.files_checked),
        format!("'any' Usage Count: {}", stats.any_count),
        format!("Type Assertions: {}", stats.assertions_count),
        format!("Missing Type Annotations: {}", stats.missing_types),
        format!("'unknown' Usage: {}", stats.unknown_count),
        String::new(),
    ];

    if result.issues.is_empty() {
        lines.push("✅ SUCCESS: No type safety issues found!".to_string());
        lines.push("All TypeScript code follows strict typing principles.".to_string());
    } else {
        let blocking: Vec<&Issue> = result.blocking().collect();
        let warnings: Vec<&Issue> = result.warnings().collect();
        push_section(
            &mut lines,
            "❌ BLOCKING ISSUES (Must be fixed):",
            &blocking,
            BLOCKING_LISTING_CAP,
            "blocking issues",
        );
        push_section(
            &mut lines,
            "⚠️  WARNINGS (Should be addressed):",
            &warnings,
            WARNING_LISTING_CAP,
            "warnings",
        );
    }

    if stats.any_count > 0 {
        lines.push("📝 RECOMMENDATIONS:".to_string());
        lines.push("-".repeat(40));
        lines.push("1. Replace 'any' with proper types or generics".to_string());
        lines.push("2. Use 'unknown' with type guards for truly unknown types".to_string());
        lines.push("3. Create type definitions for third-party libraries".to_string());
        lines.push("4. Consider using the /strict-types command to auto-fix issues".to_string());
        lines.push(String::new());
    }

    lines.push(rule);
    lines.join("\n")
}
