//! Commit-time documentation policy.
//!
//! 1. Documentation lives in the Docusaurus app (`apps/docs/docs/`)
//! 2. No standalone markdown outside it, apart from an allow-list
//! 3. Code changes should come with documentation changes (warning only)
//! 4. The docs site still builds when docs change
//!
//! Exit codes: 0 = pass, 1 = policy failure.

use std::path::Path;
use std::process::Command;

use super::docs_build::{BuildOutcome, DOCS_BUILD_TIMEOUT, DocsBuilder, NxDocsBuilder};
use crate::hooks::types::HookOutput;

pub const DOCS_ROOT: &str = "apps/docs/docs/";
pub const DOCS_APP_ROOT: &str = "apps/docs/";
pub const LEGACY_DOCS_ROOT: &str = "docs/";
pub const LEGACY_DOCS_INDEX: &str = "docs/README.md";
pub const ALLOWED_MARKDOWN: &[&str] = &["CLAUDE.md", "CHANGELOG.md", "CONTRIBUTING.md", "LICENSE.md"];
const EXEMPT_PREFIX: &str = ".claude/";
const CODE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".py", ".prisma"];
const UNDOCUMENTED_LISTING_CAP: usize = 5;

const RED: &str = "\x1b[0;31m";
const YELLOW: &str = "\x1b[1;33m";
const GREEN: &str = "\x1b[0;32m";
const NC: &str = "\x1b[0m";

/// Files staged in the index. A git failure reads as "nothing staged".
pub fn get_staged_files(cwd: &Path) -> Vec<String> {
    let output = match Command::new("git")
        .args(["diff", "--cached", "--name-only"])
        .current_dir(cwd)
        .output()
    {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!(error = %e, "could not run git diff --cached");
            return Vec::new();
        }
    };
    if !output.status.success() {
        tracing::warn!(
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git diff --cached failed"
        );
        return Vec::new();
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

/// Markdown files that sit outside the Docusaurus docs tree.
pub fn forbidden_markdown_files(staged: &[String]) -> Vec<String> {
    let mut forbidden = Vec::new();
    for file in staged {
        if !file.ends_with(".md") {
            continue;
        }

        if file.starts_with(LEGACY_DOCS_ROOT) && file != LEGACY_DOCS_INDEX {
            forbidden.push(file.clone());
            continue;
        }

        if !file.ends_with("README.md")
            && !file.starts_with(DOCS_ROOT)
            && !ALLOWED_MARKDOWN.iter().any(|allowed| file.ends_with(allowed))
            && !file.starts_with(EXEMPT_PREFIX)
        {
            forbidden.push(file.clone());
        }
    }
    forbidden
}

/// Non-test source changes under `apps/` or `libs/`, returned only when no
/// file under the docs tree is staged alongside them.
pub fn undocumented_code_changes(staged: &[String]) -> Vec<String> {
    if staged.iter().any(|f| f.starts_with(DOCS_ROOT)) {
        return Vec::new();
    }
    staged
        .iter()
        .filter(|f| CODE_EXTENSIONS.iter().any(|ext| f.ends_with(ext)))
        .filter(|f| f.starts_with("apps/") || f.starts_with("libs/"))
        .filter(|f| !(f.contains(".spec.") || f.contains(".test.")))
        .cloned()
        .collect()
}

fn build_failure_message(outcome: &BuildOutcome, stdout: &mut String, stderr: &mut String) {
    match outcome {
        BuildOutcome::Passed => {}
        BuildOutcome::Failed {
            stdout: out,
            stderr: err,
        } => {
            stderr.push_str(&error_line("Docusaurus build failed!"));
            stdout.push_str(out);
            stdout.push('\n');
            stderr.push_str(err);
            stderr.push('\n');
        }
        BuildOutcome::BrokenLinks { stdout: out } => {
            stderr.push_str(&error_line("Docusaurus build found broken links!"));
            stdout.push_str(out);
            stdout.push('\n');
        }
        BuildOutcome::TimedOut { after } => {
            stderr.push_str(&error_line(&format!(
                "Docusaurus build timed out (>{}s)",
                after.as_secs()
            )));
        }
        BuildOutcome::LaunchFailed { reason } => {
            stderr.push_str(&error_line(&format!(
                "Failed to run Docusaurus build: {}",
                reason
            )));
        }
    }
}

fn error_line(message: &str) -> String {
    format!("{}❌ {}{}\n", RED, message, NC)
}

fn warning_line(message: &str) -> String {
    format!("{}⚠️  {}{}\n", YELLOW, message, NC)
}

/// Apply the documentation policy to a staged file list.
pub fn validate_staged(staged: &[String], builder: &dyn DocsBuilder) -> HookOutput {
    let mut stdout = String::new();
    let mut stderr = String::new();

    if staged.is_empty() {
        stdout.push_str("No staged files to validate\n");
        return HookOutput::ok(stdout);
    }

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let forbidden = forbidden_markdown_files(staged);
    if !forbidden.is_empty() {
        errors.push("Forbidden markdown files outside Docusaurus:".to_string());
        for file in &forbidden {
            errors.push(format!("  - {}", file));
        }
        errors.push(String::new());
        errors.push(format!(
            "CRITICAL: All documentation MUST be in Docusaurus ({})",
            DOCS_ROOT
        ));
        errors.push(String::new());
        errors.push("To fix:".to_string());
        errors.push(format!("  1. Move content to {}", DOCS_ROOT));
        errors.push("  2. Update apps/docs/sidebars.ts".to_string());
        errors.push("  3. Remove the forbidden file".to_string());
        errors.push("  4. Run: nx build docs".to_string());
    }

    let undocumented = undocumented_code_changes(staged);
    if !undocumented.is_empty() {
        warnings.push("Code changes detected without documentation updates:".to_string());
        for file in undocumented.iter().take(UNDOCUMENTED_LISTING_CAP) {
            warnings.push(format!("  - {}", file));
        }
        if undocumented.len() > UNDOCUMENTED_LISTING_CAP {
            warnings.push(format!(
                "  ... and {} more files",
                undocumented.len() - UNDOCUMENTED_LISTING_CAP
            ));
        }
        warnings.push(String::new());
        warnings.push("Consider running: /sync-docs".to_string());
        warnings.push(format!("Or add documentation manually in {}", DOCS_ROOT));
    }

    let doc_changes = staged.iter().filter(|f| f.starts_with(DOCS_APP_ROOT)).count();
    if doc_changes > 0 {
        stdout.push_str(&format!(
            "\n{} documentation file(s) changed. Validating...\n",
            doc_changes
        ));
        stdout.push_str("Validating Docusaurus build...\n");
        let outcome = builder.build();
        tracing::debug!(?outcome, "docs build finished");
        if !outcome.passed() {
            build_failure_message(&outcome, &mut stdout, &mut stderr);
            errors.push("Docusaurus build validation failed!".to_string());
            errors.push("Fix broken links or build errors before committing.".to_string());
            errors.push(String::new());
            errors.push("To debug:".to_string());
            errors.push("  nx build docs".to_string());
            errors.push("  nx serve docs  # Preview at http://localhost:3002".to_string());
        }
    }

    let rule = "=".repeat(60);
    if !warnings.is_empty() {
        stderr.push_str(&format!("\n{}{}{}\n", YELLOW, rule, NC));
        for warning in &warnings {
            stderr.push_str(&warning_line(warning));
        }
        stderr.push_str(&format!("{}{}{}\n\n", YELLOW, rule, NC));
    }

    if !errors.is_empty() {
        stderr.push_str(&format!("\n{}{}{}\n", RED, rule, NC));
        for error in &errors {
            stderr.push_str(&error_line(error));
        }
        stderr.push_str(&format!("{}{}{}\n\n", RED, rule, NC));
        return HookOutput {
            stdout,
            stderr,
            exit_code: 1,
        };
    }

    if doc_changes > 0 {
        stdout.push_str(&format!("{}✅ Documentation validation passed!{}\n", GREEN, NC));
    }

    HookOutput {
        stdout,
        stderr,
        exit_code: 0,
    }
}

/// `ftry-hooks validate-docs`: run the policy on the git index of `cwd`.
pub fn execute(cwd: &Path) -> HookOutput {
    let staged = get_staged_files(cwd);
    tracing::debug!(count = staged.len(), timeout_secs = DOCS_BUILD_TIMEOUT.as_secs(), "validating staged files");
    let builder = NxDocsBuilder::new(cwd.to_path_buf());
    validate_staged(&staged, &builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    struct FakeBuilder {
        outcome: BuildOutcome,
        calls: Cell<usize>,
    }

    impl FakeBuilder {
        fn new(outcome: BuildOutcome) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl DocsBuilder for FakeBuilder {
        fn build(&self) -> BuildOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn files(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_staged_list_skips_everything() {
        let builder = FakeBuilder::new(BuildOutcome::Passed);
        let out = validate_staged(&[], &builder);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "No staged files to validate\n");
        assert_eq!(builder.calls.get(), 0);
    }

    #[test]
    fn test_forbidden_markdown_rules() {
        let staged = files(&[
            "docs/guide.md",
            "docs/README.md",
            "README.md",
            "libs/ui/README.md",
            "apps/docs/docs/intro.md",
            "CLAUDE.md",
            "CHANGELOG.md",
            "apps/backend/CONTRIBUTING.md",
            ".claude/commands/sync-docs.md",
            "notes/plan.md",
            "apps/frontend/ARCHITECTURE.md",
            "src/index.ts",
        ]);
        assert_eq!(
            forbidden_markdown_files(&staged),
            vec![
                "docs/guide.md".to_string(),
                "notes/plan.md".to_string(),
                "apps/frontend/ARCHITECTURE.md".to_string(),
            ]
        );
    }

    #[test]
    fn test_legacy_nested_readme_is_forbidden() {
        let staged = files(&["docs/api/README.md"]);
        assert_eq!(forbidden_markdown_files(&staged), staged);
    }

    #[test]
    fn test_undocumented_code_changes() {
        let staged = files(&[
            "apps/backend/src/main.ts",
            "libs/ui/src/button.tsx",
            "libs/ui/src/button.spec.tsx",
            "apps/backend/src/app.test.ts",
            "scripts/seed.ts",
            "apps/backend/prisma/schema.prisma",
        ]);
        assert_eq!(
            undocumented_code_changes(&staged),
            files(&[
                "apps/backend/src/main.ts",
                "libs/ui/src/button.tsx",
                "apps/backend/prisma/schema.prisma",
            ])
        );

        let mut with_docs = staged.clone();
        with_docs.push("apps/docs/docs/backend.md".to_string());
        assert!(undocumented_code_changes(&with_docs).is_empty());
    }

    #[test]
    fn test_code_without_docs_warns_but_passes() {
        let builder = FakeBuilder::new(BuildOutcome::Passed);
        let staged: Vec<String> = (0..7).map(|i| format!("libs/core/src/f{}.ts", i)).collect();
        let out = validate_staged(&staged, &builder);
        assert_eq!(out.exit_code, 0);
        assert!(out.stderr.contains("Code changes detected without documentation updates:"));
        assert!(out.stderr.contains("  - libs/core/src/f4.ts"));
        assert!(!out.stderr.contains("  - libs/core/src/f5.ts"));
        assert!(out.stderr.contains("  ... and 2 more files"));
        assert_eq!(builder.calls.get(), 0);
    }

    #[test]
    fn test_forbidden_file_fails() {
        let builder = FakeBuilder::new(BuildOutcome::Passed);
        let out = validate_staged(&files(&["docs/setup.md"]), &builder);
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.contains("Forbidden markdown files outside Docusaurus:"));
        assert!(out.stderr.contains("  - docs/setup.md"));
        assert!(out.stderr.contains("CRITICAL: All documentation MUST be in Docusaurus"));
    }

    #[test]
    fn test_docs_change_runs_build_and_passes() {
        let builder = FakeBuilder::new(BuildOutcome::Passed);
        let out = validate_staged(&files(&["apps/docs/docs/intro.md", "apps/docs/sidebars.ts"]), &builder);
        assert_eq!(builder.calls.get(), 1);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("2 documentation file(s) changed. Validating..."));
        assert!(out.stdout.contains("Documentation validation passed!"));
    }

    #[test]
    fn test_build_failures_each_fail_validation() {
        let cases = vec![
            (
                BuildOutcome::Failed {
                    stdout: "compiling".into(),
                    stderr: "Error: boom".into(),
                },
                "Docusaurus build failed!",
            ),
            (
                BuildOutcome::BrokenLinks {
                    stdout: "Broken link on /intro".into(),
                },
                "Docusaurus build found broken links!",
            ),
            (
                BuildOutcome::TimedOut {
                    after: Duration::from_secs(120),
                },
                "Docusaurus build timed out (>120s)",
            ),
            (
                BuildOutcome::LaunchFailed {
                    reason: "No such file or directory".into(),
                },
                "Failed to run Docusaurus build: No such file or directory",
            ),
        ];

        for (outcome, message) in cases {
            let builder = FakeBuilder::new(outcome);
            let out = validate_staged(&files(&["apps/docs/docs/intro.md"]), &builder);
            assert_eq!(out.exit_code, 1, "{}", message);
            assert!(out.stderr.contains(message), "{}", message);
            assert!(out.stderr.contains("Docusaurus build validation failed!"));
            assert!(!out.stdout.contains("Documentation validation passed!"));
        }
    }

    #[test]
    fn test_failed_build_echoes_output() {
        let builder = FakeBuilder::new(BuildOutcome::Failed {
            stdout: "step 1 ok".into(),
            stderr: "step 2 exploded".into(),
        });
        let out = validate_staged(&files(&["apps/docs/docusaurus.config.ts"]), &builder);
        assert!(out.stdout.contains("step 1 ok"));
        assert!(out.stderr.contains("step 2 exploded"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let staged = files(&["docs/a.md", "apps/web/src/a.ts"]);
        let a = validate_staged(&staged, &FakeBuilder::new(BuildOutcome::Passed));
        let b = validate_staged(&staged, &FakeBuilder::new(BuildOutcome::Passed));
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_staged_files_outside_git_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let staged = get_staged_files(dir.path());
        assert!(staged.is_empty());
    }
}
