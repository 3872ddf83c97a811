//! `ftry-hooks validate-types <paths...>`: pre-commit type-safety gate.
//!
//! The path arguments only decide whether to run. When any of them is a
//! TypeScript file the whole working tree is scanned.

use std::path::Path;

use super::type_report;
use super::type_scan::{self, TypeScanner};
use crate::error::HookError;
use crate::hooks::types::HookOutput;

const TS_EXTENSIONS: &[&str] = &[".ts", ".tsx"];

pub fn execute(args: &[String], cwd: &Path) -> Result<HookOutput, HookError> {
    if args.is_empty() {
        return Ok(HookOutput::ok(
            "ℹ️  TypeScript validation hook - no files to validate\n".to_string(),
        ));
    }
    if !args
        .iter()
        .any(|a| TS_EXTENSIONS.iter().any(|ext| a.ends_with(ext)))
    {
        return Ok(HookOutput::ok("ℹ️  No TypeScript files to validate\n".to_string()));
    }

    let scanner = TypeScanner::new()?;
    let files = type_scan::find_typescript_files(cwd);
    tracing::debug!(files = files.len(), root = %cwd.display(), "scanning TypeScript files");
    let result = scanner.scan_files(cwd, &files);

    let mut stdout = String::from("🔍 Running TypeScript type safety validation...\n");
    stdout.push_str(&type_report::render(&result));
    stdout.push('\n');

    let exit_code = if result.should_block() {
        stdout.push_str("\n❌ COMMIT BLOCKED: Fix type safety issues before committing.\n");
        stdout.push_str("💡 TIP: Run '/strict-types' to get automated fixes for these issues.\n");
        1
    } else {
        stdout.push_str("\n✅ TypeScript validation passed! Code follows strict typing principles.\n");
        0
    };

    Ok(HookOutput {
        stdout,
        stderr: String::new(),
        exit_code,
    })
}
