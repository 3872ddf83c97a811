use std::path::Path;

use super::types::{ContextOutput, HookEvent, HookInput, HookOutput};
use crate::error::HookError;

const CODE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yml", "yaml"];

/// Which reminder a modified file earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reminder {
    Test,
    Code,
    Config,
}

/// Classify a modified file. Test files win over their extension.
pub fn classify(file_path: &str) -> Option<Reminder> {
    if file_path.is_empty() {
        return None;
    }
    if file_path.contains(".spec.") || file_path.contains(".test.") {
        return Some(Reminder::Test);
    }

    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if CODE_EXTENSIONS.contains(&ext) {
        Some(Reminder::Code)
    } else if CONFIG_EXTENSIONS.contains(&ext) {
        Some(Reminder::Config)
    } else {
        None
    }
}

pub fn reminder_text(file_path: &str, reminder: Reminder) -> String {
    let body = match reminder {
        Reminder::Test => concat!(
            "💡 Test file modified. Consider:\n",
            "   • Run tests: `nx affected --target=test` or `bun run test`\n",
            "   • Pre-commit hooks will auto-format and lint"
        ),
        Reminder::Code => concat!(
            "💡 Code file modified. Consider:\n",
            "   • Format: `bun run format` (or let pre-commit handle it)\n",
            "   • Lint: `bun run lint` to check for issues\n",
            "   • Type check: `bun run typecheck`\n",
            "   • Test: `nx affected --target=test`\n",
            "   • All checks: `bun run check-all`"
        ),
        Reminder::Config => concat!(
            "💡 Config file modified. Consider:\n",
            "   • Format: `bun run format`\n",
            "   • Test affected projects if this impacts builds"
        ),
    };
    format!("\n📋 File modified: {}\n{}", file_path, body)
}

/// PostToolUse handler: remind about formatting, linting and tests after a
/// file write. Advisory only, always exit 0.
pub fn handle(input: &HookInput) -> Result<HookOutput, HookError> {
    if !matches!(input.tool_name(), "Write" | "Edit" | "MultiEdit") {
        return Ok(HookOutput::empty());
    }

    let file_path = input.file_path();
    match classify(file_path) {
        Some(reminder) => ContextOutput::new(
            HookEvent::PostToolUse,
            reminder_text(file_path, reminder),
            false,
        )
        .into_hook_output(),
        None => Ok(HookOutput::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn write(file_path: &str) -> HookInput {
        HookInput {
            data: json!({ "tool_name": "Write", "tool_input": { "file_path": file_path } }),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("libs/a/src/thing.spec.ts"), Some(Reminder::Test));
        assert_eq!(classify("apps/web/src/App.test.tsx"), Some(Reminder::Test));
        assert_eq!(classify("apps/web/src/App.tsx"), Some(Reminder::Code));
        assert_eq!(classify("tools/build.mjs"), Some(Reminder::Code));
        assert_eq!(classify("nx.json"), Some(Reminder::Config));
        assert_eq!(classify(".github/workflows/ci.yml"), Some(Reminder::Config));
        assert_eq!(classify("README.md"), None);
        assert_eq!(classify("Makefile"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_code_file_reminder() {
        let out = handle(&write("apps/backend/src/main.ts")).unwrap();
        assert_eq!(out.exit_code, 0);
        let parsed: Value = serde_json::from_str(&out.stdout).unwrap();
        assert_eq!(parsed["hookSpecificOutput"]["hookEventName"], "PostToolUse");
        assert_eq!(parsed["suppressOutput"], false);
        let ctx = parsed["hookSpecificOutput"]["additionalContext"].as_str().unwrap();
        assert!(ctx.starts_with("\n📋 File modified: apps/backend/src/main.ts\n"));
        assert!(ctx.contains("bun run typecheck"));
    }

    #[test]
    fn test_edit_and_multiedit_are_handled() {
        for tool in ["Edit", "MultiEdit"] {
            let input = HookInput {
                data: json!({ "tool_name": tool, "tool_input": { "file_path": "a.spec.ts" } }),
            };
            let out = handle(&input).unwrap();
            assert!(out.stdout.contains("Test file modified"));
        }
    }

    #[test]
    fn test_other_tools_and_files_are_silent() {
        let input = HookInput {
            data: json!({ "tool_name": "Read", "tool_input": { "file_path": "a.ts" } }),
        };
        assert_eq!(handle(&input).unwrap(), HookOutput::empty());
        assert_eq!(handle(&write("docs/notes.md")).unwrap(), HookOutput::empty());
        let input = HookInput {
            data: json!({ "tool_name": "Write" }),
        };
        assert_eq!(handle(&input).unwrap(), HookOutput::empty());
    }
}
