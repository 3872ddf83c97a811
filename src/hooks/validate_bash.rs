use super::rules::{Rule, RuleSet};
use super::types::{HookInput, HookOutput, Verdict};

/// Project tooling rules for shell commands, in reporting order.
pub fn bash_rules() -> Result<RuleSet, regex::Error> {
    Ok(RuleSet::new(vec![
        // Package manager enforcement
        Rule::block(
            r"\b(npm|npx|yarn|pnpm|node)\b",
            "⚠️ Use 'bun' instead of npm/yarn/pnpm/node. This project exclusively uses Bun as the runtime and package manager.",
        )?
        .unless_followed_by(r"\s+(install|init|create)")?,
        Rule::block(
            r"\bnpm\s+install\b",
            "⚠️ Use 'bun install' instead of 'npm install'",
        )?,
        Rule::block(r"\bnpm\s+run\b", "⚠️ Use 'bun run' instead of 'npm run'")?,
        Rule::block(
            r"\byarn\s+(?:install|add|remove)",
            "⚠️ Use 'bun install/add/remove' instead of yarn commands",
        )?,
        // Nx picks up bun through the packageManager field
        Rule::warn(
            r"\bbun\s+nx\b",
            "ℹ️ Call 'nx' directly, not 'bun nx'. Nx automatically uses bun via packageManager field.",
        )?,
        // Dedicated host tools over shell utilities
        Rule::warn(
            r"\bgrep\b",
            "ℹ️ Use the Grep tool instead of 'grep' command for better performance and features",
        )?
        .unless_followed_by(r".*\|")?,
        Rule::warn(
            r"\bfind\s+\S+\s+-name\b",
            "ℹ️ Use the Glob tool instead of 'find -name' for pattern matching",
        )?,
        Rule::warn(
            r"\bcat\s+[^\|]+(?:\||$)",
            "ℹ️ Use the Read tool instead of 'cat' for reading files",
        )?,
        Rule::warn(
            r"\b(sed|awk)\b",
            "ℹ️ Use the Edit tool instead of 'sed/awk' for file modifications",
        )?,
        // Git hygiene
        Rule::warn(
            r"git\s+commit.*--no-verify",
            "⚠️ Avoid --no-verify flag. Pre-commit hooks ensure code quality.",
        )?,
        Rule::warn(
            r"git\s+push.*--force",
            "⚠️ Use 'git push --force-with-lease' instead of '--force' for safer force pushes",
        )?
        .unless_followed_by(r"-with-lease")?,
    ]))
}

/// Validate one shell command against the project tooling rules.
///
/// Every rule is checked; returns `(blocking, warnings, should_block)`.
pub fn validate_command(rules: &RuleSet, command: &str) -> (Vec<String>, Vec<String>, bool) {
    let findings = rules.evaluate(command);
    let should_block = findings.should_block();
    (findings.blocking, findings.warnings, should_block)
}

/// PreToolUse handler for `Bash` tool calls.
///
/// Exit 2 when a blocking rule matched, 1 for warnings only, 0 otherwise.
pub fn handle(input: &HookInput, rules: &RuleSet) -> HookOutput {
    let command = input.command();
    if input.tool_name() != "Bash" || command.is_empty() {
        return HookOutput::empty();
    }

    let (blocking, warnings, should_block) = validate_command(rules, command);
    if blocking.is_empty() && warnings.is_empty() {
        return HookOutput::empty();
    }

    let mut msg = String::new();
    if !blocking.is_empty() {
        msg.push_str("🚫 Command Blocked - Project Standards Violation:\n\n");
        for issue in &blocking {
            msg.push_str(&format!("   {}\n\n", issue));
        }
    }
    if !warnings.is_empty() {
        msg.push_str("📋 Recommendations:\n\n");
        for issue in &warnings {
            msg.push_str(&format!("   {}\n\n", issue));
        }
    }

    if should_block {
        msg.push_str("\nRefer to CLAUDE.md for project tooling standards.\n");
        HookOutput::verdict(Verdict::Block, msg)
    } else {
        HookOutput::verdict(Verdict::Warn, msg)
    }
}
