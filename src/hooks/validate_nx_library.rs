use regex::{Regex, RegexBuilder};

use super::rules::{Findings, Rule, RuleSet, Severity};
use super::types::{HookInput, HookOutput, Verdict};

/// Compiled rules for Nx library generation commands.
///
/// Libraries in this monorepo are non-buildable, tagged with `type:` and
/// `scope:`, and live under `libs/`.
#[derive(Debug, Clone)]
pub struct NxLibraryRules {
    library_command: Regex,
    generator: Regex,
    forbidden: RuleSet,
    tags_required: Regex,
    directory_required: Regex,
    tags_value: Regex,
}

/// Recommended flags per generator, checked by literal substring.
const RECOMMENDED_FLAGS: &[(&str, &[&str])] = &[
    (
        "@nx/react:library",
        &["--bundler=none", "--unitTestRunner=vitest"],
    ),
    ("@nx/nest:library", &["--buildable=false"]),
    ("@nx/js:library", &["--bundler=none", "--unitTestRunner=vitest"]),
];

fn ci(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl NxLibraryRules {
    pub fn new() -> Result<NxLibraryRules, regex::Error> {
        Ok(NxLibraryRules {
            library_command: ci(r"nx\s+g(?:enerate)?\s+@nx/(?:react|nest|js|node):lib(?:rary)?")?,
            generator: ci(r"@nx/(react|nest|js|node):lib(?:rary)?")?,
            forbidden: RuleSet::new(vec![
                Rule::block(
                    r"--buildable(?:\s+|=)true",
                    "❌ NEVER use --buildable=true. All libraries must be non-buildable.",
                )?,
                Rule::block(
                    r"--buildable(?:\s|$)",
                    "❌ NEVER use --buildable. All libraries must be non-buildable.",
                )?,
                Rule::block(
                    r"--publishable",
                    "❌ NEVER use --publishable. Libraries are internal only.",
                )?,
            ]),
            tags_required: ci(r"--tags[=\s]+[^\s]+")?,
            directory_required: ci(r"--directory[=\s]+libs/")?,
            tags_value: ci(r"--tags[=\s]+([^\s]+)")?,
        })
    }

    /// Whether `command` generates an Nx library at all.
    pub fn is_library_command(&self, command: &str) -> bool {
        self.library_command.is_match(command)
    }

    /// Normalised generator id, e.g. `@nx/react:library`. The kind keeps the
    /// casing it was typed with.
    pub fn extract_generator(&self, command: &str) -> Option<String> {
        self.generator
            .captures(command)
            .map(|caps| format!("@nx/{}:library", &caps[1]))
    }

    /// Validate a library generation command. Every check runs; returns
    /// `(blocking, warnings, should_block)`.
    pub fn validate(&self, command: &str) -> (Vec<String>, Vec<String>, bool) {
        let mut findings: Findings = self.forbidden.evaluate(command);

        if !self.tags_required.is_match(command) {
            findings.push(
                Severity::Block,
                "❌ REQUIRED: --tags flag must include type and scope tags.\n   Example: --tags=type:feature,scope:appointments",
            );
        }

        if !self.directory_required.is_match(command) {
            findings.push(
                Severity::Block,
                "❌ REQUIRED: --directory flag must specify libs/ path.\n   Example: --directory=libs/appointments/feature-booking",
            );
        }

        if let Some(caps) = self.tags_value.captures(command) {
            let tags = &caps[1];
            if !tags.contains("type:") {
                findings.push(
                    Severity::Block,
                    "❌ Tags must include a type tag: type:feature, type:ui, type:data-access, or type:util",
                );
            }
            if !tags.contains("scope:") {
                findings.push(
                    Severity::Block,
                    "❌ Tags must include a scope tag: scope:shared, scope:appointments, etc.",
                );
            }
        }

        if let Some(generator) = self.extract_generator(command)
            && let Some((_, flags)) = RECOMMENDED_FLAGS.iter().find(|(g, _)| *g == generator)
        {
            for flag in flags.iter() {
                if !command.contains(flag) {
                    findings.push(
                        Severity::Warn,
                        format!("💡 RECOMMENDED: Add {} for non-buildable library", flag),
                    );
                }
            }
        }

        let should_block = findings.should_block();
        (findings.blocking, findings.warnings, should_block)
    }
}

/// PreToolUse handler for Nx library scaffolding.
///
/// Commands that are not library generation pass untouched (exit 0).
pub fn handle(input: &HookInput, rules: &NxLibraryRules) -> HookOutput {
    let command = input.command();
    if input.tool_name() != "Bash" || command.is_empty() {
        return HookOutput::empty();
    }
    if !rules.is_library_command(command) {
        return HookOutput::empty();
    }

    let (blocking, warnings, should_block) = rules.validate(command);
    if blocking.is_empty() && warnings.is_empty() {
        return HookOutput::empty();
    }

    let mut msg = String::new();
    if !blocking.is_empty() {
        msg.push_str("🚫 Nx Library Generation Blocked - Architecture Violation:\n\n");
        for issue in &blocking {
            msg.push_str(&format!("   {}\n\n", issue));
        }
    }
    if !warnings.is_empty() {
        msg.push_str("📋 Nx Library Recommendations:\n\n");
        for warning in &warnings {
            msg.push_str(&format!("   {}\n\n", warning));
        }
    }

    if should_block {
        msg.push_str("\n📖 Refer to .nx/NX_ARCHITECTURE.md for complete guidelines.\n");
        msg.push_str("📖 Refer to CLAUDE.md 'Nx Monorepo Architecture' section.\n\n");
        msg.push_str("✅ Example valid command:\n");
        msg.push_str("   nx g @nx/react:library feature-booking \\\n");
        msg.push_str("     --directory=libs/appointments/feature-booking \\\n");
        msg.push_str("     --tags=type:feature,scope:appointments \\\n");
        msg.push_str("     --bundler=none \\\n");
        msg.push_str("     --unitTestRunner=vitest\n");
        HookOutput::verdict(Verdict::Block, msg)
    } else {
        HookOutput::verdict(Verdict::Warn, msg)
    }
}
