use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HookError;

/// Host lifecycle events the hooks answer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HookEvent {
    SessionStart,
    PreToolUse,
    PostToolUse,
}

impl HookEvent {
    /// Parse an event name as the host spells it.
    pub fn from_name(s: &str) -> Option<HookEvent> {
        match s {
            "SessionStart" => Some(HookEvent::SessionStart),
            "PreToolUse" => Some(HookEvent::PreToolUse),
            "PostToolUse" => Some(HookEvent::PostToolUse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::SessionStart => "SessionStart",
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
        }
    }
}

/// The stdin-driven hooks, addressed as `ftry-hooks hook <name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookName {
    ValidateBash,
    ValidateNxLibrary,
    ToolingContext,
    CodeQuality,
}

impl HookName {
    /// Parse a hook name from a CLI argument (kebab or snake case).
    pub fn from_arg(s: &str) -> Option<HookName> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "validate-bash" => Some(HookName::ValidateBash),
            "validate-nx-library" => Some(HookName::ValidateNxLibrary),
            "tooling-context" | "add-tooling-context" => Some(HookName::ToolingContext),
            "code-quality" | "check-code-quality" => Some(HookName::CodeQuality),
            _ => None,
        }
    }

    /// Canonical kebab-case name, also the key used in the config file.
    pub fn name(&self) -> &'static str {
        match self {
            HookName::ValidateBash => "validate-bash",
            HookName::ValidateNxLibrary => "validate-nx-library",
            HookName::ToolingContext => "tooling-context",
            HookName::CodeQuality => "code-quality",
        }
    }

    /// The host event this hook is registered for.
    pub fn event(&self) -> HookEvent {
        match self {
            HookName::ValidateBash | HookName::ValidateNxLibrary => HookEvent::PreToolUse,
            HookName::ToolingContext => HookEvent::SessionStart,
            HookName::CodeQuality => HookEvent::PostToolUse,
        }
    }

    pub const ALL: &'static [HookName] = &[
        HookName::ToolingContext,
        HookName::ValidateBash,
        HookName::ValidateNxLibrary,
        HookName::CodeQuality,
    ];
}

/// Raw JSON object read from hook stdin.
/// Kept as a `serde_json::Value`; each handler reads the fields it needs.
#[derive(Debug, Clone)]
pub struct HookInput {
    pub data: Value,
}

impl HookInput {
    /// Parse stdin. Anything other than a JSON object is an input-format error.
    pub fn parse(stdin_json: &str) -> Result<HookInput, HookError> {
        let data: Value = serde_json::from_str(stdin_json)
            .map_err(|e| HookError::InvalidInput(e.to_string()))?;
        if !data.is_object() {
            return Err(HookError::InvalidInput(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(HookInput { data })
    }

    pub fn hook_event_name(&self) -> &str {
        self.data
            .get("hook_event_name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn tool_name(&self) -> &str {
        self.data
            .get("tool_name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// A string field of `tool_input`, empty when absent.
    pub fn tool_input_str(&self, key: &str) -> &str {
        self.data
            .get("tool_input")
            .and_then(|ti| ti.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn command(&self) -> &str {
        self.tool_input_str("command")
    }

    pub fn file_path(&self) -> &str {
        self.tool_input_str("file_path")
    }
}

/// Verdict of a hook, mapped one-to-one onto the host exit-code protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Proceed silently.
    Continue,
    /// Proceed, surfacing warnings.
    Warn,
    /// Abort the pending tool call.
    Block,
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Continue => 0,
            Verdict::Warn => 1,
            Verdict::Block => 2,
        }
    }
}

/// Result returned by a hook handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutput {
    /// Text to write to stdout (may be empty).
    pub stdout: String,
    /// Text to write to stderr (may be empty).
    pub stderr: String,
    /// 0 = proceed, 1 = warn, 2 = block.
    pub exit_code: i32,
}

impl HookOutput {
    pub fn ok(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn empty() -> Self {
        Self::ok(String::new())
    }

    /// Report on stderr with the exit code of `verdict`.
    pub fn verdict(verdict: Verdict, stderr: String) -> Self {
        Self {
            stdout: String::new(),
            stderr,
            exit_code: verdict.exit_code(),
        }
    }
}

/// `hookSpecificOutput` payload injecting advisory text into the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: HookEvent,
    pub additional_context: String,
}

/// Top-level JSON written to stdout for context-injecting hooks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOutput {
    pub hook_specific_output: HookSpecificOutput,
    pub suppress_output: bool,
}

impl ContextOutput {
    pub fn new(event: HookEvent, additional_context: String, suppress_output: bool) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event,
                additional_context,
            },
            suppress_output,
        }
    }

    pub fn into_hook_output(self) -> Result<HookOutput, HookError> {
        let stdout = serde_json::to_string(&self)?;
        Ok(HookOutput::ok(stdout))
    }
}
