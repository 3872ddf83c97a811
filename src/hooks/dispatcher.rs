use std::path::Path;

use super::code_quality;
use super::tooling_context;
use super::types::{HookInput, HookName, HookOutput};
use super::utils;
use super::validate_bash;
use super::validate_nx_library::{self, NxLibraryRules};
use crate::config::HooksConfig;
use crate::error::HookError;

/// Run one stdin-driven hook.
///
/// - Disabled hooks exit 0 without reading the payload
/// - Malformed JSON exits 1 with `Error: Invalid JSON input: ...` on stderr
/// - Handler errors exit 1 and are appended to `.claude/.hook-errors.log`
/// - Otherwise the handler's own output and exit code pass through
pub fn dispatch(hook: HookName, stdin_json: &str, config: &HooksConfig, cwd: &Path) -> HookOutput {
    if !config.is_enabled(hook) {
        tracing::debug!(hook = hook.name(), "hook disabled by config");
        return HookOutput::empty();
    }

    let result = HookInput::parse(stdin_json).and_then(|input| route(hook, &input));
    match result {
        Ok(output) => {
            tracing::debug!(hook = hook.name(), exit_code = output.exit_code, "hook finished");
            output
        }
        Err(err) => {
            tracing::warn!(hook = hook.name(), error = %err, "hook failed");
            if let Some(claude_dir) = utils::find_claude_dir(cwd) {
                utils::log_hook_error(&claude_dir, hook.name(), 1, &err.to_string());
            }
            HookOutput {
                stdout: String::new(),
                stderr: format!("Error: {}\n", err),
                exit_code: 1,
            }
        }
    }
}

/// Route a parsed payload to its handler. Rule tables are compiled here,
/// once per process, and handed to the handler by reference.
fn route(hook: HookName, input: &HookInput) -> Result<HookOutput, HookError> {
    match hook {
        HookName::ValidateBash => {
            let rules = validate_bash::bash_rules()?;
            Ok(validate_bash::handle(input, &rules))
        }
        HookName::ValidateNxLibrary => {
            let rules = NxLibraryRules::new()?;
            Ok(validate_nx_library::handle(input, &rules))
        }
        HookName::ToolingContext => tooling_context::handle(input),
        HookName::CodeQuality => code_quality::handle(input),
    }
}

/// Convenience: dispatch from raw CLI args.
pub fn dispatch_from_cli(
    hook_name: &str,
    stdin_json: &str,
    cwd: &Path,
) -> Result<HookOutput, HookError> {
    let hook = HookName::from_arg(hook_name).ok_or_else(|| HookError::UnknownCommand {
        name: format!("hook {}", hook_name),
        suggestion: None,
    })?;
    let config = HooksConfig::load(cwd);
    Ok(dispatch(hook, stdin_json, &config, cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(hook: HookName, stdin: &str) -> HookOutput {
        let dir = TempDir::new().unwrap();
        dispatch(hook, stdin, &HooksConfig::default(), dir.path())
    }

    #[test]
    fn test_bad_json_exits_1_for_every_hook() {
        for hook in HookName::ALL {
            let out = run(*hook, "not valid json {{{");
            assert_eq!(out.exit_code, 1, "{:?}", hook);
            assert!(out.stderr.starts_with("Error: Invalid JSON input:"));
            assert!(out.stdout.is_empty());
        }
    }

    #[test]
    fn test_empty_stdin_is_invalid() {
        let out = run(HookName::ValidateBash, "");
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn test_bad_json_logged_to_claude_dir() {
        let dir = TempDir::new().unwrap();
        let claude = dir.path().join(".claude");
        fs::create_dir_all(&claude).unwrap();

        dispatch(HookName::CodeQuality, "{", &HooksConfig::default(), dir.path());

        let log = fs::read_to_string(claude.join(".hook-errors.log")).unwrap();
        assert!(log.contains("code-quality exit=1 Invalid JSON input"));
    }

    #[test]
    fn test_validate_bash_block_passes_through() {
        let out = run(
            HookName::ValidateBash,
            r#"{"tool_name":"Bash","tool_input":{"command":"npm install lodash"}}"#,
        );
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("bun install"));
    }

    #[test]
    fn test_validate_nx_library_non_bash_exits_0() {
        let out = run(
            HookName::ValidateNxLibrary,
            r#"{"tool_name":"Read","tool_input":{"file_path":"x.ts"}}"#,
        );
        assert_eq!(out, HookOutput::empty());
    }

    #[test]
    fn test_tooling_context_session_start() {
        let out = run(HookName::ToolingContext, r#"{"hook_event_name":"SessionStart"}"#);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("\"hookEventName\":\"SessionStart\""));
    }

    #[test]
    fn test_disabled_hook_skips_even_bad_json() {
        let dir = TempDir::new().unwrap();
        let config = HooksConfig {
            disabled: vec!["validate-bash".to_string()],
        };
        let out = dispatch(HookName::ValidateBash, "{{{", &config, dir.path());
        assert_eq!(out, HookOutput::empty());
    }

    #[test]
    fn test_dispatch_from_cli_unknown_hook() {
        let dir = TempDir::new().unwrap();
        let err = dispatch_from_cli("bogus", "{}", dir.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown command: hook bogus"));
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let stdin = r#"{"tool_name":"Bash","tool_input":{"command":"npm run x && grep y z"}}"#;
        assert_eq!(run(HookName::ValidateBash, stdin), run(HookName::ValidateBash, stdin));
    }
}
