use std::io::Read;
use std::path::Path;

use crate::commands::{install_hooks, settings, validate_docs, validate_types};
use crate::error::HookError;
use crate::hooks::{self, types::HookName, types::HookOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hook,
    ValidateDocs,
    ValidateTypes,
    InstallHooks,
    Settings,
    Version,
    Help,
}

impl Command {
    pub fn from_arg(s: &str) -> Option<Command> {
        match s {
            "hook" => Some(Command::Hook),
            "validate-docs" => Some(Command::ValidateDocs),
            "validate-types" => Some(Command::ValidateTypes),
            "install-hooks" => Some(Command::InstallHooks),
            "settings" => Some(Command::Settings),
            "version" | "--version" | "-V" => Some(Command::Version),
            "help" | "--help" | "-h" => Some(Command::Help),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Hook => "hook",
            Command::ValidateDocs => "validate-docs",
            Command::ValidateTypes => "validate-types",
            Command::InstallHooks => "install-hooks",
            Command::Settings => "settings",
            Command::Version => "version",
            Command::Help => "help",
        }
    }

    /// All known canonical command names.
    fn all_names() -> &'static [&'static str] {
        &[
            "hook", "validate-docs", "validate-types", "install-hooks", "settings", "version",
            "help",
        ]
    }

    /// Suggest the closest command name for a typo.
    pub fn suggest(input: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, usize)> = None;
        for name in Self::all_names() {
            let dist = edit_distance(input, name);
            if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
                best = Some((name, dist));
            }
        }
        best.map(|(name, _)| name)
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1).min(dp[i][j - 1] + 1).min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[a.len()][b.len()]
}

pub fn help_text() -> String {
    let hook_names: Vec<&str> = HookName::ALL.iter().map(|h| h.name()).collect();
    format!(
        "ftry-hooks {}\n\n\
         Usage: ftry-hooks <command> [args...]\n\n\
         Commands:\n\
         \x20 hook <name>              Run a host hook, reading its JSON payload from stdin\n\
         \x20                          ({})\n\
         \x20 validate-docs            Check staged files against the documentation policy\n\
         \x20 validate-types <paths>   Scan TypeScript sources for type-safety issues\n\
         \x20 install-hooks            Install the git pre-commit hook\n\
         \x20 settings                 Print the host hooks settings block\n\
         \x20 version                  Print the version\n\
         \x20 help                     Show this message\n",
        env!("CARGO_PKG_VERSION"),
        hook_names.join(", ")
    )
}

/// Route `args` (including the program name at index 0). `stdin` is only
/// read by `hook`.
pub fn run_cli(args: &[String], cwd: &Path, stdin: &mut dyn Read) -> Result<HookOutput, HookError> {
    if args.len() < 2 {
        return Err(HookError::Usage("ftry-hooks <command> [args...]"));
    }

    let command = Command::from_arg(args[1].as_str());
    tracing::debug!(command = ?command.map(|c| c.name()), "routing");
    match command {
        Some(Command::Hook) => {
            if args.len() < 3 {
                return Err(HookError::Usage("ftry-hooks hook <name>"));
            }
            let mut stdin_json = String::new();
            stdin
                .read_to_string(&mut stdin_json)
                .map_err(|e| HookError::io("reading hook payload from stdin", e))?;
            hooks::dispatcher::dispatch_from_cli(&args[2], &stdin_json, cwd)
        }
        Some(Command::ValidateDocs) => Ok(validate_docs::execute(cwd)),
        Some(Command::ValidateTypes) => validate_types::execute(&args[2..], cwd),
        Some(Command::InstallHooks) => install_hooks::execute(cwd),
        Some(Command::Settings) => settings::execute(),
        Some(Command::Version) => Ok(HookOutput::ok(format!(
            "ftry-hooks {}\n",
            env!("CARGO_PKG_VERSION")
        ))),
        Some(Command::Help) => Ok(HookOutput::ok(help_text())),
        None => Err(HookError::UnknownCommand {
            name: args[1].clone(),
            suggestion: Command::suggest(&args[1]),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(args: &[&str], stdin: &str) -> Result<HookOutput, HookError> {
        let dir = TempDir::new().unwrap();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        run_cli(&args, dir.path(), &mut Cursor::new(stdin.as_bytes().to_vec()))
    }

    #[test]
    fn test_run_cli_errors() {
        assert!(matches!(run(&["ftry-hooks"], ""), Err(HookError::Usage(_))));
        assert!(matches!(run(&["ftry-hooks", "hook"], ""), Err(HookError::Usage(_))));
        let err = run(&["ftry-hooks", "unknown"], "").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: unknown");
    }

    #[test]
    fn test_run_cli_did_you_mean() {
        let err = run(&["ftry-hooks", "validate-doc"], "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command: validate-doc (did you mean 'validate-docs'?)"
        );
    }

    #[test]
    fn test_command_from_arg_all_variants() {
        for name in Command::all_names() {
            let cmd = Command::from_arg(name).unwrap();
            assert_eq!(cmd.name(), *name);
        }
        assert_eq!(Command::from_arg("--help"), Some(Command::Help));
        assert_eq!(Command::from_arg("-V"), Some(Command::Version));
        assert_eq!(Command::from_arg("validate"), None);
    }

    #[test]
    fn test_command_suggest_typo() {
        assert_eq!(Command::suggest("hok"), Some("hook"));
        assert_eq!(Command::suggest("validate-type"), Some("validate-types"));
        assert_eq!(Command::suggest("setings"), Some("settings"));
        assert_eq!(Command::suggest("zzzzzzzzzzz"), None);
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("hook", "hook"), 0);
    }

    #[test]
    fn test_hook_reads_stdin() {
        let out = run(
            &["ftry-hooks", "hook", "validate-bash"],
            r#"{"tool_name":"Bash","tool_input":{"command":"npm install"}}"#,
        )
        .unwrap();
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("Command Blocked"));
    }

    #[test]
    fn test_hook_with_empty_stdin_is_invalid_json() {
        let out = run(&["ftry-hooks", "hook", "code-quality"], "").unwrap();
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.starts_with("Error: Invalid JSON input:"));
    }

    #[test]
    fn test_validate_types_without_paths() {
        let out = run(&["ftry-hooks", "validate-types"], "").unwrap();
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("no files to validate"));
    }

    #[test]
    fn test_version_and_help() {
        let out = run(&["ftry-hooks", "version"], "").unwrap();
        assert_eq!(out.stdout, format!("ftry-hooks {}\n", env!("CARGO_PKG_VERSION")));
        let out = run(&["ftry-hooks", "help"], "").unwrap();
        assert!(out.stdout.contains("validate-nx-library"));
        assert!(out.stdout.contains("install-hooks"));
    }
}
