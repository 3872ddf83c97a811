use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::HookError;
use crate::hooks::types::HookOutput;

const MANAGED_MARKER: &str = "ftry-hooks pre-commit";

const HOOK_CONTENT: &str = r#"#!/usr/bin/env bash
set -euo pipefail
# ftry-hooks pre-commit: documentation policy and type-safety gate.
# Installed by `ftry-hooks install-hooks`. Remove with: rm .git/hooks/pre-commit
ftry-hooks validate-docs
STAGED=$(git diff --cached --name-only --diff-filter=ACM)
# shellcheck disable=SC2086
ftry-hooks validate-types $STAGED
"#;

/// Install the managed pre-commit hook in the repository containing `cwd`. Idempotent.
pub fn execute(cwd: &Path) -> Result<HookOutput, HookError> {
    let git_root = find_git_root(cwd)?;
    let hooks_dir = git_root.join(".git/hooks");
    fs::create_dir_all(&hooks_dir)
        .map_err(|e| HookError::io(format!("creating {}", hooks_dir.display()), e))?;

    let message = install_pre_commit_hook(&hooks_dir.join("pre-commit"))?;
    tracing::info!(root = %git_root.display(), "{}", message);
    Ok(HookOutput::ok(format!("{}\n", message)))
}

fn find_git_root(cwd: &Path) -> Result<PathBuf, HookError> {
    let args = "rev-parse --show-toplevel";
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(cwd)
        .output()
        .map_err(|e| HookError::Git {
            args: args.to_string(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(HookError::Git {
            args: args.to_string(),
            detail: "not inside a git repository".to_string(),
        });
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        return Err(HookError::Git {
            args: args.to_string(),
            detail: "empty output".to_string(),
        });
    }
    Ok(PathBuf::from(root))
}

fn install_pre_commit_hook(hook_path: &Path) -> Result<String, HookError> {
    if hook_path.is_symlink() {
        return Ok("pre-commit hook is a symlink not managed by ftry-hooks -- skipping".to_string());
    }
    if hook_path.exists() {
        if let Ok(content) = fs::read_to_string(hook_path)
            && content.contains(MANAGED_MARKER)
        {
            if content == HOOK_CONTENT {
                return Ok("pre-commit hook already installed".to_string());
            }
            write_hook(hook_path)?;
            return Ok("Updated pre-commit hook".to_string());
        }
        return Ok("pre-commit hook exists but is not managed by ftry-hooks -- skipping".to_string());
    }

    write_hook(hook_path)?;
    Ok("Installed pre-commit hook".to_string())
}

fn write_hook(hook_path: &Path) -> Result<(), HookError> {
    let context = || format!("writing {}", hook_path.display());
    fs::write(hook_path, HOOK_CONTENT).map_err(|e| HookError::io(context(), e))?;
    let mut perms = fs::metadata(hook_path)
        .map_err(|e| HookError::io(context(), e))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(hook_path, perms).map_err(|e| HookError::io(context(), e))?;
    Ok(())
}
