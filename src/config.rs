//! Optional per-project settings in `.claude/ftry-hooks.json`.
//!
//! ```json
//! { "disabled": ["code-quality"] }
//! ```
//!
//! Only switches live here. Rule tables, documentation paths, thresholds and
//! the docs build timeout are policy and are not configurable.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::hooks::types::HookName;
use crate::hooks::utils;

pub const CONFIG_FILE: &str = "ftry-hooks.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Hook names (as accepted by `ftry-hooks hook <name>`) that exit 0 untouched.
    pub disabled: Vec<String>,
}

impl HooksConfig {
    /// Load the config found by walking up from `cwd`.
    /// Missing, unreadable or malformed config means everything is enabled.
    pub fn load(cwd: &Path) -> HooksConfig {
        match utils::find_claude_dir(cwd) {
            Some(dir) => Self::load_from_path(&dir.join(CONFIG_FILE)),
            None => HooksConfig::default(),
        }
    }

    pub fn load_from_path(config_path: &Path) -> HooksConfig {
        let content = match fs::read_to_string(config_path) {
            Ok(c) => c,
            Err(_) => return HooksConfig::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring malformed hook config");
                HooksConfig::default()
            }
        }
    }

    pub fn is_enabled(&self, hook: HookName) -> bool {
        !self
            .disabled
            .iter()
            .any(|name| HookName::from_arg(name) == Some(hook))
    }
}
