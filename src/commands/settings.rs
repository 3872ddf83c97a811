//! `ftry-hooks settings`: the host `hooks` block wiring each stdin hook to its event.

use serde_json::{Value, json};

use crate::error::HookError;
use crate::hooks::types::{HookEvent, HookName, HookOutput};

const BINARY: &str = "ftry-hooks";

fn matcher_for(hook: HookName) -> Option<&'static str> {
    match hook {
        HookName::ValidateBash | HookName::ValidateNxLibrary => Some("Bash"),
        HookName::CodeQuality => Some("Write|Edit|MultiEdit"),
        HookName::ToolingContext => None,
    }
}

/// Build the settings value. Hooks sharing an event and matcher share one entry.
pub fn hooks_settings() -> Value {
    let mut events = serde_json::Map::new();
    for event in [HookEvent::SessionStart, HookEvent::PreToolUse, HookEvent::PostToolUse] {
        let mut entries: Vec<(Option<&'static str>, Vec<Value>)> = Vec::new();
        for hook in HookName::ALL.iter().filter(|h| h.event() == event) {
            let command = json!({
                "type": "command",
                "command": format!("{} hook {}", BINARY, hook.name()),
            });
            let matcher = matcher_for(*hook);
            match entries.iter_mut().find(|(m, _)| *m == matcher) {
                Some((_, commands)) => commands.push(command),
                None => entries.push((matcher, vec![command])),
            }
        }

        let entries: Vec<Value> = entries
            .into_iter()
            .map(|(matcher, commands)| match matcher {
                Some(m) => json!({ "matcher": m, "hooks": commands }),
                None => json!({ "hooks": commands }),
            })
            .collect();
        events.insert(event.as_str().to_string(), Value::Array(entries));
    }
    json!({ "hooks": Value::Object(events) })
}

pub fn execute() -> Result<HookOutput, HookError> {
    let mut rendered = serde_json::to_string_pretty(&hooks_settings())?;
    rendered.push('\n');
    Ok(HookOutput::ok(rendered))
}
