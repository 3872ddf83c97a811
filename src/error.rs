//! Error type shared by every hook and command.

/// Failures that abort a single invocation.
///
/// Policy violations are not errors: they are reported through
/// [`crate::hooks::types::HookOutput`] and the exit code.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The host sent something that is not a JSON object.
    #[error("Invalid JSON input: {0}")]
    InvalidInput(String),

    /// A rule table pattern failed to compile.
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize hook output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// `git` could not be run or returned an error.
    #[error("git {args} failed: {detail}")]
    Git { args: String, detail: String },

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command: {name}{}", suggestion_suffix(.suggestion))]
    UnknownCommand {
        name: String,
        suggestion: Option<&'static str>,
    },
}

impl HookError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        HookError::Io {
            context: context.into(),
            source,
        }
    }
}

fn suggestion_suffix(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}
