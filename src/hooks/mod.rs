//! Host hook handlers, one per stdin-driven hook.
//!
//!   - **SessionStart**: `tooling_context`
//!   - **PreToolUse**: `validate_bash`, `validate_nx_library`
//!   - **PostToolUse**: `code_quality`
//!
//! Entry point: `ftry-hooks hook <name>` (reads JSON from stdin), routed by
//! `dispatcher::dispatch()`.

// Infrastructure
pub mod dispatcher;
pub mod rules;
pub mod types;
pub mod utils;

// PreToolUse validators
pub mod validate_bash;
pub mod validate_nx_library;

// Advisory context
pub mod code_quality;
pub mod tooling_context;
