//! Subcommands that run outside the host's stdin hook protocol.

pub mod docs_build;
pub mod install_hooks;
pub mod settings;
pub mod type_report;
pub mod type_scan;
pub mod validate_docs;
pub mod validate_types;
