use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Project-local host configuration directory.
pub const CLAUDE_DIR: &str = ".claude";

const HOOK_ERROR_LOG: &str = ".hook-errors.log";

/// Walk up from `start` to find a directory containing `.claude/`.
/// Returns the `.claude` directory path if found.
pub fn find_claude_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CLAUDE_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Append a failure line to `.claude/.hook-errors.log`.
/// Trims to the last 30 entries once the log passes 50.
pub fn log_hook_error(claude_dir: &Path, hook_name: &str, exit_code: i32, message: &str) {
    let log_path = claude_dir.join(HOOK_ERROR_LOG);
    let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let entry = format!("[{}] {} exit={} {}\n", ts, hook_name, exit_code, message);

    if let Ok(mut f) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = f.write_all(entry.as_bytes());
    }

    trim_log_file(&log_path, 50, 30);
}

/// If the file exceeds `max_lines`, keep only the last `keep_lines`.
fn trim_log_file(path: &Path, max_lines: usize, keep_lines: usize) {
    if let Ok(content) = fs::read_to_string(path) {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() > max_lines {
            let mut output = lines[lines.len() - keep_lines..].join("\n");
            output.push('\n');
            let _ = fs::write(path, output);
        }
    }
}
