//! Line- and file-level heuristics for TypeScript type safety.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::HookError;

const ANY_PATTERNS: &[&str] = &[
    r": any\b",
    r"<any>",
    r"as any\b",
    r"Array<any>",
    r"\bany\[\]",
    r"Promise<any>",
    r"Record<\w+,\s*any>",
];

const SAME_LINE_JUSTIFICATIONS: &[&str] = &["@ts-expect-error", "eslint-disable"];
const PREV_LINE_JUSTIFICATIONS: &[&str] = &[
    "@ts-expect-error",
    "eslint-disable",
    "TODO: Fix any type",
    "FIXME: Remove any",
];
const ALLOWED_ASSERTIONS: &[&str] = &[
    "as const",
    "as unknown",
    "as HTMLElement",
    "as any",
    "document.",
    "querySelector",
];

const MAX_INTERFACE_PROPERTIES: usize = 5;
const MAX_TYPE_LITERAL_REPEATS: usize = 2;
const TYPE_LITERAL_PREVIEW_CHARS: usize = 50;
const EXCLUDED_PATH_PARTS: &[&str] = &["node_modules", "dist"];

const ANY_MESSAGE: &str = "❌ BLOCKED: 'any' type detected without justification. Use proper types, generics, or add @ts-expect-error comment with explanation.";
const ASSERTION_MESSAGE: &str = "⚠️  WARNING: Type assertion detected. Consider using type guards instead of 'as' keyword.";
const MISSING_FN_RETURN_MESSAGE: &str = "❌ BLOCKED: Exported function missing explicit return type. All public API functions must have explicit return types.";
const MISSING_ARROW_TYPE_MESSAGE: &str = "❌ BLOCKED: Exported arrow function missing type annotation. All public API functions must have explicit types.";
const UNKNOWN_MESSAGE: &str = "⚠️  WARNING: 'unknown' type detected. Ensure proper type guards are used for narrowing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Block,
    Warn,
    /// Neither list in the report shows these; they only suppress the success banner.
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Any,
    Assertion,
    MissingType,
    Unknown,
    LargeInterface,
    RepeatedTypeLiteral,
    ReadError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Root-relative path.
    pub file: PathBuf,
    /// 1-based, or 0 for file-level findings.
    pub line: usize,
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub files_checked: usize,
    pub any_count: usize,
    pub assertions_count: usize,
    pub missing_types: usize,
    pub unknown_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub issues: Vec<Issue>,
    pub stats: Stats,
}

impl ScanResult {
    pub fn should_block(&self) -> bool {
        self.issues.iter().any(|i| i.severity == IssueSeverity::Block)
    }

    pub fn blocking(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Block)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Warn)
    }
}

/// Compiled heuristics. Build once, scan many files.
pub struct TypeScanner {
    any: Vec<Regex>,
    assertion: Regex,
    export_fn: Regex,
    fn_return_type: Regex,
    export_arrow: Regex,
    arrow_type: Regex,
    unknown: Regex,
    interface: Regex,
    property: Regex,
    type_literal: Regex,
    whitespace: Regex,
}

impl TypeScanner {
    pub fn new() -> Result<Self, HookError> {
        Ok(Self {
            any: ANY_PATTERNS
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<_, _>>()?,
            assertion: Regex::new(r"\bas\s+[A-Z]\w+")?,
            export_fn: Regex::new(r"export\s+(async\s+)?function\s+\w+\([^)]*\)\s*\{")?,
            fn_return_type: Regex::new(r"\)\s*:\s*\w+")?,
            export_arrow: Regex::new(r"export\s+const\s+\w+\s*=\s*(\([^)]*\)|[^=]+)\s*=>")?,
            arrow_type: Regex::new(r":\s*\([^)]*\)\s*=>\s*\w+")?,
            unknown: Regex::new(r": unknown\b")?,
            interface: Regex::new(r"interface\s+(\w+)\s*\{([^}]+)\}")?,
            property: Regex::new(r"(?m)^\s*\w+:")?,
            type_literal: Regex::new(r"\{\s*\w+:\s*\w+(?:;\s*\w+:\s*\w+)+\s*\}")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Scan one file's contents. `display` is the path shown in issues.
    pub fn scan_source(&self, display: &Path, content: &str, stats: &mut Stats) -> Vec<Issue> {
        let mut issues = Vec::new();
        let lines: Vec<&str> = content.split('\n').collect();

        for (idx, line) in lines.iter().enumerate() {
            if is_comment_or_string(line) {
                continue;
            }
            let line_no = idx + 1;
            let prev = if idx > 0 { Some(lines[idx - 1]) } else { None };
            let mut push = |kind: IssueKind, severity: IssueSeverity, message: &str| {
                issues.push(Issue {
                    file: display.to_path_buf(),
                    line: line_no,
                    kind,
                    severity,
                    message: message.to_string(),
                });
            };

            let justified = is_justified(line, prev);
            for pattern in &self.any {
                if pattern.is_match(line) && !justified {
                    push(IssueKind::Any, IssueSeverity::Block, ANY_MESSAGE);
                    stats.any_count += 1;
                }
            }

            if self.assertion.is_match(line) && !ALLOWED_ASSERTIONS.iter().any(|a| line.contains(a)) {
                push(IssueKind::Assertion, IssueSeverity::Warn, ASSERTION_MESSAGE);
                stats.assertions_count += 1;
            }

            if self.export_fn.is_match(line) && !self.fn_return_type.is_match(line) {
                push(IssueKind::MissingType, IssueSeverity::Block, MISSING_FN_RETURN_MESSAGE);
                stats.missing_types += 1;
            }
            if self.export_arrow.is_match(line) && !self.arrow_type.is_match(line) {
                push(IssueKind::MissingType, IssueSeverity::Block, MISSING_ARROW_TYPE_MESSAGE);
                stats.missing_types += 1;
            }

            if self.unknown.is_match(line) {
                push(IssueKind::Unknown, IssueSeverity::Warn, UNKNOWN_MESSAGE);
                stats.unknown_count += 1;
            }
        }

        issues.extend(self.file_level(display, content));
        issues
    }

    /// Oversized interfaces and repeated inline object types. Always warnings on line 0.
    fn file_level(&self, display: &Path, content: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        let warn = |kind: IssueKind, message: String| Issue {
            file: display.to_path_buf(),
            line: 0,
            kind,
            severity: IssueSeverity::Warn,
            message,
        };

        for caps in self.interface.captures_iter(content) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            let count = self.property.find_iter(body).count();
            if count > MAX_INTERFACE_PROPERTIES {
                issues.push(warn(
                    IssueKind::LargeInterface,
                    format!(
                        "⚠️  WARNING: Interface '{}' has {} properties. Consider splitting into smaller, focused interfaces (Interface Segregation Principle).",
                        name, count
                    ),
                ));
            }
        }

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for m in self.type_literal.find_iter(content) {
            let normalized = self.whitespace.replace_all(m.as_str(), " ").trim().to_string();
            let seen = counts.entry(normalized.clone()).or_insert(0);
            if *seen == 0 {
                order.push(normalized);
            }
            *seen += 1;
        }
        for pattern in order {
            let count = counts.get(&pattern).copied().unwrap_or(0);
            if count > MAX_TYPE_LITERAL_REPEATS {
                let preview: String = pattern.chars().take(TYPE_LITERAL_PREVIEW_CHARS).collect();
                issues.push(warn(
                    IssueKind::RepeatedTypeLiteral,
                    format!(
                        "⚠️  WARNING: Type pattern '{}...' repeated {} times. Extract to a reusable type (DRY principle).",
                        preview, count
                    ),
                ));
            }
        }

        issues
    }

    /// Scan every file under `root`, in the order given.
    pub fn scan_files(&self, root: &Path, files: &[PathBuf]) -> ScanResult {
        let mut result = ScanResult::default();
        for path in files {
            result.stats.files_checked += 1;
            let display = path.strip_prefix(root).unwrap_or(path);
            match fs::read_to_string(path) {
                Ok(content) => {
                    let issues = self.scan_source(display, &content, &mut result.stats);
                    result.issues.extend(issues);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable TypeScript file");
                    result.issues.push(Issue {
                        file: display.to_path_buf(),
                        line: 0,
                        kind: IssueKind::ReadError,
                        severity: IssueSeverity::Unclassified,
                        message: format!("Error reading file: {}", e),
                    });
                }
            }
        }
        result
    }
}

fn is_comment_or_string(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || line.contains('`')
        || line.contains('"')
        || line.contains('\'')
}

fn is_justified(line: &str, prev: Option<&str>) -> bool {
    SAME_LINE_JUSTIFICATIONS.iter().any(|j| line.contains(j))
        || prev.is_some_and(|p| PREV_LINE_JUSTIFICATIONS.iter().any(|j| p.contains(j)))
}

fn is_excluded(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    EXCLUDED_PATH_PARTS.iter().any(|part| rel.contains(part))
}

/// Every `.ts`/`.tsx` file under `root`, sorted, minus build output and dependencies.
pub fn find_typescript_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                pending.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext == "ts" || ext == "tsx")
                && !is_excluded(root, &path)
            {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
