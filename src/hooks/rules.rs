//! Rule tables and the line matcher shared by the command hooks.
//!
//! A [`RuleSet`] is built once per process and passed by reference into the
//! validators; nothing here is global or mutable.

use regex::{Regex, RegexBuilder};

/// How a matched rule affects the host's pending action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the tool call.
    Block,
    /// Report only.
    Warn,
}

/// A (pattern, message, severity) triple.
///
/// `regex` has no look-around, so a rule that must not fire when its match
/// is directly followed by some text carries that text as `veto`. The rule
/// matches when at least one match of `pattern` is not followed by `veto`.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    veto: Option<Regex>,
    pub message: String,
    pub severity: Severity,
}

impl Rule {
    /// Case-insensitive rule.
    pub fn new(pattern: &str, message: &str, severity: Severity) -> Result<Rule, regex::Error> {
        Ok(Rule {
            pattern: build(pattern, true)?,
            veto: None,
            message: message.to_string(),
            severity,
        })
    }

    pub fn block(pattern: &str, message: &str) -> Result<Rule, regex::Error> {
        Rule::new(pattern, message, Severity::Block)
    }

    pub fn warn(pattern: &str, message: &str) -> Result<Rule, regex::Error> {
        Rule::new(pattern, message, Severity::Warn)
    }

    /// Reject matches that are immediately followed by `suffix`.
    pub fn unless_followed_by(mut self, suffix: &str) -> Result<Rule, regex::Error> {
        self.veto = Some(build(&format!("^(?:{})", suffix), true)?);
        Ok(self)
    }

    pub fn is_match(&self, line: &str) -> bool {
        let Some(veto) = &self.veto else {
            return self.pattern.is_match(line);
        };

        // Try every start position, and for each start every shorter end the
        // engine would fall back to, the way a backtracking lookahead does.
        let mut start = 0;
        while let Some(first) = self.pattern.find_at(line, start) {
            let mut m = first;
            loop {
                if !veto.is_match(&line[m.end()..]) {
                    return true;
                }
                let end = prev_boundary(line, m.end());
                if end <= m.start() {
                    break;
                }
                match self.pattern.find_at(&line[..end], m.start()) {
                    Some(shorter) if shorter.start() == m.start() => m = shorter,
                    _ => break,
                }
            }
            match next_boundary(line, first.start()) {
                Some(next) => start = next,
                None => break,
            }
        }
        false
    }
}

fn build(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
}

fn prev_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.saturating_sub(1);
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_boundary(s: &str, idx: usize) -> Option<usize> {
    if idx >= s.len() {
        return None;
    }
    let mut i = idx + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    Some(i)
}

/// Matches partitioned by severity, in rule-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub blocking: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        match severity {
            Severity::Block => self.blocking.push(message.into()),
            Severity::Warn => self.warnings.push(message.into()),
        }
    }

    pub fn should_block(&self) -> bool {
        !self.blocking.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.blocking.is_empty() && self.warnings.is_empty()
    }
}

/// An ordered, immutable rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> RuleSet {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply every rule to `line`. No rule short-circuits another.
    pub fn evaluate(&self, line: &str) -> Findings {
        let mut findings = Findings::default();
        for rule in &self.rules {
            if rule.is_match(line) {
                findings.push(rule.severity, rule.message.as_str());
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_is_case_insensitive() {
        let rule = Rule::block(r"\bnpm\s+run\b", "no npm").unwrap();
        assert!(rule.is_match("NPM RUN build"));
        assert!(!rule.is_match("bun run build"));
    }

    #[test]
    fn test_veto_rejects_only_followed_matches() {
        let rule = Rule::block(r"\b(npm|node)\b", "runtime")
            .unwrap()
            .unless_followed_by(r"\s+(install|init|create)")
            .unwrap();
        assert!(!rule.is_match("npm install lodash"));
        assert!(!rule.is_match("npm init -y"));
        assert!(rule.is_match("npm test"));
        assert!(rule.is_match("node script.js"));
        // A later occurrence that is not vetoed still counts.
        assert!(rule.is_match("npm install && npm test"));
    }

    #[test]
    fn test_veto_backtracks_to_earlier_end() {
        let rule = Rule::warn(r"git\s+push.*--force", "force")
            .unwrap()
            .unless_followed_by(r"-with-lease")
            .unwrap();
        assert!(rule.is_match("git push --force origin main"));
        assert!(!rule.is_match("git push --force-with-lease origin main"));
        // Greedy match lands on the vetoed flag; the earlier bare flag counts.
        assert!(rule.is_match("git push --force origin --force-with-lease"));
        assert!(rule.is_match("git push --force-with-lease origin --force"));
    }

    #[test]
    fn test_veto_with_trailing_context() {
        let rule = Rule::warn(r"\bgrep\b", "grep")
            .unwrap()
            .unless_followed_by(r".*\|")
            .unwrap();
        assert!(rule.is_match("grep -r foo src"));
        assert!(!rule.is_match("grep foo file | wc -l"));
        assert!(rule.is_match("cat x | grep foo"));
    }

    #[test]
    fn test_veto_handles_multibyte_text() {
        let rule = Rule::warn(r"\bnode\b", "node")
            .unwrap()
            .unless_followed_by(r"\s+install")
            .unwrap();
        assert!(rule.is_match("échо ünïcode && node ñ.js"));
        assert!(!rule.is_match("ünïcode node install"));
    }

    #[test]
    fn test_evaluate_preserves_declaration_order_and_partitions() {
        let rules = RuleSet::new(vec![
            Rule::warn("alpha", "w1").unwrap(),
            Rule::block("beta", "b1").unwrap(),
            Rule::warn("gamma", "w2").unwrap(),
            Rule::block("alpha", "b2").unwrap(),
        ]);
        let findings = rules.evaluate("gamma beta alpha");
        assert_eq!(findings.blocking, vec!["b1", "b2"]);
        assert_eq!(findings.warnings, vec!["w1", "w2"]);
        assert!(findings.should_block());
    }

    #[test]
    fn test_evaluate_no_match_is_empty() {
        let rules = RuleSet::new(vec![Rule::block("forbidden", "nope").unwrap()]);
        let findings = rules.evaluate("perfectly fine");
        assert!(findings.is_empty());
        assert!(!findings.should_block());
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        assert!(Rule::block("(unclosed", "x").is_err());
        assert!(Rule::warn("ok", "x").unwrap().unless_followed_by("[").is_err());
    }
}
