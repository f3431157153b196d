//! Index of step handlers already registered in existing source files.
//!
//! Recognised registrations, first argument being the pattern:
//!
//! - Cucumber JS/TS calls: `Given("…")`, `When(/…/)`, `Then('…')`,
//!   `And`, `But`, `Step`, `defineStep`
//! - builder chains: `.given(r"…")`
//! - macros: `given!(r"…")`
//! - attributes: `#[given("…")]`, `#[then(regex = r"^…$")]`, `#[when(expr = "…")]`
//!
//! The pattern literal may be delimited by `"`, `'`, a backtick, `/`, or be a
//! Rust raw string.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::aggregate::PatternSet;
use crate::keywords::StepKind;

static REGISTRATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \#\[\s*(?P<attr>given|when|then)\s*\(
        | (?P<call>\b(?:Given|When|Then|And|But|Step|defineStep))\s*\(
        | \.(?P<builder>given|when|then)\s*\(
        | \b(?P<mac>given|when|then)!\s*\(
        ",
    )
    .expect("registration pattern is valid")
});

static ATTRIBUTE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:regex|expr)\s*=\s*").expect("attribute key pattern is valid"));

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

/// A handler registration found in a source file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImplementedStep {
    /// `None` for kind-agnostic registrations such as `defineStep`.
    pub kind: Option<StepKind>,
    pub pattern: String,
    pub file: String,
    /// 1-based.
    pub line: usize,
}

impl ImplementedStep {
    /// Strings a generated pattern is compared against: the pattern itself,
    /// plus its body when it is anchored as `^…$`.
    pub fn match_keys(&self) -> impl Iterator<Item = &str> {
        let unanchored = self
            .pattern
            .strip_prefix('^')
            .and_then(|p| p.strip_suffix('$'));
        std::iter::once(self.pattern.as_str()).chain(unanchored)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub by_kind: ByKind,
    /// Patterns registered more than once.
    pub ambiguous: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ByKind {
    #[serde(rename = "Given")]
    pub given: usize,
    #[serde(rename = "When")]
    pub when: usize,
    #[serde(rename = "Then")]
    pub then: usize,
    #[serde(rename = "Any")]
    pub any: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StepIndex {
    pub steps: Vec<ImplementedStep>,
    pub stats: Stats,
}

impl StepIndex {
    pub fn from_steps(mut steps: Vec<ImplementedStep>) -> Self {
        // Sort for stability
        steps.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        let mut stats = Stats {
            total: steps.len(),
            ..Stats::default()
        };
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for s in &steps {
            match s.kind {
                Some(StepKind::Given) => stats.by_kind.given += 1,
                Some(StepKind::When) => stats.by_kind.when += 1,
                Some(StepKind::Then) => stats.by_kind.then += 1,
                None => stats.by_kind.any += 1,
            }
            *seen.entry(s.pattern.as_str()).or_insert(0) += 1;
        }
        stats.ambiguous = seen.values().filter(|&&c| c > 1).count();
        StepIndex { steps, stats }
    }

    /// Every string a new pattern must not equal.
    pub fn patterns(&self) -> PatternSet {
        self.steps
            .iter()
            .flat_map(|s| s.match_keys())
            .map(str::to_string)
            .collect()
    }

    /// First registration (by file, then line) implementing `pattern`.
    pub fn find(&self, pattern: &str) -> Option<&ImplementedStep> {
        self.steps
            .iter()
            .find(|s| s.match_keys().any(|key| key == pattern))
    }
}

/// Scans `files` for handler registrations, skipping the file at `exclude`
/// (the destination about to be rewritten).
pub fn index_implemented_steps(files: &[SourceFile], exclude: Option<&str>) -> StepIndex {
    let exclude = exclude.map(Path::new);
    let steps = files
        .iter()
        .filter(|sf| exclude != Some(Path::new(&sf.path)))
        .flat_map(|sf| {
            scan_registrations(&sf.text)
                .into_iter()
                .map(move |(offset, kind, pattern)| ImplementedStep {
                    kind,
                    pattern,
                    file: sf.path.clone(),
                    line: line_of(&sf.text, offset),
                })
        })
        .collect();
    StepIndex::from_steps(steps)
}

/// Finds `(byte offset, kind, pattern)` for every registration in `text`.
///
/// The cursor moves at least one character per iteration, so an empty
/// argument list (`Given()`) or an unterminated literal cannot stall it.
pub fn scan_registrations(text: &str) -> Vec<(usize, Option<StepKind>, String)> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(cap) = REGISTRATION.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = cap.get(0) else {
            break;
        };
        let is_attribute = cap.name("attr").is_some();
        let name = ["attr", "call", "builder", "mac"]
            .iter()
            .find_map(|g| cap.name(g))
            .map(|m| m.as_str())
            .unwrap_or_default();

        let mut args = text[whole.end()..].trim_start();
        if is_attribute {
            if let Some(key) = ATTRIBUTE_KEY.find(args) {
                args = &args[key.end()..];
            }
        }
        if let Some(pattern) = read_pattern_literal(args) {
            out.push((whole.start(), kind_from_name(name), pattern));
        }

        pos = next_char_boundary(text, whole.end().max(pos + 1));
    }
    out
}

fn kind_from_name(name: &str) -> Option<StepKind> {
    match name.to_ascii_lowercase().as_str() {
        "given" => Some(StepKind::Given),
        "when" | "and" | "but" => Some(StepKind::When),
        "then" => Some(StepKind::Then),
        _ => None,
    }
}

fn next_char_boundary(text: &str, mut at: usize) -> usize {
    while at < text.len() && !text.is_char_boundary(at) {
        at += 1;
    }
    at
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Reads the literal `s` starts with and returns its interior.
///
/// Quote-delimited interiors have `\<quote>` and `\\` unescaped; other
/// escapes and slash-delimited bodies are kept as written. Returns `None`
/// when `s` does not start with a literal or the literal is unterminated.
fn read_pattern_literal(s: &str) -> Option<String> {
    let mut chars = s.chars();
    match chars.next()? {
        'r' => read_raw_string(&s[1..]),
        '/' => read_delimited(&s[1..], '/', false),
        q @ ('"' | '\'' | '`') => read_delimited(&s[1..], q, true),
        _ => None,
    }
}

fn read_delimited(s: &str, delim: char, unescape: bool) -> Option<String> {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let escaped = chars.next()?;
            if !(unescape && (escaped == delim || escaped == '\\')) {
                out.push('\\');
            }
            out.push(escaped);
        } else if c == delim {
            return Some(out);
        } else {
            out.push(c);
        }
    }
    None // unterminated
}

/// `s` follows the leading `r`: `#*"…"#*`.
fn read_raw_string(s: &str) -> Option<String> {
    let hashes = s.len() - s.trim_start_matches('#').len();
    let body = s[hashes..].strip_prefix('"')?;
    let closing = format!("\"{}", "#".repeat(hashes));
    body.find(&closing).map(|end| body[..end].to_string())
}
