//! Step text → matchable pattern.
//!
//! Quoted strings are replaced by `{string}` first, integers by `{int}`
//! second. The order matters: digits inside quotes belong to the string
//! literal and must never turn into an `{int}`.
//!
//! Braces already in the text are escaped (`\{`, `\}`) as Cucumber
//! expressions expect, so the only bare placeholders in a pattern are the
//! ones the extractor inserted.

use std::borrow::Cow;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const STRING_PLACEHOLDER: &str = "{string}";
pub const INT_PLACEHOLDER: &str = "{int}";

const DOUBLE_QUOTED: &str = r#""[^"]*""#;
// Bounded by non-word characters on both sides so apostrophes inside words
// ("don't", "users' list") never open a literal.
const SINGLE_QUOTED: &str = r"\B'[^']*'\B";
const INTEGER: &str = r"-?\b\d+\b";

static DEFAULT_EXTRACTOR: Lazy<PatternExtractor> =
    Lazy::new(|| PatternExtractor::new(ExtractorOptions::default()));

/// Which literal kinds the extractor recognises.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractorOptions {
    pub single_quotes: bool,
    pub integers: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            single_quotes: true,
            integers: true,
        }
    }
}

/// A normalized step pattern and the parameter names for its placeholders.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepPattern {
    pub pattern: String,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PatternExtractor {
    strings: Regex,
    integers: Option<Regex>,
    literals: Regex,
}

impl PatternExtractor {
    pub fn new(options: ExtractorOptions) -> Self {
        let strings = if options.single_quotes {
            format!("{DOUBLE_QUOTED}|{SINGLE_QUOTED}")
        } else {
            DOUBLE_QUOTED.to_string()
        };
        let literals = if options.integers {
            format!("{strings}|{INTEGER}")
        } else {
            strings.clone()
        };
        Self {
            strings: Regex::new(&strings).expect("string literal pattern is valid"),
            integers: options
                .integers
                .then(|| Regex::new(INTEGER).expect("integer literal pattern is valid")),
            literals: Regex::new(&literals).expect("combined literal pattern is valid"),
        }
    }

    /// Rewrites `text` into a pattern. Returns `None` for blank text.
    pub fn extract(&self, text: &str) -> Option<StepPattern> {
        if text.trim().is_empty() {
            return None;
        }

        let escaped = escape_braces(text);
        let quoted = self.strings.replace_all(&escaped, STRING_PLACEHOLDER);
        let pattern = match &self.integers {
            Some(integers) => {
                replace_spans(&quoted, integer_spans(integers, &quoted), INT_PLACEHOLDER)
            }
            None => quoted.into_owned(),
        };

        let parameters = (1..=self.literal_count(text))
            .map(|n| format!("param{n}"))
            .collect();

        Some(StepPattern {
            pattern,
            parameters,
        })
    }

    /// Number of literals in the raw text, strings and integers together.
    fn literal_count(&self, text: &str) -> usize {
        self.literals.find_iter(text).count()
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(ExtractorOptions::default())
    }
}

/// Extracts with the default options (both quote styles, integers on).
pub fn extract_pattern(text: &str) -> Option<StepPattern> {
    DEFAULT_EXTRACTOR.extract(text)
}

/// Counts `{string}` and `{int}` tokens in a pattern. Escaped tokens
/// (`\{int\}`) do not match.
pub fn placeholder_count(pattern: &str) -> usize {
    pattern.matches(STRING_PLACEHOLDER).count() + pattern.matches(INT_PLACEHOLDER).count()
}

fn escape_braces(text: &str) -> Cow<'_, str> {
    if !text.contains(['{', '}']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if matches!(c, '{' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Integer spans in `text`. A leading `-` glued to a word (`a-5`) is a
/// hyphen, not a sign, and stays outside the span.
fn integer_spans(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text)
        .map(|m| {
            let mut span = m.range();
            if text[span.clone()].starts_with('-') && preceded_by_word(text, span.start) {
                span.start += 1;
            }
            span
        })
        .collect()
}

fn preceded_by_word(text: &str, at: usize) -> bool {
    text[..at]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn replace_spans(text: &str, spans: Vec<Range<usize>>, with: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&text[last..span.start]);
        out.push_str(with);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> StepPattern {
        extract_pattern(text).expect("non-empty text")
    }

    #[test]
    fn text_without_literals_passes_through() {
        let out = extract("I am logged in");
        assert_eq!(out.pattern, "I am logged in");
        assert!(out.parameters.is_empty());
    }

    #[test]
    fn quoted_strings_become_string_placeholders() {
        let out = extract(r#"I search for "rust books" in "the catalog""#);
        assert_eq!(out.pattern, "I search for {string} in {string}");
        assert_eq!(out.parameters, vec!["param1", "param2"]);
    }

    #[test]
    fn digits_inside_quotes_stay_in_the_string() {
        let out = extract(r#"I have "5" items"#);
        assert_eq!(out.pattern, "I have {string} items");
        assert_eq!(out.parameters, vec!["param1"]);

        let out = extract(r#"the code "A-42" is valid for 3 days"#);
        assert_eq!(out.pattern, "the code {string} is valid for {int} days");
        assert_eq!(out.parameters, vec!["param1", "param2"]);
    }

    #[test]
    fn bare_integers_become_int_placeholders() {
        let out = extract("I add 3 and -12 to the cart");
        assert_eq!(out.pattern, "I add {int} and {int} to the cart");
        assert_eq!(out.parameters.len(), 2);

        let out = extract("there are 10 20 30 rows");
        assert_eq!(out.pattern, "there are {int} {int} {int} rows");
    }

    #[test]
    fn digits_inside_identifiers_are_not_integers() {
        let out = extract("user42 opens page_2 and item-7");
        assert_eq!(out.pattern, "user42 opens page_2 and item-{int}");
        assert_eq!(out.parameters, vec!["param1"]);
    }

    #[test]
    fn single_quotes_need_word_boundaries() {
        let out = extract("I don't see 'hidden' fields");
        assert_eq!(out.pattern, "I don't see {string} fields");
        assert_eq!(out.parameters, vec!["param1"]);

        let out = extract("the users' list can't be empty");
        assert_eq!(out.pattern, "the users' list can't be empty");
        assert!(out.parameters.is_empty());
    }

    #[test]
    fn options_switch_literal_kinds_off() {
        let extractor = PatternExtractor::new(ExtractorOptions {
            single_quotes: false,
            integers: false,
        });
        let out = extractor.extract("I pick 'red' and \"blue\" 2 times").unwrap();
        assert_eq!(out.pattern, "I pick 'red' and {string} 2 times");
        assert_eq!(out.parameters, vec!["param1"]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert_eq!(extract_pattern(""), None);
        assert_eq!(extract_pattern("   "), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = r#"I open "the dashboard""#;
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn braces_in_the_text_are_escaped() {
        let out = extract("I type {int} here");
        assert_eq!(out.pattern, r"I type \{int\} here");
        assert!(out.parameters.is_empty());

        let out = extract("x 5 {int}");
        assert_eq!(out.pattern, r"x {int} \{int\}");
        assert_eq!(out.parameters, vec!["param1"]);

        let out = extract(r#"the map {"a": 1} is empty"#);
        assert_eq!(out.pattern, r"the map \{{string}: {int}\} is empty");
        assert_eq!(out.parameters, vec!["param1", "param2"]);
    }

    #[test]
    fn parameter_count_matches_placeholders() {
        let samples = [
            "plain text",
            r#"one "string""#,
            "one 1 int",
            r#"mix "a1" of 2 and 'b 3' then 4"#,
            r#"empty "" quotes and '' too"#,
            "negative -5, positive 5.",
            r#"unterminated "quote and 7"#,
            "'start' and end 'x'",
            "I type {int} here",
            "x 5 {int}",
            r#"a {string} and "{int}" then 3"#,
        ];
        for text in samples {
            let out = extract(text);
            assert_eq!(
                out.parameters.len(),
                placeholder_count(&out.pattern),
                "mismatch for {text:?} -> {:?}",
                out.pattern
            );
        }
    }
}
