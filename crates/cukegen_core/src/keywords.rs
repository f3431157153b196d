//! Per-language step keyword tables and the keyword classifier.
//!
//! The table uses the `gherkin-languages.json` shape: every language lists
//! its `given`, `when`, `then`, `and` and `but` spellings. `and` and `but`
//! are merged into a single continuation bucket at load time. The builtin
//! table carries every language the `gherkin` parser accepts. A handful of
//! spellings listed under two step kinds upstream (`en-old`, `ne`, `uz`) are
//! left out of it, so those steps come out unclassified.
//!
//! Continuation keywords always classify as [`StepKind::When`], whatever the
//! step they continue. Strict Gherkin would inherit the previous step's kind;
//! the scaffolder does not track it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const BUILTIN_TABLE: &str = include_str!("gherkin-languages.json");

/// Gherkin's bullet keyword, valid in place of any other step keyword.
const BULLET: &str = "*";

static BUILTIN: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::from_json(BUILTIN_TABLE).expect("embedded keyword table is valid")
});

/// Canonical handler category of a step.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Outcome check.
    Then,
}

impl StepKind {
    /// Title-cased label used when rendering handlers.
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Given => "Given",
            StepKind::When => "When",
            StepKind::Then => "Then",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of looking a keyword up in a [`KeywordTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Classified(StepKind),
    /// Neither the keyword nor possibly the language is in the table.
    Unclassified,
}

impl Classification {
    pub fn kind(self) -> Option<StepKind> {
        match self {
            Classification::Classified(kind) => Some(kind),
            Classification::Unclassified => None,
        }
    }
}

/// The four buckets a keyword spelling can fall into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Bucket {
    Given,
    When,
    Then,
    Continuation,
}

impl Bucket {
    fn name(self) -> &'static str {
        match self {
            Bucket::Given => "given",
            Bucket::When => "when",
            Bucket::Then => "then",
            Bucket::Continuation => "and/but",
        }
    }

    fn classify(self) -> StepKind {
        match self {
            Bucket::Given => StepKind::Given,
            Bucket::When | Bucket::Continuation => StepKind::When,
            Bucket::Then => StepKind::Then,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeywordTableError {
    #[error("invalid keyword table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("language '{language}': keyword '{keyword}' is listed under both {first} and {second}")]
    Overlap {
        language: String,
        keyword: String,
        first: &'static str,
        second: &'static str,
    },
}

/// One language entry as it appears in `gherkin-languages.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct LanguageEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given: Vec<String>,
    #[serde(default)]
    when: Vec<String>,
    #[serde(default)]
    then: Vec<String>,
    #[serde(default)]
    and: Vec<String>,
    #[serde(default)]
    but: Vec<String>,
}

#[derive(Clone, Debug, Default)]
struct LanguageKeywords {
    name: Option<String>,
    lookup: HashMap<String, Bucket>,
}

/// Immutable language code → keyword → bucket lookup.
#[derive(Clone, Debug, Default)]
pub struct KeywordTable {
    languages: BTreeMap<String, LanguageKeywords>,
}

impl KeywordTable {
    /// The table shipped with the crate, parsed on first use.
    pub fn builtin() -> &'static KeywordTable {
        &BUILTIN
    }

    /// Parses a table in the `gherkin-languages.json` shape.
    ///
    /// Spellings are trimmed, the bullet `*` is kept only as a continuation
    /// keyword, and a spelling appearing in two buckets of one language is
    /// rejected.
    pub fn from_json(json: &str) -> Result<Self, KeywordTableError> {
        let raw: BTreeMap<String, LanguageEntry> = serde_json::from_str(json)?;
        let mut languages = BTreeMap::new();
        for (code, entry) in raw {
            let mut lookup: HashMap<String, Bucket> = HashMap::new();
            let buckets = [
                (Bucket::Given, &entry.given),
                (Bucket::When, &entry.when),
                (Bucket::Then, &entry.then),
                (Bucket::Continuation, &entry.and),
                (Bucket::Continuation, &entry.but),
            ];
            for (bucket, spellings) in buckets {
                for spelling in spellings {
                    let keyword = spelling.trim();
                    if keyword.is_empty() || (keyword == BULLET && bucket != Bucket::Continuation)
                    {
                        continue;
                    }
                    match lookup.get(keyword) {
                        Some(existing) if *existing != bucket => {
                            return Err(KeywordTableError::Overlap {
                                language: code.clone(),
                                keyword: keyword.to_string(),
                                first: existing.name(),
                                second: bucket.name(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            lookup.insert(keyword.to_string(), bucket);
                        }
                    }
                }
            }
            languages.insert(
                code,
                LanguageKeywords {
                    name: entry.name,
                    lookup,
                },
            );
        }
        Ok(KeywordTable { languages })
    }

    pub fn supports(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// English name of a language, when the table provides one.
    pub fn language_name(&self, language: &str) -> Option<&str> {
        self.languages.get(language)?.name.as_deref()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Maps a raw step keyword of `language` to its handler category.
    pub fn classify(&self, language: &str, keyword: &str) -> Classification {
        self.languages
            .get(language)
            .and_then(|lang| lang.lookup.get(keyword.trim()))
            .map(|bucket| Classification::Classified(bucket.classify()))
            .unwrap_or(Classification::Unclassified)
    }
}
