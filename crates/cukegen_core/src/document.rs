//! Feature source → [`ParsedDocument`], via the `gherkin` crate.

use gherkin::{Feature, GherkinEnv};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";

static LANGUAGE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*language\s*:\s*([A-Za-z0-9_-]+)\s*$").expect("directive pattern is valid")
});

/// One step as written: the surface keyword and the text after it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawStep {
    pub keyword: String,
    pub text: String,
}

impl RawStep {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }
}

/// A scenario, background or outline: anything that owns a list of steps.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioSteps {
    pub name: String,
    pub steps: Vec<RawStep>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedDocument {
    pub language: String,
    pub name: String,
    pub scenarios: Vec<ScenarioSteps>,
}

impl ParsedDocument {
    pub fn new(language: impl Into<String>, scenarios: Vec<ScenarioSteps>) -> Self {
        Self {
            language: language.into(),
            name: String::new(),
            scenarios,
        }
    }

    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unsupported feature language '{0}'")]
    UnsupportedLanguage(String),
    #[error("failed to parse feature: {0}")]
    Parse(#[from] gherkin::ParseError),
}

/// Reads the `# language: xx` directive from the comment block heading a
/// feature. Anything after the first non-comment line is ignored.
pub fn detect_language(source: &str) -> Option<&str> {
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with('#') {
            return None;
        }
        if let Some(cap) = LANGUAGE_DIRECTIVE.captures(trimmed) {
            return cap.get(1).map(|m| m.as_str());
        }
    }
    None
}

/// Parses a feature file's text.
///
/// Step containers come out in source order: the feature background, then
/// scenarios and rules as they appear, a rule contributing its own
/// background before its scenarios.
pub fn parse_feature(source: &str) -> Result<ParsedDocument, DocumentError> {
    let language = detect_language(source).unwrap_or(DEFAULT_LANGUAGE).to_string();
    let env = GherkinEnv::new(&language)
        .map_err(|_| DocumentError::UnsupportedLanguage(language.clone()))?;

    // The grammar expects a terminating newline.
    let feature = if source.ends_with('\n') {
        Feature::parse(source, env)?
    } else {
        Feature::parse(format!("{source}\n"), env)?
    };

    Ok(ParsedDocument {
        language,
        name: feature.name.clone(),
        scenarios: collect_scenarios(&feature),
    })
}

fn collect_scenarios(feature: &Feature) -> Vec<ScenarioSteps> {
    let mut out = Vec::new();
    if let Some(background) = &feature.background {
        out.push(steps_of(&background.keyword, &background.steps));
    }

    let mut blocks: Vec<(usize, Vec<ScenarioSteps>)> = feature
        .scenarios
        .iter()
        .map(|s| (s.span.start, vec![steps_of(&s.name, &s.steps)]))
        .collect();
    for rule in &feature.rules {
        let mut inner = Vec::new();
        if let Some(background) = &rule.background {
            inner.push(steps_of(&background.keyword, &background.steps));
        }
        inner.extend(rule.scenarios.iter().map(|s| steps_of(&s.name, &s.steps)));
        blocks.push((rule.span.start, inner));
    }
    blocks.sort_by_key(|(start, _)| *start);

    out.extend(blocks.into_iter().flat_map(|(_, scenarios)| scenarios));
    out
}

fn steps_of(name: &str, steps: &[gherkin::Step]) -> ScenarioSteps {
    ScenarioSteps {
        name: name.to_string(),
        steps: steps
            .iter()
            .map(|step| RawStep::new(step.keyword.trim(), step.value.as_str()))
            .collect(),
    }
}
