//! Walks a document's steps and keeps one handler per distinct pattern.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::{ParsedDocument, RawStep};
use crate::keywords::{KeywordTable, StepKind};
use crate::pattern::PatternExtractor;

pub type PatternSet = HashSet<String>;

/// One handler stub to generate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlerDescriptor {
    /// `None` when the keyword is not in the language's table.
    pub category: Option<StepKind>,
    pub pattern: String,
    pub parameters: Vec<String>,
}

/// Ordered, pattern-deduplicated descriptors.
///
/// `order` and `seen` only change together, in [`StepAggregator::insert`].
#[derive(Debug, Default)]
pub struct StepAggregator {
    order: Vec<HandlerDescriptor>,
    seen: PatternSet,
}

impl StepAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `descriptor` unless its pattern is already present. Returns
    /// whether it was added.
    pub fn insert(&mut self, descriptor: HandlerDescriptor) -> bool {
        if !self.seen.insert(descriptor.pattern.clone()) {
            return false;
        }
        self.order.push(descriptor);
        true
    }

    pub fn into_descriptors(self) -> Vec<HandlerDescriptor> {
        self.order
    }
}

/// Builds the descriptor for a single step. `None` when the step has no
/// text to turn into a pattern.
pub fn describe_step(
    step: &RawStep,
    language: &str,
    table: &KeywordTable,
    extractor: &PatternExtractor,
) -> Option<HandlerDescriptor> {
    let extracted = extractor.extract(&step.text)?;
    Some(HandlerDescriptor {
        category: table.classify(language, &step.keyword).kind(),
        pattern: extracted.pattern,
        parameters: extracted.parameters,
    })
}

/// All distinct handlers of a document in first-occurrence order.
pub fn aggregate_steps(
    document: &ParsedDocument,
    table: &KeywordTable,
    extractor: &PatternExtractor,
) -> Vec<HandlerDescriptor> {
    let mut aggregator = StepAggregator::new();
    for scenario in &document.scenarios {
        for step in &scenario.steps {
            match describe_step(step, &document.language, table, extractor) {
                Some(descriptor) => {
                    aggregator.insert(descriptor);
                }
                None => warn!(
                    "skipping step with empty text in scenario '{}' (keyword '{}')",
                    scenario.name, step.keyword
                ),
            }
        }
    }
    aggregator.into_descriptors()
}
