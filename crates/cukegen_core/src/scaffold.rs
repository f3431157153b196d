//! The generation pipeline minus I/O: document + existing files → the
//! handlers left to write.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate_steps, HandlerDescriptor};
use crate::document::ParsedDocument;
use crate::keywords::KeywordTable;
use crate::pattern::{ExtractorOptions, PatternExtractor};
use crate::step_index::{index_implemented_steps, ImplementedStep, SourceFile, StepIndex};

/// What to do with a step whose keyword the language table does not know.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiedPolicy {
    /// Keep the handler without a category; the template decides.
    #[default]
    Emit,
    /// Drop the handler with a warning.
    Skip,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScaffoldOptions {
    pub unclassified: UnclassifiedPolicy,
    pub extractor: ExtractorOptions,
}

/// A handler left out because some file already implements its pattern.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedStep {
    pub descriptor: HandlerDescriptor,
    pub implemented_in: ImplementedStep,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScaffoldPlan {
    /// Handlers to generate, in first-occurrence order.
    pub steps: Vec<HandlerDescriptor>,
    pub skipped: Vec<SkippedStep>,
    /// Handlers (kept or dropped) whose keyword was not classified.
    pub unclassified: usize,
}

pub struct Scaffolder<'t> {
    table: &'t KeywordTable,
    extractor: PatternExtractor,
    unclassified: UnclassifiedPolicy,
}

impl<'t> Scaffolder<'t> {
    pub fn new(table: &'t KeywordTable, options: ScaffoldOptions) -> Self {
        Self {
            table,
            extractor: PatternExtractor::new(options.extractor),
            unclassified: options.unclassified,
        }
    }

    pub fn plan(&self, document: &ParsedDocument, existing: &StepIndex) -> ScaffoldPlan {
        if !self.table.supports(&document.language) {
            warn!(
                "no step keywords known for language '{}' ({} languages in the table); every step will be unclassified",
                document.language,
                self.table.languages().count()
            );
        }

        let descriptors = aggregate_steps(document, self.table, &self.extractor);
        debug!(
            "{} steps normalized to {} distinct patterns",
            document.step_count(),
            descriptors.len()
        );

        let implemented = existing.patterns();
        let mut plan = ScaffoldPlan::default();
        for descriptor in descriptors {
            if descriptor.category.is_none() {
                plan.unclassified += 1;
                if self.unclassified == UnclassifiedPolicy::Skip {
                    warn!("skipping step with unrecognised keyword: {}", descriptor.pattern);
                    continue;
                }
            }
            let found = implemented
                .contains(&descriptor.pattern)
                .then(|| existing.find(&descriptor.pattern))
                .flatten();
            match found {
                Some(found) => {
                    info!(
                        "step already implemented in {}:{}: {}",
                        found.file, found.line, descriptor.pattern
                    );
                    plan.skipped.push(SkippedStep {
                        descriptor,
                        implemented_in: found.clone(),
                    });
                }
                None => plan.steps.push(descriptor),
            }
        }
        plan
    }
}

/// Plans with the builtin keyword table against in-memory handler files.
pub fn plan_scaffold(
    document: &ParsedDocument,
    files: &[SourceFile],
    destination: Option<&str>,
    options: ScaffoldOptions,
) -> ScaffoldPlan {
    let existing = index_implemented_steps(files, destination);
    Scaffolder::new(KeywordTable::builtin(), options).plan(document, &existing)
}
