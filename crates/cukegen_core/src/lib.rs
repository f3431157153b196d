//! cukegen_core: step extraction and pattern normalization behind cukegen.
//! Keep this crate platform-agnostic and free of I/O.

pub mod aggregate;
pub mod document;
pub mod keywords;
pub mod pattern;
pub mod scaffold;
pub mod step_index;

pub use aggregate::{aggregate_steps, HandlerDescriptor, PatternSet, StepAggregator};
pub use document::{parse_feature, DocumentError, ParsedDocument, RawStep, ScenarioSteps};
pub use keywords::{Classification, KeywordTable, KeywordTableError, StepKind};
pub use pattern::{extract_pattern, ExtractorOptions, PatternExtractor, StepPattern};
pub use scaffold::{
    plan_scaffold, ScaffoldOptions, ScaffoldPlan, Scaffolder, SkippedStep, UnclassifiedPolicy,
};
pub use step_index::{index_implemented_steps, ImplementedStep, SourceFile, StepIndex};

/// Returns the crate version at compile time (useful for debugging).
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
