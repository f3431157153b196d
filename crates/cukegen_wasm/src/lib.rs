use cukegen_core::{
    parse_feature, plan_scaffold, HandlerDescriptor, ScaffoldOptions, SkippedStep, SourceFile,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Deserialize)]
struct ScaffoldRequest {
    feature: SourceFile,
    #[serde(default)]
    files: Vec<SourceFile>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    options: ScaffoldOptions,
}

#[derive(Debug, Serialize)]
struct ScaffoldResponse {
    language: String,
    steps: Vec<HandlerDescriptor>,
    skipped: Vec<SkippedStep>,
    unclassified: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// JSON in, JSON out: `{ feature: {path, text}, files: [{path, text}],
/// destination?, options? }` → `{ language, steps, skipped, unclassified }`,
/// or `{ error }` when the request or the feature cannot be parsed.
#[wasm_bindgen]
pub fn scaffold_steps(request_json: &str) -> String {
    let response = serde_json::from_str::<ScaffoldRequest>(request_json)
        .map_err(|e| format!("invalid request: {e}"))
        .and_then(|request| {
            let document = parse_feature(&request.feature.text)
                .map_err(|e| format!("{}: {e}", request.feature.path))?;
            let plan = plan_scaffold(
                &document,
                &request.files,
                request.destination.as_deref(),
                request.options,
            );
            Ok(ScaffoldResponse {
                language: document.language,
                steps: plan.steps,
                skipped: plan.skipped,
                unclassified: plan.unclassified,
            })
        });

    let encoded = match response {
        Ok(ok) => serde_json::to_string(&ok),
        Err(error) => serde_json::to_string(&ErrorResponse { error }),
    };
    encoded.unwrap_or_else(|e| format!(r#"{{"error":"failed to encode response: {e}"}}"#))
}

/// Crate version of the core, for diagnostics in the host.
#[wasm_bindgen]
pub fn core_version() -> String {
    cukegen_core::version().to_string()
}
