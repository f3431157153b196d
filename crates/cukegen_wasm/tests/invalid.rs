use cukegen_wasm::scaffold_steps;

#[test]
fn invalid_input_returns_error_json() {
    let out = scaffold_steps("not json");
    let v: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert!(v.get("error").is_some(), "expected error field in JSON: {}", out);
}

#[test]
fn malformed_feature_returns_error_json() {
    let input = serde_json::json!({
        "feature": { "path": "bad.feature", "text": "no keywords here" }
    })
    .to_string();
    let out = scaffold_steps(&input);
    let v: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    let error = v.get("error").and_then(|e| e.as_str()).unwrap_or_default();
    assert!(error.starts_with("bad.feature:"), "unexpected error: {}", out);
}
