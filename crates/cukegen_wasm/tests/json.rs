use cukegen_wasm::scaffold_steps;

#[test]
fn json_round_trip() {
    let input = serde_json::json!({
        "feature": {
            "path": "features/cart.feature",
            "text": "Feature: Cart\n  Scenario: s\n    Given I am logged in\n    When I add \"apple\"\n    And I add \"pear\"\n    Then I see 2 items\n"
        },
        "files": [
            { "path": "steps/auth.steps.js", "text": "Given('I am logged in', () => {});" },
            { "path": "steps/cart.steps.js", "text": "Then('I see {int} items', () => {});" }
        ],
        "destination": "steps/cart.steps.js"
    })
    .to_string();

    let out = scaffold_steps(&input);
    let v: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(v["language"], "en");

    let steps = v["steps"].as_array().expect("steps array");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["category"], "When");
    assert_eq!(steps[0]["pattern"], "I add {string}");
    assert_eq!(steps[0]["parameters"], serde_json::json!(["param1"]));
    assert_eq!(steps[1]["category"], "Then");

    let skipped = v["skipped"].as_array().expect("skipped array");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["implemented_in"]["file"], "steps/auth.steps.js");
}

#[test]
fn options_are_honoured() {
    let input = serde_json::json!({
        "feature": {
            "path": "f.feature",
            "text": "Feature: F\n  Scenario: s\n    Given I wait 5 seconds\n"
        },
        "options": { "extractor": { "integers": false } }
    })
    .to_string();

    let v: serde_json::Value = serde_json::from_str(&scaffold_steps(&input)).expect("valid JSON");
    assert_eq!(v["steps"][0]["pattern"], "I wait 5 seconds");
    assert_eq!(v["steps"][0]["parameters"], serde_json::json!([]));
}
