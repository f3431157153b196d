use cucumber::gherkin::Step;
use cucumber::{then, when};
use cukegen_core::pattern::placeholder_count;
use cukegen_core::PatternExtractor;
use crate::CoreWorld;

fn docstring(step: &Step) -> String {
    step.docstring.clone().unwrap_or_default().trim().to_string()
}

#[when("I extract the pattern of:")]
async fn extract_pattern_of(world: &mut CoreWorld, step: &Step) {
    let extractor = PatternExtractor::new(world.options.extractor);
    world.pattern = extractor.extract(&docstring(step));
}

#[when("I extract the pattern of an empty step")]
async fn extract_empty(world: &mut CoreWorld) {
    world.pattern = PatternExtractor::default().extract("");
}

#[then("the pattern is:")]
async fn pattern_is(world: &mut CoreWorld, step: &Step) {
    let extracted = world.pattern.as_ref().expect("pattern extracted");
    assert_eq!(extracted.pattern, docstring(step));
}

#[then(regex = r#"^the parameters are "([^"]*)"$"#)]
async fn parameters_are(world: &mut CoreWorld, expected: String) {
    let extracted = world.pattern.as_ref().expect("pattern extracted");
    let expected: Vec<&str> = expected.split(',').map(str::trim).collect();
    assert_eq!(extracted.parameters, expected);
    assert_eq!(extracted.parameters.len(), placeholder_count(&extracted.pattern));
}

#[then("there are no parameters")]
async fn no_parameters(world: &mut CoreWorld) {
    let extracted = world.pattern.as_ref().expect("pattern extracted");
    assert!(extracted.parameters.is_empty(), "unexpected {:?}", extracted.parameters);
}

#[then("nothing is extracted")]
async fn nothing_extracted(world: &mut CoreWorld) {
    assert!(world.pattern.is_none());
}
