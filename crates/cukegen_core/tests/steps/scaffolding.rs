use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use cukegen_core::{
    index_implemented_steps, parse_feature, KeywordTable, Scaffolder, SourceFile, StepKind,
    UnclassifiedPolicy,
};
use crate::CoreWorld;

fn docstring(step: &Step) -> String {
    step.docstring.clone().unwrap_or_default().trim().to_string()
}

#[given("a feature file:")]
async fn a_feature_file(world: &mut CoreWorld, step: &Step) {
    world.feature = docstring(step);
}

#[given(regex = r#"^a handler file "([^"]+)" with content:$"#)]
async fn a_handler_file(world: &mut CoreWorld, path: String, step: &Step) {
    world.files.push(SourceFile {
        path,
        text: docstring(step),
    });
}

#[given(regex = r#"^the destination is "([^"]+)"$"#)]
async fn the_destination(world: &mut CoreWorld, path: String) {
    world.destination = Some(path);
}

#[given("the keyword table:")]
async fn the_keyword_table(world: &mut CoreWorld, step: &Step) {
    let table = KeywordTable::from_json(&docstring(step)).expect("valid keyword table");
    world.table = Some(table);
}

#[given("unclassified steps are skipped")]
async fn unclassified_skipped(world: &mut CoreWorld) {
    world.options.unclassified = UnclassifiedPolicy::Skip;
}

#[when("I plan the scaffold")]
async fn plan_the_scaffold(world: &mut CoreWorld) {
    let document = parse_feature(&world.feature).expect("feature parses");
    let table = world.table.as_ref().unwrap_or_else(|| KeywordTable::builtin());
    let existing = index_implemented_steps(&world.files, world.destination.as_deref());
    world.plan = Some(Scaffolder::new(table, world.options).plan(&document, &existing));
}

#[then(regex = r"^the plan contains (\d+) handlers?$")]
async fn plan_contains(world: &mut CoreWorld, n: usize) {
    let plan = world.plan.as_ref().expect("plan built");
    assert_eq!(plan.steps.len(), n, "handlers: {:?}", plan.steps);
}

#[then(regex = r#"^handler (\d+) is "(Given|When|Then|unclassified)" with pattern "(.*)"$"#)]
async fn handler_is(world: &mut CoreWorld, n: usize, kind: String, pattern: String) {
    let plan = world.plan.as_ref().expect("plan built");
    let handler = plan.steps.get(n - 1).expect("handler exists");
    let expected_kind = match kind.as_str() {
        "Given" => Some(StepKind::Given),
        "When" => Some(StepKind::When),
        "Then" => Some(StepKind::Then),
        _ => None,
    };
    assert_eq!(handler.category, expected_kind);
    assert_eq!(handler.pattern, pattern);
}

#[then(regex = r#"^handler (\d+) has parameters "([^"]*)"$"#)]
async fn handler_has_parameters(world: &mut CoreWorld, n: usize, parameters: String) {
    let plan = world.plan.as_ref().expect("plan built");
    let handler = plan.steps.get(n - 1).expect("handler exists");
    assert_eq!(handler.parameters.join(", "), parameters);
}

#[then(regex = r#"^"(.*)" is skipped as implemented in "([^"]+)"$"#)]
async fn skipped_as_implemented(world: &mut CoreWorld, pattern: String, file: String) {
    let plan = world.plan.as_ref().expect("plan built");
    let found = plan
        .skipped
        .iter()
        .any(|s| s.descriptor.pattern == pattern && s.implemented_in.file == file);
    assert!(found, "expected {pattern} to be skipped via {file}: {:?}", plan.skipped);
}

#[then(regex = r"^(\d+) steps? (?:is|are) unclassified$")]
async fn unclassified_count(world: &mut CoreWorld, n: usize) {
    let plan = world.plan.as_ref().expect("plan built");
    assert_eq!(plan.unclassified, n);
}
