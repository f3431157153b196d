//! Renders handler descriptors through a Handlebars template.
//!
//! Templates see `feature`, `language` and `steps`; every step has
//! `category` (`Given`/`When`/`Then` or null), `pattern` and `parameters`.

use cukegen_core::HandlerDescriptor;
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::GenerateError;

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/steps.js.hbs");

const TEMPLATE_NAME: &str = "steps";

#[derive(Debug, Serialize)]
pub struct TemplateData<'a> {
    pub feature: &'a str,
    pub language: &'a str,
    pub steps: &'a [HandlerDescriptor],
}

pub struct StepRenderer {
    handlebars: Handlebars<'static>,
}

impl StepRenderer {
    pub fn new(template: &str) -> Result<Self, GenerateError> {
        let mut handlebars = Handlebars::new();
        // Output is source code, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);

        // Register helpers
        handlebars.register_helper("join", Box::new(join_helper));
        handlebars.register_helper("js_string", Box::new(js_string_helper));

        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(Box::new)?;
        Ok(Self { handlebars })
    }

    pub fn with_default_template() -> Result<Self, GenerateError> {
        Self::new(DEFAULT_TEMPLATE)
    }

    pub fn render(&self, data: &TemplateData<'_>) -> Result<String, GenerateError> {
        Ok(self.handlebars.render(TEMPLATE_NAME, data)?)
    }
}

/// Escapes text for a single-quoted JavaScript string literal.
pub fn js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

// Handlebars helpers

/// `{{join list ", "}}`
fn join_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
    let items: Vec<String> = h
        .param(0)
        .and_then(|v| v.value().as_array())
        .map(|values| {
            values
                .iter()
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    out.write(&items.join(separator))?;
    Ok(())
}

fn js_string_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&js_string(param))?;
    Ok(())
}
