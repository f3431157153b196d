use std::path::{Path, PathBuf};

use cukegen_core::{
    index_implemented_steps, parse_feature, KeywordTable, ParsedDocument, ScaffoldPlan, Scaffolder,
};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::discovery::list_handler_files;
use crate::error::GenerateError;
use crate::render::{StepRenderer, TemplateData};

/// Outcome of a generation run.
#[derive(Debug)]
pub struct GenerationReport {
    pub feature: PathBuf,
    pub destination: PathBuf,
    pub plan: ScaffoldPlan,
    pub rendered: String,
    /// False on dry runs.
    pub written: bool,
}

/// Reads the feature, scans the steps directory, renders and writes the
/// steps file. Any error aborts the run before the output is written.
pub async fn run(settings: &Settings) -> Result<GenerationReport, GenerateError> {
    let feature = settings.feature_path()?;
    let destination = settings.destination(&feature);

    info!("Parsing {}", feature.display());
    let document = read_document(&feature).await?;

    let custom_table = match &settings.keywords {
        Some(path) => Some(load_keywords(path).await?),
        None => None,
    };
    let table = custom_table.as_ref().unwrap_or_else(|| KeywordTable::builtin());
    debug!(
        "feature '{}' ({}): {} scenarios",
        document.name,
        table
            .language_name(&document.language)
            .unwrap_or(&document.language),
        document.scenarios.len()
    );

    info!("Scanning {} for existing steps", settings.steps_dir.display());
    let files = {
        let root = settings.steps_dir.clone();
        let exclude = destination.clone();
        tokio::task::spawn_blocking(move || list_handler_files(&root, &exclude)).await??
    };
    let existing = index_implemented_steps(&files, destination.to_str());
    if existing.stats.ambiguous > 0 {
        warn!(
            "{} patterns are registered more than once in {}",
            existing.stats.ambiguous,
            settings.steps_dir.display()
        );
    }

    let plan = Scaffolder::new(table, settings.options).plan(&document, &existing);
    if plan.steps.is_empty() {
        warn!("every step of {} is already implemented", feature.display());
    }

    let renderer = match &settings.template {
        Some(path) => {
            let template = fs::read_to_string(path)
                .await
                .map_err(|source| GenerateError::ReadTemplate {
                    path: path.clone(),
                    source,
                })?;
            StepRenderer::new(&template)?
        }
        None => StepRenderer::with_default_template()?,
    };
    let rendered = renderer.render(&TemplateData {
        feature: &document.name,
        language: &document.language,
        steps: &plan.steps,
    })?;

    let written = if settings.dry_run {
        false
    } else {
        write_output(&destination, &rendered, settings.force).await?;
        info!(
            "Wrote {} step definitions to {} ({} already implemented)",
            plan.steps.len(),
            destination.display(),
            plan.skipped.len()
        );
        true
    };

    Ok(GenerationReport {
        feature,
        destination,
        plan,
        rendered,
        written,
    })
}

async fn read_document(path: &Path) -> Result<ParsedDocument, GenerateError> {
    let source = fs::read_to_string(path)
        .await
        .map_err(|source| GenerateError::ReadFeature {
            path: path.to_path_buf(),
            source,
        })?;
    parse_feature(&source).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

async fn load_keywords(path: &Path) -> Result<KeywordTable, GenerateError> {
    let json = fs::read_to_string(path)
        .await
        .map_err(|source| GenerateError::ReadKeywords {
            path: path.to_path_buf(),
            source,
        })?;
    KeywordTable::from_json(&json).map_err(|source| GenerateError::Keywords {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_output(destination: &Path, contents: &str, force: bool) -> Result<(), GenerateError> {
    if !force && fs::try_exists(destination).await.unwrap_or(false) {
        return Err(GenerateError::DestinationExists(destination.to_path_buf()));
    }
    let write_error = |source: std::io::Error| GenerateError::Write {
        path: destination.to_path_buf(),
        source,
    };
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    fs::write(destination, contents).await.map_err(write_error)
}
