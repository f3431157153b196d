//! Command line arguments and the settings a run is driven by.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use cukegen_core::{ExtractorOptions, ScaffoldOptions, UnclassifiedPolicy};

use crate::error::GenerateError;

pub const FEATURE_EXTENSION: &str = ".feature";

#[derive(Parser, Debug)]
#[command(name = "cukegen")]
#[command(about = "Scaffold Cucumber step definitions from a Gherkin feature file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Feature file (the `.feature` suffix may be omitted)
    pub feature: Option<PathBuf>,

    /// Directory the steps file is written to and scanned for existing steps
    #[arg(short, long, default_value = ".")]
    pub steps_dir: PathBuf,

    /// Handlebars template used to render the steps file
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Keyword table in gherkin-languages.json format, replacing the builtin one
    #[arg(short, long)]
    pub keywords: Option<PathBuf>,

    /// Extension of the generated file
    #[arg(short, long, default_value = "js")]
    pub extension: String,

    /// What to do with steps whose keyword is not in the keyword table
    #[arg(long, value_enum, default_value_t = Unclassified::Emit)]
    pub unclassified: Unclassified,

    /// Leave single-quoted text alone instead of turning it into {string}
    #[arg(long)]
    pub no_single_quotes: bool,

    /// Leave bare integers alone instead of turning them into {int}
    #[arg(long)]
    pub no_integers: bool,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite the steps file if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Unclassified {
    Emit,
    Skip,
}

impl From<Unclassified> for UnclassifiedPolicy {
    fn from(value: Unclassified) -> Self {
        match value {
            Unclassified::Emit => UnclassifiedPolicy::Emit,
            Unclassified::Skip => UnclassifiedPolicy::Skip,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub feature: Option<PathBuf>,
    pub steps_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub keywords: Option<PathBuf>,
    pub extension: String,
    pub options: ScaffoldOptions,
    pub dry_run: bool,
    pub force: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feature: None,
            steps_dir: PathBuf::from("."),
            template: None,
            keywords: None,
            extension: "js".to_string(),
            options: ScaffoldOptions::default(),
            dry_run: false,
            force: false,
        }
    }
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            feature: cli.feature,
            steps_dir: cli.steps_dir,
            template: cli.template,
            keywords: cli.keywords,
            extension: cli.extension,
            options: ScaffoldOptions {
                unclassified: cli.unclassified.into(),
                extractor: ExtractorOptions {
                    single_quotes: !cli.no_single_quotes,
                    integers: !cli.no_integers,
                },
            },
            dry_run: cli.dry_run,
            force: cli.force,
        }
    }
}

impl Settings {
    /// The feature file to read, with `.feature` appended when missing.
    pub fn feature_path(&self) -> Result<PathBuf, GenerateError> {
        let feature = self
            .feature
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(GenerateError::InputMissing)?;
        Ok(with_feature_extension(feature))
    }

    /// `<steps_dir>/<stem>.steps.<extension>`, where the stem is the
    /// feature's file name up to its first dot.
    pub fn destination(&self, feature: &Path) -> PathBuf {
        let stem = feature_stem(feature);
        let extension = self.extension.trim_start_matches('.');
        self.steps_dir.join(format!("{stem}.steps.{extension}"))
    }
}

fn with_feature_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(FEATURE_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_owned();
        raw.push(FEATURE_EXTENSION);
        PathBuf::from(raw)
    }
}

fn feature_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.find('.') {
        Some(dot) => name[..dot].to_string(),
        None => name,
    }
}
