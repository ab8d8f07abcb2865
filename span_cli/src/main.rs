//! # Timberspan CLI Application
//!
//! Command line front end for `span_core`: one-shot lookups, dimension
//! listings, dataset provenance and audits, plus a prompt-driven mode.
//!
//! Logging goes to stderr. The filter comes from `SPAN_CLI_LOG` when set,
//! otherwise from the `log_level` setting.

mod cli;
mod output;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use span_core::audit::audit_grade_ordering;
use span_core::elements::subtype_info;
use span_core::enumerate;
use span_core::{
    try_resolve, DatasetSource, Dimension, ElementType, OutputFormat, ReferenceDataset, Selection, Settings,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command, ListCommand};

const CONFIG_ENV: &str = "SPAN_CLI_CONFIG";
const LOG_ENV: &str = "SPAN_CLI_LOG";

/// Exit code when a lookup has no tabulated value
const NO_RESULT: u8 = 2;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let settings = load_settings(&args)?;
    init_logging(&settings);

    let source = match &args.dataset {
        Some(path) => DatasetSource::File(path.clone()),
        None => settings.dataset_source(),
    };
    debug!(%source, "loading reference dataset");
    let dataset = source
        .load()
        .with_context(|| format!("Failed to load {}", source))?;

    let json = args.json || settings.output == OutputFormat::Json;

    match args.command {
        Command::Resolve { element, grade, size, spacing, subtype } => {
            let selection = Selection {
                grade: Some(grade.unwrap_or_else(|| settings.default_grade.clone())),
                size: Some(size),
                spacing: spacing.or_else(|| default_spacing(&element, &settings)),
                subtype,
                element_type: element,
            };
            print_lookup(&dataset, &selection, json)
        }
        Command::List { what } => {
            list(&dataset, what, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sources => {
            if json {
                #[derive(Serialize)]
                struct Provenance<'a> {
                    meta: &'a span_core::dataset::DatasetMeta,
                    usage_notes: &'a [String],
                }
                print_json(&Provenance {
                    meta: &dataset.meta,
                    usage_notes: dataset.usage_notes(),
                })?;
            } else {
                print!("{}", output::sources_text(&dataset));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Audit => audit(&dataset, json),
        Command::Interactive => interactive(&dataset, &settings, json),
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => Settings::load(&path).with_context(|| format!("Failed to read settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn init_logging(settings: &Settings) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(&settings.log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Configured spacing, for elements that have a spacing dimension
fn default_spacing(element: &str, settings: &Settings) -> Option<String> {
    let element = ElementType::from_key(element)?;
    element
        .shape()
        .requires(Dimension::Spacing)
        .then(|| settings.default_spacing.clone())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_lookup(dataset: &ReferenceDataset, selection: &Selection, json: bool) -> Result<ExitCode> {
    match try_resolve(dataset, selection) {
        Ok(result) => {
            if json {
                print_json(&result)?;
            } else {
                print!("{}", output::result_text(&result, dataset.disclaimer()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(miss) => {
            if miss.is_fault() {
                warn!(element = %selection.element_type, %miss, "lookup fault");
            }
            if json {
                println!("null");
            } else {
                println!("No data for this combination");
                println!("  ({})", miss);
            }
            Ok(ExitCode::from(NO_RESULT))
        }
    }
}

fn list(dataset: &ReferenceDataset, what: ListCommand, json: bool) -> Result<()> {
    // (key, description) rows
    let rows: Vec<(String, String)> = match what {
        ListCommand::Elements => enumerate::element_types(dataset)
            .into_iter()
            .map(|element| {
                let description = dataset
                    .element(element)
                    .map(|definition| definition.description.clone())
                    .unwrap_or_default();
                (element.key().to_string(), description)
            })
            .collect(),
        ListCommand::Grades => enumerate::grades(dataset)
            .into_iter()
            .map(|grade| {
                let description = enumerate::grade_description(dataset, &grade).unwrap_or_default().to_string();
                (grade, description)
            })
            .collect(),
        ListCommand::Spacings => enumerate::spacing_labels(dataset)
            .into_iter()
            .map(|label| (label, String::new()))
            .collect(),
        ListCommand::Sizes { element } => enumerate::sizes(dataset, element)
            .into_iter()
            .map(|size| (size, String::new()))
            .collect(),
        ListCommand::Subtypes { element } => enumerate::subtypes(dataset, element)
            .into_iter()
            .map(|key| {
                let info = subtype_info(&key);
                (key, info.description.unwrap_or_default().to_string())
            })
            .collect(),
    };

    if json {
        let keys: Vec<&str> = rows.iter().map(|(key, _)| key.as_str()).collect();
        return print_json(&keys);
    }

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, description) in &rows {
        if description.is_empty() {
            println!("{}", key);
        } else {
            println!("{:<width$}  {}", key, description, width = width);
        }
    }
    Ok(())
}

fn audit(dataset: &ReferenceDataset, json: bool) -> Result<ExitCode> {
    let report = dataset.validate().context("Dataset failed validation")?;
    let issues = audit_grade_ordering(dataset);

    if json {
        #[derive(Serialize)]
        struct Audit<'a> {
            warnings: &'a [String],
            grade_ordering: &'a [span_core::audit::GradeOrderingIssue],
        }
        print_json(&Audit {
            warnings: &report.warnings,
            grade_ordering: &issues,
        })?;
    } else {
        print!("{}", output::audit_text(&report, &issues));
    }

    Ok(if issues.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// Interactive mode
// ============================================================================

/// Read one trimmed line; empty input or a read failure yields `None`.
fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()).filter(|s| !s.is_empty()),
    }
}

fn prompt_string(prompt: &str, default: &str) -> String {
    prompt_line(&format!("{} [{}]: ", prompt, default)).unwrap_or_else(|| default.to_string())
}

/// Pick from a numbered list by number or by key. Unrecognized input picks the default.
fn prompt_choice(prompt: &str, options: &[String], default: usize) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let default = default.min(options.len() - 1);

    for (index, option) in options.iter().enumerate() {
        println!("  {}) {}", index + 1, option);
    }
    let answer = prompt_line(&format!("{} [{}]: ", prompt, options[default]));
    Some(pick(options, answer.as_deref()).unwrap_or_else(|| options[default].clone()))
}

fn pick(options: &[String], answer: Option<&str>) -> Option<String> {
    let answer = answer?;
    if let Ok(number) = answer.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| options.get(index)).cloned();
    }
    options.iter().find(|option| option.eq_ignore_ascii_case(answer)).cloned()
}

fn interactive(dataset: &ReferenceDataset, settings: &Settings, json: bool) -> Result<ExitCode> {
    println!("Timberspan - Timber Span Lookup");
    println!("===============================");
    println!();

    let elements: Vec<String> = enumerate::element_types(dataset)
        .into_iter()
        .map(|element| element.key().to_string())
        .collect();
    let Some(element_key) = prompt_choice("Element", &elements, 0) else {
        anyhow::bail!("Dataset has no element tables");
    };
    let Some(element) = ElementType::from_key(&element_key) else {
        anyhow::bail!("Unknown element type '{}'", element_key);
    };
    let shape = element.shape();
    println!();

    let grades = enumerate::grades(dataset);
    let default_grade = grades.iter().position(|g| *g == settings.default_grade).unwrap_or(0);
    let grade = prompt_choice("Grade", &grades, default_grade).unwrap_or_else(|| settings.default_grade.clone());
    println!();

    let mut selection = Selection::new(element.key()).grade(grade);

    let sizes = enumerate::sizes(dataset, element);
    if let Some(size) = prompt_choice("Size", &sizes, 0) {
        selection = selection.size(size);
    }
    println!();

    if let Some(kind) = shape.subtype_kind() {
        let subtypes = enumerate::subtypes(dataset, element);
        if let Some(subtype) = prompt_choice(kind.display_name(), &subtypes, 0) {
            selection = selection.subtype(subtype);
        }
        println!();
    }

    if shape.requires(Dimension::Spacing) {
        let spacing = prompt_string("Spacing (mm)", &settings.default_spacing);
        selection = selection.spacing(spacing);
        println!();
    }

    print_lookup(dataset, &selection, json)
}
