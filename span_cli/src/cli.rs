use std::path::PathBuf;

use clap::{Parser, Subcommand};
use span_core::ElementType;

#[derive(Parser, Debug)]
#[command(name = "span-cli")]
#[command(about = "Maximum span and wall height lookups for structural timber")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Reference dataset file (defaults to the shipped tables)
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Settings file (TOML). Falls back to $SPAN_CLI_CONFIG
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the capacity for one combination
    Resolve {
        /// Element type key, e.g. floor_joists
        #[arg(long)]
        element: String,

        /// Strength class (defaults to the configured grade)
        #[arg(long)]
        grade: Option<String>,

        /// Section size, e.g. 47x150
        #[arg(long)]
        size: String,

        /// Spacing, e.g. 400 or 400mm (defaults to the configured spacing)
        #[arg(long)]
        spacing: Option<String>,

        /// Wall type or stringer type
        #[arg(long)]
        subtype: Option<String>,
    },

    /// List valid choices for a dimension
    List {
        #[command(subcommand)]
        what: ListCommand,
    },

    /// Show dataset provenance, usage notes and disclaimer
    Sources,

    /// Check the dataset for shape warnings and grade ordering problems
    Audit,

    /// Choose a combination step by step
    Interactive,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    Elements,
    Grades,
    Spacings,
    Sizes {
        #[arg(long, value_parser = parse_element)]
        element: ElementType,
    },
    Subtypes {
        #[arg(long, value_parser = parse_element)]
        element: ElementType,
    },
}

fn parse_element(key: &str) -> Result<ElementType, String> {
    ElementType::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = ElementType::ALL.iter().map(|e| e.key()).collect();
        format!("unknown element type '{}' (expected one of: {})", key, known.join(", "))
    })
}
