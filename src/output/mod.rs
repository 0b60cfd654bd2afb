//! Output formatting for command results
//!
//! Results print as an aligned table by default, or as JSON or YAML documents.

mod table;
mod yaml;

pub use table::{render_table, Tabular};
pub use yaml::to_yaml;

use clap::ValueEnum;
use serde::Serialize;
use std::io;
use thiserror::Error;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Block-style YAML
    Yaml,
}

/// Errors that can occur while rendering or printing output
#[derive(Debug, Error)]
pub enum OutputError {
    /// The result could not be converted to JSON
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to stdout failed
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Renders a list of resources
pub fn render_list<T: Serialize + Tabular>(
    items: &[T],
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = items.iter().map(Tabular::row).collect();
            Ok(render_table(&T::headers(), &rows))
        }
        OutputFormat::Json => render_json(items),
        OutputFormat::Yaml => Ok(to_yaml(&serde_json::to_value(items)?)),
    }
}

/// Renders a single resource
pub fn render_one<T: Serialize + Tabular>(
    item: &T,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Table => Ok(render_table(&T::headers(), &[item.row()])),
        OutputFormat::Json => render_json(item),
        OutputFormat::Yaml => Ok(to_yaml(&serde_json::to_value(item)?)),
    }
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
