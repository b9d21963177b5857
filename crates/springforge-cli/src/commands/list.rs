//! Implementation of the `springforge list` command.

use serde_json::{Map, Value};

use springforge_core::domain::{
    ARCHITECTURE_REGISTRY, DependencyRegistry, PRESET_REGISTRY, VersionCatalog,
};

use crate::{
    cli::{ListArgs, ListFormat, ListTarget},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let listing = match args.target {
        ListTarget::Architectures => architectures(),
        ListTarget::Dependencies => {
            let registry = super::load_registry(&config.rule_files(&args.rules))?;
            dependencies(&registry, args.category.as_deref())?
        }
        ListTarget::Presets => presets(),
        ListTarget::Versions => versions(&VersionCatalog::builtin()),
    };

    match args.format {
        ListFormat::Table => {
            output.header(listing.title)?;
            for line in listing.table_lines() {
                output.data(&line)?;
            }
        }
        ListFormat::List => {
            for row in &listing.rows {
                output.data(&row[0])?;
            }
        }
        ListFormat::Json => output.json(&listing.to_json())?,
        ListFormat::Csv => {
            for line in listing.csv_lines() {
                output.data(&line)?;
            }
        }
    }
    Ok(())
}

/// Rows of one catalogue. The first column is always the id.
#[derive(Debug)]
pub(crate) struct Listing {
    title: &'static str,
    columns: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Listing {
    fn table_lines(&self) -> Vec<String> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render = |cells: Vec<&str>| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            format!("  {}", padded.join("  ")).trim_end().to_string()
        };

        let header: Vec<String> = self.columns.iter().map(|c| c.to_uppercase()).collect();
        let mut lines = vec![render(header.iter().map(String::as_str).collect())];
        lines.extend(
            self.rows
                .iter()
                .map(|row| render(row.iter().map(String::as_str).collect())),
        );
        lines
    }

    fn csv_lines(&self) -> Vec<String> {
        let mut lines = vec![self.columns.join(",")];
        lines.extend(self.rows.iter().map(|row| {
            row.iter()
                .map(|cell| csv_escape(cell))
                .collect::<Vec<_>>()
                .join(",")
        }));
        lines
    }

    fn to_json(&self) -> Value {
        let items = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.to_string(), Value::String(cell.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(items)
    }
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

// ── Catalogues ───────────────────────────────────────────────────────────────

fn architectures() -> Listing {
    Listing {
        title: "Architecture styles:",
        columns: &["id", "name", "layers", "description"],
        rows: ARCHITECTURE_REGISTRY
            .iter()
            .map(|def| {
                vec![
                    def.style.to_string(),
                    def.display_name.to_string(),
                    def.layers.len().to_string(),
                    def.description.to_string(),
                ]
            })
            .collect(),
    }
}

pub(crate) fn dependencies(
    registry: &DependencyRegistry,
    category: Option<&str>,
) -> CliResult<Listing> {
    let rules = registry.all();
    let rows: Vec<Vec<String>> = rules
        .into_iter()
        .filter(|rule| category.is_none_or(|c| rule.category.as_str().eq_ignore_ascii_case(c)))
        .map(|rule| {
            vec![
                rule.id.clone(),
                rule.name.clone(),
                rule.category.to_string(),
                rule.priority.to_string(),
                rule.aliases.join(" "),
            ]
        })
        .collect();

    if rows.is_empty() {
        if let Some(category) = category {
            return Err(CliError::Usage {
                message: format!("no dependencies in category '{category}'"),
                source: None,
            });
        }
    }

    Ok(Listing {
        title: "Dependencies:",
        columns: &["id", "name", "category", "priority", "aliases"],
        rows,
    })
}

fn presets() -> Listing {
    Listing {
        title: "Presets:",
        columns: &["id", "architecture", "java", "dependencies", "features"],
        rows: PRESET_REGISTRY
            .iter()
            .map(|preset| {
                vec![
                    preset.id.to_string(),
                    preset.architecture.to_string(),
                    preset.language_version.to_string(),
                    preset.dependencies.join(" "),
                    preset
                        .features
                        .enabled()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                ]
            })
            .collect(),
    }
}

fn versions(catalog: &VersionCatalog) -> Listing {
    Listing {
        title: "Platform versions:",
        columns: &["line", "spring-boot", "lombok", "springdoc", "mapstruct", "jjwt"],
        rows: catalog
            .lines()
            .map(|table| {
                vec![
                    table.line.to_string(),
                    table.boot_version.to_string(),
                    table.lombok.to_string(),
                    table.springdoc.to_string(),
                    table.mapstruct.to_string(),
                    table.jjwt.to_string(),
                ]
            })
            .collect(),
    }
}
