use std::path::Path;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use reqspec::{Artifact, ArtifactKind};
use serde::Serialize;
use tracing::instrument;

use super::{
    terminal::{self, Colorize},
    KindArg,
};

/// Narrowest title column before the table stops truncating.
const MIN_TITLE_WIDTH: usize = 16;

/// Command arguments for `reqspec list`.
#[derive(Debug, Parser)]
#[command(about = "List goals and requirements")]
pub struct List {
    /// Filter by kind (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',', value_name = "KIND")]
    kind: Vec<KindArg>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    kind: ArtifactKind,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    categories: Vec<&'a str>,
    edges: usize,
}

impl<'a> From<&'a Artifact> for Row<'a> {
    fn from(artifact: &'a Artifact) -> Self {
        Self {
            kind: artifact.kind(),
            name: artifact.name().as_str(),
            title: artifact.title(),
            id: artifact.id(),
            categories: artifact
                .categories()
                .iter()
                .map(|category| category.name().as_str())
                .collect(),
            edges: artifact.edges().map(|(_, targets)| targets.len()).sum(),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = super::load_root(root)?;

        let kinds: Vec<ArtifactKind> = self.kind.iter().copied().map(Into::into).collect();
        let rows: Vec<Row<'_>> = workspace
            .iter()
            .filter(|artifact| kinds.is_empty() || kinds.contains(&artifact.kind()))
            .map(Row::from)
            .collect();

        match self.output {
            OutputFormat::Table => render_table(&rows, self.quiet),
            OutputFormat::Json => render_json(&rows)?,
        }
        Ok(())
    }
}

fn render_table(rows: &[Row<'_>], quiet: bool) {
    if quiet {
        for row in rows {
            println!("{}\t{}", row.kind, row.name);
        }
        return;
    }

    if rows.is_empty() {
        println!("{}", "No artifacts found".dim());
        return;
    }

    let headers = ["KIND", "NAME", "TITLE", "EDGES"];
    let data: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.kind.to_string(),
                row.name.to_string(),
                row.title.unwrap_or_default().to_string(),
                row.edges.to_string(),
            ]
        })
        .collect();

    let mut widths = [0; 4];
    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = data
            .iter()
            .map(|row| row[idx].chars().count())
            .max()
            .unwrap_or(0)
            .max(header.len());
    }

    // Shrink the title column to fit the terminal, if it is known.
    if let Some(total) = terminal::terminal_width() {
        let others: usize = widths[0] + widths[1] + widths[3] + 4 * 2;
        let available = usize::from(total).saturating_sub(others);
        widths[2] = widths[2].min(available.max(MIN_TITLE_WIDTH));
    }

    for (header, width) in headers.iter().zip(widths) {
        print!("{header:<width$}  ");
    }
    println!();
    for width in widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in data {
        for (idx, value) in row.iter().enumerate() {
            let width = widths[idx];
            let value = terminal::truncate(value, width);
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn render_json(rows: &[Row<'_>]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
