use std::path::Path;

use anyhow::Context;
use clap::Parser;
use reqspec::{Issue, Severity, Validator, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
#[command(about = "Check every discovered snapshot for integrity issues")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = super::load_root(root)?;
        let issues = Validator::default().validate(&workspace);

        match self.output {
            OutputFormat::Table => self.output_table(&workspace, &issues),
            OutputFormat::Json => output_json(&issues)?,
            OutputFormat::Summary => output_summary(&issues),
        }

        // Exit with appropriate code
        if issues.iter().any(Issue::is_error) {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, workspace: &Workspace, issues: &[Issue]) {
        for issue in issues {
            if self.quiet && !issue.is_error() {
                continue;
            }
            let label = format!("{}[{}]", issue.severity, issue.code).severity(issue.severity);
            println!("{label} {}", issue.message);
            println!(
                "{}",
                format!("  --> {} ({})", issue.locus, issue.locus.node.kind).dim()
            );
        }

        if self.quiet {
            return;
        }

        let (errors, warnings) = count(issues);
        if errors + warnings == 0 {
            println!(
                "{}",
                format!("{} artifacts checked, no issues", workspace.len()).success()
            );
        } else {
            let summary = format!(
                "{} artifacts checked: {errors} errors, {warnings} warnings",
                workspace.len()
            );
            if errors > 0 {
                println!("\n{}", summary.error());
            } else {
                println!("\n{}", summary.warning());
            }
        }
    }
}

fn output_json(issues: &[Issue]) -> anyhow::Result<()> {
    use serde_json::json;

    let (errors, warnings) = count(issues);
    let output = json!({
        "status": if errors == 0 { "ok" } else { "errors_found" },
        "issues": issues,
        "summary": {
            "errors": errors,
            "warnings": warnings,
        }
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to render json output")?
    );
    Ok(())
}

fn output_summary(issues: &[Issue]) {
    let (errors, warnings) = count(issues);
    println!("errors={errors} warnings={warnings}");
}

/// Counts issues by severity as `(errors, warnings)`.
fn count(issues: &[Issue]) -> (usize, usize) {
    issues
        .iter()
        .fold((0, 0), |(errors, warnings), issue| match issue.severity {
            Severity::Error => (errors + 1, warnings),
            Severity::Warning => (errors, warnings + 1),
        })
}
