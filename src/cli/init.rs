use std::path::Path;

use anyhow::Context;
use clap::Parser;
use reqspec::{domain::CONFIG_PATH, Config};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Create a default configuration file")]
pub struct Init {
    /// File name suffix of snapshot files
    #[arg(long, value_name = "SUFFIX")]
    extension: Option<String>,

    /// Skip paths matching this regular expression during discovery
    #[arg(long, value_name = "REGEX")]
    omit: Option<String>,

    /// Only look for snapshots directly under the root
    #[arg(long)]
    no_recursive: bool,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let path = root.join(CONFIG_PATH);
        if path.exists() {
            anyhow::bail!(
                "Repository already initialized (found existing {})",
                path.display()
            );
        }

        let mut config = Config::default();
        if let Some(extension) = &self.extension {
            config.set_extension(extension);
        }
        config.set_omit(self.omit)?;
        config.recursive = !self.no_recursive;

        config
            .save(&path)
            .with_context(|| format!("Failed to create {CONFIG_PATH}"))?;

        println!(
            "{}",
            format!("Initialized snapshot repository in {}", root.display()).success()
        );
        println!("  Created: {CONFIG_PATH}");
        println!(
            "{}",
            format!("  Snapshots: *.{}", config.extension()).dim()
        );
        Ok(())
    }
}
