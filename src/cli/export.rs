use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use reqspec::{ArtifactKind, Config};
use tracing::instrument;

use super::{terminal::Colorize, KindArg};

#[derive(Debug, Parser)]
#[command(about = "Export the goals or requirements of a snapshot as Sphinx-Needs")]
pub struct Export {
    /// The snapshot file to export
    file: PathBuf,

    /// Which artifacts to export (defaults to the configured kind)
    #[arg(value_enum)]
    kind: Option<KindArg>,

    /// Directory to write the output to
    ///
    /// Defaults to the configured destination, or a `generated` directory
    /// next to the snapshot.
    #[arg(short, long, value_name = "DIR")]
    destination: Option<PathBuf>,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(root)?;
        let kind = self.kind.map_or(config.export_kind, ArtifactKind::from);
        let destination = self
            .destination
            .or_else(|| config.destination.as_ref().map(|dir| root.join(dir)));

        let workspace = reqspec::load_file(&self.file)
            .with_context(|| format!("failed to load {}", self.file.display()))?;
        let path = reqspec::export(&workspace, kind, &self.file, destination.as_deref())?;

        println!(
            "{}",
            format!(
                "Exported {} {kind} artifacts to {}",
                workspace.count(kind),
                path.display()
            )
            .success()
        );
        Ok(())
    }
}
