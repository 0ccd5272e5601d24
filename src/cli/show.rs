use std::{path::Path, process};

use clap::Parser;
use reqspec::{domain::summary, ArtifactKind, Name};
use tracing::instrument;

use super::{terminal::Colorize, KindArg};

#[derive(Debug, Parser)]
#[command(about = "Display a summary of a goal or requirement")]
pub struct Show {
    /// The name of the artifact to display
    name: Name,

    /// Restrict the lookup to one kind
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = super::load_root(root)?;

        let kinds = self.kind.map_or_else(
            || vec![ArtifactKind::Goal, ArtifactKind::Requirement],
            |kind| vec![kind.into()],
        );
        let matches: Vec<_> = kinds
            .into_iter()
            .filter_map(|kind| workspace.get(kind, &self.name))
            .collect();

        let artifact = match matches.as_slice() {
            [artifact] => *artifact,
            [] => {
                eprintln!("{}", format!("Artifact {} not found", self.name).error());
                process::exit(1);
            }
            _ => anyhow::bail!(
                "'{}' names both a goal and a requirement; use --kind to pick one",
                self.name
            ),
        };

        print!("{}", summary(artifact));

        let referrers: Vec<_> = workspace.referrers(artifact).collect();
        if !referrers.is_empty() {
            println!("\n{}", "Referenced by".dim());
            for (referrer, relation) in referrers {
                println!(
                    "  • {} {} {}",
                    referrer.kind(),
                    referrer.name(),
                    format!("({relation})").dim()
                );
            }
        }

        Ok(())
    }
}
