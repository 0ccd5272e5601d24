use std::path::{Path, PathBuf};

mod export;
mod init;
mod list;
mod show;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use export::Export;
use init::Init;
use list::List;
use reqspec::{ArtifactKind, Config, Workspace};
use show::Show;
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the snapshot directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Validate(Validate::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create a default configuration file
    Init(Init),

    /// Check every discovered snapshot for integrity issues (default)
    Validate(Validate),

    /// Export the goals or requirements of a snapshot as Sphinx-Needs
    Export(Export),

    /// Show a summary of a single goal or requirement
    Show(Show),

    /// List goals and requirements
    List(List),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(&root)?,
            Self::Validate(command) => command.run(&root)?,
            Self::Export(command) => command.run(&root)?,
            Self::Show(command) => command.run(&root)?,
            Self::List(command) => command.run(&root)?,
        }
        Ok(())
    }
}

/// The artifact kind as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum KindArg {
    Goal,
    Requirement,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Goal => Self::Goal,
            KindArg::Requirement => Self::Requirement,
        }
    }
}

/// Discovers and loads every snapshot under `root`.
#[instrument(level = "debug")]
fn load_root(root: &Path) -> anyhow::Result<Workspace> {
    let config = Config::load_or_default(root)?;
    let omit = config.omit_pattern()?;
    let paths = reqspec::collect_snapshot_paths(
        root,
        config.extension(),
        omit.as_ref(),
        config.recursive,
    );
    tracing::info!(files = paths.len(), "discovered snapshots");

    reqspec::load_workspace(&paths)
        .with_context(|| format!("failed to load snapshots under {}", root.display()))
}
