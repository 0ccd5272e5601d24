//! Goal and requirement traceability.
//!
//! Artifacts are loaded from YAML snapshots into a [`Workspace`], checked by
//! a [`Validator`] and exported as Sphinx-Needs directive blocks.

pub mod domain;
pub use domain::{
    Artifact, ArtifactKind, Config, EntityKind, EntityRef, Issue, Name, RelationKind, Severity,
    Target, Validator, Workspace,
};

/// Filesystem discovery, loading and export.
pub mod storage;
pub use storage::{collect_snapshot_paths, export, load_file, load_workspace, ExportError, LoadError};
