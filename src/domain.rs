//! Domain models for the traceability graph.
//!
//! This module contains the core domain types: artifacts and their relations,
//! the workspace that holds them, the validation engine, and the Sphinx-Needs
//! renderer. Nothing here touches the filesystem except [`Config`].

mod artifact;
pub use artifact::{
    Artifact, ArtifactKind, EntityKind, GoalRelations, NotApplicable, RequirementRelations,
    Relations,
};

mod config;
pub use config::{Config, ConfigError, CONFIG_PATH};

mod name;
pub use name::{InvalidName, Name};

mod relation;
pub use relation::{EntityRef, RelationKind, Target};

/// Sphinx-Needs rendering.
pub mod render;
pub use render::{render, DirectiveBlock, Document, PLACEHOLDER_TITLE};

mod summary;
pub use summary::summary;

/// Integrity rules and the validator that applies them.
pub mod validation;
pub use validation::{Issue, IssueCode, Locus, Property, Rule, Severity, Validator};

mod workspace;
pub use workspace::{InsertError, Workspace};
