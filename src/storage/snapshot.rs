//! YAML snapshots of an already-resolved workspace.
//!
//! A snapshot declares categories, hazards and artifacts. Loading checks that
//! every name an artifact mentions is declared somewhere in the same load and
//! turns the names into [`Target`]s. Nothing else is interpreted: duplicate
//! and self-referencing edges are kept as written so the validator can report
//! them.

use std::{
    collections::{hash_map::Entry, HashMap},
    fs,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Deserialize;
use tracing::{debug, instrument, trace};

use crate::domain::{
    Artifact, ArtifactKind, EntityKind, EntityRef, InsertError, Name, NotApplicable, RelationKind,
    Target, Workspace,
};

/// Errors that can occur while loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A snapshot file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A snapshot is not valid YAML or does not match the snapshot schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: serde_yaml::Error,
    },

    /// A hazard or category is declared twice.
    #[error("{kind} '{name}' is declared more than once")]
    DuplicateEntity {
        /// The entity kind.
        kind: EntityKind,
        /// The repeated name.
        name: Name,
    },

    /// An artifact is declared twice.
    #[error(transparent)]
    DuplicateArtifact(#[from] InsertError),

    /// An artifact lists a relation its variant does not carry.
    #[error("{artifact}: {source}")]
    NotApplicable {
        /// The offending artifact.
        artifact: EntityRef,
        /// The rejected relation.
        source: NotApplicable,
    },

    /// An artifact mentions a name that is not declared.
    #[error("{artifact}: '{field}' refers to unknown {kind} '{target}'")]
    Unresolved {
        /// The offending artifact.
        artifact: EntityRef,
        /// The field holding the reference.
        field: &'static str,
        /// The kind of entity the field expects.
        kind: EntityKind,
        /// The name that failed to resolve.
        target: Name,
    },
}

/// The on-disk layout of one snapshot file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    #[serde(default)]
    categories: Vec<EntityDecl>,
    #[serde(default)]
    hazards: Vec<EntityDecl>,
    #[serde(default)]
    items: Vec<ItemDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityDecl {
    name: Name,
    #[serde(default)]
    title: Option<String>,
}

/// An artifact as written. Relation fields are optional so that a goal
/// listing `inherits` can be reported rather than silently ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ItemDecl {
    #[serde(rename = "type")]
    kind: ArtifactKind,
    name: Name,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    categories: Vec<Name>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    rationale: Option<String>,
    #[serde(default)]
    references: Option<Vec<Name>>,
    #[serde(default)]
    evolves: Option<Vec<Name>>,
    #[serde(default)]
    refines: Option<Vec<Name>>,
    #[serde(default)]
    inherits: Option<Vec<Name>>,
    #[serde(default)]
    mitigated_hazards: Option<Vec<Name>>,
    #[serde(default)]
    decomposes: Option<Vec<Name>>,
    #[serde(default)]
    conflicting: Option<Vec<Name>>,
}

impl ItemDecl {
    fn relations(&self) -> [(RelationKind, Option<&Vec<Name>>); 7] {
        [
            (RelationKind::References, self.references.as_ref()),
            (RelationKind::Evolves, self.evolves.as_ref()),
            (RelationKind::Refines, self.refines.as_ref()),
            (RelationKind::Inherits, self.inherits.as_ref()),
            (RelationKind::MitigatedHazards, self.mitigated_hazards.as_ref()),
            (RelationKind::Decomposes, self.decomposes.as_ref()),
            (RelationKind::Conflicting, self.conflicting.as_ref()),
        ]
    }

    fn identity(&self) -> EntityRef {
        EntityRef {
            kind: self.kind.into(),
            name: self.name.clone(),
        }
    }
}

/// Every declared name, with its title, across all files of one load.
#[derive(Debug, Default)]
struct Declarations(HashMap<EntityRef, Option<String>>);

impl Declarations {
    /// Records a name. Returns `false` if it was already declared.
    fn declare(&mut self, kind: EntityKind, name: &Name, title: Option<&String>) -> bool {
        let key = EntityRef {
            kind,
            name: name.clone(),
        };
        match self.0.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(title.cloned());
                true
            }
        }
    }

    fn declare_unique(
        &mut self,
        kind: EntityKind,
        name: &Name,
        title: Option<&String>,
    ) -> Result<(), LoadError> {
        if self.declare(kind, name, title) {
            Ok(())
        } else {
            Err(LoadError::DuplicateEntity {
                kind,
                name: name.clone(),
            })
        }
    }

    fn target(&self, kind: EntityKind, name: &Name) -> Option<Target> {
        let key = EntityRef {
            kind,
            name: name.clone(),
        };
        let title = self.0.get(&key)?;
        Some(Target::new(kind, name.clone(), title.clone()))
    }
}

/// Reads and parses snapshot files, then resolves them into one workspace.
///
/// Files are parsed in parallel; artifacts keep file order, and files keep
/// the order in which they are given. Names may refer across files.
///
/// # Errors
///
/// Returns the first error encountered, see [`LoadError`].
#[instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn load_workspace(paths: &[PathBuf]) -> Result<Workspace, LoadError> {
    let files = paths
        .par_iter()
        .map(|path| read_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    resolve(files)
}

/// Loads a single snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or resolved.
pub fn load_file(path: &Path) -> Result<Workspace, LoadError> {
    load_workspace(&[path.to_path_buf()])
}

/// Parses and resolves a snapshot held in memory.
///
/// `origin` is only used in error messages.
///
/// # Errors
///
/// Returns an error if the text cannot be parsed or resolved.
pub fn load_str(text: &str, origin: &Path) -> Result<Workspace, LoadError> {
    resolve(vec![parse(text, origin)?])
}

fn read_file(path: &Path) -> Result<SnapshotFile, LoadError> {
    trace!(path = %path.display(), "reading snapshot");
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, origin: &Path) -> Result<SnapshotFile, LoadError> {
    // an empty document deserializes as unit, not as an empty mapping
    if text.trim().is_empty() {
        return Ok(SnapshotFile::default());
    }
    serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

fn resolve(files: Vec<SnapshotFile>) -> Result<Workspace, LoadError> {
    let mut declarations = Declarations::default();
    for file in &files {
        for category in &file.categories {
            declarations.declare_unique(
                EntityKind::Category,
                &category.name,
                category.title.as_ref(),
            )?;
        }
        for hazard in &file.hazards {
            declarations.declare_unique(EntityKind::Hazard, &hazard.name, hazard.title.as_ref())?;
        }
        for item in &file.items {
            // repeated artifacts are reported by the workspace on insert
            declarations.declare(item.kind.into(), &item.name, item.title.as_ref());
        }
    }

    let capacity = files.iter().map(|file| file.items.len()).sum();
    let mut workspace = Workspace::with_capacity(capacity);
    for item in files.into_iter().flat_map(|file| file.items) {
        let artifact = build_artifact(&declarations, item)?;
        trace!(name = %artifact.name(), kind = %artifact.kind(), "resolved artifact");
        workspace.insert(artifact)?;
    }

    debug!(artifacts = workspace.len(), "workspace loaded");
    Ok(workspace)
}

fn build_artifact(declarations: &Declarations, item: ItemDecl) -> Result<Artifact, LoadError> {
    let identity = item.identity();
    let lookup = |field: &'static str, kind: EntityKind, name: &Name| {
        declarations
            .target(kind, name)
            .ok_or_else(|| LoadError::Unresolved {
                artifact: identity.clone(),
                field,
                kind,
                target: name.clone(),
            })
    };

    let mut artifact = Artifact::new(item.kind, item.name.clone());
    for category in &item.categories {
        artifact = artifact.with_category(lookup("categories", EntityKind::Category, category)?);
    }

    for (relation, names) in item.relations() {
        let Some(names) = names else { continue };
        let Some(kind) = item.kind.target_kind(relation) else {
            return Err(LoadError::NotApplicable {
                artifact: identity.clone(),
                source: NotApplicable {
                    kind: item.kind,
                    relation,
                },
            });
        };
        for name in names {
            let target = lookup(relation.as_str(), kind, name)?;
            artifact
                .push_edge(relation, target)
                .map_err(|source| LoadError::NotApplicable {
                    artifact: identity.clone(),
                    source,
                })?;
        }
    }

    let ItemDecl {
        title,
        id,
        description,
        rationale,
        ..
    } = item;
    if let Some(title) = title {
        artifact = artifact.with_title(title);
    }
    if let Some(id) = id {
        artifact = artifact.with_id(id);
    }
    if let Some(description) = description {
        artifact = artifact.with_description(description);
    }
    if let Some(rationale) = rationale {
        artifact = artifact.with_rationale(rationale);
    }
    Ok(artifact)
}
