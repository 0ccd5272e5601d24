//! The in-memory traceability graph.
//!
//! The [`Workspace`] knows nothing about the filesystem. Artifacts are kept in
//! insertion order in a flat store, with an index keyed by kind and name.
//! Edges are target identities, so a lookup through [`Workspace::resolve`] is
//! the only way to follow one.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{Artifact, ArtifactKind, EntityKind, Name, RelationKind, Target};

/// A fully materialised snapshot of goals and requirements.
#[derive(Debug, Default, Clone)]
pub struct Workspace {
    /// Artifacts in insertion order.
    artifacts: Vec<Artifact>,

    /// Lookup from (kind, name) to position in `artifacts`.
    index: HashMap<(ArtifactKind, Name), usize>,
}

/// Errors that can occur when inserting an artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    /// An artifact of the same kind and name is already present.
    #[error("{kind} '{name}' is defined more than once")]
    DuplicateArtifact {
        /// The artifact kind.
        kind: ArtifactKind,
        /// The duplicated name.
        name: Name,
    },
}

impl Workspace {
    /// Creates an empty workspace with room for the given number of
    /// artifacts.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            artifacts: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Appends an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::DuplicateArtifact`] if an artifact with the same
    /// kind and name already exists. The workspace is left unchanged.
    pub fn insert(&mut self, artifact: Artifact) -> Result<(), InsertError> {
        let key = (artifact.kind(), artifact.name().clone());
        if self.index.contains_key(&key) {
            let (kind, name) = key;
            return Err(InsertError::DuplicateArtifact { kind, name });
        }
        self.index.insert(key, self.artifacts.len());
        self.artifacts.push(artifact);
        Ok(())
    }

    /// Looks up an artifact by kind and name.
    #[must_use]
    pub fn get(&self, kind: ArtifactKind, name: &Name) -> Option<&Artifact> {
        // The key is owned, so clone the name for the probe.
        let position = self.index.get(&(kind, name.clone()))?;
        self.artifacts.get(*position)
    }

    /// Follows an edge to the artifact it points at.
    ///
    /// Returns `None` for hazards and categories, which are not stored as
    /// nodes, and for targets missing from this workspace.
    #[must_use]
    pub fn resolve(&self, target: &Target) -> Option<&Artifact> {
        let kind = match target.kind() {
            EntityKind::Goal => ArtifactKind::Goal,
            EntityKind::Requirement => ArtifactKind::Requirement,
            EntityKind::Hazard | EntityKind::Category => return None,
        };
        self.get(kind, target.name())
    }

    /// Iterates over all artifacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    /// Iterates over the artifacts of one kind in insertion order.
    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.iter().filter(move |artifact| artifact.kind() == kind)
    }

    /// The number of artifacts of one kind.
    #[must_use]
    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.of_kind(kind).count()
    }

    /// The total number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the workspace holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Finds every artifact with an edge to the given artifact, together with
    /// the relation the edge belongs to.
    ///
    /// An artifact is reported once per relation, however many edges of that
    /// relation point at the target.
    pub fn referrers<'a>(
        &'a self,
        artifact: &'a Artifact,
    ) -> impl Iterator<Item = (&'a Artifact, RelationKind)> + 'a {
        self.iter().flat_map(move |candidate| {
            candidate
                .edges()
                .filter(move |(_, targets)| targets.iter().any(|target| artifact.is(target)))
                .map(move |(relation, _)| (candidate, relation))
        })
    }
}

impl<'a> IntoIterator for &'a Workspace {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{InsertError, Workspace};
    use crate::domain::{Artifact, ArtifactKind, EntityKind, Name, RelationKind, Target};

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    #[test]
    fn preserves_insertion_order() {
        let mut workspace = Workspace::default();
        for n in ["Zeta", "Alpha", "Mu"] {
            workspace.insert(Artifact::goal(name(n))).unwrap();
        }
        workspace.insert(Artifact::requirement(name("Req1"))).unwrap();

        let names: Vec<_> = workspace
            .of_kind(ArtifactKind::Goal)
            .map(|a| a.name().as_str())
            .collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mu"]);
        assert_eq!(workspace.count(ArtifactKind::Requirement), 1);
        assert_eq!(workspace.len(), 4);
    }

    #[test]
    fn rejects_duplicate_names_within_a_kind() {
        let mut workspace = Workspace::default();
        workspace.insert(Artifact::goal(name("Alpha"))).unwrap();
        let err = workspace.insert(Artifact::goal(name("Alpha"))).unwrap_err();
        assert_eq!(
            err,
            InsertError::DuplicateArtifact {
                kind: ArtifactKind::Goal,
                name: name("Alpha"),
            }
        );
        assert_eq!(workspace.len(), 1);

        // the same name as a different kind is a different entity
        workspace.insert(Artifact::requirement(name("Alpha"))).unwrap();
    }

    #[test]
    fn resolves_cyclic_edges_by_lookup() {
        let mut workspace = Workspace::default();
        let alpha = Artifact::goal(name("Alpha"))
            .with_edge(
                RelationKind::Refines,
                Target::new(EntityKind::Goal, name("Beta"), None),
            )
            .unwrap();
        let beta = Artifact::goal(name("Beta"))
            .with_edge(
                RelationKind::Refines,
                Target::new(EntityKind::Goal, name("Alpha"), None),
            )
            .unwrap();
        workspace.insert(alpha).unwrap();
        workspace.insert(beta).unwrap();

        let mut current = workspace.get(ArtifactKind::Goal, &name("Alpha")).unwrap();
        for expected in ["Beta", "Alpha", "Beta"] {
            let next = &current.relation(RelationKind::Refines).unwrap()[0];
            current = workspace.resolve(next).unwrap();
            assert_eq!(current.name().as_str(), expected);
        }
    }

    #[test]
    fn hazards_do_not_resolve_to_nodes() {
        let workspace = Workspace::default();
        let hazard = Target::new(EntityKind::Hazard, name("Fire"), None);
        assert!(workspace.resolve(&hazard).is_none());
    }

    #[test]
    fn finds_referrers() {
        let mut workspace = Workspace::default();
        let target = Target::new(EntityKind::Goal, name("Alpha"), None);
        workspace.insert(Artifact::goal(name("Alpha"))).unwrap();
        workspace
            .insert(
                Artifact::requirement(name("Req1"))
                    .with_edge(RelationKind::References, target.clone())
                    .unwrap()
                    .with_edge(RelationKind::References, target.clone())
                    .unwrap(),
            )
            .unwrap();
        workspace
            .insert(
                Artifact::goal(name("Beta"))
                    .with_edge(RelationKind::Conflicting, target)
                    .unwrap(),
            )
            .unwrap();

        let alpha = workspace.get(ArtifactKind::Goal, &name("Alpha")).unwrap();
        let referrers: Vec<_> = workspace
            .referrers(alpha)
            .map(|(artifact, relation)| (artifact.name().as_str(), relation))
            .collect();
        assert_eq!(
            referrers,
            [
                ("Req1", RelationKind::References),
                ("Beta", RelationKind::Conflicting),
            ]
        );
    }
}
