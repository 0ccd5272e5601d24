use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{EntityKind, Name};

/// A named, directed category of edge between an artifact and another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Generic cross-reference to goals.
    References,
    /// Supersession chain.
    Evolves,
    /// Refinement hierarchy.
    Refines,
    /// Inheritance of properties from another requirement.
    Inherits,
    /// Mitigation links to hazards.
    MitigatedHazards,
    /// Decomposition into sub-requirements.
    Decomposes,
    /// Symmetric conflict marker between goals.
    Conflicting,
}

impl RelationKind {
    /// The relation kinds whose edges must be free of self-loops and
    /// duplicate targets.
    pub const INTEGRITY_CHECKED: [Self; 5] = [
        Self::Decomposes,
        Self::Evolves,
        Self::Inherits,
        Self::Refines,
        Self::Conflicting,
    ];

    /// The field name of the relation, as used in snapshots and issue loci.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::References => "references",
            Self::Evolves => "evolves",
            Self::Refines => "refines",
            Self::Inherits => "inherits",
            Self::MitigatedHazards => "mitigatedHazards",
            Self::Decomposes => "decomposes",
            Self::Conflicting => "conflicting",
        }
    }

    /// The verb form used in messages, e.g. "cannot decompose itself".
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::References => "reference",
            Self::Evolves => "evolve",
            Self::Refines => "refine",
            Self::Inherits => "inherit",
            Self::MitigatedHazards => "mitigate",
            Self::Decomposes => "decompose",
            Self::Conflicting => "conflict",
        }
    }

    /// A human-readable label for summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::References => "References",
            Self::Evolves => "Evolves",
            Self::Refines => "Refines",
            Self::Inherits => "Inherits",
            Self::MitigatedHazards => "Mitigated Hazards",
            Self::Decomposes => "Decomposes",
            Self::Conflicting => "Conflicts with",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved identity of an entity: its kind and name.
///
/// Names are only unique within a kind, so both parts are needed to compare
/// identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    /// The kind of entity.
    pub kind: EntityKind,
    /// The entity's name.
    pub name: Name,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// The target of an edge.
///
/// Edges hold target identities rather than owning references, so cycles in
/// the graph are plain repeated lookups in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    identity: EntityRef,
    title: Option<String>,
}

impl Target {
    /// Creates a new target.
    #[must_use]
    pub const fn new(kind: EntityKind, name: Name, title: Option<String>) -> Self {
        Self {
            identity: EntityRef { kind, name },
            title,
        }
    }

    /// The identity this edge resolves to.
    #[must_use]
    pub const fn identity(&self) -> &EntityRef {
        &self.identity
    }

    /// The name of the target.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.identity.name
    }

    /// The kind of the target.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.identity.kind
    }

    /// The title of the target, if it has one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::RelationKind;

    #[test_case(RelationKind::Decomposes, "decompose")]
    #[test_case(RelationKind::Evolves, "evolve")]
    #[test_case(RelationKind::Refines, "refine")]
    #[test_case(RelationKind::Inherits, "inherit")]
    #[test_case(RelationKind::Conflicting, "conflict")]
    fn verb_strips_plural(kind: RelationKind, verb: &str) {
        assert_eq!(kind.verb(), verb);
    }

    #[test]
    fn field_names_round_trip_through_serde() {
        for kind in [
            RelationKind::References,
            RelationKind::MitigatedHazards,
            RelationKind::Conflicting,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
