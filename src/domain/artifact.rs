//! Goals and requirements, and the fixed table of relations each carries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{EntityRef, Name, RelationKind, Target};

/// The two artifact variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A goal.
    Goal,
    /// A requirement.
    Requirement,
}

impl ArtifactKind {
    /// The relations an artifact of this kind carries, in export order.
    #[must_use]
    pub const fn relations(self) -> &'static [RelationKind] {
        match self {
            Self::Goal => &[
                RelationKind::References,
                RelationKind::Evolves,
                RelationKind::Refines,
                RelationKind::Conflicting,
            ],
            Self::Requirement => &[
                RelationKind::References,
                RelationKind::Evolves,
                RelationKind::Refines,
                RelationKind::Inherits,
                RelationKind::MitigatedHazards,
                RelationKind::Decomposes,
            ],
        }
    }

    /// Whether artifacts of this kind carry the given relation.
    #[must_use]
    pub fn has_relation(self, relation: RelationKind) -> bool {
        self.relations().contains(&relation)
    }

    /// The kind of entity the given relation points at, if this variant
    /// carries it.
    #[must_use]
    pub fn target_kind(self, relation: RelationKind) -> Option<EntityKind> {
        if !self.has_relation(relation) {
            return None;
        }
        Some(match relation {
            RelationKind::References | RelationKind::Conflicting => EntityKind::Goal,
            RelationKind::MitigatedHazards => EntityKind::Hazard,
            RelationKind::Inherits | RelationKind::Decomposes => EntityKind::Requirement,
            RelationKind::Evolves | RelationKind::Refines => self.into(),
        })
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Goal => "Goal",
            Self::Requirement => "Requirement",
        })
    }
}

/// Every kind of entity an edge may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// A goal.
    Goal,
    /// A requirement.
    Requirement,
    /// A hazard, the target of mitigation links.
    Hazard,
    /// A category, used as a tag.
    Category,
}

impl From<ArtifactKind> for EntityKind {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Goal => Self::Goal,
            ArtifactKind::Requirement => Self::Requirement,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Goal => "Goal",
            Self::Requirement => "Requirement",
            Self::Hazard => "Hazard",
            Self::Category => "Category",
        })
    }
}

/// Relations carried by a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalRelations {
    /// Cross-references to other goals.
    pub references: Vec<Target>,
    /// Goals this goal supersedes.
    pub evolves: Vec<Target>,
    /// Goals this goal refines.
    pub refines: Vec<Target>,
    /// Goals this goal conflicts with.
    pub conflicting: Vec<Target>,
}

/// Relations carried by a requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementRelations {
    /// Cross-references to goals.
    pub references: Vec<Target>,
    /// Requirements this requirement supersedes.
    pub evolves: Vec<Target>,
    /// Requirements this requirement refines.
    pub refines: Vec<Target>,
    /// Requirements this requirement inherits from.
    pub inherits: Vec<Target>,
    /// Hazards this requirement mitigates.
    pub mitigated_hazards: Vec<Target>,
    /// Requirements this requirement decomposes into.
    pub decomposes: Vec<Target>,
}

/// The variant-specific part of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relations {
    /// Goal relations.
    Goal(GoalRelations),
    /// Requirement relations.
    Requirement(RequirementRelations),
}

impl Relations {
    /// The artifact kind these relations belong to.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::Goal(_) => ArtifactKind::Goal,
            Self::Requirement(_) => ArtifactKind::Requirement,
        }
    }

    /// The targets of one relation.
    ///
    /// Returns `None` if the relation does not apply to this variant, and an
    /// empty slice if it applies but has no edges.
    #[must_use]
    pub fn get(&self, relation: RelationKind) -> Option<&[Target]> {
        let targets: &[Target] = match (self, relation) {
            (Self::Goal(goal), RelationKind::References) => &goal.references,
            (Self::Goal(goal), RelationKind::Evolves) => &goal.evolves,
            (Self::Goal(goal), RelationKind::Refines) => &goal.refines,
            (Self::Goal(goal), RelationKind::Conflicting) => &goal.conflicting,
            (Self::Requirement(req), RelationKind::References) => &req.references,
            (Self::Requirement(req), RelationKind::Evolves) => &req.evolves,
            (Self::Requirement(req), RelationKind::Refines) => &req.refines,
            (Self::Requirement(req), RelationKind::Inherits) => &req.inherits,
            (Self::Requirement(req), RelationKind::MitigatedHazards) => &req.mitigated_hazards,
            (Self::Requirement(req), RelationKind::Decomposes) => &req.decomposes,
            _ => return None,
        };
        Some(targets)
    }

    /// Mutable access to one relation, if it applies to this variant.
    pub fn get_mut(&mut self, relation: RelationKind) -> Option<&mut Vec<Target>> {
        let targets = match (self, relation) {
            (Self::Goal(goal), RelationKind::References) => &mut goal.references,
            (Self::Goal(goal), RelationKind::Evolves) => &mut goal.evolves,
            (Self::Goal(goal), RelationKind::Refines) => &mut goal.refines,
            (Self::Goal(goal), RelationKind::Conflicting) => &mut goal.conflicting,
            (Self::Requirement(req), RelationKind::References) => &mut req.references,
            (Self::Requirement(req), RelationKind::Evolves) => &mut req.evolves,
            (Self::Requirement(req), RelationKind::Refines) => &mut req.refines,
            (Self::Requirement(req), RelationKind::Inherits) => &mut req.inherits,
            (Self::Requirement(req), RelationKind::MitigatedHazards) => {
                &mut req.mitigated_hazards
            }
            (Self::Requirement(req), RelationKind::Decomposes) => &mut req.decomposes,
            _ => return None,
        };
        Some(targets)
    }
}

impl From<ArtifactKind> for Relations {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Goal => Self::Goal(GoalRelations::default()),
            ArtifactKind::Requirement => Self::Requirement(RequirementRelations::default()),
        }
    }
}

/// A goal or requirement node in the traceability graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    name: Name,
    title: Option<String>,
    id: Option<String>,
    categories: Vec<Target>,
    description: Option<String>,
    rationale: Option<String>,
    relations: Relations,
}

impl Artifact {
    /// Creates an artifact of the given kind with no optional attributes and
    /// no edges.
    #[must_use]
    pub fn new(kind: ArtifactKind, name: Name) -> Self {
        Self {
            name,
            title: None,
            id: None,
            categories: Vec::new(),
            description: None,
            rationale: None,
            relations: kind.into(),
        }
    }

    /// Creates an empty goal.
    #[must_use]
    pub fn goal(name: Name) -> Self {
        Self::new(ArtifactKind::Goal, name)
    }

    /// Creates an empty requirement.
    #[must_use]
    pub fn requirement(name: Name) -> Self {
        Self::new(ArtifactKind::Requirement, name)
    }

    /// Sets the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the opaque identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Appends a category.
    #[must_use]
    pub fn with_category(mut self, category: Target) -> Self {
        self.categories.push(category);
        self
    }

    /// Appends an edge.
    ///
    /// # Errors
    ///
    /// Returns [`NotApplicable`] if this variant does not carry the relation.
    pub fn push_edge(&mut self, relation: RelationKind, target: Target) -> Result<(), NotApplicable> {
        let kind = self.kind();
        self.relations
            .get_mut(relation)
            .ok_or(NotApplicable { kind, relation })?
            .push(target);
        Ok(())
    }

    /// Appends an edge, builder style.
    ///
    /// # Errors
    ///
    /// Returns [`NotApplicable`] if this variant does not carry the relation.
    pub fn with_edge(mut self, relation: RelationKind, target: Target) -> Result<Self, NotApplicable> {
        self.push_edge(relation, target)?;
        Ok(self)
    }

    /// The artifact variant.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.relations.kind()
    }

    /// The artifact's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The identity of this artifact, for comparison with edge targets.
    #[must_use]
    pub fn identity(&self) -> EntityRef {
        EntityRef {
            kind: self.kind().into(),
            name: self.name.clone(),
        }
    }

    /// Whether the given target resolves to this artifact.
    #[must_use]
    pub fn is(&self, target: &Target) -> bool {
        target.kind() == self.kind().into() && target.name() == &self.name
    }

    /// The display title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The opaque identifier, if set.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The categories this artifact is tagged with, in declaration order.
    #[must_use]
    pub fn categories(&self) -> &[Target] {
        &self.categories
    }

    /// The description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The rationale, if set.
    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// The targets of one relation.
    ///
    /// See [`Relations::get`] for the distinction between `None` and an empty
    /// slice.
    #[must_use]
    pub fn relation(&self, relation: RelationKind) -> Option<&[Target]> {
        self.relations.get(relation)
    }

    /// All relations, variant-tagged.
    #[must_use]
    pub const fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Iterates over every applicable relation with its targets, in export
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (RelationKind, &[Target])> {
        self.kind()
            .relations()
            .iter()
            .filter_map(move |&relation| Some((relation, self.relation(relation)?)))
    }
}

/// Error returned when adding an edge of a kind the artifact variant does not
/// carry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("a {kind} has no '{relation}' relation")]
pub struct NotApplicable {
    /// The artifact variant.
    pub kind: ArtifactKind,
    /// The rejected relation.
    pub relation: RelationKind,
}

#[cfg(test)]
mod tests {
    use super::{Artifact, ArtifactKind, EntityKind, NotApplicable};
    use crate::domain::{Name, RelationKind, Target};

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    fn goal(s: &str) -> Target {
        Target::new(EntityKind::Goal, name(s), None)
    }

    #[test]
    fn absent_relation_is_distinct_from_empty() {
        let goal = Artifact::goal(name("Alpha"));
        assert_eq!(goal.relation(RelationKind::Conflicting), Some(&[][..]));
        assert_eq!(goal.relation(RelationKind::Decomposes), None);

        let req = Artifact::requirement(name("Req1"));
        assert_eq!(req.relation(RelationKind::Decomposes), Some(&[][..]));
        assert_eq!(req.relation(RelationKind::Conflicting), None);
    }

    #[test]
    fn edges_keep_insertion_order_and_duplicates() {
        let goal = Artifact::goal(name("Alpha"))
            .with_edge(RelationKind::Refines, goal("Gamma"))
            .unwrap()
            .with_edge(RelationKind::Refines, goal("Beta"))
            .unwrap()
            .with_edge(RelationKind::Refines, goal("Gamma"))
            .unwrap();

        let names: Vec<_> = goal
            .relation(RelationKind::Refines)
            .unwrap()
            .iter()
            .map(|target| target.name().as_str())
            .collect();
        assert_eq!(names, ["Gamma", "Beta", "Gamma"]);
    }

    #[test]
    fn rejects_edge_for_other_variant() {
        let result = Artifact::goal(name("Alpha")).with_edge(RelationKind::Inherits, goal("Beta"));
        assert_eq!(
            result.unwrap_err(),
            NotApplicable {
                kind: ArtifactKind::Goal,
                relation: RelationKind::Inherits,
            }
        );
    }

    #[test]
    fn identity_includes_kind() {
        let req = Artifact::requirement(name("Alpha"));
        assert!(!req.is(&goal("Alpha")));
        assert!(req.is(&Target::new(EntityKind::Requirement, name("Alpha"), None)));
    }

    #[test]
    fn evolves_targets_same_variant() {
        assert_eq!(
            ArtifactKind::Goal.target_kind(RelationKind::Evolves),
            Some(EntityKind::Goal)
        );
        assert_eq!(
            ArtifactKind::Requirement.target_kind(RelationKind::Evolves),
            Some(EntityKind::Requirement)
        );
        assert_eq!(
            ArtifactKind::Requirement.target_kind(RelationKind::References),
            Some(EntityKind::Goal)
        );
        assert_eq!(ArtifactKind::Goal.target_kind(RelationKind::MitigatedHazards), None);
    }

    #[test]
    fn edges_follow_export_order() {
        let req = Artifact::requirement(name("Req1"));
        let order: Vec<_> = req.edges().map(|(kind, _)| kind).collect();
        assert_eq!(order, ArtifactKind::Requirement.relations());
    }
}
