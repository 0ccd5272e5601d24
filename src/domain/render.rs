//! Sphinx-Needs rendering of artifacts.
//!
//! Each artifact becomes one directive block:
//!
//! ```text
//! .. req:: Title
//!     :id: Name
//!     :tags: Safety, Security
//!     :decomposes: Sub1, Sub2
//! ```
//!
//! Field lines are indented with a single tab. A field whose relation is
//! empty or does not apply to the artifact's variant is left out entirely;
//! downstream tooling treats a missing field differently from an empty one.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::{Artifact, ArtifactKind, RelationKind, Target, Workspace};

/// The title rendered for artifacts that have none.
pub const PLACEHOLDER_TITLE: &str = "Placeholder Title";

impl ArtifactKind {
    /// The Sphinx-Needs directive used for this kind.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Goal => "need",
            Self::Requirement => "req",
        }
    }
}

impl RelationKind {
    /// The Sphinx-Needs option name for this relation.
    #[must_use]
    pub const fn export_tag(self) -> &'static str {
        match self {
            Self::References => "referencedGoals",
            Self::Evolves => "evolves",
            Self::Refines => "refines",
            Self::Inherits => "inherits",
            Self::MitigatedHazards => "mitigates",
            Self::Decomposes => "decomposes",
            Self::Conflicting => "conflictsWith",
        }
    }
}

/// A single artifact rendered as a directive block.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveBlock<'a>(pub &'a Artifact);

impl fmt::Display for DirectiveBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artifact = self.0;
        writeln!(
            f,
            ".. {}:: {}",
            artifact.kind().directive(),
            artifact.title().unwrap_or(PLACEHOLDER_TITLE)
        )?;
        writeln!(f, "\t:id: {}", artifact.name())?;
        write_field(f, "tags", artifact.categories())?;
        for (relation, targets) in artifact.edges() {
            write_field(f, relation.export_tag(), targets)?;
        }
        Ok(())
    }
}

/// Writes `\t:<tag>: a, b, c` followed by a newline, or nothing if there are
/// no targets.
fn write_field(f: &mut fmt::Formatter<'_>, tag: &str, targets: &[Target]) -> fmt::Result {
    let Some((first, rest)) = targets.split_first() else {
        return Ok(());
    };
    write!(f, "\t:{tag}: {}", first.name())?;
    for target in rest {
        write!(f, ", {}", target.name())?;
    }
    writeln!(f)
}

/// Every artifact of one kind in a workspace, rendered as a document.
///
/// Blocks appear in workspace insertion order, separated by a blank line.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    workspace: &'a Workspace,
    kind: ArtifactKind,
}

impl<'a> Document<'a> {
    /// Selects the artifacts of `kind` from `workspace`.
    #[must_use]
    pub const fn new(workspace: &'a Workspace, kind: ArtifactKind) -> Self {
        Self { workspace, kind }
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, artifact) in self.workspace.of_kind(self.kind).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", DirectiveBlock(artifact))?;
        }
        Ok(())
    }
}

/// Renders every artifact of the given kind.
#[instrument(level = "debug", skip(workspace))]
#[must_use]
pub fn render(workspace: &Workspace, kind: ArtifactKind) -> String {
    let document = Document::new(workspace, kind).to_string();
    debug!(
        blocks = workspace.count(kind),
        bytes = document.len(),
        "rendered document"
    );
    document
}

#[cfg(test)]
mod tests {
    use super::{render, DirectiveBlock, PLACEHOLDER_TITLE};
    use crate::domain::{Artifact, ArtifactKind, EntityKind, Name, RelationKind, Target, Workspace};

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    fn target(kind: EntityKind, s: &str) -> Target {
        Target::new(kind, name(s), Some(format!("{s} title")))
    }

    #[test]
    fn bare_requirement() {
        let req = Artifact::requirement(name("Req1"));
        assert_eq!(
            DirectiveBlock(&req).to_string(),
            ".. req:: Placeholder Title\n\t:id: Req1\n"
        );
    }

    #[test]
    fn goal_without_title_uses_placeholder() {
        let goal = Artifact::goal(name("Alpha"));
        let block = DirectiveBlock(&goal).to_string();
        assert!(block.starts_with(&format!(".. need:: {PLACEHOLDER_TITLE}\n")));
    }

    #[test]
    fn single_category_renders_tags() {
        let req = Artifact::requirement(name("Req1"))
            .with_title("Keep it cool")
            .with_category(target(EntityKind::Category, "Safety"));
        assert_eq!(
            DirectiveBlock(&req).to_string(),
            ".. req:: Keep it cool\n\t:id: Req1\n\t:tags: Safety\n"
        );
    }

    #[test]
    fn requirement_field_order() {
        let req = Artifact::requirement(name("Req1"))
            .with_title("Everything")
            .with_category(target(EntityKind::Category, "Safety"))
            .with_category(target(EntityKind::Category, "Cost"))
            .with_edge(RelationKind::Decomposes, target(EntityKind::Requirement, "Sub2"))
            .unwrap()
            .with_edge(RelationKind::Decomposes, target(EntityKind::Requirement, "Sub1"))
            .unwrap()
            .with_edge(RelationKind::MitigatedHazards, target(EntityKind::Hazard, "Fire"))
            .unwrap()
            .with_edge(RelationKind::Inherits, target(EntityKind::Requirement, "Base"))
            .unwrap()
            .with_edge(RelationKind::Refines, target(EntityKind::Requirement, "Req0"))
            .unwrap()
            .with_edge(RelationKind::Evolves, target(EntityKind::Requirement, "Old"))
            .unwrap()
            .with_edge(RelationKind::References, target(EntityKind::Goal, "Alpha"))
            .unwrap();

        let expected = "\
.. req:: Everything
\t:id: Req1
\t:tags: Safety, Cost
\t:referencedGoals: Alpha
\t:evolves: Old
\t:refines: Req0
\t:inherits: Base
\t:mitigates: Fire
\t:decomposes: Sub2, Sub1
";
        assert_eq!(DirectiveBlock(&req).to_string(), expected);
    }

    #[test]
    fn goal_conflicts_and_duplicates_render_verbatim() {
        let goal = Artifact::goal(name("Alpha"))
            .with_title("First")
            .with_edge(RelationKind::Conflicting, target(EntityKind::Goal, "Beta"))
            .unwrap()
            .with_edge(RelationKind::Conflicting, target(EntityKind::Goal, "Beta"))
            .unwrap();
        assert_eq!(
            DirectiveBlock(&goal).to_string(),
            ".. need:: First\n\t:id: Alpha\n\t:conflictsWith: Beta, Beta\n"
        );
    }

    #[test]
    fn document_filters_by_kind_and_separates_blocks() {
        let mut workspace = Workspace::default();
        workspace.insert(Artifact::goal(name("G1"))).unwrap();
        workspace.insert(Artifact::requirement(name("R1"))).unwrap();
        workspace
            .insert(Artifact::goal(name("G2")).with_title("Second"))
            .unwrap();

        assert_eq!(
            render(&workspace, ArtifactKind::Goal),
            ".. need:: Placeholder Title\n\t:id: G1\n\n.. need:: Second\n\t:id: G2\n"
        );
        assert_eq!(
            render(&workspace, ArtifactKind::Requirement),
            ".. req:: Placeholder Title\n\t:id: R1\n"
        );
    }

    #[test]
    fn empty_selection_is_empty_document() {
        let mut workspace = Workspace::default();
        workspace.insert(Artifact::goal(name("G1"))).unwrap();
        assert_eq!(render(&workspace, ArtifactKind::Requirement), "");
    }
}
