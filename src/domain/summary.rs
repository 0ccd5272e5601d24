// Markdown summary of a single artifact, as shown by `reqspec show`.

use std::fmt::{self, Write as _};

use crate::domain::{Artifact, Target};

/// Renders a markdown summary of an artifact.
///
/// Absent scalar fields and empty lists are skipped. Targets are listed by
/// name, followed by their title in parentheses when one is known.
#[must_use]
pub fn summary(artifact: &Artifact) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_summary(&mut out, artifact);
    out
}

fn write_summary(out: &mut String, artifact: &Artifact) -> fmt::Result {
    writeln!(out, "#### {}:", artifact.name())?;
    writeln!(out, "* **Type**: {}", artifact.kind())?;

    let scalars = [
        ("UUID", artifact.id()),
        ("Title", artifact.title()),
        ("Description", artifact.description()),
    ];
    for (label, value) in scalars {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            writeln!(out, "* **{label}**: {value}")?;
        }
    }

    write_targets(out, "Categories", artifact.categories())?;

    if let Some(rationale) = artifact.rationale().filter(|v| !v.is_empty()) {
        writeln!(out, "* **Rationale**: {rationale}")?;
    }

    for (relation, targets) in artifact.edges() {
        write_targets(out, relation.label(), targets)?;
    }
    Ok(())
}

fn write_targets(out: &mut String, label: &str, targets: &[Target]) -> fmt::Result {
    if targets.is_empty() {
        return Ok(());
    }
    write!(out, "* **{label}**: ")?;
    for (i, target) in targets.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(target.name());
        if let Some(title) = target.title() {
            write!(out, " ({title})")?;
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::summary;
    use crate::domain::{Artifact, EntityKind, Name, RelationKind, Target};

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    #[test]
    fn minimal_goal() {
        let goal = Artifact::goal(name("Alpha"));
        assert_eq!(summary(&goal), "#### Alpha:\n* **Type**: Goal\n");
    }

    #[test]
    fn full_requirement() {
        let req = Artifact::requirement(name("Req1"))
            .with_id("5b0c7d4e")
            .with_title("Cool down")
            .with_description("Keeps things cool")
            .with_rationale("Heat is bad")
            .with_category(Target::new(EntityKind::Category, name("Safety"), None))
            .with_edge(
                RelationKind::MitigatedHazards,
                Target::new(EntityKind::Hazard, name("Fire"), Some("Open flame".into())),
            )
            .unwrap()
            .with_edge(
                RelationKind::References,
                Target::new(EntityKind::Goal, name("Alpha"), None),
            )
            .unwrap()
            .with_edge(
                RelationKind::References,
                Target::new(EntityKind::Goal, name("Beta"), Some("Second".into())),
            )
            .unwrap();

        let expected = "\
#### Req1:
* **Type**: Requirement
* **UUID**: 5b0c7d4e
* **Title**: Cool down
* **Description**: Keeps things cool
* **Categories**: Safety
* **Rationale**: Heat is bad
* **References**: Alpha, Beta (Second)
* **Mitigated Hazards**: Fire (Open flame)
";
        assert_eq!(summary(&req), expected);
    }
}
