//! Integrity checks over the traceability graph.
//!
//! A [`Rule`] is a pure function from an artifact to the issues it finds.
//! The [`Validator`] holds an immutable list of rules and applies every rule
//! to every artifact; it never stops early and keeps no state between runs.

use std::{collections::HashSet, fmt};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{Artifact, EntityRef, RelationKind, Target, Workspace};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style only. Never blocks anything.
    Warning,
    /// A structural problem in the graph.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Stable, machine-readable issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum IssueCode {
    /// The artifact name does not start with a capital letter.
    FirstLetterCapital,
    /// An edge points back at the artifact that owns it.
    SelfReference,
    /// A relation lists the same target more than once.
    DuplicateReference,
}

impl IssueCode {
    /// The code as reported to tools.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstLetterCapital => "first-letter-capital",
            Self::SelfReference => "self-reference",
            Self::DuplicateReference => "dupe-reference",
        }
    }
}

impl From<IssueCode> for &'static str {
    fn from(code: IssueCode) -> Self {
        code.as_str()
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field of an artifact an issue is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// The artifact's name.
    Name,
    /// One of the artifact's relations.
    Relation(RelationKind),
}

impl Property {
    /// The field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Relation(relation) => relation.as_str(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Property {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    /// The artifact.
    pub node: EntityRef,
    /// The field on the artifact.
    pub property: Property,
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node.name, self.property)
    }
}

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// How serious the issue is.
    pub severity: Severity,
    /// Stable code identifying the check.
    pub code: IssueCode,
    /// Human-readable description.
    pub message: String,
    /// The artifact and field the issue is attached to.
    pub locus: Locus,
}

impl Issue {
    fn new(
        severity: Severity,
        code: IssueCode,
        message: String,
        artifact: &Artifact,
        property: Property,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            locus: Locus {
                node: artifact.identity(),
                property,
            },
        }
    }

    /// Whether this issue has error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.locus, self.message
        )
    }
}

impl Serialize for Issue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Issue", 6)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("kind", &self.locus.node.kind.to_string())?;
        state.serialize_field("node", self.locus.node.name.as_str())?;
        state.serialize_field("property", &self.locus.property)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// A validation rule: a pure function from an artifact to the issues found on
/// it.
pub type Rule = fn(&Artifact) -> Vec<Issue>;

/// Warns when an artifact's name does not start with a capital letter.
#[must_use]
pub fn check_starts_with_capital(artifact: &Artifact) -> Vec<Issue> {
    if artifact.name().starts_with_capital() {
        return Vec::new();
    }
    vec![Issue::new(
        Severity::Warning,
        IssueCode::FirstLetterCapital,
        format!("{} name should start with a capital.", artifact.kind()),
        artifact,
        Property::Name,
    )]
}

/// Reports each checked relation that contains an edge back to the artifact
/// itself.
#[must_use]
pub fn check_self_reference(artifact: &Artifact) -> Vec<Issue> {
    checked_relations(artifact)
        .filter(|(_, targets)| targets.iter().any(|target| artifact.is(target)))
        .map(|(relation, _)| {
            Issue::new(
                Severity::Error,
                IssueCode::SelfReference,
                format!(
                    "{} '{}' cannot {} itself",
                    artifact.kind(),
                    artifact.name(),
                    relation.verb()
                ),
                artifact,
                Property::Relation(relation),
            )
        })
        .collect()
}

/// Reports each checked relation that lists the same target more than once.
///
/// A relation with several repeated targets is reported once.
#[must_use]
pub fn check_duplicate_reference(artifact: &Artifact) -> Vec<Issue> {
    checked_relations(artifact)
        .filter(|(_, targets)| {
            let unique: HashSet<_> = targets.iter().map(|target| target.identity()).collect();
            unique.len() < targets.len()
        })
        .map(|(relation, _)| {
            Issue::new(
                Severity::Error,
                IssueCode::DuplicateReference,
                format!("Redundant cross-reference in '{relation}' attribute"),
                artifact,
                Property::Relation(relation),
            )
        })
        .collect()
}

/// The integrity-checked relations present on this artifact's variant.
fn checked_relations(artifact: &Artifact) -> impl Iterator<Item = (RelationKind, &[Target])> {
    RelationKind::INTEGRITY_CHECKED
        .into_iter()
        .filter_map(move |relation| Some((relation, artifact.relation(relation)?)))
}

/// Applies a fixed list of rules to every artifact in a workspace.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<Rule>,
}

impl Default for Validator {
    /// The standard rule set: capitalisation, self-reference and duplicate
    /// reference.
    fn default() -> Self {
        Self::new(vec![
            check_starts_with_capital,
            check_self_reference,
            check_duplicate_reference,
        ])
    }
}

impl Validator {
    /// Creates a validator from an explicit rule list.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Validates a single artifact, running rules in order.
    #[must_use]
    pub fn validate_artifact(&self, artifact: &Artifact) -> Vec<Issue> {
        self.rules.iter().flat_map(|rule| rule(artifact)).collect()
    }

    /// Validates every artifact in the workspace.
    ///
    /// Issues are ordered by artifact (insertion order), then by rule, then
    /// by relation.
    #[instrument(level = "debug", skip_all, fields(artifacts = workspace.len()))]
    pub fn validate(&self, workspace: &Workspace) -> Vec<Issue> {
        let issues: Vec<Issue> = workspace
            .iter()
            .flat_map(|artifact| self.validate_artifact(artifact))
            .collect();
        debug!(issues = issues.len(), "validation finished");
        issues
    }
}
