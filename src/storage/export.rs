use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::domain::{render, ArtifactKind, Workspace};

/// The directory exports go to when no destination is given, relative to the
/// source file's directory.
const DEFAULT_DESTINATION: &str = "generated";

/// The extension of exported documents.
const OUTPUT_EXTENSION: &str = "rst";

/// Errors that abort an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The destination directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Where an export for a given source file ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    directory: PathBuf,
    stem: String,
}

impl OutputLocation {
    /// Derives the output location for `source`.
    ///
    /// The stem is the part of the file name before the first `.`, so
    /// `model.reqspec.yaml` becomes `model`. Without a `destination` the
    /// output goes to a `generated` directory next to the source.
    #[must_use]
    pub fn resolve(source: &Path, destination: Option<&Path>) -> Self {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let stem = file_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();

        let directory = destination.map_or_else(
            || {
                source
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(DEFAULT_DESTINATION)
            },
            Path::to_path_buf,
        );

        Self { directory, stem }
    }

    /// The directory the output file is written to.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file stem shared by source and output.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The full path of the output file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{OUTPUT_EXTENSION}", self.stem))
    }
}

/// Renders every artifact of `kind` and writes the document next to (or
/// under `destination` for) the snapshot it came from.
///
/// The destination directory is created if needed and any existing output
/// is overwritten. Returns the path written.
///
/// # Errors
///
/// Returns [`ExportError::CreateDir`] if the destination cannot be created
/// and [`ExportError::Write`] if the file cannot be written.
#[instrument(level = "debug", skip(workspace))]
pub fn export(
    workspace: &Workspace,
    kind: ArtifactKind,
    source: &Path,
    destination: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let location = OutputLocation::resolve(source, destination);

    fs::create_dir_all(location.directory()).map_err(|source| ExportError::CreateDir {
        path: location.directory().to_path_buf(),
        source,
    })?;

    let document = render(workspace, kind);
    let path = location.path();
    fs::write(&path, document).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::TempDir;
    use test_case::test_case;

    use super::{export, ExportError, OutputLocation};
    use crate::domain::{Artifact, ArtifactKind, Name, Workspace};

    fn workspace() -> Workspace {
        let mut workspace = Workspace::default();
        for (kind, name) in [
            (ArtifactKind::Goal, "Alpha"),
            (ArtifactKind::Requirement, "Req1"),
        ] {
            let name = Name::try_from(name).unwrap();
            workspace.insert(Artifact::new(kind, name)).unwrap();
        }
        workspace
    }

    #[test_case("model.reqspec.yaml", "model" ; "double extension")]
    #[test_case("model.yaml", "model" ; "single extension")]
    #[test_case("model", "model" ; "no extension")]
    fn stem_is_text_before_first_dot(file: &str, stem: &str) {
        let location = OutputLocation::resolve(Path::new(file), None);
        assert_eq!(location.stem(), stem);
    }

    #[test]
    fn default_destination_is_generated_next_to_source() {
        let location = OutputLocation::resolve(Path::new("docs/model.reqspec.yaml"), None);
        assert_eq!(location.path(), Path::new("docs/generated/model.rst"));
    }

    #[test]
    fn explicit_destination_wins() {
        let location = OutputLocation::resolve(
            Path::new("docs/model.reqspec.yaml"),
            Some(Path::new("out/needs")),
        );
        assert_eq!(location.path(), Path::new("out/needs/model.rst"));
    }

    #[test]
    fn creates_nested_destination_and_writes_document() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("model.reqspec.yaml");
        let destination = tmp.path().join("a/b/c");

        let path = export(
            &workspace(),
            ArtifactKind::Requirement,
            &source,
            Some(&destination),
        )
        .unwrap();

        assert_eq!(path, destination.join("model.rst"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            ".. req:: Placeholder Title\n\t:id: Req1\n"
        );
    }

    #[test]
    fn re_export_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("model.reqspec.yaml");
        let workspace = workspace();

        let first = export(&workspace, ArtifactKind::Goal, &source, None).unwrap();
        let before = fs::read(&first).unwrap();
        let second = export(&workspace, ArtifactKind::Goal, &source, None).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, tmp.path().join("generated/model.rst"));
        assert_eq!(fs::read(&second).unwrap(), before);
    }

    #[test]
    fn destination_that_is_a_file_fails_to_create() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = export(
            &workspace(),
            ArtifactKind::Goal,
            &tmp.path().join("model.reqspec.yaml"),
            Some(&blocker.join("inner")),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }

    #[test]
    fn output_path_occupied_by_directory_fails_to_write() {
        let tmp = TempDir::new().unwrap();
        let destination = tmp.path().join("out");
        fs::create_dir_all(destination.join("model.rst")).unwrap();

        let err = export(
            &workspace(),
            ArtifactKind::Goal,
            &tmp.path().join("model.reqspec.yaml"),
            Some(&destination),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
