mod discovery;
pub use discovery::collect_snapshot_paths;

mod export;
pub use export::{export, ExportError, OutputLocation};

/// YAML snapshot loading.
pub mod snapshot;
pub use snapshot::{load_file, load_str, load_workspace, LoadError};
