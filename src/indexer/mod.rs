pub mod artifacts;
pub mod extractor;
pub mod usages;
pub mod walker;

pub use artifacts::resolve_artifacts;
pub use extractor::{extract_definition, ExtractedDefinition};
pub use usages::UsageFinder;
pub use walker::{ScanKind, WorkspaceScanner};
