pub mod conventions;
pub mod error;
pub mod host;
pub mod index;
pub mod indexer;
pub mod navigator;
pub mod query;

pub use error::{NavigatorError, Result};
pub use host::{Flow, Host};
pub use index::{
    ComponentRecord, DocumentStore, IndexDiagnostic, IndexGeneration, Location, OpenDocument,
    RebuildReport, RefreshGate, RefreshOutcome, RelatedArtifacts, SymbolIndex,
};
pub use indexer::{
    extract_definition, resolve_artifacts, ExtractedDefinition, ScanKind, UsageFinder,
    WorkspaceScanner,
};
pub use navigator::{IndexStatus, Navigator, NavigatorConfig};
pub use query::{CompletionItem, CompletionKind, Hover, Position, QueryDispatcher};
