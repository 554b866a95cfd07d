use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NavigatorError, Result};
use crate::index::{DocumentStore, IndexDiagnostic, RebuildReport, RefreshOutcome, SymbolIndex};
use crate::indexer::{UsageFinder, WorkspaceScanner};
use crate::query::QueryDispatcher;

#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    pub workspace_root: PathBuf,
}

impl NavigatorConfig {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }
}

/// Snapshot of the index state reported to hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    pub workspace_root: PathBuf,
    pub generation: u64,
    pub components: usize,
    pub rebuilding: bool,
    pub open_documents: usize,
    pub diagnostics: Vec<IndexDiagnostic>,
}

/// The navigation service for one workspace.
///
/// Owns the symbol index and the open-document store; hosts hold it behind an
/// `Arc` and pass it to their handlers.
pub struct Navigator {
    config: NavigatorConfig,
    index: SymbolIndex,
    documents: DocumentStore,
    usages: UsageFinder,
}

impl Navigator {
    /// Creates a navigator with an empty index. No disk access.
    pub fn new(config: NavigatorConfig) -> Self {
        let scanner = WorkspaceScanner::new(&config.workspace_root);
        Self {
            index: SymbolIndex::new(scanner.clone()),
            usages: UsageFinder::new(scanner),
            documents: DocumentStore::new(),
            config,
        }
    }

    /// Creates a navigator and runs the initial rebuild.
    ///
    /// A missing root only logs a warning and leaves the index empty. Failing
    /// to read every definition file that was found is an error.
    pub fn open(config: NavigatorConfig) -> Result<Self> {
        let navigator = Self::new(config);

        let scanner = WorkspaceScanner::new(navigator.root());
        if let Err(e) = scanner.check_root() {
            tracing::warn!("Starting with an empty component index: {}", e);
            return Ok(navigator);
        }

        if let RefreshOutcome::Ran { last, .. } = navigator.refresh_index() {
            if last.retained && last.generation == 0 && last.failures > 0 {
                return Err(NavigatorError::EmptyIndex(last.failures));
            }
        }

        Ok(navigator)
    }

    pub fn root(&self) -> &Path {
        &self.config.workspace_root
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn usages(&self) -> &UsageFinder {
        &self.usages
    }

    pub fn dispatcher(&self) -> QueryDispatcher<'_> {
        QueryDispatcher::new(&self.index, &self.documents, &self.usages)
    }

    /// Rebuilds the index; blocks for the duration of the pass.
    pub fn refresh_index(&self) -> RefreshOutcome<RebuildReport> {
        tracing::info!("Refreshing component index under {}", self.root().display());
        self.index.rebuild()
    }

    pub fn document_opened(&self, uri: &str, text: &str) {
        self.documents.open(uri, text);
    }

    pub fn document_changed(&self, uri: &str, text: &str) {
        self.documents.change(uri, text);
    }

    pub fn document_closed(&self, uri: &str) {
        self.documents.close(uri);
    }

    pub fn status(&self) -> IndexStatus {
        let generation = self.index.snapshot();
        IndexStatus {
            workspace_root: self.config.workspace_root.clone(),
            generation: generation.number(),
            components: generation.len(),
            rebuilding: self.index.is_rebuilding(),
            open_documents: self.documents.len(),
            diagnostics: self.index.diagnostics(),
        }
    }
}
