use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rayon::prelude::*;

use crate::index::refresh::{RefreshGate, RefreshOutcome};
use crate::index::{ComponentRecord, IndexDiagnostic, RebuildReport};
use crate::indexer::{extract_definition, resolve_artifacts, ScanKind, WorkspaceScanner};

/// One complete, immutable index generation.
#[derive(Debug, Default)]
pub struct IndexGeneration {
    number: u64,
    components: HashMap<String, Arc<ComponentRecord>>,
    diagnostics: Vec<IndexDiagnostic>,
}

impl IndexGeneration {
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn get(&self, identifier: &str) -> Option<&Arc<ComponentRecord>> {
        self.components.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.components.contains_key(identifier)
    }

    /// Files the pass that built this generation could not read.
    pub fn diagnostics(&self) -> &[IndexDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All records sorted by identifier.
    pub fn records(&self) -> Vec<Arc<ComponentRecord>> {
        let mut records: Vec<_> = self.components.values().cloned().collect();
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        records
    }
}

/// Identifier -> component map, rebuilt wholesale and swapped in atomically.
///
/// Readers always see a complete generation: a rebuild fills a fresh map and
/// only then replaces the current one.
pub struct SymbolIndex {
    scanner: WorkspaceScanner,
    current: ArcSwap<IndexGeneration>,
    gate: RefreshGate,
}

enum FileOutcome {
    Indexed(ComponentRecord),
    NotAComponent,
    Failed(IndexDiagnostic),
}

impl SymbolIndex {
    /// Creates an empty index (generation 0) over `scanner`'s workspace.
    pub fn new(scanner: WorkspaceScanner) -> Self {
        Self {
            scanner,
            current: ArcSwap::from_pointee(IndexGeneration::default()),
            gate: RefreshGate::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.scanner.root()
    }

    /// Rebuilds the index, coalescing with any rebuild already in progress.
    pub fn rebuild(&self) -> RefreshOutcome<RebuildReport> {
        self.gate.run(|| self.rebuild_pass())
    }

    pub fn is_rebuilding(&self) -> bool {
        self.gate.is_running()
    }

    pub fn lookup(&self, identifier: &str) -> Option<Arc<ComponentRecord>> {
        self.current.load().get(identifier).cloned()
    }

    pub fn list(&self) -> Vec<Arc<ComponentRecord>> {
        self.current.load().records()
    }

    /// The current generation, for callers that need several consistent reads.
    pub fn snapshot(&self) -> Arc<IndexGeneration> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().number()
    }

    /// Diagnostics of the current generation.
    ///
    /// A pass that was not installed reports its diagnostics only in its
    /// [`RebuildReport`].
    pub fn diagnostics(&self) -> Vec<IndexDiagnostic> {
        self.current.load().diagnostics.clone()
    }

    fn rebuild_pass(&self) -> RebuildReport {
        let previous = self.current.load_full();

        let files = match self.scanner.scan(ScanKind::Definitions) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Component scan failed, keeping generation {}: {}", previous.number, e);
                return RebuildReport {
                    generation: previous.number,
                    components: previous.len(),
                    files_scanned: 0,
                    failures: 0,
                    retained: true,
                    diagnostics: vec![IndexDiagnostic {
                        file_path: self.scanner.root().to_path_buf(),
                        message: e.to_string(),
                    }],
                };
            }
        };

        let outcomes: Vec<FileOutcome> = files.par_iter().map(|file| index_file(file)).collect();

        let mut components = HashMap::new();
        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Indexed(record) => {
                    tracing::debug!(
                        "Indexed component: {} ({})",
                        record.identifier,
                        record.implementation_name
                    );
                    // later files in scan order win on duplicate identifiers
                    if let Some(old) = components.insert(record.identifier.clone(), Arc::new(record)) {
                        tracing::debug!("{} redefined, replacing {}", old.identifier, old.definition_file.display());
                    }
                }
                FileOutcome::NotAComponent => {}
                FileOutcome::Failed(diagnostic) => {
                    tracing::warn!(
                        "Failed to read {}: {}",
                        diagnostic.file_path.display(),
                        diagnostic.message
                    );
                    diagnostics.push(diagnostic);
                }
            }
        }

        let failures = diagnostics.len();

        if failures > 0 && failures == files.len() {
            tracing::warn!(
                "All {} definition files failed, keeping generation {}",
                failures,
                previous.number
            );
            return RebuildReport {
                generation: previous.number,
                components: previous.len(),
                files_scanned: files.len(),
                failures,
                retained: true,
                diagnostics,
            };
        }

        let next = IndexGeneration {
            number: previous.number + 1,
            components,
            diagnostics: diagnostics.clone(),
        };
        let report = RebuildReport {
            generation: next.number,
            components: next.len(),
            files_scanned: files.len(),
            failures,
            retained: false,
            diagnostics,
        };
        self.current.store(Arc::new(next));

        tracing::info!(
            "Indexed {} components from {} definition files (generation {})",
            report.components,
            report.files_scanned,
            report.generation
        );
        report
    }
}

fn index_file(file: &Path) -> FileOutcome {
    // non-UTF-8 bytes are replaced, only real read errors fail the file
    let bytes = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) => {
            return FileOutcome::Failed(IndexDiagnostic {
                file_path: file.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    let text = String::from_utf8_lossy(&bytes);

    let Some(definition) = extract_definition(&text) else {
        tracing::debug!("No registration call in {}", file.display());
        return FileOutcome::NotAComponent;
    };

    let component_dir = file.parent().unwrap_or_else(|| Path::new(""));
    let related_artifacts = resolve_artifacts(component_dir, &definition.identifier);

    FileOutcome::Indexed(ComponentRecord {
        identifier: definition.identifier,
        implementation_name: definition.implementation_name,
        definition_file: file.to_path_buf(),
        definition_line: definition.line,
        definition_start_column: definition.start_column,
        definition_end_column: definition.end_column,
        related_artifacts,
    })
}
