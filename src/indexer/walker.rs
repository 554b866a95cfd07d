use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::conventions::{
    is_component_dir_name, is_ignored_name, DEFINITION_EXTENSION, MARKUP_EXTENSION,
};
use crate::error::{NavigatorError, Result};

/// What a workspace scan yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// `<dir>/<dir>.js` files inside `wb-` prefixed directories
    Definitions,
    /// every `.html` file
    Markup,
}

#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    root: PathBuf,
}

impl WorkspaceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails if the root is missing or is not a directory.
    pub fn check_root(&self) -> Result<()> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            NavigatorError::WorkspaceRoot(format!("{}: {}", self.root.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(NavigatorError::WorkspaceRoot(format!(
                "{}: not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Walks the workspace depth-first in file-name order.
    ///
    /// Every call performs a fresh walk. Unreadable subtrees are skipped and
    /// never abort the scan; only an unusable root is an error.
    pub fn scan(&self, kind: ScanKind) -> Result<Vec<PathBuf>> {
        self.check_root()?;

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .file_name()
                        .to_str()
                        .map(|name| !is_ignored_name(name))
                        .unwrap_or(true)
            })
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            // links are listed but not followed; reading resolves them
            let is_file = entry
                .file_type()
                .map(|t| t.is_file() || (t.is_symlink() && !entry.path().is_dir()))
                .unwrap_or(false);
            if is_file && Self::matches(entry.path(), kind) {
                files.push(entry.into_path());
            }
        }

        tracing::debug!("Scan {:?} of {} found {} files", kind, self.root.display(), files.len());
        Ok(files)
    }

    /// Applies the naming convention of `kind` to a single path.
    pub fn matches(path: &Path, kind: ScanKind) -> bool {
        match kind {
            ScanKind::Definitions => is_definition_file(path),
            ScanKind::Markup => has_extension(path, MARKUP_EXTENSION),
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

fn is_definition_file(path: &Path) -> bool {
    if !has_extension(path, DEFINITION_EXTENSION) {
        return false;
    }
    let stem = path.file_stem().and_then(|s| s.to_str());
    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());

    match (stem, dir_name) {
        (Some(stem), Some(dir)) => stem == dir && is_component_dir_name(dir),
        _ => false,
    }
}
