use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file range. Lines are 1-based, columns are 0-based characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(
        file_path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// Conventional sibling files of a component, each present only if it exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArtifacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<PathBuf>,
}

impl RelatedArtifacts {
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.demo.is_none() && self.schema.is_none() && self.doc.is_none()
    }
}

/// One indexed component. Immutable; replaced wholesale on the next rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub identifier: String,
    pub implementation_name: String,
    pub definition_file: PathBuf,
    /// 1-based line of the registration call
    pub definition_line: u32,
    pub definition_start_column: u32,
    pub definition_end_column: u32,
    pub related_artifacts: RelatedArtifacts,
}

impl ComponentRecord {
    /// Range of the registration call.
    pub fn definition_location(&self) -> Location {
        Location::new(
            self.definition_file.to_string_lossy(),
            self.definition_line,
            self.definition_start_column,
            self.definition_line,
            self.definition_end_column,
        )
    }
}

/// A definition file that could not be read during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDiagnostic {
    pub file_path: PathBuf,
    pub message: String,
}

/// Summary of one rebuild pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildReport {
    /// Generation current after the pass
    pub generation: u64,
    pub components: usize,
    pub files_scanned: usize,
    pub failures: usize,
    /// True if the previous generation was kept instead of replaced
    pub retained: bool,
    /// Files this pass could not read, whether or not it was installed
    pub diagnostics: Vec<IndexDiagnostic>,
}
