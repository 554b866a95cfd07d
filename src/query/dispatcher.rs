
use serde::{Deserialize, Serialize};

use crate::index::{ComponentRecord, DocumentStore, Location, SymbolIndex};
use crate::indexer::UsageFinder;
use crate::query::position::{identifier_at, is_tag_start, offset_at, Position};

/// Markdown hover content for a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: String,
    pub documentation: String,
}

impl From<&ComponentRecord> for CompletionItem {
    fn from(record: &ComponentRecord) -> Self {
        Self {
            label: record.identifier.clone(),
            kind: CompletionKind::Class,
            detail: record.implementation_name.clone(),
            documentation: format!("Web Component: {}", record.identifier),
        }
    }
}

/// Answers position-addressed navigation queries.
///
/// Holds no state of its own: every call reads the current index generation
/// and the open document's text. A document that is not open, a cursor that
/// is not on a tag and an unknown identifier all give an empty answer.
#[derive(Clone, Copy)]
pub struct QueryDispatcher<'a> {
    index: &'a SymbolIndex,
    documents: &'a DocumentStore,
    usages: &'a UsageFinder,
}

impl<'a> QueryDispatcher<'a> {
    pub fn new(index: &'a SymbolIndex, documents: &'a DocumentStore, usages: &'a UsageFinder) -> Self {
        Self {
            index,
            documents,
            usages,
        }
    }

    pub fn resolve_identifier_at_position(&self, uri: &str, pos: Position) -> Option<String> {
        self.documents
            .with_text(uri, |text| {
                let offset = offset_at(text, pos)?;
                identifier_at(text, offset)
            })
            .flatten()
    }

    pub fn go_to_definition(&self, uri: &str, pos: Position) -> Option<Location> {
        let identifier = self.resolve_identifier_at_position(uri, pos)?;
        self.index
            .lookup(&identifier)
            .map(|record| record.definition_location())
    }

    /// Usages are only searched for identifiers present in the index.
    pub fn find_references(&self, uri: &str, pos: Position) -> Vec<Location> {
        match self.resolve_identifier_at_position(uri, pos) {
            Some(identifier) if self.index.lookup(&identifier).is_some() => {
                self.usages.find_usages(&identifier)
            }
            _ => Vec::new(),
        }
    }

    pub fn hover(&self, uri: &str, pos: Position) -> Option<Hover> {
        let identifier = self.resolve_identifier_at_position(uri, pos)?;
        let record = self.index.lookup(&identifier)?;
        Some(Hover {
            contents: hover_markdown(&record),
        })
    }

    /// Every indexed identifier when the cursor follows `<` or a partial tag name.
    ///
    /// The list is not filtered by the partial name; clients filter it.
    pub fn completion(&self, uri: &str, pos: Position) -> Vec<CompletionItem> {
        let at_tag_start = self
            .documents
            .with_text(uri, |text| {
                offset_at(text, pos)
                    .map(|offset| is_tag_start(text, offset))
                    .unwrap_or(false)
            })
            .unwrap_or(false);

        if !at_tag_start {
            return Vec::new();
        }

        self.index
            .list()
            .iter()
            .map(|record| CompletionItem::from(record.as_ref()))
            .collect()
    }
}

fn hover_markdown(record: &ComponentRecord) -> String {
    let mut contents = format!(
        "**{}**\n\nClass: `{}`\n\nDefinition: {}\n\n",
        record.identifier,
        record.implementation_name,
        record.definition_file.display()
    );

    let artifacts = &record.related_artifacts;
    for (label, path) in [
        ("CSS", &artifacts.style),
        ("Demo", &artifacts.demo),
        ("Schema", &artifacts.schema),
        ("Docs", &artifacts.doc),
    ] {
        if let Some(path) = path {
            contents.push_str(&format!("{}: {}\n", label, path.display()));
        }
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RelatedArtifacts;
    use std::path::PathBuf;

    fn record() -> ComponentRecord {
        ComponentRecord {
            identifier: "wb-button".into(),
            implementation_name: "WBButton".into(),
            definition_file: PathBuf::from("/w/wb-button/wb-button.js"),
            definition_line: 3,
            definition_start_column: 0,
            definition_end_column: 31,
            related_artifacts: RelatedArtifacts {
                style: Some(PathBuf::from("/w/wb-button/wb-button.css")),
                demo: None,
                schema: Some(PathBuf::from("/w/wb-button/wb-button.schema.json")),
                doc: None,
            },
        }
    }

    #[test]
    fn test_hover_markdown() {
        let markdown = hover_markdown(&record());

        assert!(markdown.starts_with("**wb-button**\n\n"));
        assert!(markdown.contains("Class: `WBButton`"));
        assert!(markdown.contains("Definition: /w/wb-button/wb-button.js"));
        assert!(markdown.contains("CSS: /w/wb-button/wb-button.css\n"));
        assert!(markdown.contains("Schema: /w/wb-button/wb-button.schema.json\n"));
        assert!(!markdown.contains("Demo:"));
        assert!(!markdown.contains("Docs:"));
    }

    #[test]
    fn test_completion_item_from_record() {
        let item = CompletionItem::from(&record());

        assert_eq!(item.label, "wb-button");
        assert_eq!(item.kind, CompletionKind::Class);
        assert_eq!(item.detail, "WBButton");
        assert_eq!(item.documentation, "Web Component: wb-button");
    }

    #[test]
    fn test_completion_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CompletionKind::Class).unwrap(), "\"class\"");
    }
}
