//! Document store for documents the editing client has open.
//!
//! Entries are owned entirely by open/change/close notifications; nothing
//! here reads from disk.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Text of an open document as last reported by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub uri: String,
    pub text: String,
    /// Starts at 1 on open, incremented by every change
    pub version: u64,
}

impl OpenDocument {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
            version: 1,
        }
    }

    /// Replaces the full text and bumps the version
    pub fn update(&mut self, text: String) {
        self.text = text;
        self.version += 1;
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, OpenDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or reopens) a document at version 1
    pub fn open(&self, uri: &str, text: &str) {
        self.documents
            .write()
            .insert(uri.to_string(), OpenDocument::new(uri, text));
    }

    /// Replaces a document's text; an unknown uri is treated as an open
    pub fn change(&self, uri: &str, text: &str) {
        let mut docs = self.documents.write();
        match docs.get_mut(uri) {
            Some(doc) => doc.update(text.to_string()),
            None => {
                docs.insert(uri.to_string(), OpenDocument::new(uri, text));
            }
        }
    }

    pub fn close(&self, uri: &str) {
        self.documents.write().remove(uri);
    }

    pub fn get(&self, uri: &str) -> Option<OpenDocument> {
        self.documents.read().get(uri).cloned()
    }

    /// Runs `f` against the document's text without cloning it
    pub fn with_text<R>(&self, uri: &str, f: impl FnOnce(&str) -> R) -> Option<R> {
        let docs = self.documents.read();
        docs.get(uri).map(|doc| f(&doc.text))
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.read().contains_key(uri)
    }

    pub fn version(&self, uri: &str) -> Option<u64> {
        self.documents.read().get(uri).map(|d| d.version)
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    pub fn uris(&self) -> Vec<String> {
        self.documents.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_get() {
        let store = DocumentStore::new();
        store.open("file:///a.html", "<wb-button>");

        let doc = store.get("file:///a.html").unwrap();
        assert_eq!(doc.text, "<wb-button>");
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_change_overwrites_and_increments_version() {
        let store = DocumentStore::new();
        store.open("file:///a.html", "one");
        store.change("file:///a.html", "two");
        store.change("file:///a.html", "three");

        let doc = store.get("file:///a.html").unwrap();
        assert_eq!(doc.text, "three");
        assert_eq!(doc.version, 3);
    }

    #[test]
    fn test_change_unknown_document_opens_it() {
        let store = DocumentStore::new();
        store.change("file:///b.html", "text");

        assert_eq!(store.version("file:///b.html"), Some(1));
    }

    #[test]
    fn test_reopen_resets_version() {
        let store = DocumentStore::new();
        store.open("file:///a.html", "one");
        store.change("file:///a.html", "two");
        store.open("file:///a.html", "fresh");

        assert_eq!(store.version("file:///a.html"), Some(1));
    }

    #[test]
    fn test_close_removes_document() {
        let store = DocumentStore::new();
        store.open("file:///a.html", "one");
        store.open("file:///b.html", "two");
        store.close("file:///a.html");

        assert!(!store.contains("file:///a.html"));
        assert!(store.contains("file:///b.html"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_close_unknown_document_is_noop() {
        let store = DocumentStore::new();
        store.close("file:///missing.html");
        assert!(store.is_empty());
    }

    #[test]
    fn test_with_text() {
        let store = DocumentStore::new();
        store.open("file:///a.html", "hello");

        assert_eq!(store.with_text("file:///a.html", |t| t.len()), Some(5));
        assert_eq!(store.with_text("file:///nope.html", |t| t.len()), None);
    }
}
