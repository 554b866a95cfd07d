use std::path::Path;

use regex::Regex;

use crate::index::Location;
use crate::indexer::extractor::char_column;
use crate::indexer::walker::{ScanKind, WorkspaceScanner};

/// Finds opening tags of a component across every markup file of the workspace.
///
/// Nothing is cached: each call rescans the whole workspace from disk.
#[derive(Debug, Clone)]
pub struct UsageFinder {
    scanner: WorkspaceScanner,
}

impl UsageFinder {
    pub fn new(scanner: WorkspaceScanner) -> Self {
        Self { scanner }
    }

    pub fn find_usages(&self, identifier: &str) -> Vec<Location> {
        let files = match self.scanner.scan(ScanKind::Markup) {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("Usage scan for {} skipped: {}", identifier, e);
                return Vec::new();
            }
        };

        let pattern = match tag_opener(identifier) {
            Some(pattern) => pattern,
            None => return Vec::new(),
        };

        let mut usages = Vec::new();
        for file in &files {
            match std::fs::read(file) {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    usages.extend(find_in_text(&pattern, identifier, &text, file));
                }
                Err(e) => {
                    tracing::debug!("Skipping unreadable markup {}: {}", file.display(), e);
                }
            }
        }

        tracing::debug!(
            "Found {} usages of {} in {} markup files",
            usages.len(),
            identifier,
            files.len()
        );
        usages
    }
}

/// `<identifier` followed by whitespace or `>` on the same line.
fn tag_opener(identifier: &str) -> Option<Regex> {
    Regex::new(&format!(r"<{}[\s>]", regex::escape(identifier))).ok()
}

fn find_in_text(pattern: &Regex, identifier: &str, text: &str, file: &Path) -> Vec<Location> {
    let file_path = file.to_string_lossy().into_owned();
    let width = identifier.chars().count() as u32 + 1;

    text.lines()
        .enumerate()
        .flat_map(|(i, line)| {
            let line_number = i as u32 + 1;
            let file_path = &file_path;
            pattern.find_iter(line).map(move |m| {
                let column = char_column(line, m.start());
                Location::new(file_path.as_str(), line_number, column, line_number, column + width)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn find(text: &str, identifier: &str) -> Vec<Location> {
        let pattern = tag_opener(identifier).unwrap();
        find_in_text(&pattern, identifier, text, Path::new("page.html"))
    }

    #[test]
    fn test_find_single_usage() {
        let usages = find("<p>\n<wb-button>Click</wb-button>\n", "wb-button");

        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].start_line, 2);
        assert_eq!(usages[0].start_column, 0);
        assert_eq!(usages[0].end_column, 10);
    }

    #[test]
    fn test_find_every_usage_on_a_line() {
        let usages = find("<wb-tab>a</wb-tab><wb-tab class=\"x\">b</wb-tab> <wb-tab>", "wb-tab");

        let columns: Vec<u32> = usages.iter().map(|u| u.start_column).collect();
        assert_eq!(columns, vec![0, 18, 47]);
        assert!(usages.iter().all(|u| u.start_line == 1));
    }

    #[test]
    fn test_find_requires_tag_boundary() {
        assert!(find("<wb-button-group>", "wb-button").is_empty());
        assert!(find("</wb-button>", "wb-button").is_empty());
        assert!(find("wb-button>", "wb-button").is_empty());
    }

    #[test]
    fn test_find_tag_with_attributes_on_next_line_is_not_matched() {
        assert!(find("<wb-button\n  variant=\"primary\">", "wb-button").is_empty());
    }

    #[test]
    fn test_find_accepts_tab_separator() {
        assert_eq!(find("<wb-card\tid=\"a\">", "wb-card").len(), 1);
    }

    #[test]
    fn test_find_columns_count_characters() {
        let usages = find("<p>héllo</p><wb-x>", "wb-x");
        assert_eq!(usages[0].start_column, 12);
    }

    #[test]
    fn test_find_usages_across_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("index.html"), "<wb-nav>\n").unwrap();
        fs::write(root.join("pages/home.html"), "<main>\n<wb-nav></wb-nav>\n").unwrap();
        fs::write(root.join("pages/notes.txt"), "<wb-nav>\n").unwrap();

        let finder = UsageFinder::new(WorkspaceScanner::new(root));
        let usages = finder.find_usages("wb-nav");

        assert_eq!(usages.len(), 2);
        assert!(usages.iter().any(|u| u.file_path.ends_with("home.html") && u.start_line == 2));
    }

    #[test]
    fn test_find_usages_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let finder = UsageFinder::new(WorkspaceScanner::new(temp_dir.path().join("gone")));
        assert!(finder.find_usages("wb-nav").is_empty());
    }
}
