//! Fixed naming conventions of a wb- component workspace.
//!
//! A component lives in its own directory named after its tag, e.g.
//! `components/wb-button/`, with the registration in `wb-button.js` and
//! optional siblings for styling, demo, schema and documentation.

/// Prefix every component directory and tag name carries.
pub const COMPONENT_PREFIX: &str = "wb-";

/// Extension of component definition files.
pub const DEFINITION_EXTENSION: &str = "js";

/// Extension of markup files scanned for usages.
pub const MARKUP_EXTENSION: &str = "html";

/// Directory names never descended into. Dot-entries are skipped separately.
pub const IGNORED_DIRS: &[&str] = &["node_modules", "target", "dist", "bower_components"];

pub const STYLE_SUFFIX: &str = ".css";
pub const DEMO_SUFFIX: &str = "-demo.html";
pub const SCHEMA_SUFFIX: &str = ".schema.json";
pub const DOC_SUFFIX: &str = ".md";

/// Characters after which clients should ask for completions.
pub const COMPLETION_TRIGGERS: &[&str] = &["<", "-"];

/// Returns true for names the scanner never descends into or yields.
pub fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}

/// Returns true if a directory name carries the component prefix.
pub fn is_component_dir_name(name: &str) -> bool {
    name.len() > COMPONENT_PREFIX.len() && name.starts_with(COMPONENT_PREFIX)
}
