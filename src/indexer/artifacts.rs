use std::path::Path;

use crate::conventions::{DEMO_SUFFIX, DOC_SUFFIX, SCHEMA_SUFFIX, STYLE_SUFFIX};
use crate::index::RelatedArtifacts;

/// Probes `component_dir` for the conventional sibling files of `identifier`.
///
/// Only existence is checked; a missing sibling simply leaves its slot empty.
pub fn resolve_artifacts(component_dir: &Path, identifier: &str) -> RelatedArtifacts {
    let sibling = |suffix: &str| {
        let candidate = component_dir.join(format!("{}{}", identifier, suffix));
        candidate.is_file().then_some(candidate)
    };

    RelatedArtifacts {
        style: sibling(STYLE_SUFFIX),
        demo: sibling(DEMO_SUFFIX),
        schema: sibling(SCHEMA_SUFFIX),
        doc: sibling(DOC_SUFFIX),
    }
}
