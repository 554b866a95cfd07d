use once_cell::sync::Lazy;
use regex::Regex;

/// `customElements.define('wb-button', WBButton)` or `register('wb-button', WBButton)`
static REGISTRATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:customElements\.define|\bregister)\s*\(\s*['"]([^'"]+)['"]\s*,\s*(\w+)\s*\)"#)
        .expect("registration pattern is valid")
});

/// A registration call found in a definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDefinition {
    pub identifier: String,
    pub implementation_name: String,
    /// 1-based line of the registration call
    pub line: u32,
    /// 0-based character columns spanned by the call
    pub start_column: u32,
    pub end_column: u32,
}

/// Finds the first registration call in `text`.
///
/// Only the first match of the file is returned; later registrations in the
/// same file are not indexed. A file without any registration yields `None`.
pub fn extract_definition(text: &str) -> Option<ExtractedDefinition> {
    text.lines().enumerate().find_map(|(i, line)| {
        let caps = REGISTRATION.captures(line)?;
        let call = caps.get(0)?;
        Some(ExtractedDefinition {
            identifier: caps[1].to_string(),
            implementation_name: caps[2].to_string(),
            line: i as u32 + 1,
            start_column: char_column(line, call.start()),
            end_column: char_column(line, call.end()),
        })
    })
}

/// Converts a byte index within `line` to a character column.
pub(crate) fn char_column(line: &str, byte_index: usize) -> u32 {
    line[..byte_index].chars().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_register_call() {
        let text = "import { register } from '../core.js';\n\nregister('wb-button', WBButton);\n";
        let def = extract_definition(text).unwrap();

        assert_eq!(def.identifier, "wb-button");
        assert_eq!(def.implementation_name, "WBButton");
        assert_eq!(def.line, 3);
        assert_eq!(def.start_column, 0);
        assert_eq!(def.end_column, 31);
    }

    #[test]
    fn test_extract_custom_elements_define() {
        let text = "class WBCard extends HTMLElement {}\n  customElements.define(\"wb-card\", WBCard);";
        let def = extract_definition(text).unwrap();

        assert_eq!(def.identifier, "wb-card");
        assert_eq!(def.implementation_name, "WBCard");
        assert_eq!(def.line, 2);
        assert_eq!(def.start_column, 2);
    }

    #[test]
    fn test_extract_tolerates_whitespace() {
        let def = extract_definition("register (  'wb-tabs' ,  WBTabs  )").unwrap();
        assert_eq!(def.identifier, "wb-tabs");
        assert_eq!(def.implementation_name, "WBTabs");
    }

    #[test]
    fn test_extract_only_first_registration() {
        let text = "register('wb-a', WBA);\nregister('wb-b', WBB);\n";
        let def = extract_definition(text).unwrap();

        assert_eq!(def.identifier, "wb-a");
        assert_eq!(def.line, 1);
    }

    #[test]
    fn test_extract_none_without_registration() {
        assert!(extract_definition("export const x = 1;\n").is_none());
        assert!(extract_definition("").is_none());
    }

    #[test]
    fn test_extract_ignores_non_identifier_second_argument() {
        assert!(extract_definition("register('wb-a', new WBA());").is_none());
        assert!(extract_definition("register('wb-a', 'WBA');").is_none());
    }

    #[test]
    fn test_extract_ignores_prefixed_function_names() {
        assert!(extract_definition("preregister('wb-a', WBA);").is_none());
    }

    #[test]
    fn test_extract_line_numbers_with_crlf() {
        let text = "// header\r\n// more\r\nregister('wb-x', WBX);\r\n";
        assert_eq!(extract_definition(text).unwrap().line, 3);
    }
}
