//! Frontmatter splitting and header field extraction.
//!
//! A project file is a YAML header fenced by `---` lines, followed by a
//! Markdown body:
//!
//! ```text
//! ---
//! id: ocr-pipeline
//! title: OCR Pipeline
//! techStack: [Python, PyTorch]
//! featured: true
//! ---
//! Body text...
//! ```
//!
//! A file without an opening fence has an empty header and the whole text as
//! its body. An opening fence without a closing one, invalid YAML, or a header
//! that is not a key/value mapping are errors.
//!
//! Header values are read leniently: scalar fields accept strings, numbers and
//! booleans (`id: 42` yields `"42"`), so a hand-edited file does not vanish
//! from the site over a missing pair of quotes.

use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("frontmatter opened with `---` but never closed")]
    Unterminated,
    #[error("invalid YAML header: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("header is not a key/value mapping")]
    NotAMapping,
}

/// Header key/value pairs, keyed by field name.
pub type Header = BTreeMap<String, Value>;

/// A file split into its parsed header and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Header,
    pub body: String,
}

/// Split raw text into header and body.
pub fn split(text: &str) -> Result<Document, FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    match lines.next() {
        Some(first) if is_fence(first) => {}
        _ => {
            return Ok(Document {
                header: Header::new(),
                body: text.to_string(),
            });
        }
    }

    let mut offset = 0;
    let mut header_len = None;
    let header_start = text.split_inclusive('\n').next().map_or(0, str::len);
    for line in lines {
        if is_fence(line) {
            header_len = Some(offset);
            offset += line.len();
            break;
        }
        offset += line.len();
    }
    let header_len = header_len.ok_or(FrontmatterError::Unterminated)?;

    let header_text = &text[header_start..header_start + header_len];
    let body = &text[header_start + offset..];

    Ok(Document {
        header: parse_header(header_text)?,
        body: body.to_string(),
    })
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == FENCE
}

fn parse_header(text: &str) -> Result<Header, FrontmatterError> {
    if text.trim().is_empty() {
        return Ok(Header::new());
    }
    match serde_yaml::from_str::<Value>(text)? {
        Value::Null => Ok(Header::new()),
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(k, v)| scalar_to_string(&k).map(|k| (k, v)))
            .collect()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A scalar field as a trimmed string. Blank values count as absent.
pub fn string_field(header: &Header, key: &str) -> Option<String> {
    header
        .get(key)
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A boolean flag. Accepts YAML booleans and the strings `"true"`/`"false"`.
/// Anything else is `false`.
pub fn bool_field(header: &Header, key: &str) -> bool {
    match header.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// A list of scalars as strings, in authored order. Non-scalar items are
/// skipped; a missing or non-list field is empty.
pub fn list_field(header: &Header, key: &str) -> Vec<String> {
    match header.get(key) {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_and_body() {
        let doc = split("---\nid: a\ntitle: A\n---\nBody here\n").unwrap();
        assert_eq!(string_field(&doc.header, "id").as_deref(), Some("a"));
        assert_eq!(string_field(&doc.header, "title").as_deref(), Some("A"));
        assert_eq!(doc.body, "Body here\n");
    }

    #[test]
    fn crlf_fences_are_recognized() {
        let doc = split("---\r\nid: a\r\n---\r\nBody").unwrap();
        assert_eq!(string_field(&doc.header, "id").as_deref(), Some("a"));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn leading_bom_is_ignored() {
        let doc = split("\u{feff}---\nid: a\n---\n").unwrap();
        assert_eq!(string_field(&doc.header, "id").as_deref(), Some("a"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn no_fence_means_empty_header() {
        let doc = split("# Just markdown\n").unwrap();
        assert!(doc.header.is_empty());
        assert_eq!(doc.body, "# Just markdown\n");
    }

    #[test]
    fn empty_header_is_allowed() {
        let doc = split("---\n---\nbody").unwrap();
        assert!(doc.header.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn unterminated_header_is_error() {
        let err = split("---\nid: a\ntitle: A\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn invalid_yaml_is_error() {
        let err = split("---\nid: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml(_)));
    }

    #[test]
    fn list_header_is_error() {
        let err = split("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::NotAMapping));
    }

    #[test]
    fn body_may_contain_horizontal_rules() {
        let doc = split("---\nid: a\n---\nintro\n---\nmore\n").unwrap();
        assert_eq!(doc.body, "intro\n---\nmore\n");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let doc = split("---\nid: 42\n---\n").unwrap();
        assert_eq!(string_field(&doc.header, "id").as_deref(), Some("42"));
    }

    #[test]
    fn blank_string_field_is_absent() {
        let doc = split("---\ntitle: \"   \"\n---\n").unwrap();
        assert_eq!(string_field(&doc.header, "title"), None);
    }

    #[test]
    fn unquoted_date_reads_as_string() {
        let doc = split("---\ndate: 2024-03-01\n---\n").unwrap();
        assert_eq!(
            string_field(&doc.header, "date").as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn bool_field_accepts_bool_and_string() {
        let doc = split("---\na: true\nb: \"TRUE\"\nc: yes\nd: false\n---\n").unwrap();
        assert!(bool_field(&doc.header, "a"));
        assert!(bool_field(&doc.header, "b"));
        // YAML 1.2: `yes` is a plain string, not a boolean
        assert!(!bool_field(&doc.header, "c"));
        assert!(!bool_field(&doc.header, "d"));
        assert!(!bool_field(&doc.header, "missing"));
    }

    #[test]
    fn list_field_keeps_order_and_duplicates() {
        let doc = split("---\ntechStack: [Python, React, Python, 3]\n---\n").unwrap();
        assert_eq!(
            list_field(&doc.header, "techStack"),
            vec!["Python", "React", "Python", "3"]
        );
    }

    #[test]
    fn list_field_non_list_is_empty() {
        let doc = split("---\ntechStack: Python\n---\n").unwrap();
        assert!(list_field(&doc.header, "techStack").is_empty());
    }
}
