//! Shared types returned by the loader and the query layer.
//!
//! These are serialized as-is by the HTTP surface and by `--json` CLI output,
//! so field names follow the camelCase convention the site frontend consumes.

use serde::Serialize;

/// One project entry, parsed from a Markdown file with a frontmatter header.
///
/// Records are built fresh from storage on every query and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Stable identifier from the `id` header field.
    pub id: String,
    /// URL slug. Always equal to `id`.
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cover_image: String,
    /// Date exactly as authored. Absent dates sort as the configured default
    /// but are never filled in here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Technologies in authored order; duplicates are kept.
    pub tech_stack: Vec<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Markdown body with the header stripped.
    pub content: String,
    /// Estimated minutes to read `content`.
    pub reading_time: usize,
}

/// Neighbors of a project in the newest-first listing.
///
/// `previous` is the more recent project, `next` the older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation<'a> {
    pub previous: Option<&'a ProjectRecord>,
    pub next: Option<&'a ProjectRecord>,
}
