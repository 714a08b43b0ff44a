//! # Folio
//!
//! The content layer behind a portfolio site's projects API. Each project is a
//! Markdown file with a YAML frontmatter header; the directory of files is the
//! whole database.
//!
//! # Architecture: Load, Index, Query
//!
//! Every request runs the same short pipeline, start to finish:
//!
//! ```text
//! 1. Scan    content/projects/*.md  →  ScanReport   (records + rejections)
//! 2. Index   ScanReport.records     →  ContentIndex (sort dates resolved)
//! 3. Query   ContentIndex           →  JSON         (list, find, related, navigation)
//! ```
//!
//! Nothing is cached between requests. Content changes at deploy time, so HTTP
//! caching (via `Cache-Control` and `ETag`) does that job one layer up, and the
//! loader stays a pure function of what is on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Storage backends: a directory of `.md` files, or in-memory entries |
//! | [`frontmatter`] | Splits `---` fenced YAML headers from bodies; lenient field readers |
//! | [`metadata`] | Reading time, sort dates, hidden-entry conventions |
//! | [`scan`] | Turns raw entries into records or rejections |
//! | [`query`] | List, featured, find-by-slug, related ranking, prev/next navigation |
//! | [`http`] | axum router for the projects API |
//! | [`config`] | `folio.toml` loading, merging over stock defaults, validation |
//! | [`types`] | `ProjectRecord` and `Navigation`, as serialized to clients |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Bad Entries Are Skipped, Not Fatal
//!
//! One malformed file should not take the projects page down. The loader
//! records every rejected entry with a reason, logs it, and carries on.
//! Callers of the query layer only ever see valid records; `folio check`
//! shows the rejections. Only a storage failure (missing directory,
//! unreadable file) fails a request.
//!
//! ## Hiding Drafts
//!
//! Authors hide a project by wrapping the file in `<!-- ... -->`, or by
//! leaving a marker phrase such as `HIDDEN PROJECT` anywhere in it. Both are
//! checked on the raw text so a hidden file never reaches the parser's
//! output.
//!
//! ## Related Projects
//!
//! Similarity is the count of distinct shared technologies. It is deliberately
//! simple: no weighting for repeated entries, no category bonus. Ties go to the
//! newer project.

pub mod config;
pub mod frontmatter;
pub mod http;
pub mod metadata;
pub mod output;
pub mod query;
pub mod scan;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
