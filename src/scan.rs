//! Content loading.
//!
//! Reads every entry from a [`ContentStore`] and turns it into a
//! [`ProjectRecord`], or a [`Rejection`] explaining why it was left out.
//!
//! ## Entry Format
//!
//! ```text
//! content/projects/
//! ├── ocr-pipeline.md      # ---\nid: ocr-pipeline\ntitle: ...\n---\nbody
//! ├── face-tracker.md
//! └── old-idea.md          # <!-- ...whole file commented out... -->
//! ```
//!
//! ## Rejection Rules
//!
//! Checked in this order; the first that applies wins:
//!
//! 1. The entry is not valid UTF-8
//! 2. Trimmed text starts with `<!--` (the entry is commented out)
//! 3. The frontmatter header cannot be split or parsed
//! 4. The header has no `id` or no `title`
//! 5. The raw text contains a hidden-marker phrase
//!
//! Rejected entries never fail the scan. They are logged and collected in
//! [`ScanReport::rejected`] so `folio check` can show them, while queries only
//! ever see [`ScanReport::records`].
//!
//! ## Failures
//!
//! A storage failure (directory missing, entry that cannot be read at all)
//! fails the whole scan. Nothing is partially returned. An entry that reads
//! fine but does not decode is a rejection, not a failure.

use crate::config::ContentConfig;
use crate::frontmatter::{self, FrontmatterError};
use crate::metadata;
use crate::store::ContentStore;
use crate::types::ProjectRecord;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error reading {entry}: {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why an entry was left out of the index.
#[derive(Debug)]
pub enum RejectReason {
    /// Entry bytes are not valid UTF-8.
    InvalidEncoding(std::str::Utf8Error),
    /// Whole entry wrapped in an HTML comment.
    CommentedOut,
    /// Header could not be split or parsed.
    Malformed(FrontmatterError),
    /// A required header field is absent or blank.
    MissingField(&'static str),
    /// Raw text contains a hidden-marker phrase.
    HiddenMarker(String),
}

impl RejectReason {
    /// Hidden entries are deliberate; everything else is an authoring mistake.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::CommentedOut | Self::HiddenMarker(_))
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding(e) => write!(f, "not valid UTF-8: {e}"),
            Self::CommentedOut => write!(f, "commented out"),
            Self::Malformed(e) => write!(f, "malformed frontmatter: {e}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::HiddenMarker(m) => write!(f, "contains hidden marker {m:?}"),
        }
    }
}

/// An entry that did not make it into the index.
#[derive(Debug)]
pub struct Rejection {
    /// Storage entry name (file name for directory stores).
    pub entry: String,
    pub reason: RejectReason,
}

/// Result of a scan: the valid records plus a side log of rejections.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Valid records in storage enumeration order.
    pub records: Vec<ProjectRecord>,
    pub rejected: Vec<Rejection>,
}

impl ScanReport {
    /// Ids declared by more than one record.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for record in &self.records {
            if !seen.insert(record.id.as_str()) && !dupes.contains(&record.id.as_str()) {
                dupes.push(record.id.as_str());
            }
        }
        dupes
    }
}

/// Load every entry from `store`.
pub fn scan(store: &dyn ContentStore, config: &ContentConfig) -> Result<ScanReport, ScanError> {
    let names = store.list_entries().map_err(|source| ScanError::Io {
        entry: "<listing>".to_string(),
        source,
    })?;

    let mut report = ScanReport::default();
    for name in names {
        let raw = store.read_entry(&name).map_err(|source| ScanError::Io {
            entry: name.clone(),
            source,
        })?;
        let parsed = std::str::from_utf8(&raw)
            .map_err(RejectReason::InvalidEncoding)
            .and_then(|text| parse_entry(text, config));
        match parsed {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                if reason.is_hidden() {
                    debug!(entry = %name, %reason, "skipping hidden project");
                } else {
                    warn!(entry = %name, %reason, "skipping invalid project");
                }
                report.rejected.push(Rejection {
                    entry: name,
                    reason,
                });
            }
        }
    }

    for id in report.duplicate_ids() {
        warn!(%id, "duplicate project id; lookups return the first entry");
    }

    Ok(report)
}

/// Turn one raw entry into a record, or say why it was rejected.
pub fn parse_entry(raw: &str, config: &ContentConfig) -> Result<ProjectRecord, RejectReason> {
    if metadata::is_commented_out(raw) {
        return Err(RejectReason::CommentedOut);
    }

    let doc = frontmatter::split(raw).map_err(RejectReason::Malformed)?;
    let header = &doc.header;

    let id = frontmatter::string_field(header, "id").ok_or(RejectReason::MissingField("id"))?;
    let title =
        frontmatter::string_field(header, "title").ok_or(RejectReason::MissingField("title"))?;

    if let Some(marker) = metadata::find_hidden_marker(raw, &config.hidden_markers) {
        return Err(RejectReason::HiddenMarker(marker.to_string()));
    }

    let field = |key: &str| frontmatter::string_field(header, key).unwrap_or_default();
    let reading_time = metadata::reading_time(&doc.body, config.words_per_minute);

    Ok(ProjectRecord {
        slug: id.clone(),
        id,
        title,
        summary: field("summary"),
        category: field("category"),
        cover_image: field("coverImage"),
        date: frontmatter::string_field(header, "date"),
        tech_stack: frontmatter::list_field(header, "techStack"),
        featured: frontmatter::bool_field(header, "featured"),
        status: field("status"),
        content: doc.body,
        reading_time,
    })
}
