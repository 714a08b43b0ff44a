//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, record/entry builders, and lookup helpers that
//! panic with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = scan(&DirStore::new(tmp.path()), &ContentConfig::default()).unwrap();
//! let ocr = find_record(&report.records, "receipt-ocr");
//! assert!(ocr.featured);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::ProjectRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/projects/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/projects");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Builders
// =========================================================================

/// Raw entry text for a minimal valid project.
pub fn project(id: &str, date: &str, tech: &[&str]) -> String {
    format!(
        "---\nid: {id}\ntitle: Project {id}\ndate: {date}\ntechStack: [{}]\n---\nAbout {id}.\n",
        tech.join(", ")
    )
}

/// A record built directly, bypassing the loader.
pub fn record(slug: &str, date: Option<&str>, tech: &[&str]) -> ProjectRecord {
    ProjectRecord {
        id: slug.to_string(),
        slug: slug.to_string(),
        title: format!("Project {slug}"),
        summary: format!("Summary of {slug}"),
        category: String::new(),
        cover_image: String::new(),
        date: date.map(str::to_string),
        tech_stack: tech.iter().map(|t| t.to_string()).collect(),
        featured: false,
        status: String::new(),
        content: String::new(),
        reading_time: 0,
    }
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find a record by slug. Panics if not found.
pub fn find_record<'a>(records: &'a [ProjectRecord], slug: &str) -> &'a ProjectRecord {
    records.iter().find(|r| r.slug == slug).unwrap_or_else(|| {
        let slugs = record_slugs(records);
        panic!("project '{slug}' not found. Available: {slugs:?}")
    })
}

/// All slugs in the given order.
pub fn record_slugs(records: &[ProjectRecord]) -> Vec<&str> {
    records.iter().map(|r| r.slug.as_str()).collect()
}
