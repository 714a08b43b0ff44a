//! Content storage backends.
//!
//! The loader never touches the filesystem directly; it goes through a
//! [`ContentStore`], which only needs to enumerate entry names and read an
//! entry's raw bytes. Decoding is the loader's job, so a badly encoded entry
//! is rejected like any other malformed entry. Enumeration order matters: it is the final tie-break for
//! every ordering the query layer produces, so stores must enumerate
//! deterministically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A read-only source of raw project entries.
pub trait ContentStore: Send + Sync {
    /// Names of all entries, in a stable order.
    fn list_entries(&self) -> io::Result<Vec<String>>;

    /// Raw bytes of one entry.
    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Markdown files in a single directory on disk.
///
/// Only regular files with an `.md` extension are entries. Dotfiles are
/// skipped, as are names that are not valid UTF-8. Entries are enumerated
/// sorted by file name.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentStore for DirStore {
    fn list_entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(name = ?raw, "skipping entry with non-UTF-8 file name");
                    continue;
                }
            };
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            let is_markdown = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("md"))
                .unwrap_or(false);
            if is_markdown {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }
}

/// Entries held in memory, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A repeated name replaces the earlier bytes in place.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<Vec<u8>>) {
        let name = name.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = text,
            None => self.entries.push((name, text)),
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        self.insert(name, text);
        self
    }
}

impl ContentStore for MemoryStore {
    fn list_entries(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.iter().map(|(n, _)| n.clone()).collect())
    }

    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no entry {name}")))
    }
}
