//! Query operations over the loaded projects.
//!
//! A [`ContentIndex`] is built from one scan and answers every projects-API
//! query. All operations are pure: same records in, same answer out.
//!
//! ## Ordering
//!
//! The canonical order is newest first by sort date (see
//! [`metadata::sort_date`]), with equal dates keeping storage enumeration
//! order. Listing and navigation both use it.
//!
//! ## Related projects
//!
//! Candidates are every record except the target (and any record sharing its
//! slug). Each scores the number of distinct technologies it shares with the
//! target, by exact string match; repeated entries in either stack count once.
//! Ranking is score descending, then sort date descending, then enumeration
//! order. Category plays no part.

use crate::metadata;
use crate::types::{Navigation, ProjectRecord};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Projects from a single scan, ready to query.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    records: Vec<ProjectRecord>,
    /// Sort date per record, parallel to `records`.
    dates: Vec<NaiveDate>,
}

impl ContentIndex {
    /// Index `records` (in enumeration order), using `default_date` for any
    /// record without a usable date.
    pub fn new(records: Vec<ProjectRecord>, default_date: NaiveDate) -> Self {
        let dates = records
            .iter()
            .map(|r| metadata::sort_date(r.date.as_deref(), default_date))
            .collect();
        Self { records, dates }
    }

    /// Records in enumeration order.
    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Positions into `records`, newest first, stable on ties.
    fn newest_first(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by(|&a, &b| self.dates[b].cmp(&self.dates[a]));
        order
    }

    /// All projects, newest first.
    pub fn list_all(&self) -> Vec<&ProjectRecord> {
        self.newest_first()
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Featured projects, newest first.
    pub fn list_featured(&self) -> Vec<&ProjectRecord> {
        self.list_all().into_iter().filter(|r| r.featured).collect()
    }

    /// The first project (in enumeration order) with this slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.slug == slug)
    }

    /// Up to `limit` projects most similar to `slug`, most similar first.
    ///
    /// Returns `None` when `slug` does not exist.
    pub fn related(&self, slug: &str, limit: usize) -> Option<Vec<&ProjectRecord>> {
        let target = self.find_by_slug(slug)?;
        let target_stack: HashSet<&str> = target.tech_stack.iter().map(String::as_str).collect();

        let mut scored: Vec<(usize, usize)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.slug != slug)
            .map(|(i, r)| (i, shared_tech_count(&target_stack, &r.tech_stack)))
            .collect();

        scored.sort_by(|&(a, score_a), &(b, score_b)| {
            score_b
                .cmp(&score_a)
                .then_with(|| self.dates[b].cmp(&self.dates[a]))
        });

        Some(
            scored
                .into_iter()
                .take(limit)
                .map(|(i, _)| &self.records[i])
                .collect(),
        )
    }

    /// Neighbors of `slug` in the newest-first order.
    ///
    /// `previous` is the newer neighbor, `next` the older one. Returns `None`
    /// when `slug` does not exist.
    pub fn navigation(&self, slug: &str) -> Option<Navigation<'_>> {
        let order = self.newest_first();
        let pos = order.iter().position(|&i| self.records[i].slug == slug)?;

        let previous = pos.checked_sub(1).map(|p| &self.records[order[p]]);
        let next = order.get(pos + 1).map(|&n| &self.records[n]);
        Some(Navigation { previous, next })
    }
}

/// Number of distinct technologies in `candidate` that appear in `target`.
fn shared_tech_count(target: &HashSet<&str>, candidate: &[String]) -> usize {
    candidate
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(target)
        .count()
}

/// The related-projects limit callers should use: the requested one when it
/// is positive, otherwise `default`.
pub fn effective_limit(requested: Option<usize>, default: usize) -> usize {
    requested.filter(|&n| n > 0).unwrap_or(default)
}
