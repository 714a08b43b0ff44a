//! CLI output formatting.
//!
//! Output is **project-centric**: each project gets a header line with its
//! positional index, title and date, then indented context lines (slug,
//! category, stack). Rejected entries are listed by file name with the reason.
//!
//! ```text
//! Projects
//! 001 Receipt OCR (2024-05-20) ★
//!     Slug: receipt-ocr
//!     Category: Computer Vision · Completed
//!     Stack: Python, PyTorch, FastAPI
//!     Reading time: 2 min
//!
//! Rejected
//!     commented-draft.md: commented out
//!     untitled.md: missing required field `title`
//! ```
//!
//! Each view has a `format_*` function returning `Vec<String>`; the binary
//! hands the lines to [`print_lines`]. Format functions do no I/O.

use crate::scan::ScanReport;
use crate::types::{Navigation, ProjectRecord};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line for a project: index, title, authored date, featured star.
fn project_header(index: usize, project: &ProjectRecord) -> String {
    let mut line = format!("{} {}", format_index(index), project.title);
    if let Some(date) = &project.date {
        line.push_str(&format!(" ({date})"));
    }
    if project.featured {
        line.push_str(" ★");
    }
    line
}

/// Indented context lines for a project. Empty fields are skipped.
fn project_details(project: &ProjectRecord) -> Vec<String> {
    let mut lines = vec![format!("{}Slug: {}", indent(1), project.slug)];

    let kind: Vec<&str> = [project.category.as_str(), project.status.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !kind.is_empty() {
        lines.push(format!("{}Category: {}", indent(1), kind.join(" · ")));
    }
    if !project.tech_stack.is_empty() {
        lines.push(format!(
            "{}Stack: {}",
            indent(1),
            project.tech_stack.join(", ")
        ));
    }
    if project.reading_time > 0 {
        lines.push(format!(
            "{}Reading time: {} min",
            indent(1),
            project.reading_time
        ));
    }
    lines
}

/// A numbered list of projects with details.
pub fn format_project_list(projects: &[&ProjectRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, project) in projects.iter().enumerate() {
        lines.push(project_header(i + 1, project));
        lines.extend(project_details(project));
    }
    if lines.is_empty() {
        lines.push("(no projects)".to_string());
    }
    lines
}

/// One project in full, with its summary and cover image.
pub fn format_project(project: &ProjectRecord) -> Vec<String> {
    let mut lines = vec![project_header(1, project)];
    lines.extend(project_details(project));
    if !project.summary.is_empty() {
        lines.push(format!("{}Summary: {}", indent(1), project.summary));
    }
    if !project.cover_image.is_empty() {
        lines.push(format!("{}Cover: {}", indent(1), project.cover_image));
    }
    lines
}

/// Previous/next neighbors of a project.
pub fn format_navigation(nav: &Navigation<'_>) -> Vec<String> {
    let describe = |p: Option<&ProjectRecord>| match p {
        Some(p) => format!("{} ({})", p.title, p.slug),
        None => "(none)".to_string(),
    };
    vec![
        format!("Previous: {}", describe(nav.previous)),
        format!("Next: {}", describe(nav.next)),
    ]
}

/// Inventory of a scan: valid projects, then rejected entries.
pub fn format_scan_report(report: &ScanReport) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];
    let projects: Vec<&ProjectRecord> = report.records.iter().collect();
    lines.extend(format_project_list(&projects));

    if !report.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected".to_string());
        for rejection in &report.rejected {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                rejection.entry,
                rejection.reason
            ));
        }
    }

    let dupes = report.duplicate_ids();
    if !dupes.is_empty() {
        lines.push(String::new());
        lines.push("Duplicate ids".to_string());
        for id in dupes {
            lines.push(format!("{}{id}", indent(1)));
        }
    }

    let hidden = report
        .rejected
        .iter()
        .filter(|r| r.reason.is_hidden())
        .count();
    lines.push(String::new());
    lines.push(format!(
        "{} projects, {} hidden, {} invalid",
        report.records.len(),
        hidden,
        report.rejected.len() - hidden
    ));
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
