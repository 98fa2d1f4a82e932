//! Markdown rendering of a [`ChangelogDocument`].
//!
//! Pure: the same document and context always give the same text, which
//! lets a CI job update an existing PR comment in place.

use super::{ChangelogDocument, ScopeGroup, TypeGroup};
use crate::domain::CommitEntry;
use crate::error::{Result, SemanticBranchError};
use std::fmt;
use std::str::FromStr;

/// Version label used for changes not yet released
pub const UNRELEASED: &str = "UNRELEASED";

const NO_SCOPE: &str = "(no scope)";

/// Source of the changelog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogMode {
    /// One entry per commit of a pull request branch
    Pr,
    /// Entries recovered from a squash commit body
    Release,
}

impl FromStr for ChangelogMode {
    type Err = SemanticBranchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pr" => Ok(ChangelogMode::Pr),
            "release" => Ok(ChangelogMode::Release),
            other => Err(SemanticBranchError::input(format!(
                "Unknown changelog mode '{}': expected 'pr' or 'release'",
                other
            ))),
        }
    }
}

impl fmt::Display for ChangelogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangelogMode::Pr => write!(f, "pr"),
            ChangelogMode::Release => write!(f, "release"),
        }
    }
}

/// The squash commit a release changelog was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashInfo {
    pub sha: String,
    pub url: Option<String>,
}

/// Metadata rendered around the grouped entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub version: Option<String>,
    pub branch: String,
    pub mode: ChangelogMode,
    pub squash: Option<SquashInfo>,
    pub pr_number: Option<u64>,
}

impl RenderContext {
    pub fn is_unreleased(&self) -> bool {
        self.version
            .as_deref()
            .map_or(true, |v| v.trim().eq_ignore_ascii_case(UNRELEASED))
    }

    fn heading(&self) -> String {
        match (self.mode, self.is_unreleased()) {
            (ChangelogMode::Pr, true) => {
                format!("Changelog preview for {} ({})", self.branch, UNRELEASED)
            }
            (_, true) => UNRELEASED.to_string(),
            (_, false) => self.version.as_deref().unwrap_or(UNRELEASED).trim().to_string(),
        }
    }
}

/// Render the document as Markdown, terminated by a single newline
pub fn render(document: &ChangelogDocument, context: &RenderContext) -> String {
    let mut lines = vec![format!("## {}", context.heading()), String::new()];

    if context.mode == ChangelogMode::Release {
        if let Some(reference) = release_reference(context) {
            lines.push(reference);
            lines.push(String::new());
        }
    }

    if document.is_empty() {
        lines.push("_No changes._".to_string());
        lines.push(String::new());
    }

    for group in &document.groups {
        render_group(group, &mut lines);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n") + "\n"
}

fn release_reference(context: &RenderContext) -> Option<String> {
    let squash = context.squash.as_ref().map(|s| {
        let short = short(&s.sha);
        match &s.url {
            Some(url) => format!("Squash commit [{}]({})", short, url),
            None => format!("Squash commit {}", short),
        }
    });
    let pr = context.pr_number.map(|n| format!("PR #{}", n));

    match (squash, pr) {
        (Some(s), Some(p)) => Some(format!("{} ({})", s, p)),
        (Some(s), None) => Some(s),
        (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

fn render_group(group: &TypeGroup, lines: &mut Vec<String>) {
    lines.push(format!("### {}", group.commit_type.title()));
    lines.push(String::new());
    for scope in &group.scopes {
        render_scope(scope, lines);
    }
}

fn render_scope(scope: &ScopeGroup, lines: &mut Vec<String>) {
    lines.push(format!("#### {}", scope.scope.as_deref().unwrap_or(NO_SCOPE)));
    lines.push(String::new());
    for entry in &scope.entries {
        lines.push(entry_line(entry));
        lines.extend(entry.body_lines.iter().map(|line| format!("  - {}", line)));
    }
    lines.push(String::new());
}

fn entry_line(entry: &CommitEntry) -> String {
    let marker = if entry.breaking { "**BREAKING** " } else { "" };
    let reference = match (&entry.url, entry.sha.is_empty()) {
        (_, true) => String::new(),
        (Some(url), false) => format!(" ([{}]({}))", entry.short_sha(), url),
        (None, false) => format!(" ({})", entry.short_sha()),
    };
    format!("- {}{}{}", marker, entry.description, reference)
}

fn short(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}
