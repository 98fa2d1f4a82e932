//! Conventional commit parsing.
//!
//! Turns raw commit messages into [`CommitEntry`] records. Two shapes of input
//! are handled:
//! - one commit per entry (pull request history), see [`CommitParser::parse_commits`]
//! - a squash commit whose body lists many logical commits, see
//!   [`CommitParser::parse_squash`]
//!
//! Nothing here fails: subjects outside the grammar become `other` entries.

use crate::domain::{CommitEntry, CommitMessage, CommitType};
use log::debug;
use regex::Regex;

const SUBJECT_GRAMMAR: &str =
    r"^(?P<type>[a-z]+)(\((?P<scope>[^)]+)\))?(?P<breaking>!)?:\s*(?P<description>.+)$";

const WIP_MARKER: &str = "wip:";

/// Subject split into its conventional parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubject {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    pub breaking: bool,
}

/// Parser for commit subjects and squash bodies.
///
/// Holds the compiled subject grammar; build one per run.
#[derive(Debug, Clone)]
pub struct CommitParser {
    subject: Regex,
}

impl Default for CommitParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitParser {
    pub fn new() -> Self {
        CommitParser {
            subject: Regex::new(SUBJECT_GRAMMAR).expect("subject grammar is a valid regex"),
        }
    }

    /// Whether a subject carries the `WIP:` marker
    pub fn is_wip(subject: &str) -> bool {
        subject
            .trim_start()
            .get(..WIP_MARKER.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(WIP_MARKER))
    }

    /// Whether a line matches `type(scope)!: description`
    pub fn matches_grammar(&self, line: &str) -> bool {
        self.subject.is_match(line.trim())
    }

    /// Classify a subject line.
    ///
    /// Unknown type tokens (e.g. `ci:`) and non-conventional text both map to
    /// [`CommitType::Other`] with the full subject kept as description.
    pub fn parse_subject(&self, subject: &str) -> ParsedSubject {
        let subject = subject.trim();

        if let Some(captures) = self.subject.captures(subject) {
            let token = captures.name("type").map(|m| m.as_str()).unwrap_or_default();
            let description = captures
                .name("description")
                .map(|m| m.as_str().trim())
                .unwrap_or_default();

            if let (Some(commit_type), false) = (CommitType::from_token(token), description.is_empty())
            {
                return ParsedSubject {
                    commit_type,
                    scope: captures.name("scope").map(|m| m.as_str().trim().to_string()),
                    description: description.to_string(),
                    breaking: captures.name("breaking").is_some(),
                };
            }
        }

        ParsedSubject {
            commit_type: CommitType::Other,
            scope: None,
            description: subject.to_string(),
            breaking: false,
        }
    }

    /// Parse one commit (pull request mode). `WIP:` commits yield `None`.
    pub fn parse_commit(&self, commit: &CommitMessage) -> Option<CommitEntry> {
        if Self::is_wip(&commit.subject) {
            debug!("skipping WIP commit {}", commit.sha);
            return None;
        }

        let body_lines = commit
            .body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_note_marker(line).to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Some(self.entry(&commit.subject, body_lines, commit))
    }

    /// Parse a sequence of commits, preserving order
    pub fn parse_commits(&self, commits: &[CommitMessage]) -> Vec<CommitEntry> {
        let entries: Vec<CommitEntry> = commits.iter().filter_map(|c| self.parse_commit(c)).collect();
        debug!("parsed {} entries from {} commits", entries.len(), commits.len());
        entries
    }

    /// Recover the logical commits listed in a squash commit body.
    ///
    /// Line rules, applied to trimmed lines:
    /// - blank lines are separators
    /// - `*`/`**` bullets, and lines matching the grammar (optionally behind a
    ///   `-`), start a new entry
    /// - any other line is a note appended to the current entry, minus a
    ///   leading `-`
    ///
    /// A body without entry lines yields one `other` entry carrying the squash
    /// subject.
    pub fn parse_squash(&self, squash: &CommitMessage) -> Vec<CommitEntry> {
        let mut entries = self.parse_squash_body(squash);
        if entries.is_empty() {
            debug!("squash body of {} has no entries, using its subject", squash.sha);
            entries.push(CommitEntry {
                commit_type: CommitType::Other,
                scope: None,
                description: squash.subject.trim().to_string(),
                body_lines: Vec::new(),
                sha: squash.sha.clone(),
                url: squash.url.clone(),
                breaking: false,
            });
        }
        entries
    }

    /// Entries listed in a squash body, without the subject fallback
    pub fn parse_squash_body(&self, squash: &CommitMessage) -> Vec<CommitEntry> {
        let mut entries = Vec::new();
        let mut current: Option<CommitEntry> = None;
        // Notes following a WIP entry belong to it and are dropped with it.
        let mut skipping = false;

        for line in squash.body.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            let subject = if line.starts_with('*') {
                Some(line.trim_start_matches('*').trim_start())
            } else if self.matches_grammar(line) {
                Some(line)
            } else {
                line.strip_prefix('-')
                    .map(str::trim_start)
                    .filter(|rest| self.matches_grammar(rest))
            };

            match subject {
                Some(subject) => {
                    entries.extend(current.take());
                    skipping = Self::is_wip(subject) || subject.is_empty();
                    if !skipping {
                        current = Some(self.entry(subject, Vec::new(), squash));
                    }
                }
                None if skipping => {}
                None => {
                    let note = strip_note_marker(line);
                    match current.as_mut() {
                        Some(entry) if !note.is_empty() => entry.body_lines.push(note.to_string()),
                        Some(_) => {}
                        None => debug!("dropping squash note before first entry: {}", note),
                    }
                }
            }
        }
        entries.extend(current);
        entries
    }

    fn entry(&self, subject: &str, body_lines: Vec<String>, origin: &CommitMessage) -> CommitEntry {
        let parsed = self.parse_subject(subject);
        CommitEntry {
            commit_type: parsed.commit_type,
            scope: parsed.scope,
            description: parsed.description,
            body_lines,
            sha: origin.sha.clone(),
            url: origin.url.clone(),
            breaking: parsed.breaking,
        }
    }
}

fn strip_note_marker(line: &str) -> &str {
    line.strip_prefix('-').map(str::trim_start).unwrap_or(line)
}

/// Parse pull request commits with a fresh parser
pub fn parse_commits(commits: &[CommitMessage]) -> Vec<CommitEntry> {
    CommitParser::new().parse_commits(commits)
}

/// Parse a squash commit body with a fresh parser
pub fn parse_squash(squash: &CommitMessage) -> Vec<CommitEntry> {
    CommitParser::new().parse_squash(squash)
}
