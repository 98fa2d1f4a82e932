use std::fmt;

/// Conventional commit type, in changelog rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
    Other,
}

impl CommitType {
    /// All types in the fixed order used for grouping
    pub const ALL: [CommitType; 9] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Chore,
        CommitType::Other,
    ];

    /// Map a subject's type token to a known type.
    ///
    /// Returns `None` for tokens outside the recognised set (e.g. "ci", "build").
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "feat" => Some(CommitType::Feat),
            "fix" => Some(CommitType::Fix),
            "docs" => Some(CommitType::Docs),
            "style" => Some(CommitType::Style),
            "refactor" => Some(CommitType::Refactor),
            "perf" => Some(CommitType::Perf),
            "test" => Some(CommitType::Test),
            "chore" => Some(CommitType::Chore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Other => "other",
        }
    }

    /// Human-readable section title for rendered changelogs
    pub fn title(&self) -> &'static str {
        match self {
            CommitType::Feat => "Features",
            CommitType::Fix => "Bug Fixes",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Styles",
            CommitType::Refactor => "Code Refactoring",
            CommitType::Perf => "Performance Improvements",
            CommitType::Test => "Tests",
            CommitType::Chore => "Chores",
            CommitType::Other => "Other Changes",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw commit as handed to the parser: subject line, free-form body and
/// the reference used for linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub sha: String,
    pub subject: String,
    pub body: String,
    pub url: Option<String>,
}

impl CommitMessage {
    pub fn new(sha: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        CommitMessage {
            sha: sha.into(),
            subject: subject.into(),
            body: body.into(),
            url: None,
        }
    }

    /// Split a full commit message into subject (first line) and body
    pub fn from_message(sha: impl Into<String>, message: &str) -> Self {
        let (subject, body) = match message.split_once('\n') {
            Some((subject, body)) => (subject, body.trim()),
            None => (message, ""),
        };
        CommitMessage::new(sha, subject.trim(), body)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One changelog line item produced from a commit or a squash body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    pub body_lines: Vec<String>,
    pub sha: String,
    pub url: Option<String>,
    /// `!` marker seen on the subject. Recorded only; bumps come from branch rules.
    pub breaking: bool,
}

impl CommitEntry {
    /// Abbreviated sha for display (first 7 characters)
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(7) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }
}
