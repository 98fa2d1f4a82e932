use crate::config::SemanticBranchConfig;
use crate::domain::{MatchResult, Mode, VersionBump};
use crate::error::{Result, SemanticBranchError};
use log::debug;
use regex::Regex;
use std::fmt;

/// Rule categories of the branch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Release,
    Prerelease,
    Patch,
    Minor,
    Major,
    PrereleaseIgnore,
    ReleaseIgnore,
}

impl RuleCategory {
    /// Bump categories, highest precedence first
    const BUMPS: [(RuleCategory, VersionBump); 3] = [
        (RuleCategory::Major, VersionBump::Major),
        (RuleCategory::Minor, VersionBump::Minor),
        (RuleCategory::Patch, VersionBump::Patch),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Release => "release",
            RuleCategory::Prerelease => "prerelease",
            RuleCategory::Patch => "patch",
            RuleCategory::Minor => "minor",
            RuleCategory::Major => "major",
            RuleCategory::PrereleaseIgnore => "prerelease-ignore",
            RuleCategory::ReleaseIgnore => "release-ignore",
        }
    }

    /// Ignore category consulted in the given mode
    fn ignore_for(mode: Mode) -> Self {
        match mode {
            Mode::Release => RuleCategory::ReleaseIgnore,
            Mode::Prerelease => RuleCategory::PrereleaseIgnore,
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiled branch rules: an ordered table of (category, patterns).
///
/// Every pattern is anchored so it must match the whole branch name.
#[derive(Debug, Clone)]
pub struct BranchRuleSet {
    rules: Vec<(RuleCategory, Vec<Regex>)>,
}

impl BranchRuleSet {
    /// Compile all patterns, failing on the first invalid one
    pub fn compile(config: &SemanticBranchConfig) -> Result<Self> {
        let table = [
            (RuleCategory::ReleaseIgnore, &config.release_ignore),
            (RuleCategory::PrereleaseIgnore, &config.prerelease_ignore),
            (RuleCategory::Release, &config.release),
            (RuleCategory::Prerelease, &config.prerelease),
            (RuleCategory::Major, &config.major),
            (RuleCategory::Minor, &config.minor),
            (RuleCategory::Patch, &config.patch),
        ];

        let rules = table
            .into_iter()
            .map(|(category, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|pattern| compile_anchored(category, pattern))
                    .collect::<Result<Vec<_>>>()?;
                Ok((category, compiled))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BranchRuleSet { rules })
    }

    fn patterns(&self, category: RuleCategory) -> &[Regex] {
        self.rules
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, patterns)| patterns.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any pattern of the category matches the full branch name
    pub fn matches(&self, category: RuleCategory, branch: &str) -> bool {
        self.patterns(category).iter().any(|re| re.is_match(branch))
    }
}

/// The pattern must be a valid regex on its own before it is wrapped, so an
/// unbalanced group cannot escape the anchors.
fn compile_anchored(category: RuleCategory, pattern: &str) -> Result<Regex> {
    let invalid = |source| SemanticBranchError::Pattern {
        category: category.to_string(),
        pattern: pattern.to_string(),
        source,
    };
    Regex::new(pattern).map_err(invalid)?;
    Regex::new(&format!("^(?:{})$", pattern)).map_err(invalid)
}

/// Evaluates branch names against a compiled rule set
pub struct RuleMatcher<'a> {
    rules: &'a BranchRuleSet,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(rules: &'a BranchRuleSet) -> Self {
        RuleMatcher { rules }
    }

    /// Decide bump class, eligibility and ignore status for a branch.
    ///
    /// The ignore category of the current mode short-circuits the bump to
    /// `none`; release/prerelease eligibility is still reported.
    pub fn evaluate(&self, branch: &str, mode: Mode) -> MatchResult {
        let is_release_branch = self.rules.matches(RuleCategory::Release, branch);
        let is_prerelease_branch = self.rules.matches(RuleCategory::Prerelease, branch);

        let ignore = RuleCategory::ignore_for(mode);
        if self.rules.matches(ignore, branch) {
            debug!("branch '{}' matched {} rules", branch, ignore);
            return MatchResult {
                bump: VersionBump::None,
                is_release_branch,
                is_prerelease_branch,
                ignored: true,
            };
        }

        let bump = RuleCategory::BUMPS
            .iter()
            .find(|(category, _)| self.rules.matches(*category, branch))
            .map(|(_, bump)| *bump)
            .unwrap_or_default();

        debug!(
            "branch '{}' ({} mode): bump={}, release={}, prerelease={}",
            branch, mode, bump, is_release_branch, is_prerelease_branch
        );

        MatchResult {
            bump,
            is_release_branch,
            is_prerelease_branch,
            ignored: false,
        }
    }
}
