//! Workflow orchestration
//!
//! Composes the pure engine with its collaborators (configuration, git
//! history, manifest and changelog files). Kept apart from `main.rs` so the
//! workflows can be driven programmatically, without clap, and tested against
//! a mock repository.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::analyzer::{BranchRuleSet, RuleMatcher, VersionCalculator};
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogDocument, ChangelogMode, RenderContext, SquashInfo};
use crate::config::LoadedConfig;
use crate::conventional::CommitParser;
use crate::domain::{MatchResult, Mode, Version, VersionBump};
use crate::error::Result;
use crate::git::{self, Repository};
use crate::manifest;

/// Arguments for the version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct VersionWorkflowArgs {
    /// Branch being built
    pub branch: String,

    /// Release or prerelease
    pub mode: Mode,

    /// Commits since divergence; computed from git when absent in prerelease mode
    pub commit_count: Option<u64>,

    /// Base revision used to count commits
    pub base: String,

    /// Persist the new version to the manifest (release mode, deploy only)
    pub write_manifest: bool,
}

/// Result of the version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct VersionOutcome {
    pub previous: Version,
    pub version: Version,
    pub deploy: bool,
    pub matched: MatchResult,
    pub manifest_written: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Compute the next version for a branch.
///
/// 1. Compile branch rules (invalid patterns fail here)
/// 2. Evaluate the branch
/// 3. Read the current version from the loaded manifest
/// 4. Resolve the commit count (prerelease mode)
/// 5. Calculate the version and deploy flag
/// 6. Write the manifest when releasing
pub fn run_version_workflow(
    args: &VersionWorkflowArgs,
    config: &LoadedConfig,
    repo: Option<&dyn Repository>,
) -> Result<VersionOutcome> {
    let rules = BranchRuleSet::compile(&config.rules)?;
    let matched = RuleMatcher::new(&rules).evaluate(&args.branch, args.mode);
    let previous = manifest::read_version(&config.document)?;

    let commit_count = match (args.mode, args.commit_count, repo) {
        (Mode::Prerelease, None, Some(repo)) => Some(git::count_since_base(repo, &args.base)?),
        (_, count, _) => count,
    };

    let calculation = VersionCalculator::calculate(&previous, &matched, args.mode, commit_count)?;

    let mut warnings = Vec::new();
    if !matched.ignored && matched.bump == VersionBump::None {
        warnings.push(BoundaryWarning::NoBumpRule {
            branch: args.branch.clone(),
        });
    }

    let manifest_written = match (&config.path, args.mode) {
        (Some(path), Mode::Release) if args.write_manifest && calculation.deploy => {
            manifest::write_version(path, &calculation.version)?;
            true
        }
        _ => false,
    };

    info!(
        "{} -> {} (mode={}, deploy={})",
        previous, calculation.version, args.mode, calculation.deploy
    );

    Ok(VersionOutcome {
        previous,
        version: calculation.version,
        deploy: calculation.deploy,
        matched,
        manifest_written,
        warnings,
    })
}

/// Arguments for the changelog workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogWorkflowArgs {
    pub mode: ChangelogMode,
    pub branch: String,

    /// Base revision the PR branch is compared against
    pub base: String,

    /// Version label; `None` or `UNRELEASED` renders a preview heading
    pub version: Option<String>,

    pub pr_number: Option<u64>,

    /// Repository web URL used to link commits
    pub repo_url: Option<String>,

    /// File receiving the rendered Markdown
    pub output: Option<PathBuf>,

    /// Changelog file to prepend to (release mode only)
    pub changelog_file: Option<PathBuf>,
}

/// Result of the changelog workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogOutcome {
    pub document: ChangelogDocument,
    pub markdown: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Build, render and store a changelog.
///
/// PR mode reads every commit since the branch left `base`; release mode reads
/// the squash commit at HEAD and recovers the commits listed in its body.
pub fn run_changelog_workflow(
    args: &ChangelogWorkflowArgs,
    repo: &dyn Repository,
) -> Result<ChangelogOutcome> {
    let parser = CommitParser::new();
    let repo_url = args.repo_url.as_deref();
    let mut warnings = Vec::new();

    let (entries, squash) = match args.mode {
        ChangelogMode::Pr => {
            let commits = git::commits_since_base(repo, &args.base)?;
            if commits.is_empty() {
                warnings.push(BoundaryWarning::NoCommits {
                    branch: args.branch.clone(),
                    base: args.base.clone(),
                });
            }
            let messages: Vec<_> = commits
                .iter()
                .map(|c| c.to_commit_message(repo_url))
                .collect();
            (parser.parse_commits(&messages), None)
        }
        ChangelogMode::Release => {
            let head = git::head_commit(repo)?.to_commit_message(repo_url);
            let mut entries = parser.parse_squash_body(&head);
            if entries.is_empty() {
                warnings.push(BoundaryWarning::EmptySquashBody {
                    sha: head.sha.clone(),
                });
                entries = parser.parse_squash(&head);
            }
            let squash = SquashInfo {
                sha: head.sha.clone(),
                url: head.url.clone(),
            };
            (entries, Some(squash))
        }
    };

    let document = changelog::aggregate(&entries);
    let context = RenderContext {
        version: args.version.clone(),
        branch: args.branch.clone(),
        mode: args.mode,
        squash,
        pr_number: args.pr_number,
    };
    let markdown = changelog::render(&document, &context);
    info!(
        "rendered {} changelog with {} entries",
        args.mode,
        document.entry_count()
    );

    if let Some(output) = &args.output {
        fs::write(output, &markdown)?;
    }
    if let (ChangelogMode::Release, Some(file)) = (args.mode, &args.changelog_file) {
        changelog::prepend_to_file(file, &markdown)?;
    }

    Ok(ChangelogOutcome {
        document,
        markdown,
        warnings,
    })
}

/// Append `key=value` lines to a GitHub Actions output file
pub fn append_outputs(path: &Path, lines: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(lines.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn config(text: &str) -> LoadedConfig {
        LoadedConfig::parse(text, None).unwrap()
    }

    const RULES: &str = r#"
[project]
version = "1.2.3"

[tool.semantic-branch]
release = ["main"]
prerelease = ["develop", "feature/.*"]
minor = ["feature/.*"]
patch = ["fix/.*"]
release-ignore = ["wip/.*"]
"#;

    fn version_args(branch: &str, mode: Mode, commit_count: Option<u64>) -> VersionWorkflowArgs {
        VersionWorkflowArgs {
            branch: branch.to_string(),
            mode,
            commit_count,
            base: "origin/main".to_string(),
            write_manifest: false,
        }
    }

    #[test]
    fn test_prerelease_counts_commits_from_repository() {
        let mut repo = MockRepository::new();
        let base = repo.push_commit("chore: init");
        repo.push_commit("feat: a");
        repo.push_commit("feat: b");
        repo.set_ref("origin/main", base);

        let outcome = run_version_workflow(
            &version_args("feature/x", Mode::Prerelease, None),
            &config(RULES),
            Some(&repo),
        )
        .unwrap();

        assert_eq!(outcome.version.to_string(), "1.3.0.dev2");
        assert!(outcome.deploy);
        assert!(!outcome.manifest_written);
    }

    #[test]
    fn test_prerelease_without_count_or_repository_fails() {
        let result = run_version_workflow(
            &version_args("feature/x", Mode::Prerelease, None),
            &config(RULES),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_release_without_bump_rule_warns() {
        let outcome = run_version_workflow(
            &version_args("main", Mode::Release, None),
            &config(RULES),
            None,
        )
        .unwrap();
        assert_eq!(outcome.version, Version::new(1, 2, 3));
        assert!(outcome.deploy);
        assert_eq!(
            outcome.warnings,
            vec![BoundaryWarning::NoBumpRule {
                branch: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_ignored_branch_has_no_bump_warning() {
        let outcome = run_version_workflow(
            &version_args("wip/experiment", Mode::Release, None),
            &config(RULES),
            None,
        )
        .unwrap();
        assert!(outcome.matched.ignored);
        assert!(outcome.warnings.is_empty());
        assert!(!outcome.deploy);
    }

    #[test]
    fn test_invalid_pattern_fails_before_matching() {
        let result = run_version_workflow(
            &version_args("main", Mode::Release, None),
            &config("[tool.semantic-branch]\nminor = [\"(\"]\n"),
            None,
        );
        assert!(result.is_err());
    }

    fn changelog_args(mode: ChangelogMode) -> ChangelogWorkflowArgs {
        ChangelogWorkflowArgs {
            mode,
            branch: "feature/login".to_string(),
            base: "origin/main".to_string(),
            version: None,
            pr_number: None,
            repo_url: None,
            output: None,
            changelog_file: None,
        }
    }

    #[test]
    fn test_pr_changelog_from_mock_history() {
        let mut repo = MockRepository::new();
        let base = repo.push_commit("chore: init");
        repo.push_commit("feat(auth): add login");
        repo.push_commit("WIP: scratch");
        repo.push_commit("fix: typo");
        repo.set_ref("origin/main", base);

        let outcome = run_changelog_workflow(&changelog_args(ChangelogMode::Pr), &repo).unwrap();

        assert_eq!(outcome.document.entry_count(), 2);
        assert!(!outcome.markdown.contains("scratch"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_pr_changelog_without_commits_warns() {
        let mut repo = MockRepository::new();
        let base = repo.push_commit("chore: init");
        repo.set_ref("origin/main", base);

        let outcome = run_changelog_workflow(&changelog_args(ChangelogMode::Pr), &repo).unwrap();

        assert!(outcome.document.is_empty());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [BoundaryWarning::NoCommits { .. }]
        ));
    }

    #[test]
    fn test_release_changelog_from_squash_commit() {
        let mut repo = MockRepository::new();
        repo.push_commit("chore: init");
        repo.push_commit(
            "Feature/login (#12)\n\n* feat(auth): add login\n  - oauth only\n* docs: update readme",
        );

        let mut args = changelog_args(ChangelogMode::Release);
        args.version = Some("1.3.0".to_string());
        args.pr_number = Some(12);
        let outcome = run_changelog_workflow(&args, &repo).unwrap();

        assert_eq!(outcome.document.entry_count(), 2);
        assert!(outcome.markdown.starts_with("## 1.3.0\n"));
        assert!(outcome.markdown.contains("(PR #12)"));
        assert!(outcome.markdown.contains("  - oauth only"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_release_changelog_empty_squash_warns() {
        let mut repo = MockRepository::new();
        repo.push_commit("Bump things (#3)");

        let outcome =
            run_changelog_workflow(&changelog_args(ChangelogMode::Release), &repo).unwrap();

        assert_eq!(outcome.document.entry_count(), 1);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [BoundaryWarning::EmptySquashBody { .. }]
        ));
    }
}
