use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use semantic_branch::analyzer::parse_commit_count;
use semantic_branch::changelog::ChangelogMode;
use semantic_branch::cli::orchestration::{
    self, ChangelogWorkflowArgs, VersionWorkflowArgs,
};
use semantic_branch::config;
use semantic_branch::domain::Mode;
use semantic_branch::git::{Git2Repository, Repository};
use semantic_branch::ui;

#[derive(Parser)]
#[command(
    name = "semantic-branch",
    version,
    about = "Branch-driven semantic versioning and conventional commit changelogs"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next version for a branch
    Version {
        #[arg(short, long, help = "Branch being built")]
        branch: String,

        #[arg(short, long, default_value = "release", help = "release or prerelease")]
        mode: String,

        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<String>,

        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Commits since the branch diverged (prerelease mode)"
        )]
        commit_count: Option<String>,

        #[arg(long, default_value = "origin/main", help = "Base revision for counting commits")]
        base: String,

        #[arg(long, help = "Do not write the new version to the manifest")]
        no_write: bool,

        #[arg(long, help = "Append version/deploy lines to this file")]
        github_output: Option<PathBuf>,
    },

    /// Render a changelog from conventional commits
    Changelog {
        #[arg(short, long, help = "pr or release")]
        mode: String,

        #[arg(short, long, help = "Branch the changelog is for")]
        branch: String,

        #[arg(long, default_value = "origin/main", help = "Base revision of the pull request")]
        base: String,

        #[arg(long = "version", help = "Version label for the heading")]
        release_version: Option<String>,

        #[arg(long, help = "Pull request number")]
        pr_number: Option<u64>,

        #[arg(long, help = "Repository web URL used to link commits")]
        repo_url: Option<String>,

        #[arg(short, long, help = "Write the rendered Markdown to this file")]
        output: Option<PathBuf>,

        #[arg(long, default_value = "CHANGELOG.md", help = "Changelog to prepend to in release mode")]
        changelog_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(e) = run(cli.command) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Version {
            branch,
            mode,
            config: config_path,
            commit_count,
            base,
            no_write,
            github_output,
        } => {
            let mode: Mode = mode.parse()?;
            let commit_count = commit_count.as_deref().map(parse_commit_count).transpose()?;
            let loaded = config::load_config(config_path.as_deref())?;

            let repo = match (mode, commit_count) {
                (Mode::Prerelease, None) => Some(
                    Git2Repository::open(".").context("Cannot count commits without a git repository")?,
                ),
                _ => None,
            };

            let args = VersionWorkflowArgs {
                branch,
                mode,
                commit_count,
                base,
                write_manifest: !no_write,
            };
            let outcome = orchestration::run_version_workflow(
                &args,
                &loaded,
                repo.as_ref().map(|r| r as &dyn Repository),
            )?;

            ui::display_match_summary(&args.branch, &outcome.matched);
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            if outcome.manifest_written {
                if let Some(path) = &loaded.path {
                    ui::display_success(&format!(
                        "Wrote version {} to {}",
                        outcome.version,
                        path.display()
                    ));
                }
            }

            let lines = ui::format_outputs(&outcome.version, outcome.deploy);
            if let Some(path) = github_output {
                orchestration::append_outputs(&path, &lines)?;
            }
            print!("{}", lines);
        }
        Command::Changelog {
            mode,
            branch,
            base,
            release_version,
            pr_number,
            repo_url,
            output,
            changelog_file,
        } => {
            let mode: ChangelogMode = mode.parse()?;
            let repo = Git2Repository::open(".").context("Failed to open git repository")?;

            let args = ChangelogWorkflowArgs {
                mode,
                branch,
                base,
                version: release_version,
                pr_number,
                repo_url: repo_url.or_else(repo_url_from_env),
                output,
                changelog_file: Some(changelog_file),
            };
            ui::display_status(&format!("Building {} changelog for {}", args.mode, args.branch));
            let outcome = orchestration::run_changelog_workflow(&args, &repo)?;

            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            print!("{}", outcome.markdown);
        }
    }
    Ok(())
}

fn repo_url_from_env() -> Option<String> {
    let server = std::env::var("GITHUB_SERVER_URL").ok()?;
    let repository = std::env::var("GITHUB_REPOSITORY").ok()?;
    Some(format!("{}/{}", server.trim_end_matches('/'), repository))
}
