//! CLI 명령 파싱 모듈.

use clap::{Args, Parser, Subcommand};

use crate::domain::review::{SyncOptions, TargetOptions, ThreadQueryOptions};

#[derive(Debug, Parser)]
#[command(name = "prthreads")]
#[command(about = "Sync code-analysis issues with Azure DevOps pull request threads")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only print result lines, skip progress sections
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Repository URL (https://host/<collection>/<project>/_git/<repo>)
    #[arg(long)]
    repo: Option<String>,

    /// Pull request id
    #[arg(long, conflicts_with = "branch")]
    pr: Option<i64>,

    /// Source branch of an active pull request (e.g. refs/heads/feature)
    #[arg(long)]
    branch: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Post new issues as threads and resolve threads whose issue is gone
    Sync {
        #[command(flatten)]
        target: TargetArgs,

        /// JSON file with an array of issues
        #[arg(long)]
        issues: Option<String>,

        /// Comment source tag identifying threads owned by this run
        #[arg(long)]
        source: Option<String>,

        /// Report planned changes, do not post or resolve
        #[arg(long)]
        dry_run: bool,
    },
    /// List active threads owned by a comment source
    Threads {
        #[command(flatten)]
        target: TargetArgs,

        /// Comment source tag
        #[arg(long)]
        source: Option<String>,
    },
    /// List files modified by the pull request
    ChangedFiles {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show effective merged config and credential resolution
    Config,
}

pub enum CliAction {
    InspectConfig,
    Sync(SyncOptions),
    Threads(ThreadQueryOptions),
    ChangedFiles(TargetOptions),
}

pub struct ParsedCli {
    pub action: CliAction,
    pub quiet: bool,
}

impl TargetArgs {
    fn into_options(self) -> Result<TargetOptions, String> {
        if let Some(id) = self.pr
            && id <= 0
        {
            return Err(format!("--pr must be a positive id, got {id}"));
        }

        Ok(TargetOptions {
            repository_url: self.repo,
            pull_request_id: self.pr,
            source_branch: self.branch,
        })
    }
}

impl Cli {
    pub fn parse_action() -> Result<ParsedCli, String> {
        Cli::parse().into_action()
    }

    fn into_action(self) -> Result<ParsedCli, String> {
        let action = match self.command {
            Commands::Config => CliAction::InspectConfig,
            Commands::Sync {
                target,
                issues,
                source,
                dry_run,
            } => CliAction::Sync(SyncOptions {
                target: target.into_options()?,
                issues_path: issues,
                comment_source: source,
                dry_run,
            }),
            Commands::Threads { target, source } => CliAction::Threads(ThreadQueryOptions {
                target: target.into_options()?,
                comment_source: source,
            }),
            Commands::ChangedFiles { target } => CliAction::ChangedFiles(target.into_options()?),
        };

        Ok(ParsedCli {
            action,
            quiet: self.quiet,
        })
    }
}
