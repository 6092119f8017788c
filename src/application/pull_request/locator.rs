//! 대상 PR 해석(id 우선, 없으면 소스 브랜치의 최근 active PR).

use anyhow::{Context, Result};

use crate::application::ports::ReviewGateway;
use crate::domain::error::ReconcileError;
use crate::domain::review::{PullRequest, TargetOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestSelector {
    Id(i64),
    SourceBranch(String),
}

impl PullRequestSelector {
    /// id와 브랜치 중 하나가 필요하다. 둘 다 있으면 id를 사용한다.
    pub fn from_options(options: &TargetOptions) -> Result<Self> {
        if let Some(id) = options.pull_request_id {
            return Ok(Self::Id(id));
        }

        match options
            .source_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
        {
            Some(branch) => Ok(Self::SourceBranch(branch.to_string())),
            None => Err(ReconcileError::MissingPullRequestSelector.into()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Id(id) => format!("id {id}"),
            Self::SourceBranch(branch) => format!("branch {branch}"),
        }
    }
}

pub async fn resolve_pull_request(
    gateway: &dyn ReviewGateway,
    selector: &PullRequestSelector,
) -> Result<PullRequest> {
    let found = match selector {
        PullRequestSelector::Id(id) => gateway
            .get_pull_request(*id)
            .await
            .with_context(|| format!("failed to read pull request {id}"))?,
        PullRequestSelector::SourceBranch(branch) => {
            let mut candidates = gateway
                .find_active_pull_requests(branch)
                .await
                .with_context(|| format!("failed to search pull requests for {branch}"))?;
            if candidates.len() > 1 {
                return Err(ReconcileError::AmbiguousPullRequest {
                    branch: branch.clone(),
                    count: candidates.len(),
                }
                .into());
            }
            candidates.pop()
        }
    };

    found.ok_or_else(|| {
        ReconcileError::PullRequestNotFound {
            selector: selector.describe(),
        }
        .into()
    })
}
