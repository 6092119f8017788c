//! PR에서 수정된 파일 목록 계산.

use anyhow::{Context, Result};
use tracing::debug;

use super::PullRequestSystem;
use crate::domain::error::ReconcileError;
use crate::domain::policy::normalize_path;

impl PullRequestSystem {
    /// merge target 대비 merge source 커밋 diff에서 폴더를 제외한 파일 경로를 반환한다.
    pub async fn modified_files(&self) -> Result<Vec<String>> {
        let pr = &self.pull_request;
        let target = required_commit(pr.last_merge_source_commit.as_deref(), "merge source")?;
        let base = required_commit(pr.last_merge_target_commit.as_deref(), "merge target")?;

        debug!("computing the list of files changed in this pull request");
        let changes = self
            .gateway
            .diff_commits(base, target)
            .await
            .context("failed to fetch commit diff")?;

        let files: Vec<String> = changes
            .into_iter()
            .filter(|c| !c.is_folder)
            .map(|c| normalize_path(&c.path))
            .collect();

        debug!(count = files.len(), "found changed file(s) in the pull request");
        Ok(files)
    }
}

fn required_commit<'a>(commit: Option<&'a str>, which: &'static str) -> Result<&'a str> {
    commit
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ReconcileError::MissingMergeCommit { which }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pull_request::testing::{Call, FakeGateway, FakeState, pull_request};
    use crate::domain::review::CommitChange;

    fn change(path: &str, is_folder: bool) -> CommitChange {
        CommitChange {
            path: path.to_string(),
            is_folder,
        }
    }

    #[tokio::test]
    async fn returns_normalized_files_without_folders() {
        let gateway = FakeGateway::new(FakeState {
            commit_changes: vec![
                change("/src", true),
                change("/src/a.cs", false),
                change("/README.md", false),
            ],
            ..FakeState::default()
        });
        let system = PullRequestSystem::new(Box::new(gateway.clone()), pull_request(1, 1));

        let files = system.modified_files().await.unwrap();

        assert_eq!(files, vec!["src/a.cs".to_string(), "README.md".to_string()]);
        assert_eq!(
            gateway.calls(),
            vec![Call::DiffCommits {
                base: "target-sha".to_string(),
                target: "source-sha".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn empty_diff_is_not_an_error() {
        let gateway = FakeGateway::default();
        let system = PullRequestSystem::new(Box::new(gateway), pull_request(1, 1));

        assert!(system.modified_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_commit_fails_before_any_call() {
        let gateway = FakeGateway::default();
        let mut pr = pull_request(1, 1);
        pr.last_merge_target_commit = None;
        let system = PullRequestSystem::new(Box::new(gateway.clone()), pr);

        let err = system.modified_files().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconcileError>(),
            Some(ReconcileError::MissingMergeCommit { .. })
        ));
        assert!(gateway.calls().is_empty());
    }
}
