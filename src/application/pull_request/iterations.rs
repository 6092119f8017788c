//! 최신 iteration 해석과 파일별 change tracking id 상관관계.

use anyhow::{Context, Result};
use tracing::{debug, error};

use super::PullRequestSystem;
use crate::domain::error::ReconcileError;
use crate::domain::review::ChangeEntry;

impl PullRequestSystem {
    /// iteration 중 최대 id를 반환한다. id가 없는 항목은 -1로 취급한다.
    pub async fn latest_iteration_id(&self) -> Result<i32> {
        let iterations = self
            .gateway
            .list_iterations(&self.pull_request.repository_id, self.pull_request.id)
            .await
            .context("failed to list pull request iterations")?
            .ok_or(ReconcileError::IterationsUnavailable)?;

        let iteration_id = iterations
            .iter()
            .map(|i| i.id.unwrap_or(-1))
            .max()
            .unwrap_or(-1);

        debug!(iteration_id, "determined iteration id");
        Ok(iteration_id)
    }

    /// iteration 하나의 전체 change 항목을 조회한다.
    pub async fn iteration_changes(&self, iteration_id: i32) -> Result<Vec<ChangeEntry>> {
        let changes = self
            .gateway
            .list_iteration_changes(
                &self.pull_request.repository_id,
                self.pull_request.id,
                iteration_id,
            )
            .await
            .with_context(|| format!("failed to list changes of iteration {iteration_id}"))?;

        debug!(iteration_id, count = changes.len(), "fetched iteration changes");
        Ok(changes)
    }

    /// 지정 iteration에서 파일의 change tracking id를 조회한다.
    pub async fn change_tracking_id(&self, iteration_id: i32, path: &str) -> Result<Option<i32>> {
        let changes = self.iteration_changes(iteration_id).await?;
        Ok(find_change_tracking_id(&changes, path))
    }
}

/// 경로가 정확히 일치하는 항목이 하나일 때만 id를 반환한다(정규화 없음, 대소문자 구분).
pub fn find_change_tracking_id(changes: &[ChangeEntry], path: &str) -> Option<i32> {
    let mut matches = changes.iter().filter(|c| c.path == path);

    match (matches.next(), matches.next()) {
        (Some(entry), None) => {
            debug!(
                change_tracking_id = entry.change_tracking_id,
                path, "determined change tracking id"
            );
            Some(entry.change_tracking_id)
        }
        (None, _) => {
            error!(path, "cannot post a comment for the file because no changes could be found");
            None
        }
        (Some(_), Some(_)) => {
            error!(path, "cannot post a comment for the file because its change is ambiguous");
            None
        }
    }
}
