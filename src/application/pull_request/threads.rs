//! 스레드 재조정: 활성 스레드 조회, 신규 게시, 해결(Fixed) 처리.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{PullRequestSystem, find_change_tracking_id};
use crate::domain::error::ReconcileError;
use crate::domain::issue::Issue;
use crate::domain::policy::{build_issue_thread, is_owned_active};
use crate::domain::thread::{DiscussionThread, NewThread, ThreadStatus};

impl PullRequestSystem {
    /// 소유 태그가 `comment_source`인 Active 스레드를 조회한다.
    /// 호출할 때마다 캐시를 새 세대로 교체한다.
    pub async fn fetch_active_threads(
        &mut self,
        comment_source: &str,
    ) -> Result<Vec<DiscussionThread>> {
        self.cached_threads.clear();

        let threads = self
            .gateway
            .list_threads(&self.pull_request.repository_id, self.pull_request.id)
            .await
            .context("failed to list discussion threads")?;

        self.cached_threads = threads
            .into_iter()
            .filter(|t| is_owned_active(t, comment_source))
            .collect();

        debug!(
            count = self.cached_threads.len(),
            "found discussion thread(s)"
        );
        Ok(self
            .cached_threads
            .iter()
            .map(|t| t.to_discussion_thread())
            .collect())
    }

    /// 위치를 해석할 수 있는 이슈마다 스레드를 하나씩 게시하고 게시 건수를 반환한다.
    pub async fn post_threads(&self, issues: &[Issue], comment_source: &str) -> Result<usize> {
        if !self.pull_request.supports_code_flow() {
            return Err(ReconcileError::LegacyReviewUnsupported {
                pull_request_id: self.pull_request.id,
            }
            .into());
        }

        let threads = self.build_threads(issues, comment_source).await?;
        if threads.is_empty() {
            debug!("no threads to post");
            return Ok(0);
        }

        // 실패 시 나머지 생성은 중단되고 오류가 그대로 전파된다.
        let mut posted = 0;
        for thread in &threads {
            self.gateway
                .create_thread(&self.pull_request.repository_id, self.pull_request.id, thread)
                .await
                .with_context(|| {
                    format!(
                        "failed to create discussion thread ({posted} of {} posted)",
                        threads.len()
                    )
                })?;
            posted += 1;
        }

        info!(posted, "posted discussion threads");
        Ok(posted)
    }

    /// 최근 조회 세대에 있던 스레드를 Fixed로 전환한다.
    pub async fn mark_thread_fixed(&self, thread: &DiscussionThread) -> Result<()> {
        let matches: Vec<_> = self
            .cached_threads
            .iter()
            .filter(|t| t.id == thread.id)
            .collect();

        let cached = match matches.as_slice() {
            [single] => *single,
            [] => return Err(ReconcileError::ThreadNotFound { id: thread.id }.into()),
            _ => {
                return Err(ReconcileError::DuplicateCachedThread {
                    id: thread.id,
                    count: matches.len(),
                }
                .into());
            }
        };

        self.gateway
            .update_thread_status(
                &self.pull_request.repository_id,
                self.pull_request.id,
                cached.id,
                ThreadStatus::Fixed,
            )
            .await
            .with_context(|| format!("failed to mark thread {} as fixed", cached.id))?;

        debug!(thread_id = cached.id, "marked thread as fixed");
        Ok(())
    }

    /// iteration 상태를 배치 전체에서 한 번만 해석해 스레드 페이로드를 구성한다.
    async fn build_threads(&self, issues: &[Issue], comment_source: &str) -> Result<Vec<NewThread>> {
        if issues.is_empty() {
            return Ok(Vec::new());
        }

        debug!("creating new discussion threads");
        let iteration_id = self.latest_iteration_id().await?;
        let changes = self.iteration_changes(iteration_id).await?;

        let mut threads = Vec::new();
        for issue in issues {
            info!(
                line = ?issue.line,
                file = %issue.file_path,
                "creating a discussion comment for the issue"
            );

            let Some(change_tracking_id) = find_change_tracking_id(&changes, &issue.file_path)
            else {
                continue;
            };

            threads.push(build_issue_thread(
                issue,
                iteration_id,
                change_tracking_id,
                comment_source,
            ));
        }

        Ok(threads)
    }
}
