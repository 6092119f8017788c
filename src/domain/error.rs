//! 재조정(reconcile) 과정의 치명 오류 분류.
//! 호출자는 `anyhow::Error::downcast_ref`로 구분할 수 있다.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("either a pull request id or a source branch needs to be set")]
    MissingPullRequestSelector,
    #[error("could not find pull request ({selector})")]
    PullRequestNotFound { selector: String },
    #[error("expected a single active pull request for branch {branch}, found {count}")]
    AmbiguousPullRequest { branch: String, count: usize },
    #[error("legacy code reviews are not supported (pull request {pull_request_id})")]
    LegacyReviewUnsupported { pull_request_id: i64 },
    #[error("could not retrieve the iterations")]
    IterationsUnavailable,
    #[error("pull request has no recorded {which} commit")]
    MissingMergeCommit { which: &'static str },
    #[error("thread with id {id} not found")]
    ThreadNotFound { id: i64 },
    #[error("found {count} cached threads with id {id}")]
    DuplicateCachedThread { id: i64, count: usize },
}
