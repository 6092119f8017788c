//! 리뷰(Pull Request) 도메인 엔티티/값 객체.

/// 호스팅 서비스에서 조회한 Pull Request 스냅샷.
/// 시스템 생성 시 한 번 해석되며 이후 변경되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: i64,
    pub repository_id: String,
    pub repository_name: String,
    pub source_ref_name: String,
    pub last_merge_source_commit: Option<String>,
    pub last_merge_target_commit: Option<String>,
    /// code-flow 리뷰 ID. 0 이하면 legacy 리뷰.
    pub code_review_id: i64,
}

impl PullRequest {
    /// code-flow 위치 지정(iteration/change tracking) 지원 여부.
    pub fn supports_code_flow(&self) -> bool {
        self.code_review_id > 0
    }
}

/// PR iteration 요약. 서비스가 id를 생략할 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    pub id: Option<i32>,
}

/// iteration 하나에 속한 파일 변경 항목.
/// change tracking id는 해당 iteration 안에서만 유효하다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub path: String,
    pub change_tracking_id: i32,
}

/// 커밋 diff 결과의 개별 항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitChange {
    pub path: String,
    pub is_folder: bool,
}

/// 대상 PR 선택 입력(CLI/설정에서 전달).
#[derive(Debug, Clone, Default)]
pub struct TargetOptions {
    pub repository_url: Option<String>,
    pub pull_request_id: Option<i64>,
    pub source_branch: Option<String>,
}

/// 동기화 실행 옵션.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub target: TargetOptions,
    pub issues_path: Option<String>,
    pub comment_source: Option<String>,
    pub dry_run: bool,
}

/// 활성 스레드 조회 옵션.
#[derive(Debug, Clone, Default)]
pub struct ThreadQueryOptions {
    pub target: TargetOptions,
    pub comment_source: Option<String>,
}

/// 동기화 1회 실행 결과 집계.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub issues_read: usize,
    pub issues_in_diff: usize,
    pub already_reported: usize,
    pub posted: usize,
    pub resolved: usize,
}
