//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, HostConfig};
use crate::domain::credentials::Credentials;
use crate::domain::issue::Issue;
use crate::domain::review::{ChangeEntry, CommitChange, Iteration, PullRequest};
use crate::domain::target::RepositoryTarget;
use crate::domain::thread::{NewThread, ThreadRecord, ThreadStatus};

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 저장소 URL을 도메인 대상 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn parse(&self, input: &str) -> Result<RepositoryTarget>;
}

/// 호스트 인증 정보 해석 결과.
#[derive(Debug, Clone)]
pub struct CredentialResolution {
    pub credentials: Option<Credentials>,
    pub source: Option<String>,
}

/// 호스트 설정(token/env/cmd)으로 런타임 인증 정보를 해석하는 포트.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, host: &str, host_cfg: Option<&HostConfig>) -> Result<CredentialResolution>;
}

/// 분석 이슈 입력을 읽는 포트.
pub trait IssueReader: Send + Sync {
    fn read(&self, path: &str) -> Result<Vec<Issue>>;
}

/// 리뷰 호스팅 서비스 연동 포트.
/// 재시도/페이지네이션/전송은 구현체 책임이며, 코어는 호출 결과만 소비한다.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn get_pull_request(&self, pull_request_id: i64) -> Result<Option<PullRequest>>;
    /// 소스 브랜치 기준 active PR 최대 1건(top=1)
    async fn find_active_pull_requests(&self, source_branch: &str) -> Result<Vec<PullRequest>>;
    async fn list_threads(&self, repository_id: &str, pull_request_id: i64)
    -> Result<Vec<ThreadRecord>>;
    async fn create_thread(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        thread: &NewThread,
    ) -> Result<ThreadRecord>;
    async fn update_thread_status(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        thread_id: i64,
        status: ThreadStatus,
    ) -> Result<ThreadRecord>;
    /// `None`은 iteration 목록 자체를 받지 못한 경우(빈 목록과 구분)
    async fn list_iterations(
        &self,
        repository_id: &str,
        pull_request_id: i64,
    ) -> Result<Option<Vec<Iteration>>>;
    async fn list_iteration_changes(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        iteration_id: i32,
    ) -> Result<Vec<ChangeEntry>>;
    async fn diff_commits(&self, base_commit: &str, target_commit: &str)
    -> Result<Vec<CommitChange>>;
}

/// 대상/호스트 설정에 맞는 게이트웨이를 생성하는 팩토리 포트.
pub trait VcsFactory: Send + Sync {
    fn build(
        &self,
        target: &RepositoryTarget,
        host_cfg: Option<&HostConfig>,
        credentials: Credentials,
    ) -> Result<Box<dyn ReviewGateway>>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn raw(&self, line: &str);
}
