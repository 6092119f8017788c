//! 단일 PR에 대한 iteration/change 상관관계 해석과 스레드 재조정 엔진.
//!
//! - `locator`: 대상 PR 해석(id 또는 소스 브랜치)
//! - `changes`: PR에서 수정된 파일 목록
//! - `iterations`: 최신 iteration과 change tracking id 해석
//! - `threads`: 활성 스레드 조회/신규 게시/해결 처리(세대 캐시 보유)
//!
//! 모든 게이트웨이 호출은 순차적으로 await 되며 내부 병렬성은 없다.
//! 캐시는 인스턴스 전용이므로 한 인스턴스를 동시 호출자 사이에서 공유하지 않는다.

mod changes;
mod iterations;
mod locator;
mod threads;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::Result;
use tracing::debug;

use crate::application::ports::ReviewGateway;
use crate::domain::review::PullRequest;
use crate::domain::thread::ThreadRecord;

pub use iterations::find_change_tracking_id;
pub use locator::{PullRequestSelector, resolve_pull_request};

/// 해석된 PR 하나에 묶인 재조정 시스템.
pub struct PullRequestSystem {
    gateway: Box<dyn ReviewGateway>,
    pull_request: PullRequest,
    /// 가장 최근 `fetch_active_threads` 세대
    cached_threads: Vec<ThreadRecord>,
}

impl PullRequestSystem {
    /// 이미 해석된 PR로 시스템을 구성한다.
    pub fn new(gateway: Box<dyn ReviewGateway>, pull_request: PullRequest) -> Self {
        Self {
            gateway,
            pull_request,
            cached_threads: Vec::new(),
        }
    }

    /// 선택자로 PR을 해석해 시스템을 구성한다. PR이 없으면 생성 자체가 실패한다.
    pub async fn connect(
        gateway: Box<dyn ReviewGateway>,
        selector: &PullRequestSelector,
    ) -> Result<Self> {
        let pull_request = resolve_pull_request(gateway.as_ref(), selector).await?;

        debug!(
            pull_request_id = pull_request.id,
            repository_id = %pull_request.repository_id,
            repository_name = %pull_request.repository_name,
            source_ref_name = %pull_request.source_ref_name,
            "resolved pull request"
        );

        Ok(Self::new(gateway, pull_request))
    }

    pub fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }
}
