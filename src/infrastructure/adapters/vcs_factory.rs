//! 리뷰 게이트웨이 팩토리 포트 구현 어댑터.

use anyhow::Result;

use crate::application::ports::{ReviewGateway, VcsFactory};
use crate::domain::credentials::Credentials;
use crate::domain::target::RepositoryTarget;
use crate::infrastructure::{config, vcs};

/// 대상 저장소용 게이트웨이를 생성하는 어댑터.
pub struct VcsFactoryAdapter;

impl VcsFactory for VcsFactoryAdapter {
    fn build(
        &self,
        target: &RepositoryTarget,
        host_cfg: Option<&config::HostConfig>,
        credentials: Credentials,
    ) -> Result<Box<dyn ReviewGateway>> {
        vcs::build_review_gateway(target, host_cfg, credentials)
    }
}
