//! 리뷰 호스팅 서비스 연동 계층.
//! 현재는 Azure DevOps / TFS Git 저장소만 지원한다.

pub mod azure_devops;

use anyhow::Result;
use tracing::debug;

use crate::application::config::HostConfig;
use crate::application::ports::ReviewGateway;
use crate::domain::credentials::Credentials;
use crate::domain::target::RepositoryTarget;

pub fn build_review_gateway(
    target: &RepositoryTarget,
    host_cfg: Option<&HostConfig>,
    credentials: Credentials,
) -> Result<Box<dyn ReviewGateway>> {
    let api_base = host_cfg.and_then(|h| h.api_base.clone());
    debug!(
        collection = %target.collection_url,
        project = %target.project_name,
        repository = %target.repository_name,
        auth = credentials.kind(),
        "building review gateway"
    );

    Ok(Box::new(azure_devops::AzureDevOpsClient::new(
        target.collection_url.clone(),
        target.project_name.clone(),
        target.repository_name.clone(),
        credentials,
        api_base,
    )?))
}
