//! 호스트 인증 정보 해석 포트 구현.

use anyhow::Result;

use crate::application::config::HostConfig;
use crate::application::ports::{CredentialResolution, CredentialResolver};
use crate::infrastructure::config::resolve_host_credentials;

/// 설정(auth + token/env/cmd)에 기반해 런타임 인증 정보를 해석한다.
pub struct CredentialResolverAdapter;

impl CredentialResolver for CredentialResolverAdapter {
    fn resolve(&self, _host: &str, host_cfg: Option<&HostConfig>) -> Result<CredentialResolution> {
        resolve_host_credentials(host_cfg)
    }
}
