//! 적용 설정 진단(inspection) 뷰 모델.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_host_credentials;
use crate::application::config::{DefaultsConfig, HostConfig};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub hosts: BTreeMap<String, HostInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub comment_source: String,
    pub repository_url: Option<String>,
    pub source_branch: Option<String>,
    pub issues_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInspection {
    pub auth: String,
    pub credential_source: Option<String>,
    pub credential_resolved: bool,
    pub error: Option<String>,
    pub api_base: Option<String>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let mut hosts = BTreeMap::new();
        for (host, cfg) in &loaded.config.hosts {
            hosts.insert(host.clone(), host_inspection(cfg));
        }

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: loaded.config.defaults.clone(),
            effective_defaults: EffectiveDefaults {
                comment_source: loaded.config.comment_source(),
                repository_url: loaded.config.defaults.repository_url.clone(),
                source_branch: loaded.config.defaults.source_branch.clone(),
                issues_path: loaded.config.defaults.issues_path.clone(),
            },
            hosts,
        }
    }
}

fn host_inspection(cfg: &HostConfig) -> HostInspection {
    // 비밀값 자체는 출력하지 않고 출처/해석 여부만 보여준다.
    match resolve_host_credentials(Some(cfg)) {
        Ok(resolution) => HostInspection {
            auth: cfg.auth_kind().to_string(),
            credential_source: resolution.source,
            credential_resolved: resolution.credentials.is_some(),
            error: unsupported_auth_note(cfg.auth_kind()),
            api_base: cfg.api_base.clone(),
        },
        Err(err) => HostInspection {
            auth: cfg.auth_kind().to_string(),
            credential_source: None,
            credential_resolved: false,
            error: Some(format!("{err:#}")),
            api_base: cfg.api_base.clone(),
        },
    }
}

/// 설정상 유효하지만 REST 클라이언트가 거부하는 인증 방식 안내.
fn unsupported_auth_note(kind: &str) -> Option<String> {
    kind.eq_ignore_ascii_case("aad")
        .then(|| "aad auth is not supported by the REST client; use pat or oauth".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aad_host_is_flagged_as_unsupported() {
        let cfg = HostConfig {
            auth: Some("aad".to_string()),
            user_name: Some("user".to_string()),
            token: Some("pw".to_string()),
            ..HostConfig::default()
        };

        let inspection = host_inspection(&cfg);

        assert!(inspection.credential_resolved);
        assert!(inspection.error.unwrap().contains("not supported"));
    }

    #[test]
    fn pat_host_has_no_error() {
        let cfg = HostConfig {
            token: Some("tok".to_string()),
            ..HostConfig::default()
        };

        let inspection = host_inspection(&cfg);

        assert_eq!(inspection.auth, "pat");
        assert_eq!(inspection.credential_source.as_deref(), Some("inline"));
        assert!(inspection.error.is_none());
    }
}
