//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMENT_SOURCE: &str = "prthreads";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// 호스트별 인증/엔드포인트 설정
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 스레드 소유 태그
    pub comment_source: Option<String>,
    /// 저장소 URL(`.../<collection>/<project>/_git/<repo>`)
    pub repository_url: Option<String>,
    /// PR 탐색용 기본 소스 브랜치(refs/heads/...)
    pub source_branch: Option<String>,
    /// 이슈 JSON 파일 경로
    pub issues_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// 인증 방식: integrated | basic | pat | oauth | aad (기본 pat)
    pub auth: Option<String>,
    /// basic/aad 사용자 이름
    pub user_name: Option<String>,
    /// 고정 토큰/비밀번호(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰/비밀번호를 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["az","account","get-access-token"])
    pub token_command: Option<Vec<String>>,
    /// API base URL override(선택). 없으면 collection URL을 사용한다.
    pub api_base: Option<String>,
}

impl Config {
    pub fn comment_source(&self) -> String {
        self.defaults
            .comment_source
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_COMMENT_SOURCE)
            .to_string()
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(host)
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);

        for (host, incoming) in other.hosts {
            if let Some(existing) = self.hosts.get_mut(&host) {
                existing.merge_from(incoming);
            } else {
                self.hosts.insert(host, incoming);
            }
        }
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.comment_source.is_some() {
            self.comment_source = other.comment_source;
        }
        if other.repository_url.is_some() {
            self.repository_url = other.repository_url;
        }
        if other.source_branch.is_some() {
            self.source_branch = other.source_branch;
        }
        if other.issues_path.is_some() {
            self.issues_path = other.issues_path;
        }
    }
}

impl HostConfig {
    pub fn auth_kind(&self) -> &str {
        self.auth
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("pat")
    }

    pub fn merge_from(&mut self, other: HostConfig) {
        if other.auth.is_some() {
            self.auth = other.auth;
        }
        if other.user_name.is_some() {
            self.user_name = other.user_name;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
    }
}
