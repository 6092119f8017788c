//! 실행 세션(설정/대상/PR 시스템) 준비 단계.

use anyhow::{Context, Result, bail};

use crate::application::config::Config;
use crate::application::ports::{
    ConfigRepository, CredentialResolver, Reporter, TargetResolver, VcsFactory,
};
use crate::application::pull_request::{PullRequestSelector, PullRequestSystem};
use crate::domain::review::TargetOptions;
use crate::domain::target::RepositoryTarget;

/// 세션 준비에 필요한 포트 묶음.
#[derive(Clone, Copy)]
pub struct SessionPorts<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub credential_resolver: &'a dyn CredentialResolver,
    pub target_resolver: &'a dyn TargetResolver,
    pub vcs_factory: &'a dyn VcsFactory,
    pub reporter: &'a dyn Reporter,
}

/// 유스케이스 전 구간에서 공유되는 실행 상태.
pub(super) struct Session {
    pub config: Config,
    pub system: PullRequestSystem,
}

impl Session {
    /// CLI 값이 있으면 우선하고, 없으면 설정값, 그마저 없으면 기본 태그를 사용한다.
    pub fn comment_source(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .unwrap_or_else(|| self.config.comment_source())
    }
}

/// 설정 로딩, 저장소 URL 해석, 인증, PR 해석까지 선행한다.
pub(super) async fn open_session(
    ports: &SessionPorts<'_>,
    options: &TargetOptions,
) -> Result<Session> {
    ports.reporter.section("Load Config");
    let config = ports
        .config_repo
        .load()
        .context("failed to load prthreads config")?;

    let Some(repository_url) = options
        .repository_url
        .clone()
        .or_else(|| config.defaults.repository_url.clone())
    else {
        bail!("missing repository URL. Pass --repo or configure defaults.repository_url");
    };

    let target: RepositoryTarget = ports
        .target_resolver
        .parse(&repository_url)
        .context("failed to parse repository URL")?;

    let host_cfg = config.host_config(target.host());
    let resolution = ports
        .credential_resolver
        .resolve(target.host(), host_cfg)
        .with_context(|| format!("failed to resolve credentials for {}", target.host()))?;

    let Some(credentials) = resolution.credentials else {
        bail!(
            "missing credentials for host '{}'. Configure hosts.{}.token, hosts.{}.token_env or hosts.{}.token_command in config",
            target.host(),
            target.host(),
            target.host(),
            target.host(),
        );
    };

    ports.reporter.kv("Collection", &target.collection_url);
    ports.reporter.kv("Project", &target.project_name);
    ports.reporter.kv("Repository", &target.repository_name);
    ports.reporter.kv(
        "Auth",
        &format!(
            "{} ({})",
            credentials.kind(),
            resolution.source.as_deref().unwrap_or("-")
        ),
    );

    let gateway = ports.vcs_factory.build(&target, host_cfg, credentials)?;

    let selector = PullRequestSelector::from_options(&TargetOptions {
        repository_url: Some(repository_url),
        pull_request_id: options.pull_request_id,
        source_branch: options
            .source_branch
            .clone()
            .or_else(|| config.defaults.source_branch.clone()),
    })?;

    ports.reporter.section("Resolve Pull Request");
    let system = PullRequestSystem::connect(gateway, &selector).await?;

    let pr = system.pull_request();
    ports.reporter.kv("Pull Request", &pr.id.to_string());
    ports.reporter.kv("Source Ref", &pr.source_ref_name);
    ports.reporter.kv(
        "Code Flow",
        if pr.supports_code_flow() {
            "supported"
        } else {
            "legacy"
        },
    );

    Ok(Session { config, system })
}
