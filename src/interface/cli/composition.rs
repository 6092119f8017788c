//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::changed_files::ChangedFilesUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::list_threads::ListThreadsUseCase;
use crate::application::usecases::session::SessionPorts;
use crate::application::usecases::sync_issues::SyncIssuesUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, CredentialResolverAdapter, JsonConfigRepository, JsonIssueReader,
    UrlTargetResolver, VcsFactoryAdapter,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    credential_resolver: CredentialResolverAdapter,
    target_resolver: UrlTargetResolver,
    vcs_factory: VcsFactoryAdapter,
    issue_reader: JsonIssueReader,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AppComposition {
    /// 진행 출력 생략 여부를 받아 실행 조합을 생성한다.
    pub fn new(quiet: bool) -> Self {
        Self {
            config_repo: JsonConfigRepository,
            credential_resolver: CredentialResolverAdapter,
            target_resolver: UrlTargetResolver,
            vcs_factory: VcsFactoryAdapter,
            issue_reader: JsonIssueReader,
            reporter: ConsoleReporter::new(quiet),
        }
    }

    fn session_ports(&self) -> SessionPorts<'_> {
        SessionPorts {
            config_repo: &self.config_repo,
            credential_resolver: &self.credential_resolver,
            target_resolver: &self.target_resolver,
            vcs_factory: &self.vcs_factory,
            reporter: &self.reporter,
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 이슈 동기화 유스케이스를 생성한다.
    pub fn sync_usecase(&self) -> SyncIssuesUseCase<'_> {
        SyncIssuesUseCase {
            ports: self.session_ports(),
            issue_reader: &self.issue_reader,
        }
    }

    pub fn list_threads_usecase(&self) -> ListThreadsUseCase<'_> {
        ListThreadsUseCase {
            ports: self.session_ports(),
        }
    }

    pub fn changed_files_usecase(&self) -> ChangedFilesUseCase<'_> {
        ChangedFilesUseCase {
            ports: self.session_ports(),
        }
    }
}
