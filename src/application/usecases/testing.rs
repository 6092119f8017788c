//! 유스케이스 테스트용 포트 구현 묶음.

use std::sync::Mutex;

use anyhow::Result;

use crate::application::config::{Config, HostConfig};
use crate::application::ports::{
    ConfigRepository, CredentialResolution, CredentialResolver, IssueReader, Reporter,
    ReviewGateway, TargetResolver, VcsFactory,
};
use crate::application::pull_request::testing::FakeGateway;
use crate::application::usecases::changed_files::ChangedFilesUseCase;
use crate::application::usecases::list_threads::ListThreadsUseCase;
use crate::application::usecases::session::SessionPorts;
use crate::application::usecases::sync_issues::SyncIssuesUseCase;
use crate::domain::credentials::Credentials;
use crate::domain::issue::Issue;
use crate::domain::target::RepositoryTarget;

pub(crate) struct FakePorts {
    config: Config,
    gateway: FakeGateway,
    issues: Vec<Issue>,
    pub lines: Mutex<Vec<String>>,
}

impl FakePorts {
    pub fn new(gateway: FakeGateway, issues: Vec<Issue>) -> Self {
        Self {
            config: Config::default(),
            gateway,
            issues,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn session_ports(&self) -> SessionPorts<'_> {
        SessionPorts {
            config_repo: self,
            credential_resolver: self,
            target_resolver: self,
            vcs_factory: self,
            reporter: self,
        }
    }

    pub fn sync_usecase(&self) -> SyncIssuesUseCase<'_> {
        SyncIssuesUseCase {
            ports: self.session_ports(),
            issue_reader: self,
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

    pub fn printed(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

impl ConfigRepository for FakePorts {
    fn load(&self) -> Result<Config> {
        Ok(self.config.clone())
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }
}

impl CredentialResolver for FakePorts {
    fn resolve(&self, _host: &str, _host_cfg: Option<&HostConfig>) -> Result<CredentialResolution> {
        Ok(CredentialResolution {
            credentials: Some(Credentials::personal_access_token("test-token")?),
            source: Some("inline".to_string()),
        })
    }
}

impl TargetResolver for FakePorts {
    fn parse(&self, input: &str) -> Result<RepositoryTarget> {
        RepositoryTarget::parse(input)
    }
}

impl VcsFactory for FakePorts {
    fn build(
        &self,
        _target: &RepositoryTarget,
        _host_cfg: Option<&HostConfig>,
        _credentials: Credentials,
    ) -> Result<Box<dyn ReviewGateway>> {
        Ok(Box::new(self.gateway.clone()))
    }
}

impl IssueReader for FakePorts {
    fn read(&self, _path: &str) -> Result<Vec<Issue>> {
        Ok(self.issues.clone())
    }
}

impl Reporter for FakePorts {
    fn section(&self, _name: &str) {}

    fn kv(&self, _key: &str, _value: &str) {}

    fn status(&self, scope: &str, message: &str) {
        self.push(format!("[{scope}] {message}"));
    }

    fn raw(&self, line: &str) {
        self.push(line.to_string());
    }
}
