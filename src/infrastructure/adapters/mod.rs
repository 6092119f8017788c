//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod config_repository;
mod credential_resolver;
mod issue_reader;
mod reporter;
mod target_resolver;
mod vcs_factory;

pub use config_repository::JsonConfigRepository;
pub use credential_resolver::CredentialResolverAdapter;
pub use issue_reader::JsonIssueReader;
pub use reporter::ConsoleReporter;
pub use target_resolver::UrlTargetResolver;
pub use vcs_factory::VcsFactoryAdapter;
