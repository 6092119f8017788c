//! 애플리케이션 유스케이스 모음.

pub mod changed_files;
pub mod inspect_config;
pub mod list_threads;
pub mod session;
pub mod sync_issues;

#[cfg(test)]
pub(crate) mod testing;
