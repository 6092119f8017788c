//! PR에서 수정된 파일 목록을 출력하는 유스케이스.

use anyhow::Result;

use crate::application::usecases::session::{SessionPorts, open_session};
use crate::domain::review::TargetOptions;

pub struct ChangedFilesUseCase<'a> {
    pub ports: SessionPorts<'a>,
}

impl<'a> ChangedFilesUseCase<'a> {
    pub async fn execute(&self, options: TargetOptions) -> Result<Vec<String>> {
        let session = open_session(&self.ports, &options).await?;

        self.ports.reporter.section("Changed Files");
        let files = session.system.modified_files().await?;
        for file in &files {
            self.ports.reporter.raw(file);
        }

        Ok(files)
    }
}
