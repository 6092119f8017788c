//! 이 도구가 게시한 활성 스레드를 조회하는 유스케이스.

use anyhow::Result;

use crate::application::usecases::session::{SessionPorts, open_session};
use crate::application::usecases::sync_issues::describe_thread;
use crate::domain::review::ThreadQueryOptions;
use crate::domain::thread::DiscussionThread;

pub struct ListThreadsUseCase<'a> {
    pub ports: SessionPorts<'a>,
}

impl<'a> ListThreadsUseCase<'a> {
    pub async fn execute(&self, options: ThreadQueryOptions) -> Result<Vec<DiscussionThread>> {
        let mut session = open_session(&self.ports, &options.target).await?;
        let comment_source = session.comment_source(options.comment_source.as_deref());

        self.ports.reporter.section("Active Threads");
        self.ports.reporter.kv("Source", &comment_source);
        let threads = session.system.fetch_active_threads(&comment_source).await?;
        for thread in &threads {
            self.ports.reporter.raw(&describe_thread(thread));
        }

        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pull_request::testing::{FakeGateway, FakeState, pull_request, thread};
    use crate::application::usecases::testing::FakePorts;
    use crate::domain::review::TargetOptions;
    use crate::domain::thread::ThreadStatus;

    #[tokio::test]
    async fn lists_only_threads_of_requested_source() {
        let gateway = FakeGateway::new(FakeState {
            pull_requests: vec![pull_request(3, 1)],
            threads: vec![
                thread(1, ThreadStatus::Active, Some("lint")),
                thread(2, ThreadStatus::Active, Some("prthreads")),
            ],
            ..FakeState::default()
        });
        let ports = FakePorts::new(gateway, Vec::new());

        let threads = ports
            .list_threads_usecase()
            .execute(ThreadQueryOptions {
                target: TargetOptions {
                    repository_url: Some("https://dev.azure.com/org/p/_git/r".to_string()),
                    pull_request_id: None,
                    source_branch: Some("refs/heads/feature".to_string()),
                },
                comment_source: None,
            })
            .await
            .unwrap();

        // 태그를 지정하지 않으면 기본 태그를 사용한다.
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, 2);
        assert_eq!(ports.printed(), vec!["#2 unknown location thread 2".to_string()]);
    }
}
