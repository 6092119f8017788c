//! 테스트용 인메모리 게이트웨이. 모든 호출을 순서대로 기록한다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::ReviewGateway;
use crate::domain::review::{ChangeEntry, CommitChange, Iteration, PullRequest};
use crate::domain::thread::{
    COMMENT_SOURCE_PROPERTY, NewThread, ThreadComment, ThreadProperties, ThreadRecord,
    ThreadStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetPullRequest(i64),
    FindActivePullRequests(String),
    ListThreads,
    CreateThread(NewThread),
    UpdateThreadStatus { thread_id: i64, status: ThreadStatus },
    ListIterations,
    ListIterationChanges(i32),
    DiffCommits { base: String, target: String },
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub pull_requests: Vec<PullRequest>,
    pub threads: Vec<ThreadRecord>,
    pub iterations: Option<Vec<Iteration>>,
    pub changes: HashMap<i32, Vec<ChangeEntry>>,
    pub commit_changes: Vec<CommitChange>,
    /// n번째(0부터) create 호출을 실패시킨다
    pub fail_create_at: Option<usize>,
    pub calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn created_threads(&self) -> Vec<NewThread> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateThread(thread) => Some(thread),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

pub(crate) fn pull_request(id: i64, code_review_id: i64) -> PullRequest {
    PullRequest {
        id,
        repository_id: "repo-id".to_string(),
        repository_name: "repo".to_string(),
        source_ref_name: "refs/heads/feature".to_string(),
        last_merge_source_commit: Some("source-sha".to_string()),
        last_merge_target_commit: Some("target-sha".to_string()),
        code_review_id,
    }
}

pub(crate) fn thread(id: i64, status: ThreadStatus, source: Option<&str>) -> ThreadRecord {
    let mut properties = ThreadProperties::new();
    if let Some(source) = source {
        properties.insert(COMMENT_SOURCE_PROPERTY.to_string(), json!(source));
    }
    ThreadRecord {
        id,
        status,
        comments: vec![ThreadComment::system(format!("thread {id}"))],
        properties,
    }
}

#[async_trait]
impl ReviewGateway for FakeGateway {
    async fn get_pull_request(&self, pull_request_id: i64) -> Result<Option<PullRequest>> {
        self.record(Call::GetPullRequest(pull_request_id));
        let state = self.state.lock().unwrap();
        Ok(state
            .pull_requests
            .iter()
            .find(|pr| pr.id == pull_request_id)
            .cloned())
    }

    async fn find_active_pull_requests(&self, source_branch: &str) -> Result<Vec<PullRequest>> {
        self.record(Call::FindActivePullRequests(source_branch.to_string()));
        let state = self.state.lock().unwrap();
        Ok(state
            .pull_requests
            .iter()
            .filter(|pr| pr.source_ref_name == source_branch)
            .cloned()
            .collect())
    }

    async fn list_threads(
        &self,
        _repository_id: &str,
        _pull_request_id: i64,
    ) -> Result<Vec<ThreadRecord>> {
        self.record(Call::ListThreads);
        Ok(self.state.lock().unwrap().threads.clone())
    }

    async fn create_thread(
        &self,
        _repository_id: &str,
        _pull_request_id: i64,
        thread: &NewThread,
    ) -> Result<ThreadRecord> {
        self.record(Call::CreateThread(thread.clone()));
        let mut state = self.state.lock().unwrap();
        let attempt = state
            .calls
            .iter()
            .filter(|c| matches!(c, Call::CreateThread(_)))
            .count()
            - 1;
        if state.fail_create_at == Some(attempt) {
            bail!("service unavailable");
        }

        let record = ThreadRecord {
            id: 1000 + state.threads.len() as i64,
            status: thread.status,
            comments: thread.comments.clone(),
            properties: thread.properties.clone(),
        };
        state.threads.push(record.clone());
        Ok(record)
    }

    async fn update_thread_status(
        &self,
        _repository_id: &str,
        _pull_request_id: i64,
        thread_id: i64,
        status: ThreadStatus,
    ) -> Result<ThreadRecord> {
        self.record(Call::UpdateThreadStatus { thread_id, status });
        let mut state = self.state.lock().unwrap();
        let Some(existing) = state.threads.iter_mut().find(|t| t.id == thread_id) else {
            bail!("thread {thread_id} does not exist");
        };
        existing.status = status;
        Ok(existing.clone())
    }

    async fn list_iterations(
        &self,
        _repository_id: &str,
        _pull_request_id: i64,
    ) -> Result<Option<Vec<Iteration>>> {
        self.record(Call::ListIterations);
        Ok(self.state.lock().unwrap().iterations.clone())
    }

    async fn list_iteration_changes(
        &self,
        _repository_id: &str,
        _pull_request_id: i64,
        iteration_id: i32,
    ) -> Result<Vec<ChangeEntry>> {
        self.record(Call::ListIterationChanges(iteration_id));
        let state = self.state.lock().unwrap();
        Ok(state.changes.get(&iteration_id).cloned().unwrap_or_default())
    }

    async fn diff_commits(
        &self,
        base_commit: &str,
        target_commit: &str,
    ) -> Result<Vec<CommitChange>> {
        self.record(Call::DiffCommits {
            base: base_commit.to_string(),
            target: target_commit.to_string(),
        });
        Ok(self.state.lock().unwrap().commit_changes.clone())
    }
}
