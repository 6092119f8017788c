//! Azure DevOps / Team Foundation Server Git REST API 연동 구현.
//! 호출 1회당 요청 1회이며 재시도/페이지네이션은 수행하지 않는다.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::application::ports::ReviewGateway;
use crate::domain::credentials::Credentials;
use crate::domain::policy::normalize_path;
use crate::domain::review::{ChangeEntry, CommitChange, Iteration, PullRequest};
use crate::domain::thread::{CommentKind, NewThread, ThreadComment, ThreadRecord, ThreadStatus};

const API_VERSION: &str = "4.1";

/// RFC 3986 unreserved 문자(`-` `.` `_` `~`)는 그대로 둔다.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// 요청 인증 헤더 형태.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    None,
    Basic { user_name: String, password: String },
    Bearer(String),
}

impl Auth {
    fn from_credentials(credentials: Credentials) -> Result<Self> {
        Ok(match credentials {
            Credentials::Integrated => Self::None,
            Credentials::Basic {
                user_name,
                password,
            } => Self::Basic {
                user_name,
                password,
            },
            Credentials::PersonalAccessToken(token) => Self::Basic {
                user_name: String::new(),
                password: token,
            },
            Credentials::OAuth(token) => Self::Bearer(token),
            Credentials::AzureActiveDirectory { .. } => bail!(
                "azure: aad credentials need an interactive token flow that is not supported; use pat or oauth"
            ),
        })
    }
}

pub struct AzureDevOpsClient {
    client: Client,
    collection_url: String,
    project: String,
    repository: String,
    auth: Auth,
    api_base: Option<String>,
}

impl AzureDevOpsClient {
    /// 저장소 대상 클라이언트를 생성한다. 지원하지 않는 인증 방식이면 실패한다.
    pub fn new(
        collection_url: String,
        project: String,
        repository: String,
        credentials: Credentials,
        api_base: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            collection_url,
            project,
            repository,
            auth: Auth::from_credentials(credentials)?,
            api_base,
        })
    }

    fn api_base(&self) -> String {
        // override가 없으면 collection URL이 API 루트다.
        self.api_base
            .as_deref()
            .unwrap_or(&self.collection_url)
            .trim_end_matches('/')
            .to_string()
    }

    fn repository_endpoint(&self) -> String {
        format!(
            "{}/{}/_apis/git/repositories/{}",
            self.api_base(),
            encode(&self.project),
            encode(&self.repository)
        )
    }

    fn pull_request_endpoint(&self, repository_id: &str, pull_request_id: i64) -> String {
        format!(
            "{}/_apis/git/repositories/{}/pullRequests/{}",
            self.api_base(),
            encode(repository_id),
            pull_request_id
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        // 공통 헤더/인증/api-version 적용.
        let req = self
            .client
            .request(method, url)
            .header("User-Agent", "prthreads")
            .header("Accept", "application/json")
            .query(&[("api-version", API_VERSION)]);

        match &self.auth {
            Auth::None => req,
            Auth::Basic {
                user_name,
                password,
            } => req.basic_auth(user_name, Some(password)),
            Auth::Bearer(token) => req.bearer_auth(token),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("azure: failed to {what}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("azure: failed to read {what} body"))?;

        if !status.is_success() {
            bail!("azure: failed to {what} ({status}): {body}");
        }

        serde_json::from_str(&body).with_context(|| format!("azure: invalid {what} JSON"))
    }
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    value: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestResponse {
    pull_request_id: i64,
    #[serde(default)]
    code_review_id: i64,
    repository: RepositoryRef,
    #[serde(default)]
    source_ref_name: String,
    last_merge_source_commit: Option<CommitRef>,
    last_merge_target_commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct RepositoryRef {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitRef {
    commit_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadResponse {
    id: i64,
    status: Option<String>,
    #[serde(default)]
    comments: Vec<CommentResponse>,
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentResponse {
    content: Option<String>,
    comment_type: Option<String>,
    #[serde(default)]
    is_deleted: bool,
}

#[derive(Debug, Deserialize)]
struct IterationResponse {
    id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IterationChangesResponse {
    #[serde(default)]
    change_entries: Vec<ChangeEntryResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeEntryResponse {
    change_tracking_id: i32,
    item: Option<ItemResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    path: Option<String>,
    #[serde(default)]
    is_folder: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitDiffsResponse {
    #[serde(default)]
    change_counts: Map<String, Value>,
    #[serde(default)]
    changes: Vec<CommitDiffChange>,
}

#[derive(Debug, Deserialize)]
struct CommitDiffChange {
    item: Option<ItemResponse>,
}

impl From<PullRequestResponse> for PullRequest {
    fn from(pr: PullRequestResponse) -> Self {
        Self {
            id: pr.pull_request_id,
            repository_id: pr.repository.id,
            repository_name: pr.repository.name,
            source_ref_name: pr.source_ref_name,
            last_merge_source_commit: pr.last_merge_source_commit.map(|c| c.commit_id),
            last_merge_target_commit: pr.last_merge_target_commit.map(|c| c.commit_id),
            code_review_id: pr.code_review_id,
        }
    }
}

impl From<ThreadResponse> for ThreadRecord {
    fn from(thread: ThreadResponse) -> Self {
        Self {
            id: thread.id,
            status: parse_status(thread.status.as_deref()),
            comments: thread
                .comments
                .into_iter()
                .map(|c| ThreadComment {
                    kind: parse_comment_kind(c.comment_type.as_deref()),
                    content: c.content.unwrap_or_default(),
                    is_deleted: c.is_deleted,
                })
                .collect(),
            properties: thread
                .properties
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, unwrap_property(v)))
                .collect(),
        }
    }
}

fn parse_status(status: Option<&str>) -> ThreadStatus {
    match status {
        Some(s) if s.eq_ignore_ascii_case("active") => ThreadStatus::Active,
        Some(s) if s.eq_ignore_ascii_case("fixed") => ThreadStatus::Fixed,
        _ => ThreadStatus::Other,
    }
}

fn parse_comment_kind(kind: Option<&str>) -> CommentKind {
    match kind {
        Some(k) if k.eq_ignore_ascii_case("system") => CommentKind::System,
        Some(k) if k.eq_ignore_ascii_case("text") => CommentKind::Text,
        _ => CommentKind::Other,
    }
}

fn comment_kind_code(kind: CommentKind) -> &'static str {
    match kind {
        CommentKind::System => "system",
        CommentKind::Text => "text",
        CommentKind::Other => "unknown",
    }
}

/// 서비스의 `{ "$type", "$value" }` 속성 표현에서 값만 꺼낸다.
fn unwrap_property(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("$value") => {
            map.remove("$value").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// 속성 값을 서비스의 타입 표기 형식으로 감싼다.
fn wrap_property(value: &Value) -> Value {
    match value {
        Value::String(s) => json!({ "$type": "System.String", "$value": s }),
        Value::Number(n) if n.is_i64() => json!({ "$type": "System.Int32", "$value": n }),
        other => other.clone(),
    }
}

fn thread_payload(thread: &NewThread) -> Value {
    let properties: Map<String, Value> = thread
        .properties
        .iter()
        .map(|(k, v)| (k.clone(), wrap_property(v)))
        .collect();

    json!({
        "status": thread.status.code(),
        "comments": thread
            .comments
            .iter()
            .map(|c| json!({
                "parentCommentId": 0,
                "content": c.content,
                "commentType": comment_kind_code(c.kind),
                "isDeleted": c.is_deleted,
            }))
            .collect::<Vec<_>>(),
        "properties": properties,
    })
}

#[async_trait]
impl ReviewGateway for AzureDevOpsClient {
    async fn get_pull_request(&self, pull_request_id: i64) -> Result<Option<PullRequest>> {
        let url = format!("{}/pullrequests/{}", self.repository_endpoint(), pull_request_id);
        let resp = self
            .request(Method::GET, url)
            .send()
            .await
            .context("azure: failed to fetch pull request")?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = resp
            .text()
            .await
            .context("azure: failed to read pull request body")?;
        if !status.is_success() {
            bail!("azure: failed to fetch pull request ({status}): {body}");
        }

        let pr: PullRequestResponse =
            serde_json::from_str(&body).context("azure: invalid pull request JSON")?;
        Ok(Some(pr.into()))
    }

    async fn find_active_pull_requests(&self, source_branch: &str) -> Result<Vec<PullRequest>> {
        let url = format!("{}/pullrequests", self.repository_endpoint());
        let req = self.request(Method::GET, url).query(&[
            ("searchCriteria.status", "active"),
            ("searchCriteria.sourceRefName", source_branch),
            ("$top", "1"),
        ]);

        let list: ListResponse<PullRequestResponse> =
            self.send_json(req, "search pull requests").await?;
        Ok(list
            .value
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn list_threads(
        &self,
        repository_id: &str,
        pull_request_id: i64,
    ) -> Result<Vec<ThreadRecord>> {
        let url = format!(
            "{}/threads",
            self.pull_request_endpoint(repository_id, pull_request_id)
        );
        let list: ListResponse<ThreadResponse> = self
            .send_json(self.request(Method::GET, url), "list threads")
            .await?;
        Ok(list
            .value
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn create_thread(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        thread: &NewThread,
    ) -> Result<ThreadRecord> {
        let url = format!(
            "{}/threads",
            self.pull_request_endpoint(repository_id, pull_request_id)
        );
        let req = self.request(Method::POST, url).json(&thread_payload(thread));
        let created: ThreadResponse = self.send_json(req, "create thread").await?;
        Ok(created.into())
    }

    async fn update_thread_status(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        thread_id: i64,
        status: ThreadStatus,
    ) -> Result<ThreadRecord> {
        let url = format!(
            "{}/threads/{}",
            self.pull_request_endpoint(repository_id, pull_request_id),
            thread_id
        );
        let req = self
            .request(Method::PATCH, url)
            .json(&json!({ "status": status.code() }));
        let updated: ThreadResponse = self.send_json(req, "update thread").await?;
        Ok(updated.into())
    }

    async fn list_iterations(
        &self,
        repository_id: &str,
        pull_request_id: i64,
    ) -> Result<Option<Vec<Iteration>>> {
        let url = format!(
            "{}/iterations",
            self.pull_request_endpoint(repository_id, pull_request_id)
        );
        let list: ListResponse<IterationResponse> = self
            .send_json(self.request(Method::GET, url), "list iterations")
            .await?;
        Ok(list
            .value
            .map(|items| items.into_iter().map(|i| Iteration { id: i.id }).collect()))
    }

    async fn list_iteration_changes(
        &self,
        repository_id: &str,
        pull_request_id: i64,
        iteration_id: i32,
    ) -> Result<Vec<ChangeEntry>> {
        let url = format!(
            "{}/iterations/{}/changes",
            self.pull_request_endpoint(repository_id, pull_request_id),
            iteration_id
        );
        let changes: IterationChangesResponse = self
            .send_json(self.request(Method::GET, url), "list iteration changes")
            .await?;

        // 서비스 경로(`/src/a.cs`)를 저장소 루트 상대 경로로 맞춘다.
        Ok(changes
            .change_entries
            .into_iter()
            .filter_map(|entry| {
                let path = entry.item?.path?;
                Some(ChangeEntry {
                    path: normalize_path(&path),
                    change_tracking_id: entry.change_tracking_id,
                })
            })
            .collect())
    }

    async fn diff_commits(
        &self,
        base_commit: &str,
        target_commit: &str,
    ) -> Result<Vec<CommitChange>> {
        let url = format!("{}/diffs/commits", self.repository_endpoint());
        let req = self.request(Method::GET, url).query(&[
            ("diffCommonCommit", "true"),
            ("baseVersionType", "commit"),
            ("baseVersion", base_commit),
            ("targetVersionType", "commit"),
            ("targetVersion", target_commit),
        ]);
        let diffs: CommitDiffsResponse = self.send_json(req, "diff commits").await?;

        if diffs.change_counts.is_empty() {
            return Ok(Vec::new());
        }

        Ok(diffs
            .changes
            .into_iter()
            .filter_map(|change| {
                let item = change.item?;
                Some(CommitChange {
                    path: item.path?,
                    is_folder: item.is_folder,
                })
            })
            .collect())
    }
}
