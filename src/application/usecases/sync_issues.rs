//! 분석 이슈와 PR 스레드를 재조정하는 유스케이스.
//! 이미 보고된 이슈는 건너뛰고, 사라진 이슈의 스레드는 해결 처리하며, 신규 이슈만 게시한다.

use std::collections::HashSet;

use anyhow::{Context, Result, bail};

use crate::application::ports::IssueReader;
use crate::application::usecases::session::{SessionPorts, open_session};
use crate::domain::issue::Issue;
use crate::domain::policy::{issue_content, normalize_path, thread_matches_issue};
use crate::domain::review::{SyncOptions, SyncSummary};
use crate::domain::thread::DiscussionThread;

pub struct SyncIssuesUseCase<'a> {
    pub ports: SessionPorts<'a>,
    pub issue_reader: &'a dyn IssueReader,
}

impl<'a> SyncIssuesUseCase<'a> {
    pub async fn execute(&self, options: SyncOptions) -> Result<SyncSummary> {
        let reporter = self.ports.reporter;
        reporter.section("Session");
        reporter.kv(
            "Mode",
            if options.dry_run {
                "dry-run"
            } else {
                "post-threads"
            },
        );

        let mut session = open_session(&self.ports, &options.target).await?;
        let comment_source = session.comment_source(options.comment_source.as_deref());
        reporter.kv("Source", &comment_source);

        let Some(issues_path) = options
            .issues_path
            .clone()
            .or_else(|| session.config.defaults.issues_path.clone())
        else {
            bail!("missing issues file. Pass --issues or configure defaults.issues_path");
        };

        reporter.section("Read Issues");
        let issues: Vec<Issue> = self
            .issue_reader
            .read(&issues_path)
            .with_context(|| format!("failed to read issues from {issues_path}"))?
            .into_iter()
            .map(|mut issue| {
                issue.file_path = normalize_path(&issue.file_path);
                issue
            })
            .collect();
        reporter.kv("Issues", &issues.len().to_string());

        reporter.section("Compare");
        let modified: HashSet<String> = session.system.modified_files().await?.into_iter().collect();
        reporter.kv("Changed Files", &modified.len().to_string());

        let in_diff: Vec<Issue> = issues
            .iter()
            .filter(|issue| modified.contains(&issue.file_path))
            .cloned()
            .collect();

        let existing = session.system.fetch_active_threads(&comment_source).await?;
        reporter.kv("Open Threads", &existing.len().to_string());

        let (reported, new_issues): (Vec<Issue>, Vec<Issue>) = in_diff
            .iter()
            .cloned()
            .partition(|issue| existing.iter().any(|t| thread_matches_issue(t, issue)));

        let resolved: Vec<&DiscussionThread> = existing
            .iter()
            .filter(|t| !in_diff.iter().any(|issue| thread_matches_issue(t, issue)))
            .collect();

        let mut summary = SyncSummary {
            issues_read: issues.len(),
            issues_in_diff: in_diff.len(),
            already_reported: reported.len(),
            posted: 0,
            resolved: 0,
        };

        if options.dry_run {
            reporter.section("Dry Run");
            for thread in &resolved {
                reporter.status("Resolve", &describe_thread(thread));
            }
            for issue in &new_issues {
                reporter.status("Post", &describe_issue(issue));
            }
            return Ok(summary);
        }

        reporter.section("Resolve Threads");
        for thread in &resolved {
            session.system.mark_thread_fixed(thread).await?;
            reporter.status("Resolve", &describe_thread(thread));
            summary.resolved += 1;
        }

        reporter.section("Post Threads");
        summary.posted = session
            .system
            .post_threads(&new_issues, &comment_source)
            .await?;
        reporter.kv("Posted", &summary.posted.to_string());

        reporter.section("Done");
        Ok(summary)
    }
}

fn describe_issue(issue: &Issue) -> String {
    match issue.line {
        Some(line) => format!("{}:{} {}", issue.file_path, line, issue_content(issue)),
        None => format!("{} {}", issue.file_path, issue_content(issue)),
    }
}

pub(crate) fn describe_thread(thread: &DiscussionThread) -> String {
    let location = match (thread.file_path.as_deref(), thread.line) {
        (Some(path), Some(line)) => format!("{path}:{line}"),
        (Some(path), None) => path.to_string(),
        _ => "unknown location".to_string(),
    };
    let first = thread.comments.first().map(String::as_str).unwrap_or("");
    format!("#{} {} {}", thread.id, location, first)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::application::pull_request::testing::{
        Call, FakeGateway, FakeState, pull_request, thread,
    };
    use crate::application::usecases::testing::FakePorts;
    use crate::domain::review::{ChangeEntry, CommitChange, Iteration, TargetOptions};
    use crate::domain::thread::{ITEM_PATH_PROPERTY, START_LINE_PROPERTY, ThreadRecord, ThreadStatus};

    fn options(dry_run: bool) -> SyncOptions {
        SyncOptions {
            target: TargetOptions {
                repository_url: Some("https://dev.azure.com/org/project/_git/repo".to_string()),
                pull_request_id: Some(1),
                source_branch: None,
            },
            issues_path: Some("issues.json".to_string()),
            comment_source: Some("lint".to_string()),
            dry_run,
        }
    }

    fn reported_thread(id: i64, path: &str, line: i64, content: &str) -> ThreadRecord {
        let mut record = thread(id, ThreadStatus::Active, Some("lint"));
        record
            .properties
            .insert(ITEM_PATH_PROPERTY.to_string(), json!(path));
        record
            .properties
            .insert(START_LINE_PROPERTY.to_string(), json!(line));
        record.comments[0].content = content.to_string();
        record
    }

    fn gateway() -> FakeGateway {
        FakeGateway::new(FakeState {
            pull_requests: vec![pull_request(1, 5)],
            threads: vec![
                reported_thread(10, "src/a.cs", 3, "R1: still here"),
                reported_thread(11, "src/a.cs", 8, "R2: gone now"),
                thread(12, ThreadStatus::Active, Some("someone-else")),
            ],
            iterations: Some(vec![Iteration { id: Some(2) }]),
            changes: HashMap::from([(
                2,
                vec![ChangeEntry {
                    path: "src/a.cs".to_string(),
                    change_tracking_id: 4,
                }],
            )]),
            commit_changes: vec![CommitChange {
                path: "/src/a.cs".to_string(),
                is_folder: false,
            }],
            ..FakeState::default()
        })
    }

    fn issues() -> Vec<Issue> {
        vec![
            Issue::new("src\\a.cs", Some(3), "still here").with_rule("R1"),
            Issue::new("/src/a.cs", Some(20), "brand new"),
            Issue::new("src/untouched.cs", Some(1), "outside the diff"),
        ]
    }

    #[tokio::test]
    async fn posts_new_issues_and_resolves_stale_threads() {
        let gateway = gateway();
        let ports = FakePorts::new(gateway.clone(), issues());

        let summary = ports.sync_usecase().execute(options(false)).await.unwrap();

        assert_eq!(
            summary,
            SyncSummary {
                issues_read: 3,
                issues_in_diff: 2,
                already_reported: 1,
                posted: 1,
                resolved: 1,
            }
        );

        let calls = gateway.calls();
        assert!(calls.contains(&Call::UpdateThreadStatus {
            thread_id: 11,
            status: ThreadStatus::Fixed,
        }));
        let created = gateway.created_threads();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].comments[0].content, "brand new");
    }

    #[tokio::test]
    async fn dry_run_does_not_write() {
        let gateway = gateway();
        let ports = FakePorts::new(gateway.clone(), issues());

        let summary = ports.sync_usecase().execute(options(true)).await.unwrap();

        assert_eq!(summary.posted, 0);
        assert_eq!(summary.resolved, 0);
        assert!(gateway.calls().iter().all(|c| !matches!(
            c,
            Call::CreateThread(_) | Call::UpdateThreadStatus { .. }
        )));
    }

    #[tokio::test]
    async fn missing_issues_path_is_a_configuration_error() {
        let ports = FakePorts::new(gateway(), issues());
        let mut opts = options(false);
        opts.issues_path = None;

        let err = ports.sync_usecase().execute(opts).await.unwrap_err();
        assert!(err.to_string().contains("missing issues file"));
    }
}
