//! 분석 이슈 JSON 파일 읽기 어댑터.

use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::IssueReader;
use crate::domain::issue::{Issue, Priority};

/// 이슈 객체 배열 형태의 JSON 파일을 읽는다.
pub struct JsonIssueReader;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRecord {
    #[serde(alias = "file_path", alias = "path")]
    file_path: String,
    #[serde(default)]
    line: Option<i64>,
    message: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, alias = "ruleId")]
    rule: Option<String>,
}

impl From<IssueRecord> for Issue {
    fn from(record: IssueRecord) -> Self {
        Self {
            file_path: record.file_path,
            line: record.line,
            message: record.message,
            priority: Priority::from_label(record.priority.as_deref()),
            rule: record.rule,
        }
    }
}

impl IssueReader for JsonIssueReader {
    fn read(&self, path: &str) -> Result<Vec<Issue>> {
        let raw = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        parse_issues(&raw).with_context(|| format!("invalid issues JSON in {path}"))
    }
}

fn parse_issues(raw: &str) -> Result<Vec<Issue>> {
    let records: Vec<IssueRecord> = serde_json::from_str(raw)?;
    Ok(records.into_iter().map(Into::into).collect())
}
