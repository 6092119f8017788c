//! 도메인 정책(코멘트 본문 구성, 소유 태그 판정, code-flow 위치 속성, 이슈/스레드 매칭).

use serde_json::{Value, json};

use crate::domain::issue::Issue;
use crate::domain::thread::{
    CHANGE_TRACKING_ID_PROPERTY, COMMENT_SOURCE_PROPERTY, DiscussionThread, END_LINE_PROPERTY,
    END_OFFSET_PROPERTY, FIRST_COMPARING_ITERATION_PROPERTY, ITEM_PATH_PROPERTY, NewThread,
    SECOND_COMPARING_ITERATION_PROPERTY, START_LINE_PROPERTY, START_OFFSET_PROPERTY,
    THREAD_TYPE_CODE_ANALYSIS, THREAD_TYPE_PROPERTY, ThreadComment, ThreadProperties,
    ThreadRecord, ThreadStatus,
};

/// 이슈를 코멘트 본문으로 변환한다.
/// 규칙 ID가 공백이 아니면 `"{rule}: {message}"`, 아니면 메시지 그대로.
pub fn issue_content(issue: &Issue) -> String {
    match issue.rule.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(rule) => format!("{}: {}", rule, issue.message),
        None => issue.message.clone(),
    }
}

/// 저장소 루트 기준 경로로 정규화한다(`\` → `/`, 선행 구분자 제거).
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

/// 이 도구(`source`)가 만든 활성 스레드인지 판정한다.
pub fn is_owned_active(thread: &ThreadRecord, source: &str) -> bool {
    thread.is_comment_source(source) && thread.status == ThreadStatus::Active
}

/// 최신 iteration의 diff 뷰에 라인 단위로 고정하는 위치 속성.
/// first/second comparing iteration은 의도적으로 같은 값을 사용한다.
pub fn code_flow_properties(
    issue: &Issue,
    iteration_id: i32,
    change_tracking_id: i32,
) -> ThreadProperties {
    let line = issue.line.map_or(Value::Null, |l| json!(l));

    let mut properties = ThreadProperties::new();
    properties.insert(ITEM_PATH_PROPERTY.to_string(), json!(issue.file_path));
    properties.insert(START_LINE_PROPERTY.to_string(), line.clone());
    properties.insert(END_LINE_PROPERTY.to_string(), line);
    properties.insert(START_OFFSET_PROPERTY.to_string(), json!(0));
    properties.insert(END_OFFSET_PROPERTY.to_string(), json!(1));
    properties.insert(
        FIRST_COMPARING_ITERATION_PROPERTY.to_string(),
        json!(iteration_id),
    );
    properties.insert(
        SECOND_COMPARING_ITERATION_PROPERTY.to_string(),
        json!(iteration_id),
    );
    properties.insert(
        CHANGE_TRACKING_ID_PROPERTY.to_string(),
        json!(change_tracking_id),
    );
    properties
}

/// 이슈 하나에 대한 신규 Active 스레드 페이로드를 구성한다.
pub fn build_issue_thread(
    issue: &Issue,
    iteration_id: i32,
    change_tracking_id: i32,
    comment_source: &str,
) -> NewThread {
    let mut properties = code_flow_properties(issue, iteration_id, change_tracking_id);
    properties.insert(
        THREAD_TYPE_PROPERTY.to_string(),
        json!(THREAD_TYPE_CODE_ANALYSIS),
    );
    properties.insert(COMMENT_SOURCE_PROPERTY.to_string(), json!(comment_source));

    NewThread {
        status: ThreadStatus::Active,
        comments: vec![ThreadComment::system(issue_content(issue))],
        properties,
    }
}

/// 기존 스레드가 같은 이슈를 이미 보고했는지 판정한다(경로/라인/본문 일치).
pub fn thread_matches_issue(thread: &DiscussionThread, issue: &Issue) -> bool {
    let Some(thread_path) = thread.file_path.as_deref() else {
        return false;
    };

    if normalize_path(thread_path) != normalize_path(&issue.file_path) {
        return false;
    }
    if thread.line != issue.line {
        return false;
    }

    let content = issue_content(issue);
    thread.comments.iter().any(|c| c == &content)
}
