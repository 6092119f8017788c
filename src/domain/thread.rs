//! PR discussion thread 엔티티와 속성 키.

use std::collections::BTreeMap;

use serde_json::Value;

/// 스레드 소유 태그 속성 키. 기존 리뷰에 남아있는 스레드와 호환되도록 고정값을 유지한다.
pub const COMMENT_SOURCE_PROPERTY: &str = "CakePrcaCommentSource";
/// 호스팅 UI 확장이 분석 이슈 스레드를 식별하는 마커.
pub const THREAD_TYPE_PROPERTY: &str = "CodeAnalysisThreadType";
pub const THREAD_TYPE_CODE_ANALYSIS: &str = "CodeAnalysisIssue";

pub const ITEM_PATH_PROPERTY: &str = "Microsoft.VisualStudio.Services.CodeReview.ItemPath";
pub const START_LINE_PROPERTY: &str = "Microsoft.VisualStudio.Services.CodeReview.Right.StartLine";
pub const END_LINE_PROPERTY: &str = "Microsoft.VisualStudio.Services.CodeReview.Right.EndLine";
pub const START_OFFSET_PROPERTY: &str =
    "Microsoft.VisualStudio.Services.CodeReview.Right.StartOffset";
pub const END_OFFSET_PROPERTY: &str = "Microsoft.VisualStudio.Services.CodeReview.Right.EndOffset";
pub const FIRST_COMPARING_ITERATION_PROPERTY: &str =
    "Microsoft.VisualStudio.Services.CodeReview.FirstComparingIteration";
pub const SECOND_COMPARING_ITERATION_PROPERTY: &str =
    "Microsoft.VisualStudio.Services.CodeReview.SecondComparingIteration";
pub const CHANGE_TRACKING_ID_PROPERTY: &str =
    "Microsoft.VisualStudio.Services.CodeReview.ChangeTrackingId";

/// 스레드 임의 메타데이터(위치 정보, 소유 태그 등).
pub type ThreadProperties = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Active,
    Fixed,
    /// 이 도구가 생성/소비하지 않는 나머지 상태
    Other,
}

impl ThreadStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Fixed => "fixed",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Text,
    System,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComment {
    pub kind: CommentKind,
    pub content: String,
    pub is_deleted: bool,
}

impl ThreadComment {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::System,
            content: content.into(),
            is_deleted: false,
        }
    }
}

/// 서비스 원본 형태의 스레드. 캐시에 그대로 보관된다.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadRecord {
    pub id: i64,
    pub status: ThreadStatus,
    pub comments: Vec<ThreadComment>,
    pub properties: ThreadProperties,
}

/// 생성 요청용 스레드 페이로드(id는 서비스가 부여).
#[derive(Debug, Clone, PartialEq)]
pub struct NewThread {
    pub status: ThreadStatus,
    pub comments: Vec<ThreadComment>,
    pub properties: ThreadProperties,
}

/// 호출자에게 노출되는 스레드 투영.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionThread {
    pub id: i64,
    pub status: ThreadStatus,
    pub file_path: Option<String>,
    pub line: Option<i64>,
    pub comment_source: Option<String>,
    pub comments: Vec<String>,
}

impl ThreadRecord {
    pub fn comment_source(&self) -> Option<&str> {
        self.properties
            .get(COMMENT_SOURCE_PROPERTY)
            .and_then(Value::as_str)
    }

    pub fn is_comment_source(&self, source: &str) -> bool {
        self.comment_source() == Some(source)
    }

    fn file_path(&self) -> Option<String> {
        self.properties
            .get(ITEM_PATH_PROPERTY)
            .and_then(Value::as_str)
            .map(|p| p.trim_start_matches('/').to_string())
    }

    fn line(&self) -> Option<i64> {
        self.properties.get(START_LINE_PROPERTY).and_then(Value::as_i64)
    }

    pub fn to_discussion_thread(&self) -> DiscussionThread {
        DiscussionThread {
            id: self.id,
            status: self.status,
            file_path: self.file_path(),
            line: self.line(),
            comment_source: self.comment_source().map(ToString::to_string),
            comments: self
                .comments
                .iter()
                .filter(|c| !c.is_deleted)
                .map(|c| c.content.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn projection_reads_position_and_skips_deleted_comments() {
        let mut properties = ThreadProperties::new();
        properties.insert(ITEM_PATH_PROPERTY.to_string(), json!("/src/a.cs"));
        properties.insert(START_LINE_PROPERTY.to_string(), json!(10));
        properties.insert(COMMENT_SOURCE_PROPERTY.to_string(), json!("lint"));

        let record = ThreadRecord {
            id: 4,
            status: ThreadStatus::Active,
            comments: vec![
                ThreadComment::system("kept"),
                ThreadComment {
                    kind: CommentKind::Text,
                    content: "gone".to_string(),
                    is_deleted: true,
                },
            ],
            properties,
        };

        let projected = record.to_discussion_thread();
        assert_eq!(projected.id, 4);
        assert_eq!(projected.file_path.as_deref(), Some("src/a.cs"));
        assert_eq!(projected.line, Some(10));
        assert_eq!(projected.comment_source.as_deref(), Some("lint"));
        assert_eq!(projected.comments, vec!["kept".to_string()]);
    }

    #[test]
    fn comment_source_requires_string_value() {
        let mut properties = ThreadProperties::new();
        properties.insert(COMMENT_SOURCE_PROPERTY.to_string(), json!(1));
        let record = ThreadRecord {
            id: 1,
            status: ThreadStatus::Active,
            comments: Vec::new(),
            properties,
        };

        assert_eq!(record.comment_source(), None);
        assert!(!record.is_comment_source("1"));
    }
}
