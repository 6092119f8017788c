//! 외부 분석기가 보고한 코드 이슈(읽기 전용 입력).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Undefined,
    Hint,
    Suggestion,
    Warning,
    Error,
}

impl Priority {
    /// 설정/입력 문자열을 우선순위로 변환한다. 알 수 없는 값은 Undefined.
    pub fn from_label(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Undefined;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "hint" => Self::Hint,
            "suggestion" => Self::Suggestion,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// 저장소 루트 기준 상대 경로
    pub file_path: String,
    pub line: Option<i64>,
    pub message: String,
    pub priority: Priority,
    pub rule: Option<String>,
}

impl Issue {
    pub fn new(file_path: impl Into<String>, line: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            message: message.into(),
            priority: Priority::Undefined,
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}
