//! 콘솔 리포터 포트 구현 어댑터.

use crate::application::ports::Reporter;

/// 콘솔 전용 리포터 어댑터.
/// `quiet`이면 섹션/키-값 진행 출력은 생략하고 결과 줄만 남긴다.
#[derive(Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        if self.quiet {
            return;
        }
        println!();
        println!("==================== {} ====================", name);
    }

    fn kv(&self, key: &str, value: &str) {
        if self.quiet {
            return;
        }
        println!("{:<14}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        println!("[{:<8}] {}", scope, message);
    }

    fn raw(&self, line: &str) {
        println!("{}", line);
    }
}
