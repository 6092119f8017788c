//! Domain layer
//! 비즈니스 규칙(엔티티/값 객체/도메인 정책)을 외부 의존성 없이 표현한다.

pub mod credentials;
pub mod error;
pub mod issue;
pub mod policy;
pub mod review;
pub mod target;
pub mod thread;
