//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `author`: 작가(Author)
//! - `book`: 책(Book), 목록 조회 조건, 요청 본문
//! - `goal`: 연도별 독서 목표
//! - `session`: 독서 세션
//! - `stats`: 통계/대시보드 응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Book`처럼 짧게 쓸 수 있게 합니다.

pub mod author;
pub mod book;
pub mod goal;
pub mod session;
pub mod stats;

pub use author::*;
pub use book::*;
pub use goal::*;
pub use session::*;
pub use stats::*;
