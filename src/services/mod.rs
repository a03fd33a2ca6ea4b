//! # 서비스(비즈니스 로직) 모듈
//!
//! DB와 HTTP에 의존하지 않는 규칙들과 외부 API 클라이언트를 모아둔 모듈입니다.
//! - `bulk`: 여러 책에 대한 일괄 작업
//! - `export`: CSV 내보내기
//! - `isbn`: ISBN 메타데이터 조회 (Google Books / Open Library)
//! - `reading`: 독서 상태 전이 규칙과 세션 반영
//! - `stats`: 월별/계절별 집계 보조 함수
//! - `tags`: 쉼표 구분 태그 문자열 처리

pub mod bulk;
pub mod export;
pub mod isbn;
pub mod reading;
pub mod stats;
pub mod tags;

pub use isbn::IsbnClient;
