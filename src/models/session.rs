//! # 독서 세션 모델 정의
//!
//! 독서 세션은 "언제, 몇 페이지를, 얼마 동안 읽었는지"를 기록하는
//! 추가 전용(append-only) 로그입니다. 책이 삭제될 때만 함께 지워집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 독서 세션 엔티티: DB의 `reading_sessions` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReadingSession {
    /// 세션 고유 식별자 (UUIDv7)
    pub id: String,
    /// 이 세션이 속한 책의 ID (외래키)
    pub book_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// 이번 세션에서 읽은 페이지 수 (항상 양수)
    pub pages_read: i64,
    /// 읽은 시간(분), 선택 항목
    pub duration_minutes: Option<i64>,
}

impl ReadingSession {
    /// 지금 막 끝난 세션을 만듭니다. 시작/종료 시각은 모두 `now`입니다.
    pub fn logged_now(
        book_id: impl Into<String>,
        pages_read: i64,
        duration_minutes: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            book_id: book_id.into(),
            start_time: now,
            end_time: Some(now),
            pages_read,
            duration_minutes,
        }
    }
}

/// 세션 추가 요청: `POST /api/v1/books/{id}/sessions`의 요청 본문입니다.
///
/// pages_read가 없거나 0 이하이면 요청을 무시합니다.
#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub pages_read: Option<i64>,
    pub duration_minutes: Option<i64>,
}
