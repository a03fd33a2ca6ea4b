//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `authors`: 작가 목록/추가
//! - `books`: 책 CRUD, 상태/평점/세션, 일괄 작업, 대시보드 (`AppState`도 여기 있음)
//! - `export`: CSV/JSON 내보내기
//! - `goals`: 독서 목표
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `isbn`: ISBN 메타데이터 조회
//! - `stats`: 통계와 독서 활동 그래프

pub mod authors;
pub mod books;
pub mod export;
pub mod goals;
pub mod health;
pub mod isbn;
pub mod stats;

#[cfg(test)]
mod tests;

use axum::{
    routing::{delete, get, post},
    Router,
};

pub use authors::*;
pub use books::*;
pub use export::*;
pub use goals::*;
pub use health::*;
pub use isbn::*;
pub use stats::*;

use crate::error::AppError;

/// `/api/v1` 아래에 붙는 API 라우터
///
/// axum 0.8부터 경로 파라미터는 `{id}` 형식입니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard))
        // 책(Book) API
        .route("/books", get(list_books).post(create_book))
        .route("/books/bulk", post(bulk_update))
        .route("/books/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/books/{id}/status", post(update_status))
        .route("/books/{id}/rating", post(update_rating))
        .route("/books/{id}/sessions", post(add_session))
        // 작가(Author) API
        .route("/authors", get(list_authors).post(create_author))
        // 통계 API
        .route("/stats", get(library_stats))
        .route("/stats/activity", get(reading_activity))
        // 독서 목표 API
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", delete(delete_goal))
        // 내보내기 / 외부 조회
        .route("/export/csv", get(export_csv))
        .route("/export/json", get(export_json))
        .route("/isbn", get(lookup_isbn))
        .fallback(not_found)
        .with_state(state)
}

/// 등록되지 않은 API 경로 → 404 JSON
async fn not_found() -> AppError {
    AppError::NotFound
}
