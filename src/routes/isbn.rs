//! # ISBN 조회 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/isbn?isbn=978-0-14-044913-6` → 책 메타데이터, 못 찾으면 404

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::books::AppState;
use crate::{error::AppError, services::isbn::BookMetadata};

#[derive(Debug, Deserialize)]
pub struct IsbnQuery {
    #[serde(default)]
    pub isbn: String,
}

/// `GET /isbn?isbn=…`
///
/// 외부 API 오류는 서비스 안에서 로그로 남기고, 여기서는 모두 404로 돌려줍니다.
pub async fn lookup_isbn(
    State(state): State<AppState>,
    Query(query): Query<IsbnQuery>,
) -> Result<Json<BookMetadata>, AppError> {
    let metadata = state
        .isbn
        .lookup(&query.isbn)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(Json(metadata))
}
