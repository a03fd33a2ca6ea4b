//! # 내보내기 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/export/csv`  → CSV 파일 다운로드
//! - `GET /api/v1/export/json` → 모든 책을 JSON 배열로

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::books::AppState;
use crate::{db, error::AppError, models::Book, services::export};

/// `GET /export/csv`
///
/// `Content-Disposition: attachment; filename="library_export_YYYYMMDD.csv"`
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = state.pool.acquire().await?;
    let books = db::list_all_books(&mut conn).await?;
    let body = export::books_to_csv(&books)?;
    let filename = export::csv_filename(Utc::now().date_naive());

    tracing::info!(books = books.len(), %filename, "CSV export");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// `GET /export/json`
pub async fn export_json(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let books = db::list_all_books(&mut conn).await?;
    Ok(Json(books))
}
