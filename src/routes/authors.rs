//! # 작가(Author) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/authors` → 작가 목록 (연결된 책 포함)
//! - `POST /api/v1/authors` → 작가 추가

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::books::AppState;
use crate::{db, error::AppError, models::*};

/// `GET /authors` → `{ "authors": [...] }`
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let authors = db::list_authors_with_books(&mut conn).await?;
    Ok(Json(json!({ "authors": authors })))
}

/// `POST /authors`
///
/// 이름이 비어 있으면 저장하지 않고 `{"author": null}`을 돌려줍니다.
pub async fn create_author(
    State(state): State<AppState>,
    Json(req): Json<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Some(name) = non_empty(req.name) else {
        return Ok((StatusCode::OK, Json(json!({ "author": null }))));
    };

    let author = Author {
        id: uuid::Uuid::now_v7().to_string(),
        name,
        biography: non_empty(req.biography),
        photo_url: non_empty(req.photo_url),
    };

    let mut tx = state.pool.begin().await?;
    db::insert_author(&mut tx, &author).await?;
    tx.commit().await?;

    tracing::info!(author_id = %author.id, name = %author.name, "Author added");
    Ok((StatusCode::CREATED, Json(json!({ "author": author }))))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
