//! # 책(Book) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/dashboard`           → 첫 화면 요약
//! - `GET    /api/v1/books`               → 필터/정렬/페이지 목록
//! - `POST   /api/v1/books`               → 책 추가
//! - `POST   /api/v1/books/bulk`          → 일괄 작업
//! - `GET    /api/v1/books/{id}`          → 책 상세 (세션, 진행률 그래프)
//! - `PUT    /api/v1/books/{id}`          → 책 수정 (전체 교체)
//! - `DELETE /api/v1/books/{id}`          → 책 삭제
//! - `POST   /api/v1/books/{id}/status`   → 상태 변경
//! - `POST   /api/v1/books/{id}/rating`   → 평점 변경
//! - `POST   /api/v1/books/{id}/sessions` → 독서 세션 추가
//!
//! 쓰기 핸들러는 `state.pool.begin()`으로 트랜잭션을 열고 마지막에 `commit()`합니다.
//! 중간에 `?`로 빠져나가면 트랜잭션이 drop되면서 롤백됩니다.
//! 읽기 핸들러는 풀에서 연결 하나를 빌려 씁니다.
//!
//! 잘못된 입력(빈 제목, 모르는 상태 값, 범위 밖 평점 등)은 에러가 아니라
//! 아무것도 바꾸지 않은 결과를 돌려줍니다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db,
    error::AppError,
    models::*,
    services::{bulk::BulkOperation, reading, IsbnClient},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// ISBN 메타데이터 조회 클라이언트
    pub isbn: IsbnClient,
}

const RECENT_LIMIT: i64 = 5;

/// `GET /dashboard`
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    // 읽기 전용이므로 트랜잭션 없이 연결 하나로 조회
    let mut conn = state.pool.acquire().await?;

    let dashboard = Dashboard {
        total_books: db::count_books(&mut conn).await?,
        reading_books: db::count_books_with_status(&mut conn, ReadingStatus::Reading).await?,
        completed_books: db::count_books_with_status(&mut conn, ReadingStatus::Finished).await?,
        recent_books: db::recent_books(&mut conn, RECENT_LIMIT).await?,
        current_reading: db::books_with_status(&mut conn, ReadingStatus::Reading).await?,
        recently_finished: db::recently_finished(&mut conn, RECENT_LIMIT).await?,
    };
    Ok(Json(dashboard))
}

/// `GET /books?status=&genre=&author=&tag=&rating=&sort=&order=&page=`
///
/// 쿼리 값이 비었거나 해석할 수 없으면 그 조건은 빠집니다.
/// 응답에는 현재 페이지의 책, 페이지 정보, 필터 선택지가 함께 들어갑니다.
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookListQuery>,
) -> Result<Json<BookPage>, AppError> {
    let filter = BookFilter::from(query);
    let mut conn = state.pool.acquire().await?;

    let (books, total) = db::list_books(&mut conn, &filter).await?;
    // 선택지는 필터와 상관없이 서재 전체 기준
    let facets = db::book_facets(&mut conn).await?;

    Ok(Json(BookPage {
        books,
        pagination: Pagination::new(filter.page, PAGE_SIZE, total),
        facets,
    }))
}

/// `author_id`를 정리합니다.
///
/// - 지정된 ID의 작가가 없으면 연결을 끊습니다.
/// - 지정되지 않았으면 이름이 정확히 같은 작가에 연결합니다.
async fn link_author(conn: &mut SqliteConnection, book: &mut Book) -> Result<(), AppError> {
    book.author_id = match book.author_id.take() {
        Some(id) => db::get_author(conn, &id).await?.map(|author| author.id),
        None => db::find_author_id_by_name(conn, &book.author).await?,
    };
    Ok(())
}

/// `POST /books`
///
/// 제목이나 작가가 비어 있으면 아무것도 저장하지 않고 `{"book": null}`을 돌려줍니다.
pub async fn create_book(
    State(state): State<AppState>,
    Json(form): Json<BookForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    // 필수 값이 없으면 저장 없이 200 + null
    let Some(mut book) = reading::book_from_form(form, Utc::now()) else {
        return Ok((StatusCode::OK, Json(json!({ "book": null }))));
    };

    // 작가 확인과 저장을 한 트랜잭션으로
    let mut tx = state.pool.begin().await?;
    link_author(&mut tx, &mut book).await?;
    db::insert_book(&mut tx, &book).await?;
    tx.commit().await?;

    tracing::info!(book_id = %book.id, title = %book.title, "Book added");
    Ok((StatusCode::CREATED, Json(json!({ "book": book }))))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let book = db::get_book(&mut conn, &id).await?.ok_or(AppError::NotFound)?;
    let reading_sessions = db::list_sessions_for_book(&mut conn, &id).await?;
    let progress = reading::progress_series(&book, &reading_sessions);

    Ok(Json(BookDetail {
        book,
        reading_sessions,
        progress,
    }))
}

/// `PUT /books/{id}`
///
/// 편집 가능한 필드를 모두 폼 값으로 바꿉니다. 상태가 바뀌면 전이 규칙이 적용됩니다.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<BookForm>,
) -> Result<Json<Book>, AppError> {
    let mut tx = state.pool.begin().await?;
    let mut book = db::get_book(&mut tx, &id).await?.ok_or(AppError::NotFound)?;

    // 바뀐 게 없으면 커밋하지 않고 tx는 drop 시 롤백
    if reading::apply_edit(&mut book, form, Utc::now()) {
        link_author(&mut tx, &mut book).await?;
        db::update_book(&mut tx, &book).await?;
        tx.commit().await?;
        tracing::info!(book_id = %book.id, "Book updated");
    }
    Ok(Json(book))
}

/// `DELETE /books/{id}`. 세션도 함께 지워집니다.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.pool.begin().await?;
    // 없는 ID → 404 (커밋 전에 반환하므로 롤백)
    if !db::delete_book(&mut tx, &id).await? {
        return Err(AppError::NotFound);
    }
    tx.commit().await?;

    tracing::info!(book_id = %id, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /books/{id}/status` with `{"status": "finished"}`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Book>, AppError> {
    let mut tx = state.pool.begin().await?;
    let mut book = db::get_book(&mut tx, &id).await?.ok_or(AppError::NotFound)?;

    // 알 수 없는 상태 문자열은 무시하고 현재 책을 그대로 돌려줌
    if let Some(status) = req.status.as_deref().and_then(ReadingStatus::from_form) {
        let previous = book.reading_status;
        reading::apply_status(&mut book, status, Utc::now());
        db::update_book(&mut tx, &book).await?;
        tx.commit().await?;
        tracing::info!(book_id = %book.id, from = %previous, to = %status, "Reading status changed");
    }
    Ok(Json(book))
}

/// `POST /books/{id}/rating` with `{"rating": 8}`
pub async fn update_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RatingUpdateRequest>,
) -> Result<Json<Book>, AppError> {
    let mut tx = state.pool.begin().await?;
    let mut book = db::get_book(&mut tx, &id).await?.ok_or(AppError::NotFound)?;

    if reading::apply_rating(&mut book, req.rating) {
        db::update_book(&mut tx, &book).await?;
        tx.commit().await?;
    }
    Ok(Json(book))
}

/// `POST /books/{id}/sessions` with `{"pages_read": 30, "duration_minutes": 45}`
///
/// 세션을 기록하고 책의 current_page를 올립니다. pages_read가 0 이하이면 무시하고
/// `session`은 null이 됩니다.
pub async fn add_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let mut tx = state.pool.begin().await?;
    let mut book = db::get_book(&mut tx, &id).await?.ok_or(AppError::NotFound)?;

    let Some(pages_read) = req.pages_read.filter(|pages| *pages > 0) else {
        return Ok(Json(json!({ "book": book, "session": null })));
    };

    // 세션 시각과 책의 날짜 갱신에 같은 now를 씀
    let now = Utc::now();
    // 음수 시간은 기록하지 않음
    let duration = req.duration_minutes.filter(|minutes| *minutes >= 0);
    let session = ReadingSession::logged_now(&book.id, pages_read, duration, now);
    db::insert_session(&mut tx, &session).await?;
    reading::record_pages(&mut book, pages_read, now);
    db::update_book(&mut tx, &book).await?;
    tx.commit().await?;

    tracing::info!(book_id = %book.id, pages_read, current_page = book.current_page, "Reading session logged");
    Ok(Json(json!({ "book": book, "session": session })))
}

/// `POST /books/bulk`
///
/// `{"book_ids": [...], "operation": "change_status" | "add_tag" | "delete", ...}`
/// 응답의 `affected`는 작업 대상이 된(존재하는) 책 수입니다.
pub async fn bulk_update(
    State(state): State<AppState>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(operation) = BulkOperation::from_request(&req) else {
        return Ok(Json(json!({ "affected": 0 })));
    };
    if req.book_ids.is_empty() {
        return Ok(Json(json!({ "affected": 0 })));
    }

    // 전체 작업이 한 트랜잭션: 중간에 실패하면 아무것도 반영되지 않음
    let mut tx = state.pool.begin().await?;
    let mut affected = 0_u64;

    if operation == BulkOperation::Delete {
        for id in &req.book_ids {
            if db::delete_book(&mut tx, id).await? {
                affected += 1;
            }
        }
    } else {
        let now = Utc::now();
        // 없는 ID는 조회 단계에서 빠지므로 affected에 세지 않음
        for mut book in db::get_books_by_ids(&mut tx, &req.book_ids).await? {
            // 이미 태그가 있는 책 등 바뀐 게 없으면 UPDATE 생략
            if operation.apply(&mut book, now) {
                db::update_book(&mut tx, &book).await?;
            }
            affected += 1;
        }
    }
    tx.commit().await?;

    tracing::info!(?operation, affected, "Bulk operation applied");
    Ok(Json(json!({ "affected": affected })))
}
