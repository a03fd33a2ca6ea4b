//! # 통계 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/stats`          → 서재 통계 (올해 월별/계절별 포함)
//! - `GET /api/v1/stats/activity` → 최근 180일 날짜별 읽은 페이지

use axum::{extract::State, Json};
use chrono::{Datelike, Duration, Utc};

use super::books::AppState;
use crate::{db, error::AppError, models::*, services::stats};

const TOP_LIMIT: i64 = 10;
const ACTIVITY_DAYS: i64 = 180;

/// `GET /stats`
pub async fn library_stats(State(state): State<AppState>) -> Result<Json<LibraryStats>, AppError> {
    let current_year = Utc::now().year();
    let mut conn = state.pool.acquire().await?;

    let monthly_pages = stats::monthly_totals(&db::monthly_pages(&mut conn, current_year).await?);

    Ok(Json(LibraryStats {
        total_books: db::count_books(&mut conn).await?,
        total_pages: db::total_pages(&mut conn).await?,
        total_authors: db::count_distinct_authors(&mut conn).await?,
        average_rating: db::average_rating(&mut conn).await?.map(stats::round2),
        books_by_status: db::books_by_status(&mut conn).await?,
        books_by_genre: db::top_genres(&mut conn, TOP_LIMIT).await?,
        seasonal_activity: stats::seasonal_totals(&monthly_pages),
        monthly_pages,
        top_authors: db::top_authors(&mut conn, TOP_LIMIT).await?,
        current_year,
    }))
}

/// `GET /stats/activity` → `{ "dates": [...], "pages": [...] }`
pub async fn reading_activity(
    State(state): State<AppState>,
) -> Result<Json<ReadingActivity>, AppError> {
    let since = Utc::now() - Duration::days(ACTIVITY_DAYS);
    let mut conn = state.pool.acquire().await?;
    let rows = db::daily_pages_since(&mut conn, since).await?;
    Ok(Json(stats::activity_series(rows)))
}
