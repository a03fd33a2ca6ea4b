//! # 통계 쿼리 모듈
//!
//! 서재 전체를 대상으로 한 집계 쿼리입니다. 세션 기반 집계는 `sessions` 모듈에 있습니다.

use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::NamedCount;

pub async fn count_books(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// 쪽수가 기록된 책들의 쪽수 합계
pub async fn total_pages(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(page_count), 0) FROM books")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// 서로 다른 작가(author 문자열) 수
pub async fn count_distinct_authors(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT author) FROM books")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// 평점이 있는 책들의 평균. 평점 매긴 책이 없으면 `None`.
pub async fn average_rating(conn: &mut SqliteConnection) -> Result<Option<f64>, AppError> {
    let avg = sqlx::query_scalar::<_, Option<f64>>(
        "SELECT AVG(my_rating) FROM books WHERE my_rating IS NOT NULL",
    )
    .fetch_one(&mut *conn)
    .await?;
    Ok(avg)
}

/// 상태별 책 수 (많은 순)
pub async fn books_by_status(conn: &mut SqliteConnection) -> Result<Vec<NamedCount>, AppError> {
    let rows = sqlx::query_as::<_, NamedCount>(
        r#"
        SELECT reading_status AS name, COUNT(*) AS count
        FROM books
        GROUP BY reading_status
        ORDER BY count DESC, name
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// 장르별 책 수 상위 `limit`개. 장르가 없는 책은 세지 않습니다.
pub async fn top_genres(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<NamedCount>, AppError> {
    let rows = sqlx::query_as::<_, NamedCount>(
        r#"
        SELECT genre AS name, COUNT(*) AS count
        FROM books
        WHERE genre IS NOT NULL AND genre <> ''
        GROUP BY genre
        ORDER BY count DESC, name
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// 책이 많은 작가 상위 `limit`명
pub async fn top_authors(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<NamedCount>, AppError> {
    let rows = sqlx::query_as::<_, NamedCount>(
        r#"
        SELECT author AS name, COUNT(*) AS count
        FROM books
        GROUP BY author
        ORDER BY count DESC, name
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// 해당 연도에 완독한 책 수 (완독일 기준)
pub async fn finished_books_in_year(conn: &mut SqliteConnection, year: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM books
        WHERE reading_status = 'finished'
          AND date_finished_reading IS NOT NULL
          AND strftime('%Y', date_finished_reading) = ?
        "#,
    )
    .bind(format!("{year:04}"))
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}
