//! # 독서 세션 데이터베이스 쿼리 모듈
//!
//! 세션은 추가만 됩니다. 수정하는 쿼리는 없고, 삭제는 책을 지울 때만 일어납니다.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::ReadingSession;

/// 세션 한 건을 저장합니다.
pub async fn insert_session(
    conn: &mut SqliteConnection,
    session: &ReadingSession,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO reading_sessions (id, book_id, start_time, end_time, pages_read, duration_minutes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.book_id)
    .bind(session.start_time)
    .bind(session.end_time)
    .bind(session.pages_read)
    .bind(session.duration_minutes)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// 책 한 권의 세션 목록 (최근 세션이 먼저)
pub async fn list_sessions_for_book(
    conn: &mut SqliteConnection,
    book_id: &str,
) -> Result<Vec<ReadingSession>, AppError> {
    let sessions = sqlx::query_as::<_, ReadingSession>(
        r#"
        SELECT id, book_id, start_time, end_time, pages_read, duration_minutes
        FROM reading_sessions
        WHERE book_id = ?
        ORDER BY start_time DESC, id DESC
        "#,
    )
    .bind(book_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(sessions)
}

pub async fn delete_sessions_for_book(
    conn: &mut SqliteConnection,
    book_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM reading_sessions WHERE book_id = ?")
        .bind(book_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// 특정 연도 세션들의 월별 페이지 합계. `(월, 페이지)` 쌍이며 세션이 없는 달은 빠집니다.
pub async fn monthly_pages(conn: &mut SqliteConnection, year: i32) -> Result<Vec<(i64, i64)>, AppError> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT CAST(strftime('%m', start_time) AS INTEGER) AS month,
               COALESCE(SUM(pages_read), 0) AS pages
        FROM reading_sessions
        WHERE strftime('%Y', start_time) = ?
        GROUP BY month
        ORDER BY month
        "#,
    )
    .bind(format!("{year:04}"))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// `since` 이후 세션들의 날짜별 페이지 합계 (날짜 오름차순)
pub async fn daily_pages_since(
    conn: &mut SqliteConnection,
    since: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, AppError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT date(start_time) AS day, COALESCE(SUM(pages_read), 0) AS pages
        FROM reading_sessions
        WHERE julianday(start_time) >= julianday(?)
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(since)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// 특정 연도 세션에서 읽은 페이지 합계
pub async fn pages_read_in_year(conn: &mut SqliteConnection, year: i64) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(pages_read), 0) FROM reading_sessions WHERE strftime('%Y', start_time) = ?",
    )
    .bind(format!("{year:04}"))
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}
