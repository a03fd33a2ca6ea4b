//! # 독서 목표 데이터베이스 쿼리 모듈
//!
//! 진행도(`current_progress`)는 목록을 읽을 때마다 `refresh_progress`로 다시 계산해
//! 저장합니다.
//! - books 목표: 그 해에 완독한 책 수
//! - pages 목표: 그 해 세션에서 읽은 페이지 합계

use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{GoalType, ReadingGoal};

/// 목표 목록 (최근 연도 먼저, 같은 연도에서는 books → pages)
pub async fn list_goals(conn: &mut SqliteConnection) -> Result<Vec<ReadingGoal>, AppError> {
    let goals = sqlx::query_as::<_, ReadingGoal>(
        r#"
        SELECT id, year, goal_type, target, current_progress
        FROM reading_goals
        ORDER BY year DESC, goal_type
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(goals)
}

/// (연도, 종류) 조합으로 목표를 찾습니다. 조합당 목표는 하나뿐입니다.
pub async fn find_goal(
    conn: &mut SqliteConnection,
    year: i64,
    goal_type: GoalType,
) -> Result<Option<ReadingGoal>, AppError> {
    let goal = sqlx::query_as::<_, ReadingGoal>(
        r#"
        SELECT id, year, goal_type, target, current_progress
        FROM reading_goals
        WHERE year = ? AND goal_type = ?
        "#,
    )
    .bind(year)
    .bind(goal_type)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(goal)
}

pub async fn insert_goal(conn: &mut SqliteConnection, goal: &ReadingGoal) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO reading_goals (id, year, goal_type, target, current_progress)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&goal.id)
    .bind(goal.year)
    .bind(goal.goal_type)
    .bind(goal.target)
    .bind(goal.current_progress)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// # 반환값
/// - `Ok(true)`: 삭제 성공
/// - `Ok(false)`: 해당 ID의 목표가 없음
pub async fn delete_goal(conn: &mut SqliteConnection, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM reading_goals WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_progress(
    conn: &mut SqliteConnection,
    id: &str,
    progress: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE reading_goals SET current_progress = ? WHERE id = ?")
        .bind(progress)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// 목표 하나의 현재 진행도를 계산합니다.
pub async fn compute_progress(
    conn: &mut SqliteConnection,
    goal: &ReadingGoal,
) -> Result<i64, AppError> {
    match goal.goal_type {
        GoalType::Books => super::stats::finished_books_in_year(conn, goal.year).await,
        GoalType::Pages => super::sessions::pages_read_in_year(conn, goal.year).await,
    }
}

/// 모든 목표의 진행도를 다시 계산해 저장하고, 갱신된 목록을 반환합니다.
pub async fn refresh_progress(conn: &mut SqliteConnection) -> Result<Vec<ReadingGoal>, AppError> {
    let mut goals = list_goals(conn).await?;

    for goal in &mut goals {
        let progress = compute_progress(conn, goal).await?;
        if progress != goal.current_progress {
            update_progress(conn, &goal.id, progress).await?;
            goal.current_progress = progress;
        }
    }

    Ok(goals)
}
