//! # 독서 목표(Goal) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/goals`      → 목표 목록 (진행도를 다시 계산해 저장)
//! - `POST   /api/v1/goals`      → 목표 추가
//! - `DELETE /api/v1/goals/{id}` → 목표 삭제

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use serde_json::{json, Value};

use super::books::AppState;
use crate::{db, error::AppError, models::*};

/// `GET /goals`
///
/// 목록을 볼 때마다 진행도를 새로 계산해 같은 트랜잭션 안에서 저장합니다.
pub async fn list_goals(State(state): State<AppState>) -> Result<Json<GoalList>, AppError> {
    let mut tx = state.pool.begin().await?;
    let goals = db::refresh_progress(&mut tx).await?;
    tx.commit().await?;

    Ok(Json(GoalList {
        goals,
        current_year: Utc::now().year(),
    }))
}

/// `POST /goals` with `{"year": 2024, "goal_type": "books", "target": 24}`
///
/// 필드가 빠졌거나 target이 양수가 아니면 아무것도 하지 않고 `{"goal": null}`.
/// 같은 연도/종류의 목표가 이미 있으면 409 Conflict.
pub async fn create_goal(
    State(state): State<AppState>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let goal_type = req.goal_type.as_deref().and_then(GoalType::from_form);
    let (Some(year), Some(goal_type), Some(target)) = (req.year, goal_type, req.target.filter(|t| *t > 0))
    else {
        return Ok((StatusCode::OK, Json(json!({ "goal": null }))));
    };

    let mut tx = state.pool.begin().await?;
    if db::find_goal(&mut tx, year, goal_type).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A {} goal for {year} already exists",
            goal_type.as_str()
        )));
    }

    let mut goal = ReadingGoal::new(year, goal_type, target);
    db::insert_goal(&mut tx, &goal).await?;
    goal.current_progress = db::compute_progress(&mut tx, &goal).await?;
    db::update_progress(&mut tx, &goal.id, goal.current_progress).await?;
    tx.commit().await?;

    tracing::info!(goal_id = %goal.id, year, target, "Reading goal created");
    Ok((StatusCode::CREATED, Json(json!({ "goal": goal }))))
}

/// `DELETE /goals/{id}`
pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.pool.begin().await?;
    if !db::delete_goal(&mut tx, &id).await? {
        return Err(AppError::NotFound);
    }
    tx.commit().await?;

    tracing::info!(goal_id = %id, "Reading goal deleted");
    Ok(StatusCode::NO_CONTENT)
}
