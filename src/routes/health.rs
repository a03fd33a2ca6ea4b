//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok" }`

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::books::AppState;
use crate::error::AppError;

/// `GET /health`. DB에 `SELECT 1`이 통하는지까지 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "ok"
    })))
}
