//! # 독서 목표 모델 정의
//!
//! 연도별 목표(읽은 책 수 또는 읽은 페이지 수)입니다.
//! `current_progress`는 저장되지만 기준 값이 아닙니다. 목록을 조회할 때마다
//! 책/세션 데이터에서 다시 계산하여 덮어씁니다.

use serde::{Deserialize, Serialize};

/// 목표 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum GoalType {
    /// 해당 연도에 완독한 책 수
    Books,
    /// 해당 연도 세션에서 읽은 페이지 합계
    Pages,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::Books => "books",
            GoalType::Pages => "pages",
        }
    }

    pub fn from_form(value: &str) -> Option<Self> {
        match value.trim() {
            "books" => Some(GoalType::Books),
            "pages" => Some(GoalType::Pages),
            _ => None,
        }
    }
}

/// 독서 목표 엔티티: DB의 `reading_goals` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReadingGoal {
    pub id: String,
    pub year: i64,
    pub goal_type: GoalType,
    pub target: i64,
    pub current_progress: i64,
}

impl ReadingGoal {
    pub fn new(year: i64, goal_type: GoalType, target: i64) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            year,
            goal_type,
            target,
            current_progress: 0,
        }
    }
}

/// 목표 생성 요청: `POST /api/v1/goals`
///
/// 세 필드 모두 필요하고 target은 양수여야 합니다. 하나라도 어긋나면 무시합니다.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub year: Option<i64>,
    pub goal_type: Option<String>,
    pub target: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GoalList {
    pub goals: Vec<ReadingGoal>,
    pub current_year: i32,
}
