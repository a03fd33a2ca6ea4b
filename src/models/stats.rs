//! # 통계 모델 정의
//!
//! 통계 화면, 대시보드, 독서 활동 API의 응답 구조체들입니다.

use serde::Serialize;

use super::book::Book;

/// 이름별 개수 (장르별 책 수, 작가별 책 수, 상태별 책 수)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct NamedCount {
    pub name: String,
    pub count: i64,
}

/// 계절별 읽은 페이지 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeasonalTotals {
    /// 12월, 1월, 2월
    pub winter: i64,
    /// 3월, 4월, 5월
    pub spring: i64,
    /// 6월, 7월, 8월
    pub summer: i64,
    /// 9월, 10월, 11월
    pub autumn: i64,
}

/// `GET /api/v1/stats` 응답
#[derive(Debug, Serialize)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_pages: i64,
    pub total_authors: i64,
    /// 평점이 있는 책들의 평균 (소수점 둘째 자리 반올림), 평점이 없으면 null
    pub average_rating: Option<f64>,
    pub books_by_status: Vec<NamedCount>,
    pub books_by_genre: Vec<NamedCount>,
    /// 올해 월별 읽은 페이지 (인덱스 0 = 1월)
    pub monthly_pages: [i64; 12],
    pub seasonal_activity: SeasonalTotals,
    pub top_authors: Vec<NamedCount>,
    pub current_year: i32,
}

/// `GET /api/v1/stats/activity` 응답: 날짜별 페이지 수를 나란한 두 배열로
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ReadingActivity {
    pub dates: Vec<String>,
    pub pages: Vec<i64>,
}

/// `GET /api/v1/dashboard` 응답
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_books: i64,
    pub reading_books: i64,
    pub completed_books: i64,
    pub recent_books: Vec<Book>,
    pub current_reading: Vec<Book>,
    pub recently_finished: Vec<Book>,
}
