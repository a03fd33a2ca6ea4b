//! # 통계 집계 보조 함수
//!
//! DB에서 GROUP BY로 받아온 행들을 화면에 쓰는 모양으로 바꿉니다.
//! - 월별 합계 → 12칸 고정 배열
//! - 12칸 배열 → 계절 4구간
//! - 평균 평점 반올림
//! - 날짜별 합계 → 나란한 두 배열

use crate::models::{ReadingActivity, SeasonalTotals};

/// `(월, 페이지)` 행들을 12칸 배열로 채웁니다. 인덱스 0이 1월입니다.
///
/// 세션이 없는 달은 0이고, 1~12 밖의 월 값은 버립니다.
pub fn monthly_totals(rows: &[(i64, i64)]) -> [i64; 12] {
    let mut months = [0_i64; 12];
    for &(month, pages) in rows {
        if (1..=12).contains(&month) {
            months[(month - 1) as usize] += pages;
        }
    }
    months
}

/// 12칸 월별 배열을 계절별 합계로 묶습니다.
///
/// 겨울 = 12·1·2월, 봄 = 3·4·5월, 여름 = 6·7·8월, 가을 = 9·10·11월
pub fn seasonal_totals(monthly: &[i64; 12]) -> SeasonalTotals {
    let mut seasons = SeasonalTotals::default();
    for (index, pages) in monthly.iter().enumerate() {
        match index {
            11 | 0 | 1 => seasons.winter += pages,
            2..=4 => seasons.spring += pages,
            5..=7 => seasons.summer += pages,
            _ => seasons.autumn += pages,
        }
    }
    seasons
}

/// 소수점 둘째 자리 반올림
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(YYYY-MM-DD, 페이지)` 행들을 나란한 두 배열로 나눕니다. 순서는 그대로 유지합니다.
pub fn activity_series(rows: Vec<(String, i64)>) -> ReadingActivity {
    let (dates, pages) = rows.into_iter().unzip();
    ReadingActivity { dates, pages }
}
