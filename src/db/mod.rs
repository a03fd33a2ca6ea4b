//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 트랜잭션이나 연결을 열고 이 모듈의 함수에 넘깁니다.
//!
//! 각 하위 모듈:
//! - `authors`: 작가 목록/생성, 이름으로 작가 찾기
//! - `books`: 책 CRUD, 필터/정렬/페이지네이션 목록, 대시보드용 조회
//! - `goals`: 독서 목표 CRUD와 진행도 재계산
//! - `seed`: 빈 DB에 넣는 데모 데이터
//! - `sessions`: 독서 세션 기록과 세션 기반 집계
//! - `stats`: 서재 전체 집계

pub mod authors;
pub mod books;
pub mod goals;
pub mod seed;
pub mod sessions;
pub mod stats;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::list_books`처럼 바로 접근할 수 있게 합니다.
pub use authors::*;
pub use books::*;
pub use goals::*;
pub use seed::*;
pub use sessions::*;
pub use stats::*;

/// 테스트용 인메모리 DB. 마이그레이션까지 적용된 상태로 돌려줍니다.
///
/// `sqlite::memory:`는 연결마다 별개의 DB이므로 연결을 하나로 고정하고 닫히지 않게 합니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}
