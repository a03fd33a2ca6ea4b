//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `FRONTEND_DIR`: 빌드된 프론트엔드 정적 파일 디렉토리
//! - `GOOGLE_BOOKS_URL` / `OPEN_LIBRARY_URL` / `COVERS_URL`: ISBN 조회에 쓰는 외부 API 주소
//! - `LOOKUP_TIMEOUT_SECS`: 외부 API 요청 타임아웃(초)
//! - `SEED_DEMO_DATA`: 빈 DB에 예시 데이터를 채울지 여부

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후, 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:data/chaekgalpi.db")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 프론트엔드 빌드 결과물 경로 (없으면 API만 서빙)
    pub frontend_dir: String,
    /// Google Books API 루트 주소
    pub google_books_url: String,
    /// Open Library API 루트 주소
    pub open_library_url: String,
    /// Open Library 표지 이미지 서버 주소
    pub covers_url: String,
    /// ISBN 조회 요청 하나에 허용하는 최대 시간(초)
    pub lookup_timeout_secs: u64,
    /// true이면 빈 데이터베이스에 예시 데이터를 넣습니다
    pub seed_demo_data: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 `VarError`를 반환합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // 파싱 실패 시에도 기본값으로 떨어집니다
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            google_books_url: env::var("GOOGLE_BOOKS_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com".to_string()),
            open_library_url: env::var("OPEN_LIBRARY_URL")
                .unwrap_or_else(|_| "https://openlibrary.org".to_string()),
            covers_url: env::var("COVERS_URL")
                .unwrap_or_else(|_| "https://covers.openlibrary.org".to_string()),
            lookup_timeout_secs: env::var("LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(10),
            // "1", "true", "yes" 중 하나면 켜짐
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
