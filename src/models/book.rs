//! # 책(Book) 모델 정의
//!
//! 서재의 중심 엔티티인 책과, 책 목록 조회/수정 요청에 쓰이는 구조체들입니다.
//!
//! ## 구조체 역할
//! - `ReadingStatus`: 독서 상태 5가지 (DB에는 kebab-case 문자열로 저장)
//! - `Book`: DB의 `books` 테이블 한 행
//! - `BookForm`: 책 추가/수정 요청 본문
//! - `BookListQuery` → `BookFilter`: 목록 조회 쿼리 파라미터와 그 파싱 결과
//! - `BookPage`: 페이지네이션된 목록 응답

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::ReadingSession;

/// 한 페이지에 보여줄 책 수 (고정값)
pub const PAGE_SIZE: i64 = 20;

/// 책의 독서 상태
///
/// `#[sqlx(rename_all = "kebab-case")]`: DB에는 "not-started" 같은 TEXT로 저장됩니다.
/// `#[serde(rename_all = "kebab-case")]`: JSON에서도 같은 문자열을 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum ReadingStatus {
    NotStarted,
    Reading,
    Finished,
    Abandoned,
    Planned,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 5] = [
        ReadingStatus::NotStarted,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
        ReadingStatus::Abandoned,
        ReadingStatus::Planned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStatus::NotStarted => "not-started",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
            ReadingStatus::Abandoned => "abandoned",
            ReadingStatus::Planned => "planned",
        }
    }

    /// 요청 본문의 문자열을 상태로 변환합니다. 알 수 없는 값이면 None.
    pub fn from_form(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 책 엔티티: DB의 `books` 테이블 한 행에 대응합니다.
///
/// `author`는 작가 이름을 그대로 담는 문자열이고, `author_id`는
/// `authors` 테이블로의 선택적 링크입니다. 둘 사이의 일관성은 강제하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_id: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    /// 쉼표로 구분된 태그 목록 (예: "classic, philosophy")
    pub tags: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<i64>,
    pub physical_location: Option<String>,
    pub reading_status: ReadingStatus,
    /// 1~10 사이의 개인 평점
    pub my_rating: Option<i64>,
    pub date_added: DateTime<Utc>,
    pub date_started_reading: Option<DateTime<Utc>>,
    pub date_finished_reading: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// 현재 읽고 있는 페이지. page_count를 넘지 않습니다.
    pub current_page: i64,
}

impl Book {
    /// 제목과 작가만 채운 새 책을 만듭니다. ID는 UUIDv7로 생성합니다.
    pub fn new(title: impl Into<String>, author: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            title: title.into(),
            author: author.into(),
            author_id: None,
            isbn: None,
            publication_year: None,
            publisher: None,
            genre: None,
            tags: None,
            description: None,
            cover_image_url: None,
            language: None,
            page_count: None,
            physical_location: None,
            reading_status: ReadingStatus::NotStarted,
            my_rating: None,
            date_added: now,
            date_started_reading: None,
            date_finished_reading: None,
            notes: None,
            current_page: 0,
        }
    }
}

/// 책 추가/수정 요청: `POST /books`, `PUT /books/{id}`의 요청 본문입니다.
///
/// 모든 필드가 Option입니다. 제목이나 작가가 비어 있으면 요청 전체를 무시합니다.
/// 수정(PUT)은 전체 교체 방식이라, 빠진 필드는 비워집니다.
#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_id: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<i64>,
    pub physical_location: Option<String>,
    pub reading_status: Option<String>,
    pub my_rating: Option<i64>,
    pub notes: Option<String>,
}

/// `POST /books/{id}/status` 요청 본문
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// `POST /books/{id}/rating` 요청 본문
#[derive(Debug, Deserialize)]
pub struct RatingUpdateRequest {
    pub rating: Option<i64>,
}

/// `POST /books/bulk` 요청 본문
///
/// `operation`에 따라 `new_status` 또는 `new_tag`를 사용합니다.
#[derive(Debug, Default, Deserialize)]
pub struct BulkRequest {
    #[serde(default)]
    pub book_ids: Vec<String>,
    pub operation: Option<String>,
    pub new_status: Option<String>,
    pub new_tag: Option<String>,
}

/// 정렬 기준 (허용된 컬럼만)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    Author,
    Rating,
    #[default]
    DateAdded,
    PublicationYear,
    PageCount,
}

impl SortKey {
    /// 알 수 없는 키는 기본값(date_added)으로 조용히 대체합니다.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("title") => SortKey::Title,
            Some("author") => SortKey::Author,
            Some("rating") => SortKey::Rating,
            Some("publication_year") => SortKey::PublicationYear,
            Some("page_count") => SortKey::PageCount,
            _ => SortKey::DateAdded,
        }
    }

    /// ORDER BY에 들어갈 컬럼 이름. 사용자 입력이 SQL에 직접 들어가지 않도록
    /// 고정된 문자열만 반환합니다.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Rating => "my_rating",
            SortKey::DateAdded => "date_added",
            SortKey::PublicationYear => "publication_year",
            SortKey::PageCount => "page_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// `GET /books`의 URL 쿼리 파라미터
///
/// 숫자 값도 String으로 받습니다. `?page=abc` 같은 값이 400 에러가 되지 않고
/// 기본값으로 떨어지게 하기 위해서입니다.
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub status: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub rating: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

/// 파싱이 끝난 목록 조회 조건
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub status: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    /// 태그 문자열 안의 부분 일치
    pub tag: Option<String>,
    pub rating: Option<i64>,
    pub sort: SortKey,
    pub order: SortOrder,
    /// 1부터 시작하는 페이지 번호
    pub page: i64,
}

impl From<BookListQuery> for BookFilter {
    fn from(query: BookListQuery) -> Self {
        // 빈 문자열은 "필터 없음"으로 취급합니다
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            sort: SortKey::from_param(query.sort.as_deref()),
            order: SortOrder::from_param(query.order.as_deref()),
            page: query
                .page
                .as_deref()
                .and_then(|p| p.trim().parse::<i64>().ok())
                .filter(|p| *p >= 1)
                .unwrap_or(1),
            rating: query
                .rating
                .as_deref()
                .and_then(|r| r.trim().parse::<i64>().ok()),
            status: non_empty(query.status),
            genre: non_empty(query.genre),
            author: non_empty(query.author),
            tag: non_empty(query.tag),
        }
    }
}

/// 페이지네이션 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        // 올림 나눗셈: 전체 21권이면 2페이지
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        Self {
            page,
            per_page,
            total,
            pages,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }
}

/// 목록 화면의 필터 선택지
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookFacets {
    pub genres: Vec<String>,
    pub authors: Vec<String>,
    pub statuses: Vec<String>,
    pub tags: Vec<String>,
}

/// `GET /books` 응답
#[derive(Debug, Serialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
    pub facets: BookFacets,
}

/// 진행률 그래프의 한 점 (세션 단위 누적 페이지)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    /// YYYY-MM-DD
    pub date: String,
    pub pages: i64,
    pub session_pages: i64,
}

/// `GET /books/{id}` 응답
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
    pub reading_sessions: Vec<ReadingSession>,
    pub progress: Vec<ProgressPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_form_values() {
        for status in ReadingStatus::ALL {
            assert_eq!(ReadingStatus::from_form(status.as_str()), Some(status));
        }
        assert_eq!(ReadingStatus::from_form(" finished "), Some(ReadingStatus::Finished));
        assert_eq!(ReadingStatus::from_form("done"), None);
    }

    #[test]
    fn unknown_sort_falls_back_to_date_added_desc() {
        let filter = BookFilter::from(BookListQuery {
            sort: Some("isbn; DROP TABLE books".to_string()),
            order: Some("sideways".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.sort, SortKey::DateAdded);
        assert_eq!(filter.order, SortOrder::Desc);
    }

    #[test]
    fn list_query_ignores_empty_and_unparsable_values() {
        let filter = BookFilter::from(BookListQuery {
            status: Some(String::new()),
            genre: Some("  ".to_string()),
            rating: Some("ten".to_string()),
            page: Some("-3".to_string()),
            tag: Some("classic".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.status, None);
        assert_eq!(filter.genre, None);
        assert_eq!(filter.rating, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.tag.as_deref(), Some("classic"));
    }

    #[test]
    fn pagination_rounds_page_count_up() {
        let p = Pagination::new(2, PAGE_SIZE, 41);
        assert_eq!(p.pages, 3);
        assert!(p.has_prev);
        assert!(p.has_next);

        let empty = Pagination::new(1, PAGE_SIZE, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_prev);
        assert!(!empty.has_next);
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&ReadingStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
    }
}
