//! # ISBN 메타데이터 조회 서비스
//!
//! ISBN 하나로 외부 API에서 책 정보(제목, 작가, 출판사, 표지 등)를 가져옵니다.
//!
//! ## 조회 순서
//! 1. Google Books volumes API (`/books/v1/volumes?q=isbn:…`)
//! 2. 못 찾으면 Open Library books API (`/api/books?bibkeys=ISBN:…&jscmd=data`)
//!
//! 네트워크 오류, 잘못된 응답, 결과 없음은 모두 로그만 남기고 `None`으로 돌려줍니다.
//! 호출하는 쪽에서는 "찾을 수 없음" 하나로만 처리하면 됩니다.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

const USER_AGENT: &str = "chaekgalpi/0.1";

/// 출판일 문자열 안의 네 자리 연도
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year pattern"));

/// 외부 조회 중 발생하는 에러. 밖으로 나가지 않고 로그로만 기록됩니다.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// 조회 결과: 책 추가 폼을 미리 채우는 데 쓰는 값들
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i64>,
    pub language: Option<String>,
    pub cover_image_url: Option<String>,
    pub page_count: Option<i64>,
}

/// ISBN 조회 HTTP 클라이언트
///
/// `reqwest::Client`는 내부적으로 Arc로 연결 풀을 공유하므로 clone해도 가볍습니다.
#[derive(Debug, Clone)]
pub struct IsbnClient {
    http: reqwest::Client,
    google_books_url: String,
    open_library_url: String,
    covers_url: String,
}

impl IsbnClient {
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        Self::new(
            &config.google_books_url,
            &config.open_library_url,
            &config.covers_url,
            Duration::from_secs(config.lookup_timeout_secs),
        )
    }

    pub fn new(
        google_books_url: &str,
        open_library_url: &str,
        covers_url: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            google_books_url: google_books_url.trim_end_matches('/').to_string(),
            open_library_url: open_library_url.trim_end_matches('/').to_string(),
            covers_url: covers_url.trim_end_matches('/').to_string(),
        })
    }

    /// 원본 ISBN 문자열(하이픈/공백 허용)로 책 정보를 찾습니다.
    ///
    /// 유효한 ISBN-10은 ISBN-13으로 바꿔서 조회합니다.
    pub async fn lookup(&self, raw_isbn: &str) -> Option<BookMetadata> {
        let isbn = normalize_isbn(raw_isbn)?;

        match self.google_books(&isbn).await {
            Ok(Some(found)) => return Some(found),
            Ok(None) => tracing::debug!(%isbn, "Google Books has no match"),
            Err(e) => tracing::warn!(%isbn, error = %e, "Google Books lookup failed"),
        }

        match self.open_library(&isbn).await {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                tracing::info!(%isbn, "No metadata found for ISBN");
                None
            }
            Err(e) => {
                tracing::warn!(%isbn, error = %e, "Open Library lookup failed");
                None
            }
        }
    }

    async fn google_books(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        let url = format!("{}/books/v1/volumes", self.google_books_url);
        let response: VolumesResponse = self
            .http
            .get(&url)
            .query(&[("q", format!("isbn:{isbn}"))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(info) = response.items.into_iter().next().map(|v| v.volume_info) else {
            return Ok(None);
        };
        let Some(title) = info.title.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        Ok(Some(BookMetadata {
            title,
            author: info.authors.into_iter().next().unwrap_or_default(),
            isbn: isbn.to_string(),
            publisher: info.publisher,
            publication_year: info.published_date.as_deref().and_then(extract_year),
            language: info.language,
            // Google Books 썸네일은 작아서 Open Library 표지 주소를 사용합니다
            cover_image_url: Some(format!("{}/b/isbn/{isbn}-L.jpg", self.covers_url)),
            page_count: info.page_count,
        }))
    }

    async fn open_library(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        let url = format!("{}/api/books", self.open_library_url);
        let key = format!("ISBN:{isbn}");
        let response = self
            .http
            .get(&url)
            .query(&[("bibkeys", key.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let mut books: HashMap<String, OpenLibraryBook> = response.json().await?;
        let Some(book) = books.remove(&key) else {
            return Ok(None);
        };
        let Some(title) = book.title.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        Ok(Some(BookMetadata {
            title,
            author: first_name(book.authors),
            isbn: isbn.to_string(),
            publisher: Some(first_name(book.publishers)).filter(|p| !p.is_empty()),
            publication_year: book.publish_date.as_deref().and_then(extract_year),
            language: None,
            cover_image_url: book.cover.and_then(|c| c.large),
            page_count: book.number_of_pages,
        }))
    }
}

// ── 외부 API 응답 구조 (필요한 필드만) ──

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    language: Option<String>,
    page_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryBook {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
    publish_date: Option<String>,
    cover: Option<Cover>,
    number_of_pages: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Cover {
    large: Option<String>,
}

fn first_name(entries: Vec<Named>) -> String {
    entries.into_iter().next().map(|n| n.name).unwrap_or_default()
}

/// 하이픈/공백을 지우고, 유효한 ISBN-10은 ISBN-13으로 바꿉니다.
///
/// ISBN-13은 숫자 13개, ISBN-10은 숫자 9개 뒤에 숫자나 `X` 하나입니다.
/// 모양이 맞지 않거나 ISBN-10 체크섬이 틀리면 None.
pub fn normalize_isbn(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == 'X' || *ch == 'x')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    match cleaned.len() {
        10 if is_valid_isbn10(&cleaned) => isbn10_to_13(&cleaned),
        13 if cleaned.chars().all(|ch| ch.is_ascii_digit()) => Some(cleaned),
        _ => None,
    }
}

fn is_valid_isbn10(value: &str) -> bool {
    let mut sum = 0;
    for (index, ch) in value.chars().enumerate() {
        let digit = match (index, ch) {
            (9, 'X') => 10,
            (_, ch) => match ch.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += digit * (10 - index as u32);
    }
    sum % 11 == 0
}

fn isbn10_to_13(isbn10: &str) -> Option<String> {
    let base = format!("978{}", &isbn10[..9]);
    let mut sum = 0;
    for (index, ch) in base.chars().enumerate() {
        let weight = if index % 2 == 0 { 1 } else { 3 };
        sum += ch.to_digit(10)? * weight;
    }
    let check = (10 - sum % 10) % 10;
    Some(format!("{base}{check}"))
}

/// "March 2003", "2003-05-01" 같은 문자열에서 네 자리 연도를 꺼냅니다.
fn extract_year(text: &str) -> Option<i64> {
    let captures = YEAR.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> IsbnClient {
        IsbnClient::new(
            &server.uri(),
            &server.uri(),
            "https://covers.example.org",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn converts_isbn10_to_isbn13() {
        assert_eq!(normalize_isbn("0-306-40615-2").as_deref(), Some("9780306406157"));
        assert_eq!(normalize_isbn("080442957X").as_deref(), Some("9780804429573"));
    }

    #[test]
    fn keeps_isbn13_and_rejects_other_lengths() {
        assert_eq!(normalize_isbn("978-0-306-40615-7").as_deref(), Some("9780306406157"));
        assert_eq!(normalize_isbn("12345"), None);
        assert_eq!(normalize_isbn(""), None);
    }

    #[test]
    fn rejects_misplaced_x_and_bad_isbn10_checksum() {
        // X는 ISBN-10의 마지막 자리에만 올 수 있음
        assert_eq!(normalize_isbn("97803064X6157"), None);
        assert_eq!(normalize_isbn("X306406152"), None);
        // 체크 자리가 틀린 ISBN-10
        assert_eq!(normalize_isbn("0306406153"), None);
        assert_eq!(normalize_isbn("0-8044-2957-x").as_deref(), Some("9780804429573"));
    }

    #[test]
    fn extracts_year_from_free_text() {
        assert_eq!(extract_year("March 2003"), Some(2003));
        assert_eq!(extract_year("1999-05-01"), Some(1999));
        assert_eq!(extract_year("unknown"), None);
    }

    #[tokio::test]
    async fn google_books_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("q", "isbn:9780306406157"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalItems": 1,
                "items": [{
                    "volumeInfo": {
                        "title": "Roadside Picnic",
                        "authors": ["Arkady Strugatsky", "Boris Strugatsky"],
                        "publisher": "Macmillan",
                        "publishedDate": "1977-06",
                        "language": "en",
                        "pageCount": 145
                    }
                }]
            })))
            .mount(&server)
            .await;

        let found = client(&server).lookup("0306406152").await.unwrap();
        assert_eq!(
            found,
            BookMetadata {
                title: "Roadside Picnic".to_string(),
                author: "Arkady Strugatsky".to_string(),
                isbn: "9780306406157".to_string(),
                publisher: Some("Macmillan".to_string()),
                publication_year: Some(1977),
                language: Some("en".to_string()),
                cover_image_url: Some(
                    "https://covers.example.org/b/isbn/9780306406157-L.jpg".to_string()
                ),
                page_count: Some(145),
            }
        );
    }

    #[tokio::test]
    async fn falls_back_to_open_library() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/books"))
            .and(query_param("bibkeys", "ISBN:9780306406157"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ISBN:9780306406157": {
                    "title": "Hard to Be a God",
                    "authors": [{ "name": "Arkady Strugatsky" }],
                    "publishers": [{ "name": "Seabury Press" }],
                    "publish_date": "March 1973",
                    "cover": { "large": "https://covers.example.org/large.jpg" },
                    "number_of_pages": 219
                }
            })))
            .mount(&server)
            .await;

        let found = client(&server).lookup("9780306406157").await.unwrap();
        assert_eq!(found.title, "Hard to Be a God");
        assert_eq!(found.publisher.as_deref(), Some("Seabury Press"));
        assert_eq!(found.publication_year, Some(1973));
        assert_eq!(found.page_count, Some(219));
        assert_eq!(found.cover_image_url.as_deref(), Some("https://covers.example.org/large.jpg"));
    }

    #[tokio::test]
    async fn server_errors_are_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert_eq!(client(&server).lookup("9780306406157").await, None);
    }

    #[tokio::test]
    async fn unknown_isbn_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/books"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert_eq!(client(&server).lookup("9780306406157").await, None);
    }
}
