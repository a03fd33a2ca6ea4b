//! 라우터 전체를 `oneshot`으로 호출하는 통합 테스트

use std::collections::BTreeSet;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{api_router, AppState};
use crate::db::test_pool;
use crate::services::IsbnClient;

async fn app_with_lookup(lookup_base: &str) -> Router {
    let isbn = IsbnClient::new(lookup_base, lookup_base, "https://covers.example.org", Duration::from_secs(2))
        .unwrap();
    api_router(AppState {
        pool: test_pool().await,
        isbn,
    })
}

async fn app() -> Router {
    // 조회 테스트가 아니면 외부 주소는 호출되지 않습니다
    app_with_lookup("http://127.0.0.1:9").await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, "/books", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["book"].clone()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_book_and_route_are_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/books/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(&app, Method::DELETE, "/books/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_without_title_is_ignored() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/books", Some(json!({ "author": "Anonymous" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], Value::Null);

    let (_, page) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(page["pagination"]["total"], 0);
}

#[tokio::test]
async fn reading_flow_keeps_current_page_within_page_count() {
    let app = app().await;
    let book = create(&app, json!({ "title": "Oblomov", "author": "Ivan Goncharov", "page_count": 100 })).await;
    let id = book["id"].as_str().unwrap().to_string();
    assert_eq!(book["reading_status"], "not-started");

    // 첫 세션이 not-started → reading 전환
    let (_, body) = send(&app, Method::POST, &format!("/books/{id}/sessions"), Some(json!({ "pages_read": 60 }))).await;
    assert_eq!(body["book"]["reading_status"], "reading");
    assert_eq!(body["book"]["current_page"], 60);
    assert!(body["book"]["date_started_reading"].is_string());

    let (_, body) = send(&app, Method::POST, &format!("/books/{id}/sessions"), Some(json!({ "pages_read": 80, "duration_minutes": 30 }))).await;
    assert_eq!(body["book"]["current_page"], 100);

    // pages_read가 0이면 무시
    let (_, body) = send(&app, Method::POST, &format!("/books/{id}/sessions"), Some(json!({ "pages_read": 0 }))).await;
    assert_eq!(body["session"], Value::Null);

    let (_, detail) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(detail["reading_sessions"].as_array().unwrap().len(), 2);
    assert_eq!(detail["progress"].as_array().unwrap().len(), 2);
    assert_eq!(detail["progress"][1]["pages"], 140);

    let (_, finished) = send(&app, Method::POST, &format!("/books/{id}/status"), Some(json!({ "status": "finished" }))).await;
    assert_eq!(finished["current_page"], 100);
    assert!(finished["date_finished_reading"].is_string());

    // 모르는 상태 값은 아무것도 바꾸지 않음
    let (status, same) = send(&app, Method::POST, &format!("/books/{id}/status"), Some(json!({ "status": "lost" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["reading_status"], "finished");

    let (_, reset) = send(&app, Method::POST, &format!("/books/{id}/status"), Some(json!({ "status": "not-started" }))).await;
    assert_eq!(reset["current_page"], 0);
    assert_eq!(reset["date_started_reading"], Value::Null);
    assert_eq!(reset["date_finished_reading"], Value::Null);
}

#[tokio::test]
async fn rating_outside_range_is_ignored() {
    let app = app().await;
    let book = create(&app, json!({ "title": "Walden", "author": "Henry David Thoreau" })).await;
    let id = book["id"].as_str().unwrap();

    let (_, rated) = send(&app, Method::POST, &format!("/books/{id}/rating"), Some(json!({ "rating": 7 }))).await;
    assert_eq!(rated["my_rating"], 7);
    let (_, same) = send(&app, Method::POST, &format!("/books/{id}/rating"), Some(json!({ "rating": 11 }))).await;
    assert_eq!(same["my_rating"], 7);
}

#[tokio::test]
async fn list_filters_and_reports_facets() {
    let app = app().await;
    create(&app, json!({ "title": "Solaris", "author": "Stanislaw Lem", "genre": "Sci-Fi", "tags": "space,classic" })).await;
    create(&app, json!({ "title": "Ubik", "author": "Philip K. Dick", "genre": "Sci-Fi", "reading_status": "reading" })).await;
    create(&app, json!({ "title": "Emma", "author": "Jane Austen", "genre": "Romance" })).await;

    let (_, page) = send(&app, Method::GET, "/books?genre=Sci-Fi&sort=title&order=asc", None).await;
    let titles: Vec<&str> = page["books"].as_array().unwrap().iter().map(|b| b["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Solaris", "Ubik"]);
    assert_eq!(page["pagination"]["total"], 2);
    assert_eq!(page["facets"]["genres"], json!(["Romance", "Sci-Fi"]));
    assert_eq!(page["facets"]["tags"], json!(["classic", "space"]));

    let (_, page) = send(&app, Method::GET, "/books?status=reading&rating=&page=abc", None).await;
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["pagination"]["page"], 1);
}

#[tokio::test]
async fn bulk_add_tag_is_idempotent() {
    let app = app().await;
    let a = create(&app, json!({ "title": "Nana", "author": "Emile Zola", "tags": "french" })).await;
    let b = create(&app, json!({ "title": "Germinal", "author": "Emile Zola" })).await;
    let ids = json!([a["id"], b["id"]]);

    for _ in 0..2 {
        let (_, result) = send(&app, Method::POST, "/books/bulk", Some(json!({ "book_ids": ids.clone(), "operation": "add_tag", "new_tag": " naturalism " }))).await;
        assert_eq!(result["affected"], 2);
    }

    let (_, detail) = send(&app, Method::GET, &format!("/books/{}", a["id"].as_str().unwrap()), None).await;
    assert_eq!(detail["book"]["tags"], "french,naturalism");
    let (_, detail) = send(&app, Method::GET, &format!("/books/{}", b["id"].as_str().unwrap()), None).await;
    assert_eq!(detail["book"]["tags"], "naturalism");

    let (_, result) = send(&app, Method::POST, "/books/bulk", Some(json!({ "book_ids": ids.clone(), "operation": "explode" }))).await;
    assert_eq!(result["affected"], 0);

    let (_, result) = send(&app, Method::POST, "/books/bulk", Some(json!({ "book_ids": ids.clone(), "operation": "delete" }))).await;
    assert_eq!(result["affected"], 2);
    let (_, page) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(page["pagination"]["total"], 0);
}

#[tokio::test]
async fn csv_export_is_an_attachment_with_one_row_per_book() {
    let app = app().await;
    create(&app, json!({ "title": "Lolita", "author": "Vladimir Nabokov" })).await;
    create(&app, json!({ "title": "Pnin", "author": "Vladimir Nabokov", "notes": "funny, sad" })).await;

    let request = Request::builder().uri("/export/csv").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"library_export_"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[..]);
    assert_eq!(reader.records().count(), 2);

    let (_, exported) = send(&app, Method::GET, "/export/json", None).await;
    let rows = exported.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    // books 테이블의 모든 컬럼이 그대로 나감
    let expected: BTreeSet<&str> = [
        "id", "title", "author", "author_id", "isbn", "publication_year", "publisher",
        "genre", "tags", "description", "cover_image_url", "language", "page_count",
        "physical_location", "reading_status", "my_rating", "date_added",
        "date_started_reading", "date_finished_reading", "notes", "current_page",
    ]
    .into_iter()
    .collect();
    for row in rows {
        let keys: BTreeSet<&str> = row.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, expected);
    }

    // 값이 없는 선택 필드는 null, 날짜는 RFC 3339 문자열
    let lolita = rows.iter().find(|row| row["title"] == "Lolita").unwrap();
    for field in ["isbn", "author_id", "physical_location", "date_finished_reading", "my_rating"] {
        assert_eq!(lolita[field], Value::Null, "{field}");
    }
    assert_eq!(lolita["reading_status"], "not-started");
    assert_eq!(lolita["current_page"], 0);
    let added = lolita["date_added"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(added).is_ok(), "{added}");
    assert!(lolita["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn goals_reject_duplicates_and_track_finished_books() {
    let app = app().await;
    let year = chrono::Datelike::year(&chrono::Utc::now());

    let (status, created) = send(&app, Method::POST, "/goals", Some(json!({ "year": year, "goal_type": "books", "target": 10 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/goals", Some(json!({ "year": year, "goal_type": "books", "target": 5 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    let (status, body) = send(&app, Method::POST, "/goals", Some(json!({ "year": year, "goal_type": "books", "target": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], Value::Null);

    create(&app, json!({ "title": "Dubliners", "author": "James Joyce", "reading_status": "finished" })).await;
    let (_, list) = send(&app, Method::GET, "/goals", None).await;
    assert_eq!(list["current_year"], year);
    assert_eq!(list["goals"][0]["current_progress"], 1);

    let goal_id = created["goal"]["id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/goals/{goal_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &format!("/goals/{goal_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_have_twelve_months_and_matching_seasons() {
    let app = app().await;
    let book = create(&app, json!({ "title": "Middlemarch", "author": "George Eliot", "page_count": 880, "my_rating": 9 })).await;
    let id = book["id"].as_str().unwrap();
    send(&app, Method::POST, &format!("/books/{id}/sessions"), Some(json!({ "pages_read": 42 }))).await;

    let (_, stats) = send(&app, Method::GET, "/stats", None).await;
    let months = stats["monthly_pages"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    let month_sum: i64 = months.iter().map(|m| m.as_i64().unwrap()).sum();
    assert_eq!(month_sum, 42);
    let seasons = &stats["seasonal_activity"];
    let season_sum: i64 = ["winter", "spring", "summer", "autumn"].iter().map(|s| seasons[*s].as_i64().unwrap()).sum();
    assert_eq!(season_sum, month_sum);
    assert_eq!(stats["average_rating"], 9.0);
    assert_eq!(stats["total_pages"], 880);

    let (_, activity) = send(&app, Method::GET, "/stats/activity", None).await;
    assert_eq!(activity["pages"], json!([42]));
    assert_eq!(activity["dates"].as_array().unwrap().len(), 1);

    let (_, dashboard) = send(&app, Method::GET, "/dashboard", None).await;
    assert_eq!(dashboard["reading_books"], 1);
    assert_eq!(dashboard["current_reading"][0]["title"], "Middlemarch");
}

#[tokio::test]
async fn authors_link_books_by_exact_name() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/authors", Some(json!({ "name": "Italo Calvino" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let author_id = body["author"]["id"].clone();

    let book = create(&app, json!({ "title": "Invisible Cities", "author": "Italo Calvino" })).await;
    assert_eq!(book["author_id"], author_id);
    let stray = create(&app, json!({ "title": "Ficciones", "author": "Jorge Luis Borges", "author_id": "missing" })).await;
    assert_eq!(stray["author_id"], Value::Null);

    let (_, list) = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(list["authors"][0]["name"], "Italo Calvino");
    assert_eq!(list["authors"][0]["books"][0]["title"], "Invisible Cities");
}

#[tokio::test]
async fn isbn_lookup_found_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "volumeInfo": { "title": "The Idiot", "authors": ["Fyodor Dostoevsky"] } }]
        })))
        .mount(&server)
        .await;
    let app = app_with_lookup(&server.uri()).await;

    let (status, body) = send(&app, Method::GET, "/isbn?isbn=978-0-14-044792-7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The Idiot");
    assert_eq!(body["isbn"], "9780140447927");

    let (status, _) = send(&app, Method::GET, "/isbn?isbn=123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
