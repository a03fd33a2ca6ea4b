//! # 작가 데이터베이스 쿼리 모듈
//!
//! 작가와 연결된 책은 명시적인 JOIN 한 번으로 가져와 Rust 쪽에서 묶습니다.

use std::collections::HashMap;

use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Author, AuthorWithBooks, Book};

/// 모든 작가와 각 작가에 `author_id`로 연결된 책 목록 (작가 이름순, 책 제목순)
pub async fn list_authors_with_books(
    conn: &mut SqliteConnection,
) -> Result<Vec<AuthorWithBooks>, AppError> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT id, name, biography, photo_url FROM authors ORDER BY name, id",
    )
    .fetch_all(&mut *conn)
    .await?;

    let linked = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.id, b.title, b.author, b.author_id, b.isbn, b.publication_year, b.publisher,
               b.genre, b.tags, b.description, b.cover_image_url, b.language, b.page_count,
               b.physical_location, b.reading_status, b.my_rating, b.date_added,
               b.date_started_reading, b.date_finished_reading, b.notes, b.current_page
        FROM books b
        INNER JOIN authors a ON a.id = b.author_id
        ORDER BY b.title, b.id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut by_author: HashMap<String, Vec<Book>> = HashMap::new();
    for book in linked {
        if let Some(author_id) = book.author_id.clone() {
            by_author.entry(author_id).or_default().push(book);
        }
    }

    Ok(authors
        .into_iter()
        .map(|author| {
            let books = by_author.remove(&author.id).unwrap_or_default();
            AuthorWithBooks { author, books }
        })
        .collect())
}

pub async fn insert_author(conn: &mut SqliteConnection, author: &Author) -> Result<(), AppError> {
    sqlx::query("INSERT INTO authors (id, name, biography, photo_url) VALUES (?, ?, ?, ?)")
        .bind(&author.id)
        .bind(&author.name)
        .bind(&author.biography)
        .bind(&author.photo_url)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn get_author(conn: &mut SqliteConnection, id: &str) -> Result<Option<Author>, AppError> {
    let author = sqlx::query_as::<_, Author>(
        "SELECT id, name, biography, photo_url FROM authors WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(author)
}

/// 이름이 정확히 일치하는 작가의 ID. 같은 이름이 여럿이면 먼저 만들어진 쪽.
pub async fn find_author_id_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<String>, AppError> {
    let id = sqlx::query_scalar::<_, String>(
        "SELECT id FROM authors WHERE name = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}
