//! # 책 데이터베이스 쿼리 모듈
//!
//! `books` 테이블에 대한 CRUD와 목록 조회(필터/정렬/페이지네이션) 쿼리입니다.
//!
//! 모든 함수는 `&mut SqliteConnection`을 받습니다. 호출하는 쪽에서
//! 트랜잭션(`&mut tx`)이나 풀에서 빌린 연결(`&mut conn`)을 넘기면 되고,
//! 커밋/롤백 시점은 호출하는 쪽이 정합니다.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::AppError;
use crate::models::*;
use crate::services::tags;

/// `Book` 구조체 필드 순서와 같은 SELECT 컬럼 목록
const BOOK_COLUMNS: &str = "id, title, author, author_id, isbn, publication_year, publisher, \
    genre, tags, description, cover_image_url, language, page_count, physical_location, \
    reading_status, my_rating, date_added, date_started_reading, date_finished_reading, \
    notes, current_page";

/// ID로 책 한 권을 조회합니다. 없으면 `Ok(None)`.
pub async fn get_book(conn: &mut SqliteConnection, id: &str) -> Result<Option<Book>, AppError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?");
    let book = sqlx::query_as::<_, Book>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(book)
}

/// 새 책을 저장합니다. ID와 날짜는 호출하는 쪽에서 이미 채워 둔 값을 그대로 씁니다.
pub async fn insert_book(conn: &mut SqliteConnection, book: &Book) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO books (id, title, author, author_id, isbn, publication_year, publisher,
                           genre, tags, description, cover_image_url, language, page_count,
                           physical_location, reading_status, my_rating, date_added,
                           date_started_reading, date_finished_reading, notes, current_page)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.id)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.author_id)
    .bind(&book.isbn)
    .bind(book.publication_year)
    .bind(&book.publisher)
    .bind(&book.genre)
    .bind(&book.tags)
    .bind(&book.description)
    .bind(&book.cover_image_url)
    .bind(&book.language)
    .bind(book.page_count)
    .bind(&book.physical_location)
    .bind(book.reading_status)
    .bind(book.my_rating)
    .bind(book.date_added)
    .bind(book.date_started_reading)
    .bind(book.date_finished_reading)
    .bind(&book.notes)
    .bind(book.current_page)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// 책 한 행을 통째로 덮어씁니다 (id와 date_added 제외).
///
/// 상태 변경, 평점, 세션 반영, 수정 폼 모두 `Book` 값을 먼저 고친 뒤 이 함수로 저장합니다.
pub async fn update_book(conn: &mut SqliteConnection, book: &Book) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE books
        SET title = ?, author = ?, author_id = ?, isbn = ?, publication_year = ?,
            publisher = ?, genre = ?, tags = ?, description = ?, cover_image_url = ?,
            language = ?, page_count = ?, physical_location = ?, reading_status = ?,
            my_rating = ?, date_started_reading = ?, date_finished_reading = ?,
            notes = ?, current_page = ?
        WHERE id = ?
        "#,
    )
    // 바인딩 순서 = SET 절 순서, 마지막이 WHERE id
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.author_id)
    .bind(&book.isbn)
    .bind(book.publication_year)
    .bind(&book.publisher)
    .bind(&book.genre)
    .bind(&book.tags)
    .bind(&book.description)
    .bind(&book.cover_image_url)
    .bind(&book.language)
    .bind(book.page_count)
    .bind(&book.physical_location)
    .bind(book.reading_status)
    .bind(book.my_rating)
    .bind(book.date_started_reading)
    .bind(book.date_finished_reading)
    .bind(&book.notes)
    .bind(book.current_page)
    .bind(&book.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// 책과 그 책의 독서 세션을 모두 삭제합니다.
///
/// 스키마에도 `ON DELETE CASCADE`가 있지만, 세션을 먼저 명시적으로 지웁니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제 성공
/// - `Ok(false)`: 해당 ID의 책이 없음
pub async fn delete_book(conn: &mut SqliteConnection, id: &str) -> Result<bool, AppError> {
    // 세션 먼저, 그다음 책 (같은 연결/트랜잭션 안에서)
    super::sessions::delete_sessions_for_book(conn, id).await?;

    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 여러 ID의 책들을 한 번에 조회합니다. 없는 ID는 조용히 빠집니다.
pub async fn get_books_by_ids(
    conn: &mut SqliteConnection,
    ids: &[String],
) -> Result<Vec<Book>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // WHERE id IN (?, ?, ...) 를 ID 수만큼 만듭니다
    // push_unseparated로 닫는 괄호 앞에는 쉼표가 붙지 않습니다
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {BOOK_COLUMNS} FROM books WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");

    let books = qb.build_query_as::<Book>().fetch_all(&mut *conn).await?;
    Ok(books)
}

/// 필터 조건을 WHERE 절로 붙입니다. 목록 조회와 개수 조회가 같은 조건을 씁니다.
///
/// 모든 값은 `push_bind`로 바인딩되고, SQL에 직접 들어가는 문자열은 고정값뿐입니다.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BookFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(status) = &filter.status {
        qb.push(" AND reading_status = ").push_bind(status.clone());
    }
    if let Some(genre) = &filter.genre {
        qb.push(" AND genre = ").push_bind(genre.clone());
    }
    if let Some(author) = &filter.author {
        qb.push(" AND author = ").push_bind(author.clone());
    }
    if let Some(tag) = &filter.tag {
        // 쉼표로 합쳐진 tags 문자열 안의 부분 일치 (SQLite LIKE는 ASCII 대소문자 무시)
        qb.push(" AND COALESCE(tags, '') LIKE '%' || ")
            .push_bind(escape_like(tag))
            .push(" || '%' ESCAPE '\\'");
    }
    if let Some(rating) = filter.rating {
        qb.push(" AND my_rating = ").push_bind(rating);
    }
}

/// LIKE 패턴 안에서 `%`, `_`, `\`가 글자 그대로 비교되도록 이스케이프합니다.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 필터/정렬/페이지 조건으로 책 목록 한 페이지와 전체 개수를 조회합니다.
///
/// 정렬 값이 같은 책들은 id 순으로 나열되어 페이지 경계가 흔들리지 않습니다.
/// 마지막 페이지를 넘어가면 빈 목록을 반환합니다.
pub async fn list_books(
    conn: &mut SqliteConnection,
    filter: &BookFilter,
) -> Result<(Vec<Book>, i64), AppError> {
    // 1) 필터에 걸리는 전체 개수 (페이지 수 계산용)
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM books");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    // 2) 같은 필터로 현재 페이지만
    // 정렬 컬럼과 방향은 enum에서 나온 고정 문자열만 format!으로 들어감
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {BOOK_COLUMNS} FROM books"));
    push_filters(&mut qb, filter);
    qb.push(format!(
        " ORDER BY {column} {order}, id {order}",
        column = filter.sort.column(),
        order = filter.order.keyword(),
    ));
    // page는 1부터 시작
    qb.push(" LIMIT ")
        .push_bind(PAGE_SIZE)
        .push(" OFFSET ")
        .push_bind((filter.page - 1).saturating_mul(PAGE_SIZE));

    let books = qb.build_query_as::<Book>().fetch_all(&mut *conn).await?;
    Ok((books, total))
}

/// 내보내기용 전체 목록 (추가된 순서)
pub async fn list_all_books(conn: &mut SqliteConnection) -> Result<Vec<Book>, AppError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY date_added, id");
    let books = sqlx::query_as::<_, Book>(&sql).fetch_all(&mut *conn).await?;
    Ok(books)
}

/// 목록 화면의 필터 선택지: 장르, 작가, 상태, 태그 (모두 중복 제거, 정렬)
pub async fn book_facets(conn: &mut SqliteConnection) -> Result<BookFacets, AppError> {
    let genres = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT genre FROM books WHERE genre IS NOT NULL AND genre <> '' ORDER BY genre",
    )
    .fetch_all(&mut *conn)
    .await?;

    let authors = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT author FROM books WHERE author <> '' ORDER BY author",
    )
    .fetch_all(&mut *conn)
    .await?;

    let statuses = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT reading_status FROM books ORDER BY reading_status",
    )
    .fetch_all(&mut *conn)
    .await?;

    // 태그는 행마다 "a, b" 형태라 Rust 쪽에서 쪼개고 합칩니다
    let tag_fields = sqlx::query_scalar::<_, String>(
        "SELECT tags FROM books WHERE tags IS NOT NULL",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(BookFacets {
        genres,
        authors,
        statuses,
        tags: tags::collect_tags(tag_fields.iter().map(String::as_str)),
    })
}

/// 최근에 추가된 책 `limit`권
pub async fn recent_books(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<Book>, AppError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY date_added DESC, id DESC LIMIT ?");
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    Ok(books)
}

/// 특정 상태의 책 전체 (제목순)
pub async fn books_with_status(
    conn: &mut SqliteConnection,
    status: ReadingStatus,
) -> Result<Vec<Book>, AppError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE reading_status = ? ORDER BY title");
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(status)
        .fetch_all(&mut *conn)
        .await?;
    Ok(books)
}

/// 완독일이 있는 완독 책을 최근 순으로 `limit`권
pub async fn recently_finished(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<Book>, AppError> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books \
         WHERE reading_status = 'finished' AND date_finished_reading IS NOT NULL \
         ORDER BY date_finished_reading DESC LIMIT ?"
    );
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    Ok(books)
}

pub async fn count_books_with_status(
    conn: &mut SqliteConnection,
    status: ReadingStatus,
) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE reading_status = ?")
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
