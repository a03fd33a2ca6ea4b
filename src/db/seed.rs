//! # 데모 데이터
//!
//! `SEED_DEMO_DATA=true`일 때 서버 시작 시 한 번 호출됩니다.
//! 책이 한 권이라도 있으면 아무것도 하지 않습니다.

use chrono::{DateTime, Datelike, Duration, Utc};
use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::*;
use crate::services::reading;

struct DemoBook {
    title: &'static str,
    author: usize,
    year: i64,
    genre: &'static str,
    tags: &'static str,
    pages: i64,
    status: ReadingStatus,
    rating: Option<i64>,
}

const DEMO_AUTHORS: [(&str, &str); 3] = [
    ("Fyodor Dostoevsky", "Russian novelist of the 19th century."),
    ("Ursula K. Le Guin", "American author of speculative fiction."),
    ("Haruki Murakami", "Japanese writer and translator."),
];

const DEMO_BOOKS: [DemoBook; 5] = [
    DemoBook {
        title: "Crime and Punishment",
        author: 0,
        year: 1866,
        genre: "Classic",
        tags: "classic,psychology",
        pages: 551,
        status: ReadingStatus::Finished,
        rating: Some(9),
    },
    DemoBook {
        title: "The Brothers Karamazov",
        author: 0,
        year: 1880,
        genre: "Classic",
        tags: "classic,philosophy",
        pages: 796,
        status: ReadingStatus::Reading,
        rating: None,
    },
    DemoBook {
        title: "The Left Hand of Darkness",
        author: 1,
        year: 1969,
        genre: "Science Fiction",
        tags: "sci-fi,anthropology",
        pages: 304,
        status: ReadingStatus::Finished,
        rating: Some(8),
    },
    DemoBook {
        title: "The Dispossessed",
        author: 1,
        year: 1974,
        genre: "Science Fiction",
        tags: "sci-fi,utopia",
        pages: 387,
        status: ReadingStatus::Planned,
        rating: None,
    },
    DemoBook {
        title: "Kafka on the Shore",
        author: 2,
        year: 2002,
        genre: "Fiction",
        tags: "magical-realism",
        pages: 505,
        status: ReadingStatus::NotStarted,
        rating: None,
    },
];

/// 빈 DB에 작가, 책, 세션, 올해 목표를 채웁니다.
///
/// # 반환값
/// - `Ok(true)`: 데모 데이터를 넣음
/// - `Ok(false)`: 이미 책이 있어서 건너뜀
pub async fn seed_demo_data(conn: &mut SqliteConnection, now: DateTime<Utc>) -> Result<bool, AppError> {
    if super::stats::count_books(conn).await? > 0 {
        return Ok(false);
    }

    let mut authors = Vec::with_capacity(DEMO_AUTHORS.len());
    for (name, biography) in DEMO_AUTHORS {
        let author = Author {
            id: uuid::Uuid::now_v7().to_string(),
            name: name.to_string(),
            biography: Some(biography.to_string()),
            photo_url: None,
        };
        super::authors::insert_author(conn, &author).await?;
        authors.push(author);
    }

    for (index, demo) in DEMO_BOOKS.iter().enumerate() {
        let author = &authors[demo.author];
        let added = now - Duration::days(60 - index as i64 * 10);

        let mut book = Book::new(demo.title, author.name.clone(), added);
        book.author_id = Some(author.id.clone());
        book.publication_year = Some(demo.year);
        book.genre = Some(demo.genre.to_string());
        book.tags = Some(demo.tags.to_string());
        book.page_count = Some(demo.pages);
        book.language = Some("en".to_string());
        reading::apply_rating(&mut book, demo.rating);

        if demo.status == ReadingStatus::Reading || demo.status == ReadingStatus::Finished {
            reading::apply_status(&mut book, ReadingStatus::Reading, added + Duration::days(1));
        }
        super::books::insert_book(conn, &book).await?;

        // 읽기 시작한 책은 사흘 간격으로 세 번의 세션을 남깁니다
        if book.reading_status == ReadingStatus::Reading {
            for day in 1..=3_i64 {
                let at = added + Duration::days(day * 3);
                let pages = demo.pages / 8;
                let session = ReadingSession::logged_now(&book.id, pages, Some(45), at);
                super::sessions::insert_session(conn, &session).await?;
                reading::record_pages(&mut book, pages, at);
            }
        }
        if demo.status != book.reading_status {
            reading::apply_status(&mut book, demo.status, added + Duration::days(12));
        }
        super::books::update_book(conn, &book).await?;
    }

    let year = i64::from(now.year());
    super::goals::insert_goal(conn, &ReadingGoal::new(year, GoalType::Books, 12)).await?;
    super::goals::insert_goal(conn, &ReadingGoal::new(year, GoalType::Pages, 4000)).await?;

    tracing::info!(
        authors = DEMO_AUTHORS.len(),
        books = DEMO_BOOKS.len(),
        "Seeded demo library"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::TimeZone;

    #[tokio::test]
    async fn seeds_once_into_empty_database() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert!(seed_demo_data(&mut conn, now).await.unwrap());
        assert!(!seed_demo_data(&mut conn, now).await.unwrap());

        assert_eq!(crate::db::count_books(&mut conn).await.unwrap(), 5);
        let finished = crate::db::books_with_status(&mut conn, ReadingStatus::Finished).await.unwrap();
        assert_eq!(finished.len(), 2);
        for book in &finished {
            assert_eq!(Some(book.current_page), book.page_count);
            assert!(book.date_finished_reading.is_some());
        }
        let in_progress = crate::db::books_with_status(&mut conn, ReadingStatus::Reading).await.unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].current_page, 3 * (796 / 8));

        let goals = crate::db::refresh_progress(&mut conn).await.unwrap();
        assert_eq!(goals.len(), 2);
    }
}
