//! # 독서 상태 전이 규칙
//!
//! 책의 상태 변경, 세션 추가, 추가/수정 폼 적용을 `Book` 값 위에서 수행하는
//! 순수 함수들입니다. DB에 쓰는 일은 호출하는 쪽(라우트 핸들러)이 맡습니다.
//!
//! 모든 함수는 현재 시각을 `now` 매개변수로 받습니다.
//!
//! ## 불변식
//! page_count가 있으면 항상 `current_page <= page_count`

use chrono::{DateTime, Utc};

use crate::models::{Book, BookForm, ProgressPoint, ReadingSession, ReadingStatus};

/// 책의 상태를 바꾸고, 상태에 딸린 날짜/페이지를 함께 조정합니다.
///
/// - → reading: 아직 시작 전이면 시작일을 지금으로, current_page를 0으로
/// - → finished: 완독일이 없으면 지금으로, current_page를 page_count로
/// - → not-started: 시작일/완독일을 지우고 current_page를 0으로
/// - → abandoned / planned: 상태만 변경
pub fn apply_status(book: &mut Book, status: ReadingStatus, now: DateTime<Utc>) {
    match status {
        ReadingStatus::Reading => {
            if book.date_started_reading.is_none() {
                book.date_started_reading = Some(now);
                book.current_page = 0;
            }
        }
        ReadingStatus::Finished => {
            if book.date_finished_reading.is_none() {
                book.date_finished_reading = Some(now);
            }
            if let Some(page_count) = book.page_count {
                book.current_page = page_count;
            }
        }
        ReadingStatus::NotStarted => {
            book.date_started_reading = None;
            book.date_finished_reading = None;
            book.current_page = 0;
        }
        ReadingStatus::Abandoned | ReadingStatus::Planned => {}
    }
    book.reading_status = status;
}

/// 세션에서 읽은 페이지를 책에 반영합니다.
///
/// current_page는 page_count를 넘지 않도록 잘립니다.
/// 아직 시작하지 않은 책이면 reading 상태로 바뀌고 시작일이 기록됩니다.
pub fn record_pages(book: &mut Book, pages_read: i64, now: DateTime<Utc>) {
    book.current_page = clamp_page(book.current_page.saturating_add(pages_read), book.page_count);

    if book.reading_status == ReadingStatus::NotStarted {
        book.reading_status = ReadingStatus::Reading;
        book.date_started_reading = Some(now);
    }
}

/// 평점은 1~10만 받습니다. 적용했으면 true.
pub fn apply_rating(book: &mut Book, rating: Option<i64>) -> bool {
    match rating {
        Some(value) if (1..=10).contains(&value) => {
            book.my_rating = Some(value);
            true
        }
        _ => false,
    }
}

fn clamp_page(page: i64, page_count: Option<i64>) -> i64 {
    let page = page.max(0);
    match page_count {
        Some(limit) => page.min(limit.max(0)),
        None => page,
    }
}

/// 추가 폼으로 새 책을 만듭니다. 제목이나 작가가 비어 있으면 None.
///
/// 처음 상태가 reading이면 시작일을, finished이면 시작일/완독일과
/// current_page = page_count를 채웁니다.
pub fn book_from_form(form: BookForm, now: DateTime<Utc>) -> Option<Book> {
    let title = clean(form.title.clone())?;
    let author = clean(form.author.clone())?;
    let status = form
        .reading_status
        .as_deref()
        .and_then(ReadingStatus::from_form)
        .unwrap_or(ReadingStatus::NotStarted);

    let mut book = Book::new(title, author, now);
    fill_fields(&mut book, form);

    match status {
        ReadingStatus::Finished => {
            book.date_started_reading = Some(now);
            apply_status(&mut book, ReadingStatus::Finished, now);
        }
        other => apply_status(&mut book, other, now),
    }
    Some(book)
}

/// 수정 폼을 기존 책에 적용합니다. 제목이나 작가가 비어 있으면 false(변경 없음).
///
/// 편집 가능한 필드는 폼의 값으로 모두 교체합니다. 상태가 바뀌었으면
/// `apply_status`의 전이 규칙을 따르고, page_count가 줄었으면 current_page를 자릅니다.
pub fn apply_edit(book: &mut Book, form: BookForm, now: DateTime<Utc>) -> bool {
    let (Some(title), Some(author)) = (clean(form.title.clone()), clean(form.author.clone())) else {
        return false;
    };
    let new_status = form.reading_status.as_deref().and_then(ReadingStatus::from_form);

    book.title = title;
    book.author = author;
    fill_fields(book, form);

    if let Some(status) = new_status {
        if status != book.reading_status {
            apply_status(book, status, now);
        }
    }
    book.current_page = clamp_page(book.current_page, book.page_count);
    true
}

fn fill_fields(book: &mut Book, form: BookForm) {
    book.author_id = clean(form.author_id);
    book.isbn = clean(form.isbn);
    book.publication_year = form.publication_year;
    book.publisher = clean(form.publisher);
    book.genre = clean(form.genre);
    book.tags = clean(form.tags);
    book.description = clean(form.description);
    book.cover_image_url = clean(form.cover_image_url);
    book.language = clean(form.language);
    book.page_count = form.page_count.filter(|count| *count >= 0);
    book.physical_location = clean(form.physical_location);
    book.my_rating = form.my_rating.filter(|rating| (1..=10).contains(rating));
    book.notes = clean(form.notes);
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 세션들을 시간순으로 누적한 진행률 그래프 데이터
///
/// 읽는 중인 책에만 의미가 있어, 다른 상태면 빈 배열입니다.
pub fn progress_series(book: &Book, sessions: &[ReadingSession]) -> Vec<ProgressPoint> {
    if book.reading_status != ReadingStatus::Reading {
        return Vec::new();
    }

    let mut ordered: Vec<&ReadingSession> = sessions.iter().collect();
    ordered.sort_by_key(|session| session.start_time);

    let mut cumulative = 0;
    ordered
        .into_iter()
        .map(|session| {
            cumulative += session.pages_read;
            ProgressPoint {
                date: session.start_time.format("%Y-%m-%d").to_string(),
                pages: cumulative,
                session_pages: session.pages_read,
            }
        })
        .collect()
}
