//! # 서재 내보내기
//!
//! - CSV: 고정된 16개 컬럼, 날짜는 YYYY-MM-DD, 값이 없으면 빈 칸
//! - JSON: `Book`을 그대로 직렬화 (라우트에서 처리)

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AppError;
use crate::models::Book;

/// CSV 헤더. 이 순서가 곧 컬럼 순서입니다.
pub const CSV_HEADER: [&str; 16] = [
    "Title",
    "Author",
    "ISBN",
    "Publication Year",
    "Publisher",
    "Genre",
    "Tags",
    "Description",
    "Language",
    "Page Count",
    "Reading Status",
    "Rating",
    "Date Added",
    "Date Started",
    "Date Finished",
    "Notes",
];

/// 책 목록을 CSV 바이트로 만듭니다. 헤더 한 줄 + 책마다 한 줄.
pub fn books_to_csv(books: &[Book]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for book in books {
        writer.write_record([
            book.title.clone(),
            book.author.clone(),
            text(&book.isbn),
            number(book.publication_year),
            text(&book.publisher),
            text(&book.genre),
            text(&book.tags),
            text(&book.description),
            text(&book.language),
            number(book.page_count),
            book.reading_status.to_string(),
            number(book.my_rating),
            day(Some(book.date_added)),
            day(book.date_started_reading),
            day(book.date_finished_reading),
            text(&book.notes),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV export: {e}")))
}

/// 다운로드 파일 이름: `library_export_20240315.csv`
pub fn csv_filename(today: NaiveDate) -> String {
    format!("library_export_{}.csv", today.format("%Y%m%d"))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn day(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
