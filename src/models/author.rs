use serde::{Deserialize, Serialize};

use super::book::Book;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub biography: Option<String>,
    pub photo_url: Option<String>,
}

/// 작가 목록 화면용: 작가와 `author_id`로 연결된 책들
#[derive(Debug, Serialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub photo_url: Option<String>,
}
