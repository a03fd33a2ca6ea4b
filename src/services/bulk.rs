//! 여러 책에 한 번에 적용하는 일괄 작업

use chrono::{DateTime, Utc};

use crate::models::{Book, BulkRequest, ReadingStatus};
use crate::services::{reading, tags};

/// 파싱이 끝난 일괄 작업
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOperation {
    ChangeStatus(ReadingStatus),
    AddTag(String),
    Delete,
}

impl BulkOperation {
    /// 요청 본문에서 작업을 꺼냅니다.
    ///
    /// 알 수 없는 작업, 잘못된 상태 값, 빈 태그는 None(아무것도 하지 않음).
    pub fn from_request(req: &BulkRequest) -> Option<Self> {
        match req.operation.as_deref().map(str::trim)? {
            "change_status" => req
                .new_status
                .as_deref()
                .and_then(ReadingStatus::from_form)
                .map(BulkOperation::ChangeStatus),
            "add_tag" => req
                .new_tag
                .as_deref()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(|tag| BulkOperation::AddTag(tag.to_string())),
            "delete" => Some(BulkOperation::Delete),
            _ => None,
        }
    }

    /// 책 한 권에 작업을 적용합니다. 책이 바뀌었으면 true.
    ///
    /// `Delete`는 레코드 자체를 지우는 작업이라 여기서는 아무것도 하지 않습니다.
    pub fn apply(&self, book: &mut Book, now: DateTime<Utc>) -> bool {
        match self {
            BulkOperation::ChangeStatus(status) => {
                reading::apply_status(book, *status, now);
                true
            }
            BulkOperation::AddTag(tag) => match tags::with_tag(book.tags.as_deref(), tag) {
                Some(updated) => {
                    book.tags = Some(updated);
                    true
                }
                None => false,
            },
            BulkOperation::Delete => false,
        }
    }
}
