//! 쉼표로 구분된 태그 문자열 다루기
//!
//! 태그는 별도 테이블 없이 `books.tags` 한 컬럼에 "a, b, c" 형태로 저장됩니다.

use std::collections::BTreeSet;

/// "classic, philosophy,,drama" → ["classic", "philosophy", "drama"]
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// 태그를 목록 끝에 추가한 새 태그 문자열을 반환합니다.
///
/// 이미 있는 태그(앞뒤 공백 제거 후 정확히 일치)이거나 빈 태그이면 None.
/// 같은 태그로 두 번 호출해도 결과가 같습니다.
pub fn with_tag(tags: Option<&str>, new_tag: &str) -> Option<String> {
    let new_tag = new_tag.trim();
    if new_tag.is_empty() {
        return None;
    }

    let mut current = tags.map(split_tags).unwrap_or_default();
    if current.iter().any(|tag| tag == new_tag) {
        return None;
    }
    current.push(new_tag.to_string());
    Some(current.join(","))
}

/// 여러 책의 태그 문자열에서 중복 없는 태그 목록을 정렬해 모읍니다.
pub fn collect_tags<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    fields
        .into_iter()
        .flat_map(split_tags)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
