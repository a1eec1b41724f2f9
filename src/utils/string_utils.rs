//! # 문자열 유틸리티
//!
//! 로그 출력과 진단 메시지에 쓰이는 문자열 처리 함수들입니다.

/// 진단 로그용으로 문자열 앞부분만 잘라냅니다.
///
/// 문자 단위로 `max_chars`개까지 남기며 UTF-8 경계를 깨지 않습니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::truncate_for_log;
///
/// assert_eq!(truncate_for_log("hello world", 5), "hello");
/// assert_eq!(truncate_for_log("short", 500), "short");
/// ```
pub fn truncate_for_log(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// 모듈 경로를 제외한 타입 이름을 반환합니다.
///
/// 제네릭 인자가 있는 경우 바깥 타입의 경로만 제거합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(short_type_name("entity_datastore::domain::entities::stats::PlayerStatsData"), "PlayerStatsData");
/// ```
pub fn short_type_name(full: &str) -> &str {
    let outer = full.split('<').next().unwrap_or(full);
    match outer.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_for_log("{\"a\":1}", 500), "{\"a\":1}");
        assert_eq!(truncate_for_log("", 10), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "가나다라마바사";
        assert_eq!(truncate_for_log(text, 3), "가나다");
        assert_eq!(truncate_for_log(&"x".repeat(1200), 500).len(), 500);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::PlayerStatsData"), "PlayerStatsData");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper<b::Inner>");
    }
}
