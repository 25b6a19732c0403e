//! Tag keywords for an article: parsing provider replies and the title-based
//! fallback used when no provider produces any.

use newsdeck_core::{ArticleRecord, ProviderError};
use serde_json::Value;
use crate::category::extract_badge;
use crate::orchestrator::{outermost, strip_code_fences};
use crate::text::char_len;

pub const MAX_KEYWORDS: usize = 5;

/// Last resort when the title yields no usable token and no category is set.
const DEFAULT_KEYWORD: &str = "뉴스";

/// Parse a keyword reply.
///
/// Accepts a JSON array, an object with a `keywords` array (JSON-object mode
/// providers), or an array embedded in prose. At most five entries are kept;
/// blank entries are dropped after the cut.
pub fn parse_keywords(text: &str) -> Result<Vec<String>, ProviderError> {
    let cleaned = strip_code_fences(text);
    [Some(cleaned), outermost(cleaned, '[', ']')]
        .into_iter()
        .flatten()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find_map(keyword_list)
        .ok_or_else(|| ProviderError::MalformedResponse("no keyword array in response".into()))
}

fn keyword_list(value: Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("keywords") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let keywords: Vec<String> = items
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|item| match item {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .filter(|k| !k.is_empty())
        .collect();
    (!keywords.is_empty()).then_some(keywords)
}

/// Title tokens longer than one character (punctuation treated as space),
/// else the article category, else a generic tag. Never empty.
pub fn fallback_keywords(article: &ArticleRecord) -> Vec<String> {
    let (_, title) = extract_badge(&article.title);
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .filter(|t| char_len(t) > 1)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect();
    if !tokens.is_empty() {
        return tokens;
    }

    match article.category.trim() {
        "" => vec![DEFAULT_KEYWORD.to_string()],
        category => vec![category.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let keywords = parse_keywords(r#"["멜로니", " 이탈리아 ", "벽화논란", "총리"]"#).unwrap();
        assert_eq!(keywords, vec!["멜로니", "이탈리아", "벽화논란", "총리"]);
    }

    #[test]
    fn parses_object_fenced_and_prose() {
        let keywords = parse_keywords("```json\n{\"keywords\": [\"예산\", \"국회\"]}\n```").unwrap();
        assert_eq!(keywords, vec!["예산", "국회"]);

        let keywords = parse_keywords("키워드는 다음과 같습니다: [\"예산\", \"국회\"] 입니다").unwrap();
        assert_eq!(keywords, vec!["예산", "국회"]);
    }

    #[test]
    fn keeps_first_five_then_drops_blanks() {
        let keywords = parse_keywords(r#"["a", "", "c", 2025, "e", "f", "g"]"#).unwrap();
        assert_eq!(keywords, vec!["a", "c", "2025", "e"]);
    }

    #[test]
    fn unusable_replies_are_malformed() {
        for reply in ["", "키워드 없음", "[]", r#"["", " "]"#, r#"{"count": 0}"#] {
            let err = parse_keywords(reply).unwrap_err();
            assert!(err.is_malformed(), "{reply:?}");
        }
    }

    #[test]
    fn fallback_uses_title_tokens() {
        let article = ArticleRecord::new("[단독] 정부, 내년 예산 656조원 편성…국회 제출 앞둬", "");
        assert_eq!(
            fallback_keywords(&article),
            vec!["정부", "내년", "예산", "656조원", "편성"]
        );
    }

    #[test]
    fn fallback_skips_single_characters() {
        let article = ArticleRecord::new("왜 又 이 법", "").with_category("사회");
        assert_eq!(fallback_keywords(&article), vec!["사회"]);

        let article = ArticleRecord::new("", "본문만 있다");
        assert_eq!(fallback_keywords(&article), vec!["뉴스"]);
    }
}
