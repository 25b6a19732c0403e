//! Category detection and title badges.

use newsdeck_core::{ArticleRecord, DeckBadge};
use regex_lite::Regex;
use std::sync::LazyLock;
use crate::text::collapse_whitespace;

pub const DEFAULT_CATEGORY: &str = "general";

/// `(key, label, keywords)`; earlier rows win ties.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "business",
        "경제/비즈니스",
        &["경제", "기업", "주식", "투자", "금융", "부동산", "시장", "증권", "원화", "예산", "매출", "이익"],
    ),
    (
        "technology",
        "IT/기술",
        &["기술", "AI", "인공지능", "스마트폰", "앱", "소프트웨어", "IT", "데이터", "클라우드", "5G", "반도체", "전자"],
    ),
    (
        "politics",
        "정치/시사",
        &["정치", "선거", "국회", "대통령", "법안", "의원", "정책", "의회", "위원", "여당", "야당", "국정"],
    ),
    (
        "health",
        "건강/의료",
        &["건강", "의학", "병원", "질병", "환자", "백신", "치료", "의사", "코로나", "감염", "보건"],
    ),
    (
        "culture",
        "문화/엔터",
        &["문화", "영화", "음악", "예술", "공연", "전시", "드라마", "예능", "배우", "가수", "K팝", "축제"],
    ),
    (
        "sports",
        "스포츠",
        &["스포츠", "야구", "축구", "농구", "올림픽", "선수", "경기", "우승", "월드컵", "프로", "리그", "감독"],
    ),
    (
        "science",
        "과학/환경",
        &["과학", "우주", "연구", "실험", "기후", "환경", "발견", "동물", "기술개발", "NASA"],
    ),
];

const BADGES: &[(&str, &str)] = &[
    ("단독", "EXCLUSIVE"),
    ("심층기획", "IN-DEPTH"),
    ("속보", "BREAKING"),
    ("특집", "SPECIAL"),
];

static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]{1,10})\]").expect("valid pattern"));

/// Localized label for a category key. Unknown keys label themselves.
pub fn category_label(key: &str) -> String {
    if key == DEFAULT_CATEGORY {
        return "일반".into();
    }
    CATEGORIES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map_or_else(|| key.to_string(), |(_, label, _)| label.to_string())
}

/// `(key, label)` for the article: its own category when set, otherwise the
/// category with the most distinct keywords present in title and body
/// (case-insensitive; repeats of one keyword count once).
pub fn detect_category(article: &ArticleRecord) -> (String, String) {
    let given = article.category.trim().to_lowercase();
    if !given.is_empty() {
        let label = category_label(&given);
        return (given, label);
    }

    let text = format!("{} {}", article.title, article.body_text).to_lowercase();
    let mut best = (DEFAULT_CATEGORY, 0usize);
    for &(key, _, keywords) in CATEGORIES {
        let hits = keywords
            .iter()
            .filter(|kw| text.contains(&kw.to_lowercase()))
            .count();
        if hits > best.1 {
            best = (key, hits);
        }
    }
    (best.0.to_string(), category_label(best.0))
}

/// Split a leading corner tag such as `[단독]` off the title.
///
/// Returns the badge (first bracketed tag, if any) and the title with every
/// bracketed tag removed.
pub fn extract_badge(title: &str) -> (Option<DeckBadge>, String) {
    let badge = BRACKET_TAG.captures(title).map(|caps| {
        let tag = caps[1].trim().to_string();
        let display_text = BADGES
            .iter()
            .find(|(k, _)| *k == tag)
            .map_or_else(|| tag.clone(), |(_, text)| text.to_string());
        DeckBadge { tag, display_text }
    });
    let stripped = collapse_whitespace(&BRACKET_TAG.replace_all(title, " "));
    (badge, stripped)
}
