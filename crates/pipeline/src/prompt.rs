//! Prompt construction for text and image generation.

use newsdeck_core::{ArticleRecord, GenerationOptions, LengthMode, NormalizedCardContent, SLOT_COUNT, SpeechStyle};
use crate::contract::CONTRACTS;
use crate::text::truncate_chars;

pub const SYSTEM_INSTRUCTION: &str = "당신은 한국어 카드뉴스 편집자입니다. 설명 없이 JSON 객체 하나만 출력하세요.";

pub const KEYWORD_SYSTEM_INSTRUCTION: &str =
    "기사에서 해시태그용 키워드만 JSON 배열로 추출합니다. 설명 없이 배열만 반환하세요.";

/// Article text sent with the keyword prompt.
pub const KEYWORD_ARTICLE_CHARS: usize = 1500;

/// Hard cap on any image prompt.
pub const MAX_IMAGE_PROMPT_CHARS: usize = 4000;

/// The text-generation prompt for one article.
pub fn build_text_prompt(article: &ArticleRecord, options: &GenerationOptions, max_article_chars: usize) -> String {
    let c = &CONTRACTS;
    let body = truncate_chars(&article.body_text, max_article_chars);

    let mut prompt = format!(
        r#"다음 뉴스 기사를 카드뉴스 문구로 요약하세요.

[제목]
{title}

[본문]
{body}

아래 JSON 형식으로만 답하세요. 모든 값은 한국어로 작성합니다.
{{
  "headline": "표지 제목. 최대 {hl_lines}줄, 줄마다 {hl}자 이내, 조사나 어미로 끝내지 말 것",
  "quote": "기사 속 핵심 발언 {quote}자 이내. '~라고 밝혔다' 같은 기자 표현 제외",
  "quoteSpeaker": "발언자 이름과 직함 {speaker}자 이내. 모르면 빈 문자열",
  "quoteContext": "발언이 나온 상황 {qctx}자 이내",
  "contextKeyLine": "지금 상황을 한 문장으로 {ctx}자 이내",
  "coreProblem": "핵심 쟁점 {core}자 이내",
  "card4KeySentence": "문제를 요약하는 한 문장 {k4}자 이내",
  "card4Explanation": "그 문제의 설명 {e4}자 이내",
  "beforeAfter": "BEFORE: 이전 상태 | AFTER: 이후 상태 | 변화 설명",
  "whyImportant": "독자에게 왜 중요한지 {why}자 이내",
  "prosCons": {{
    "question": "찬반 질문 {q}자 이내",
    "pros": "찬성 관점 {pros}자 이내",
    "cons": "반대 관점 {cons}자 이내"
  }},
  "readerQuestion": "독자에게 던지는 질문 {rq}자 이내",
  "keyFact": {{
    "facts": ["라벨: 값", "라벨: 값", "라벨: 값"]
  }}
}}

keyFact.facts에는 기사에 나온 수치, 날짜, 인물, 기관 등 핵심 사실을 3~5개 넣으세요.
라벨은 {label_min}~{label_max}자, 값은 {fact}자 이내의 명사구로 쓰고 문장으로 끝내지 마세요."#,
        title = article.title.trim(),
        body = body,
        hl_lines = c.headline_max_lines,
        hl = c.headline_line.max_chars,
        quote = c.quote.max_chars,
        speaker = c.quote_speaker.max_chars,
        qctx = c.quote_context.max_chars,
        ctx = c.context_key_line.max_chars,
        core = c.core_problem.max_chars,
        k4 = c.card4_key_sentence.max_chars,
        e4 = c.card4_explanation.max_chars,
        why = c.why_important.max_chars,
        q = c.pros_cons_question.max_chars,
        pros = c.pros.max_chars,
        cons = c.cons.max_chars,
        rq = c.reader_question.max_chars,
        label_min = c.fact_label_min,
        label_max = c.fact_label_max,
        fact = c.fact_value.max_chars,
    );

    let suffix = option_suffix(options);
    if !suffix.is_empty() {
        prompt.push_str("\n\n[작성 지침]\n");
        prompt.push_str(&suffix);
    }
    prompt
}

/// Style instructions derived from the request options. Empty when every
/// option is left at its default.
pub fn option_suffix(options: &GenerationOptions) -> String {
    let mut lines: Vec<&str> = Vec::new();

    if let Some(tone) = options.tone {
        lines.push(match tone {
            0..=33 => "- 어조: 객관적이고 정보 전달 중심으로 작성하세요.",
            34..=66 => "- 어조: 쟁점과 이슈를 부각하는 시각으로 작성하세요.",
            _ => "- 어조: 독자의 공감을 이끄는 감성적인 표현을 사용하세요.",
        });
    }

    match options.length {
        LengthMode::Auto => {}
        LengthMode::Short => lines.push("- 길이: 모든 문장을 짧고 간결하게 쓰세요."),
        LengthMode::Explanatory => lines.push("- 길이: 배경 설명을 덧붙여 이해를 도우세요."),
    }

    match options.speech_style {
        SpeechStyle::Auto => {}
        SpeechStyle::Report => lines.push("- 문체: '~했다', '~이다' 같은 보도체로 쓰세요."),
        SpeechStyle::CardNews => lines.push("- 문체: '~해요', '~이에요' 같은 대화체로 쓰세요."),
    }

    if options.keyword_emphasis {
        lines.push("- 핵심 키워드를 문구에 그대로 드러내 강조하세요.");
    }

    lines.join("\n")
}

/// The tag-keyword prompt: 4 or 5 keywords as a bare JSON array.
pub fn build_keyword_prompt(article: &ArticleRecord) -> String {
    let body = truncate_chars(&article.body_text, KEYWORD_ARTICLE_CHARS);
    format!(
        r#"다음 기사에서 SNS 해시태그로 쓸 핵심 키워드를 4개 또는 5개만 추출하세요.
기사 제목: {title}
기사 내용 일부: {body}

규칙: 한 단어 또는 2~3단어 조합만. 뉴스 주제·인물·이슈·장소 등. 설명이나 문장 금지.
반드시 JSON 배열만 응답하세요. 예: ["멜로니", "이탈리아", "벽화논란", "총리"]"#,
        title = article.title.trim(),
    )
}

/// One image prompt per slot, built from that slot's normalized copy.
pub fn build_image_prompts(content: &NormalizedCardContent) -> [String; SLOT_COUNT] {
    let headline = content.headline.replace('\n', " ");
    let quote = if content.quote_speaker.is_empty() {
        truncate_chars(&content.quote, 60)
    } else {
        format!(
            "{} ({})",
            truncate_chars(&content.quote, 60),
            truncate_chars(&content.quote_speaker, 30)
        )
    };

    let subjects = [
        truncate_chars(&headline, 80),
        quote,
        truncate_chars(&content.quote_context, 80),
        truncate_chars(&content.card4_key_sentence, 60),
        truncate_chars(&content.why_important, 100),
        format!(
            "{} versus {}",
            truncate_chars(&content.pros_cons.pros, 40),
            truncate_chars(&content.pros_cons.cons, 40)
        ),
        truncate_chars(&content.reader_question, 60),
    ];

    subjects.map(|subject| {
        let prompt = format!(
            "Editorial news photograph for a Korean news card about: {subject}. \
             Photojournalistic style, natural lighting, realistic detail, \
             no text overlay, no letters, no watermark."
        );
        truncate_chars(&prompt, MAX_IMAGE_PROMPT_CHARS)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdeck_core::ProsCons;

    fn content() -> NormalizedCardContent {
        NormalizedCardContent {
            headline: "정부 예산안\n국회 통과".into(),
            quote: "민생이 먼저다.".into(),
            quote_speaker: "장관".into(),
            quote_context: "국회 답변".into(),
            context_key_line: "예산안 제출".into(),
            core_problem: "지출 구조조정".into(),
            card4_key_sentence: "세수 감소".into(),
            card4_explanation: "세수가 줄었다".into(),
            before_after: "BEFORE: 1 | AFTER: 2 | 증가".into(),
            why_important: "가계 지원 축소".into(),
            pros_cons: ProsCons {
                question: "필요한가?".into(),
                pros: "재정 건전성".into(),
                cons: "복지 축소".into(),
            },
            reader_question: "어떻게 생각하나요?".into(),
        }
    }

    #[test]
    fn no_options_no_suffix() {
        assert_eq!(option_suffix(&GenerationOptions::default()), "");
        let article = ArticleRecord::new("제목", "본문");
        let prompt = build_text_prompt(&article, &GenerationOptions::default(), 8000);
        assert!(!prompt.contains("[작성 지침]"));
        assert!(prompt.contains("\"keyFact\""));
        assert!(prompt.contains("줄마다 10자 이내"));
    }

    #[test]
    fn tone_bands() {
        let suffix = |tone| option_suffix(&GenerationOptions::default().with_tone(tone));
        assert!(suffix(0).contains("객관적"));
        assert!(suffix(33).contains("객관적"));
        assert!(suffix(34).contains("쟁점"));
        assert!(suffix(66).contains("쟁점"));
        assert!(suffix(67).contains("감성적"));
        assert!(suffix(100).contains("감성적"));
    }

    #[test]
    fn all_options_listed_in_order() {
        let options = GenerationOptions {
            tone: Some(50),
            length: LengthMode::Short,
            speech_style: SpeechStyle::CardNews,
            keyword_emphasis: true,
            ..Default::default()
        };
        let suffix = option_suffix(&options);
        assert_eq!(suffix.lines().count(), 4);
        assert!(suffix.lines().last().unwrap().contains("키워드"));
    }

    #[test]
    fn article_body_capped() {
        let article = ArticleRecord::new("제목", "가".repeat(10_000));
        let prompt = build_text_prompt(&article, &GenerationOptions::default(), 100);
        assert!(prompt.contains(&"가".repeat(100)));
        assert!(!prompt.contains(&"가".repeat(101)));
    }

    #[test]
    fn image_prompts_per_slot() {
        let prompts = build_image_prompts(&content());
        assert!(prompts[0].contains("정부 예산안 국회 통과"));
        assert!(prompts[1].contains("민생이 먼저다. (장관)"));
        assert!(prompts[5].contains("재정 건전성 versus 복지 축소"));
        assert!(prompts.iter().all(|p| p.contains("no text overlay")));
        assert!(prompts.iter().all(|p| p.chars().count() <= MAX_IMAGE_PROMPT_CHARS));
    }

    #[test]
    fn keyword_prompt_caps_body() {
        let article = ArticleRecord::new(" 멜로니 총리 벽화 논란 ", "나".repeat(3000));
        let prompt = build_keyword_prompt(&article);
        assert!(prompt.contains("기사 제목: 멜로니 총리 벽화 논란\n"));
        assert!(prompt.contains(&"나".repeat(KEYWORD_ARTICLE_CHARS)));
        assert!(!prompt.contains(&"나".repeat(KEYWORD_ARTICLE_CHARS + 1)));
        assert!(prompt.contains("JSON 배열"));
    }
}
