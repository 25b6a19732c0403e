//! Trailing-suffix table for Korean headline lines.
//!
//! A headline line cut at ten characters often ends mid-phrase: on a
//! particle (`를`, `에서`), a modifier (`위한`, `하는`) or a predicate
//! ending (`했다`). The table lists those endings; [`strip_trailing`] removes
//! them in a fixed, iteration-capped loop until the line is stable.
//!
//! The table is Korean-only. Another language needs its own table here.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Upper bound on strip passes. Each productive pass removes at least one
/// character, so short lines reach a fixed point well before this.
pub const MAX_STRIP_PASSES: usize = 25;

static STRIP_TABLE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[를한]$",
        r"(?:만든|받을|의로|된지|하는|찾을|볼수|위한|대한|통한)$",
        r"(?:하는|되는|이는|가는|오는|보는|위한|대한)$",
        r"(?:으로|에서|부터|에게|에도|처럼|마저|조차)$",
        r"[를와과에의도만큼]$",
        r"(?:하데|지만|면서|이라도|이나마)$",
        r"(?:이다|였다|다\.?|했다\.?)$",
        r"(?:됐다|했다|있다|없다)\.?$",
        r"[법적물성]$",
        r"(?:이런|그런|저런|어떤)\s*$",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid suffix pattern"))
    .collect()
});

/// Endings a finished headline line may not have.
static BAD_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[를한만든받을의로된에서와과도에만큼]$").expect("valid bad-end pattern")
});

/// Strip incomplete trailing endings until stable.
pub fn strip_trailing(line: &str) -> String {
    let mut current = line.trim().to_string();
    for _ in 0..MAX_STRIP_PASSES {
        let before = current.clone();
        for pattern in STRIP_TABLE.iter() {
            if pattern.is_match(&current) {
                current = pattern.replace(&current, "").trim().to_string();
            }
        }
        if current == before {
            break;
        }
    }
    current
}

/// Whether the line still ends on a forbidden ending.
pub fn has_bad_ending(line: &str) -> bool {
    BAD_END.is_match(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_particles_and_modifiers() {
        assert_eq!(strip_trailing("국민을 위해 만든"), "국민을 위해");
        assert_eq!(strip_trailing("서울에서"), "서울");
        assert_eq!(strip_trailing("예산안 처리했다"), "예산안 처리");
        assert_eq!(strip_trailing("정부가 이런 "), "정부가");
    }

    #[test]
    fn stable_lines_are_untouched() {
        assert_eq!(strip_trailing("정부 예산안"), "정부 예산안");
        assert_eq!(strip_trailing("국회 통과 논란"), "국회 통과 논란");
    }

    #[test]
    fn strip_reaches_fixed_point() {
        for line in ["무산된 합의를 위한", "가나다라마바사아자차", "에서에서에서", "를를를를"] {
            let once = strip_trailing(line);
            assert_eq!(strip_trailing(&once), once);
        }
    }

    #[test]
    fn bad_endings_detected() {
        assert!(has_bad_ending("여야 합의가 무산된"));
        assert!(has_bad_ending("예산을"));
        assert!(!has_bad_ending("국회 통과 논란"));
        assert!(!has_bad_ending(""));
    }
}
