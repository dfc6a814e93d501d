//! Layered language detector (§4.9): charset scan → feature-word scoring →
//! bigram scoring → CJK fallback. Each layer only runs when the previous
//! one leaves the decision ambiguous.

use lazy_static::lazy_static;

use crate::Language;

/// Minimum character count below which detection gives up rather than
/// guess from too little evidence.
const MIN_INPUT_CHARS: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharsetStats {
    pub hiragana: usize,
    pub katakana: usize,
    pub cjk: usize,
    pub latin: usize,
    pub hangul: usize,
    pub quenya_special: usize,
    pub total: usize,
}

impl CharsetStats {
    fn scan(text: &str) -> Self {
        let mut stats = CharsetStats::default();
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            stats.total += 1;
            match c {
                '\u{3040}'..='\u{309F}' => stats.hiragana += 1,
                '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => stats.katakana += 1,
                '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{20000}'..='\u{2A6DF}' => {
                    stats.cjk += 1
                }
                'a'..='z' | 'A'..='Z' => stats.latin += 1,
                '\u{AC00}'..='\u{D7AF}' => stats.hangul += 1,
                'ñ' | 'þ' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ë' => {
                    stats.quenya_special += 1;
                    stats.latin += 1;
                }
                _ => {}
            }
        }
        stats
    }

    fn latin_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.latin as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub language: Language,
    pub confidence: f64,
    pub charset: CharsetStats,
}

lazy_static! {
    static ref JA_FEATURE_WORDS: Vec<(&'static str, u32)> = vec![
        ("です", 10), ("ます", 10), ("これ", 10), ("それ", 10), ("あれ", 8),
        ("した", 6), ("ます", 10), ("ください", 8), ("ありがとう", 9), ("都", 5),
        ("区", 4), ("駅", 4), ("店", 3), ("会社", 4),
    ];
    static ref ZH_FEATURE_WORDS: Vec<(&'static str, u32)> = vec![
        ("的", 10), ("是", 10), ("了", 8), ("不", 8), ("在", 7),
        ("我", 6), ("你", 6), ("他", 5), ("这", 5), ("那", 5), ("们", 5),
    ];
    static ref EN_FEATURE_WORDS: Vec<(&'static str, u32)> = vec![
        ("the", 8), ("and", 8), ("is", 8), ("was", 8), ("of", 6),
        ("to", 6), ("a", 5), ("in", 5), ("that", 6), ("it", 5),
    ];
    static ref QYA_FEATURE_WORDS: Vec<(&'static str, u32)> = vec![
        ("elen", 10), ("namárië", 10), ("aiya", 10), ("mellon", 9),
        ("quenya", 9), ("vanya", 8), ("suilad", 8), ("tirion", 7),
    ];

    static ref JA_BIGRAMS: Vec<&'static str> = vec!["です", "ます", "した", "った", "んだ"];
    static ref ZH_BIGRAMS: Vec<&'static str> = vec!["的是", "了不", "我们", "他们", "这个"];
    static ref EN_BIGRAMS: Vec<&'static str> = vec!["th", "he", "in", "er", "an"];
}

fn has_japanese_feature(text: &str) -> bool {
    JA_FEATURE_WORDS.iter().any(|(word, _)| text.contains(word))
}

/// Weighted sliding match: sum the weight of every feature word that
/// occurs anywhere in `text`, once per distinct word (not per occurrence).
fn score_features(text: &str, words: &[(&'static str, u32)]) -> u32 {
    words
        .iter()
        .filter(|(word, _)| text.contains(word))
        .map(|(_, weight)| *weight)
        .sum()
}

fn score_bigrams(text: &str, bigrams: &[&'static str]) -> u32 {
    bigrams.iter().filter(|bg| text.contains(*bg)).count() as u32
}

/// Layer 1: charset-based decision rules, in the spec's fixed order.
/// Returns `None` when no rule fires (ambiguous), falling through to L2.
fn charset_decision(stats: &CharsetStats) -> Option<(Language, f64)> {
    if stats.hiragana > 0 || stats.katakana > 0 {
        return Some((Language::Japanese, 0.95));
    }
    if stats.quenya_special > 0 && stats.latin_share() > 0.5 {
        return Some((Language::Quenya, 0.95));
    }
    if stats.latin_share() > 0.7 {
        return Some((Language::English, 0.9));
    }
    if stats.hangul > 0 {
        return Some((Language::Korean, 0.9));
    }
    None
}

/// Detect the language of `text`, per the four-layer cascade in §4.9.
/// Empty or too-short input returns `Unknown` at confidence 0.
pub fn detect_language(text: &str) -> Detection {
    let stats = CharsetStats::scan(text);

    if stats.total < MIN_INPUT_CHARS {
        return Detection {
            language: Language::Unknown,
            confidence: 0.0,
            charset: stats,
        };
    }

    // Layer 1.
    if let Some((language, confidence)) = charset_decision(&stats) {
        return Detection { language, confidence, charset: stats };
    }

    // Rule 5 of Layer 1: CJK present with no hiragana/katakana — check for
    // a Japanese feature word (kanji-only Japanese) before defaulting to
    // Chinese.
    if stats.cjk > 0 {
        if has_japanese_feature(text) {
            return Detection { language: Language::Japanese, confidence: 0.95, charset: stats };
        }

        // Layer 2: feature-word scoring among the CJK-plausible languages.
        let zh_score = score_features(text, &ZH_FEATURE_WORDS);
        let ja_score = score_features(text, &JA_FEATURE_WORDS);
        if zh_score > 0 || ja_score > 0 {
            return if ja_score > zh_score {
                Detection { language: Language::Japanese, confidence: 0.75, charset: stats }
            } else if zh_score > ja_score {
                Detection { language: Language::Mandarin, confidence: 0.75, charset: stats }
            } else {
                cjk_bigram_or_fallback(text, stats)
            };
        }
        return cjk_bigram_or_fallback(text, stats);
    }

    // Layer 2 for non-CJK ambiguous scripts (e.g. mixed Latin where L1's
    // 70% Latin-share threshold wasn't crossed).
    let en_score = score_features(text, &EN_FEATURE_WORDS);
    let qya_score = score_features(text, &QYA_FEATURE_WORDS);
    if en_score > 0 || qya_score > 0 {
        return if qya_score > en_score {
            Detection { language: Language::Quenya, confidence: 0.75, charset: stats }
        } else {
            Detection { language: Language::English, confidence: 0.75, charset: stats }
        };
    }

    // Layer 3: bigram scoring.
    let en_bg = score_bigrams(&text.to_lowercase(), &EN_BIGRAMS);
    if en_bg > 0 {
        return Detection { language: Language::English, confidence: 0.65, charset: stats };
    }

    Detection { language: Language::Unknown, confidence: 0.0, charset: stats }
}

fn cjk_bigram_or_fallback(text: &str, stats: CharsetStats) -> Detection {
    let zh_bg = score_bigrams(text, &ZH_BIGRAMS);
    let ja_bg = score_bigrams(text, &JA_BIGRAMS);
    if zh_bg > 0 || ja_bg > 0 {
        return if ja_bg > zh_bg {
            Detection { language: Language::Japanese, confidence: 0.65, charset: stats }
        } else {
            Detection { language: Language::Mandarin, confidence: 0.65, charset: stats }
        };
    }
    // Layer 4: CJK fallback.
    if has_japanese_feature(text) {
        Detection { language: Language::Japanese, confidence: 0.6, charset: stats }
    } else {
        Detection { language: Language::Mandarin, confidence: 0.55, charset: stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_forces_japanese() {
        let d = detect_language("これはペンです");
        assert_eq!(d.language, Language::Japanese);
        assert!(d.confidence >= 0.9);
    }

    #[test]
    fn kanji_only_with_feature_word_is_japanese() {
        // Scenario 7: 東京都, pure kanji containing the feature word 都.
        let d = detect_language("東京都");
        assert_eq!(d.language, Language::Japanese);
        assert!(d.confidence >= 0.6);
    }

    #[test]
    fn plain_chinese_sentence_detected_as_mandarin() {
        let d = detect_language("我们的生活很好");
        assert_eq!(d.language, Language::Mandarin);
    }

    #[test]
    fn mostly_latin_text_detected_as_english() {
        let d = detect_language("The quick brown fox jumps over the lazy dog");
        assert_eq!(d.language, Language::English);
    }

    #[test]
    fn quenya_special_chars_with_latin_majority_detected_as_quenya() {
        let d = detect_language("Elen síla lúmenn' omentielvo");
        assert_eq!(d.language, Language::Quenya);
    }

    #[test]
    fn hangul_detected_as_korean() {
        let d = detect_language("안녕하세요");
        assert_eq!(d.language, Language::Korean);
    }

    #[test]
    fn empty_input_is_unknown_with_zero_confidence() {
        let d = detect_language("");
        assert_eq!(d.language, Language::Unknown);
        assert_eq!(d.confidence, 0.0);
    }

    #[test]
    fn adding_hiragana_never_flips_detection_away_from_japanese() {
        // Monotonicity property (§8): once Japanese, stays Japanese as more
        // hiragana is added.
        let base = "猫が";
        let d1 = detect_language(base);
        let extended = format!("{base}いますね");
        let d2 = detect_language(&extended);
        if d1.language == Language::Japanese {
            assert_eq!(d2.language, Language::Japanese);
        }
        assert_eq!(d2.language, Language::Japanese);
    }
}
