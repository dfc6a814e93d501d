//! Mandarin Chinese grapheme-to-phoneme pipeline: numeral expansion →
//! punctuation normalization → DAG segmentation (HMM OOV recovery optional)
//! → polyphone resolution → tone sandhi → pinyin-to-IPA.

pub mod dag;
pub mod hmm;
pub mod num2cn;
pub mod phrase_dict;
pub mod tone_sandhi;
pub mod transcription;

use crate::token::{Token, TokenList};
use crate::trie::Trie;
use crate::EngineConfig;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ZH_SEGMENT_PATTERN: Regex = Regex::new(r"[一-鿿]+|[^一-鿿]+").unwrap();
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();

    static ref PUNCTUATION_MAP: Vec<(&'static str, &'static str)> = vec![
        ("\u{3001}", ", "),
        ("\u{FF0C}", ", "),
        ("\u{3002}", ". "),
        ("\u{FF0E}", ". "),
        ("\u{FF01}", "! "),
        ("\u{FF1A}", ": "),
        ("\u{FF1B}", "; "),
        ("\u{FF1F}", "? "),
        ("\u{00AB}", " \""),
        ("\u{00BB}", "\" "),
        ("\u{300A}", " \""),
        ("\u{300B}", "\" "),
        ("\u{300C}", " \""),
        ("\u{300D}", "\" "),
        ("\u{3010}", " \""),
        ("\u{3011}", "\" "),
        ("\u{FF08}", " ("),
        ("\u{FF09}", ") "),
    ];
}

fn is_chinese_char(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

fn map_punctuation(text: &str) -> String {
    let mut result = text.to_string();
    for (from, to) in PUNCTUATION_MAP.iter() {
        result = result.replace(from, to);
    }
    result
}

/// Expand every run of Arabic digits in `text` into Chinese text (§4.10).
/// A 4-digit run with no surrounding decimal point is read as a year
/// (digit-by-digit) rather than a magnitude, matching how such runs are
/// actually spoken.
fn convert_numbers(text: &str) -> String {
    DIGIT_RUN
        .replace_all(text, |caps: &regex::Captures| {
            let matched = &caps[0];
            if matched.contains('.') {
                matched
                    .parse::<f64>()
                    .map(num2cn::float_to_chinese)
                    .unwrap_or_else(|_| matched.to_string())
            } else if matched.len() == 4 && !matched.starts_with('0') {
                num2cn::year_to_chinese(matched)
            } else {
                matched
                    .parse::<i64>()
                    .map(num2cn::int_to_chinese)
                    .unwrap_or_else(|_| matched.to_string())
            }
        })
        .into_owned()
}

/// Resolve the per-syllable numeric-tone pinyin for `word`, preferring a
/// loaded external phrase dictionary (§6), then a whole-word dictionary
/// reading, falling back to the static phrase/POS/default polyphone tiers
/// per character (§4.4, §9b).
fn word_to_pinyin(word: &str, pos: &str, dict: &Trie, phrase_dict: Option<&Trie>) -> Vec<String> {
    if let Some(phrase) = phrase_dict.and_then(|pd| pd.lookup(word)) {
        if let Some(reading) = phrase.tag {
            return reading.split(' ').map(String::from).collect();
        }
    }
    if let Some(m) = dict.lookup(word) {
        if let Some(reading) = m.reading {
            return reading.split(' ').map(String::from).collect();
        }
    }
    if let Some(phrase) = phrase_dict::lookup_phrase(word) {
        return phrase.split(' ').map(String::from).collect();
    }

    word.chars()
        .map(|c| {
            phrase_dict::lookup_with_pos(c, pos)
                .or_else(|| phrase_dict::default_pinyin(c))
                .or_else(|| dict.lookup(&c.to_string()).and_then(|m| m.reading))
                .unwrap_or("?5")
                .to_string()
        })
        .collect()
}

fn word_to_ipa(
    word: &str,
    pos: &str,
    dict: &Trie,
    phrase_dict: Option<&Trie>,
    config: &EngineConfig,
) -> String {
    let mut pinyins = word_to_pinyin(word, pos, dict, phrase_dict);

    if config.enable_tone_sandhi {
        pinyins = tone_sandhi::apply_tone_sandhi(word, pos, &pinyins);
    }
    if config.enable_erhua {
        pinyins = tone_sandhi::apply_erhua(&pinyins);
    }

    pinyins
        .iter()
        .map(|py| transcription::retone_ipa(&transcription::pinyin_to_ipa(py)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Segment a pure-Chinese span, recovering multi-character OOV runs via HMM
/// when `config.enable_hmm_oov` is set and the DAG produced an all-single-char
/// stretch (§4.3's OOV handling clause).
fn segment_span(text: &str, dict: &Trie, hmm: &hmm::HmmModel, config: &EngineConfig) -> TokenList {
    let dag_tokens = dag::segment(text, dict);

    if !config.enable_hmm_oov || !dag::is_single_char_run(&dag_tokens.tokens) {
        return dag_tokens;
    }
    if dag_tokens.tokens.len() <= 1 {
        return dag_tokens;
    }

    let mut result = TokenList::new();
    let mut byte_start = dag_tokens.tokens.first().map(|t| t.byte_start).unwrap_or(0);
    for word in hmm::segment(hmm, text) {
        let len = word.len();
        result.push(Token::new(word, byte_start));
        byte_start += len;
    }
    result
}

/// Run the full Mandarin pipeline over `text`, producing phoneme-tagged
/// tokens. `dict` is the word-pinyin trie; `hmm` backs OOV recovery;
/// `phrase_dict` is an optional externally-loaded phrase dictionary (§6)
/// consulted before the segmenter's own curated phrase table.
pub fn process(
    text: &str,
    dict: &Trie,
    hmm: &hmm::HmmModel,
    phrase_dict: Option<&Trie>,
    config: &EngineConfig,
) -> TokenList {
    let mut result = TokenList::new();
    if text.trim().is_empty() {
        return result;
    }

    let expanded = convert_numbers(text);
    let mapped = map_punctuation(&expanded);

    for segment in ZH_SEGMENT_PATTERN.find_iter(&mapped) {
        let piece = segment.as_str();
        let first_char = piece.chars().next().unwrap_or(' ');

        if is_chinese_char(first_char) {
            let span_tokens = segment_span(piece, dict, hmm, config);
            let tagged: Vec<Token> = span_tokens
                .tokens
                .into_iter()
                .map(|token| {
                    let pos = dict
                        .lookup(&token.text)
                        .and_then(|m| m.tag.map(String::from))
                        .unwrap_or_default();
                    token.with_tag(pos)
                })
                .collect();

            // Merge 不/一/儿-suffix/reduplication pairs so tone sandhi sees
            // the combined unit, same as the segmentation's own curated
            // phrase table would (§4.4).
            let merged = if config.enable_tone_sandhi {
                tone_sandhi::pre_merge_for_modify(&tagged)
            } else {
                tagged
            };

            for token in merged {
                let pos = token.tag.clone().unwrap_or_default();
                let phonemes = word_to_ipa(&token.text, &pos, dict, phrase_dict, config);
                result.push(token.with_phonemes(phonemes));
            }
        } else {
            result.push(Token::new(piece, segment.start()));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> Trie {
        let mut trie = Trie::new();
        trie.insert("你好", 1000.0, Some("l"), Some("ni3 hao3")).unwrap();
        trie.insert("世界", 500.0, Some("n"), Some("shi4 jie4")).unwrap();
        trie.insert("中国", 800.0, Some("ns"), Some("zhong1 guo2")).unwrap();
        trie
    }

    #[test]
    fn number_expansion_before_segmentation() {
        let dict = test_dict();
        let hmm = hmm::HmmModel::default_model();
        let config = EngineConfig::default();
        let tokens = process("我有123个苹果", &dict, &hmm, None, &config);
        let text = tokens.text();
        assert!(text.contains("一百二十三"));
    }

    #[test]
    fn dictionary_word_resolves_phonemes() {
        let dict = test_dict();
        let hmm = hmm::HmmModel::default_model();
        let config = EngineConfig::default();
        let tokens = process("你好", &dict, &hmm, None, &config);
        let phonemes = tokens.phoneme_string();
        assert!(!phonemes.is_empty());
    }

    #[test]
    fn punctuation_is_mapped_to_ascii() {
        let mapped = map_punctuation("你好，世界！");
        assert!(mapped.contains(", "));
        assert!(mapped.contains('!'));
    }

    #[test]
    fn non_chinese_segments_pass_through() {
        let dict = test_dict();
        let hmm = hmm::HmmModel::default_model();
        let config = EngineConfig::default();
        let tokens = process("你好 hello", &dict, &hmm, None, &config);
        assert!(tokens.text().contains("hello"));
    }

    #[test]
    fn hmm_oov_tokens_carry_accumulating_byte_offsets() {
        // An empty dictionary forces every character into its own DAG token,
        // triggering HMM re-segmentation; the resulting multi-char words
        // must not all report the span's starting offset.
        let dict = Trie::new();
        let hmm = hmm::HmmModel::default_model();
        let config = EngineConfig::default();
        let tokens = process("张伟李明", &dict, &hmm, None, &config);
        let offsets: Vec<usize> = tokens.tokens.iter().map(|t| t.byte_start).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), offsets.len(), "byte_start values must be distinct: {offsets:?}");
    }

    #[test]
    fn loaded_phrase_dict_overrides_static_polyphone_reading() {
        // 银行's static phrase-table reading is "yin2 hang2" (initial h ->
        // IPA x); a loaded phrase dictionary entry for the same word must
        // take priority over it (§6, §4.4 priority order).
        let mut dict = Trie::new();
        dict.insert("银行", 100.0, Some("n"), None).unwrap();

        let mut phrase_dict = Trie::new();
        phrase_dict
            .insert("银行", 1.0, Some("yin2 xing2"), None)
            .unwrap();

        let hmm = hmm::HmmModel::default_model();
        let config = EngineConfig::default();

        let default_tokens = process("银行", &dict, &hmm, None, &config);
        assert!(default_tokens.phoneme_string().contains('x'));

        let overridden_tokens = process("银行", &dict, &hmm, Some(&phrase_dict), &config);
        assert!(overridden_tokens.phoneme_string().contains('ɕ'));
    }
}
