//! Japanese grapheme-to-phoneme pipeline: lattice construction → Viterbi
//! search over POS transition costs → per-token kana resolution → kana→IPA.

pub mod kana;
pub mod lattice;
pub mod transition;

use crate::token::{Token, TokenList};
use crate::trie::Trie;
use lattice::Lattice;
use tracing::warn;

/// Obtain the kana reading for a lattice node per §4.7's priority order:
/// (a) the node's own `reading`, (b) the surface itself if it is already
/// kana, (c) a `tracing::warn!` plus surface-unchanged fallback.
fn resolve_reading(surface: &str, reading: Option<&str>) -> String {
    if let Some(r) = reading {
        if !r.is_empty() {
            return r.to_string();
        }
    }
    if is_kana(surface) {
        return surface.to_string();
    }
    warn!(surface, "no reading available, falling back to surface form");
    surface.to_string()
}

fn is_kana(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            ('\u{3040}'..='\u{30FF}').contains(&c)
                || ('\u{31F0}'..='\u{31FF}').contains(&c)
        })
}

/// Run the full Japanese pipeline over `text`: build the lattice against
/// `dict`, Viterbi-decode it, then resolve each winning node's kana
/// reading to IPA (§4.6, §4.7).
pub fn process(text: &str, dict: &Trie) -> TokenList {
    let mut result = TokenList::new();
    if text.is_empty() {
        return result;
    }

    let mut lattice = Lattice::build(text, dict);
    lattice.viterbi_search();

    let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();

    for node in lattice.best_path() {
        let byte_start = byte_offsets
            .get(node.start)
            .copied()
            .unwrap_or(text.len());
        let byte_end = byte_offsets.get(node.end).copied().unwrap_or(text.len());
        let surface = &text[byte_start..byte_end];

        let reading = resolve_reading(surface, node.reading.as_deref());
        let phonemes = kana::kana_to_ipa(&reading);

        let tag = if node.tag.is_empty() {
            None
        } else {
            Some(node.tag.clone())
        };

        let mut token = Token::new(surface, byte_start).with_score(node.total_cost);
        if let Some(tag) = tag {
            token = token.with_tag(tag);
        }
        token = token.with_phonemes(phonemes);
        result.push(token);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> Trie {
        let mut trie = Trie::new();
        trie.insert("私", 4000.0, Some("代名詞"), Some("ワタクシ")).unwrap();
        trie.insert("は", 9000.0, Some("助詞"), Some("ワ")).unwrap();
        trie.insert("学生", 3000.0, Some("名詞"), Some("ガクセー")).unwrap();
        trie.insert("です", 8000.0, Some("助動詞"), Some("デス")).unwrap();
        trie
    }

    #[test]
    fn verb_conjugation_scenario_tokenizes_exactly_four_words() {
        let dict = test_dict();
        let tokens = process("私は学生です", &dict);
        let words: Vec<&str> = tokens.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["私", "は", "学生", "です"]);
    }

    #[test]
    fn phoneme_fragment_matches_expected_ipa() {
        let dict = test_dict();
        let tokens = process("私は学生です", &dict);
        let phonemes = tokens.phoneme_string();
        assert!(phonemes.contains("ɡakɯseː"), "got {phonemes:?}");
        assert!(phonemes.ends_with("desɨ"), "got {phonemes:?}");
    }

    #[test]
    fn token_offsets_are_contiguous_and_cover_the_input() {
        let dict = test_dict();
        let tokens = process("私は学生です", &dict);
        let mut expected_start = 0usize;
        for token in &tokens.tokens {
            assert_eq!(token.byte_start, expected_start);
            expected_start += token.byte_length;
        }
        assert_eq!(expected_start, "私は学生です".len());
    }

    #[test]
    fn oov_run_falls_back_to_unk_nodes_and_still_covers_input() {
        let dict = test_dict();
        let tokens = process("ピカチュウ", &dict);
        assert_eq!(tokens.text(), "ピカチュウ");
    }

    #[test]
    fn missing_reading_on_non_kana_surface_falls_back_to_surface() {
        let mut dict = Trie::new();
        dict.insert("猫", 100.0, Some("名詞"), None).unwrap();
        let tokens = process("猫", &dict);
        assert_eq!(tokens.tokens.len(), 1);
        // No reading and not kana itself: phonemes fall back to an
        // unresolved kana->IPA pass over the bare surface form.
        assert_eq!(tokens.tokens[0].phonemes.as_deref(), Some(""));
    }

    #[test]
    fn empty_text_produces_no_tokens() {
        let dict = test_dict();
        assert!(process("", &dict).tokens.is_empty());
    }
}
