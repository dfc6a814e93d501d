//! English grapheme-to-phoneme: lowercase dictionary lookup with
//! out-of-vocabulary passthrough (ambient, supplementing §2's core table).
//!
//! There is no rule-based fallback here — the reference material gives no
//! grapheme-to-phoneme rule set for English, only a CMUdict-style lookup
//! table (§6). A word missing from the dictionary surfaces with its own
//! spelling as its "phonemes", exactly as the source's OOV passthrough
//! scenario (§8, scenario 5) specifies.

use std::collections::HashMap;

use crate::token::{Token, TokenList};

/// Flat word -> IPA phoneme-string map, built at load time from the
/// English pronunciation dictionary TSV (§6). Keys are folded to lowercase
/// on insertion, matching the dictionary file format's documented fold.
#[derive(Debug, Clone, Default)]
pub struct EnglishDict {
    entries: HashMap<String, String>,
}

impl EnglishDict {
    pub fn new() -> Self {
        EnglishDict {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, word: &str, phonemes: &str) {
        self.entries.insert(word.to_lowercase(), phonemes.to_string());
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(&word.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

/// Whitespace-and-punctuation tokenizer: runs of word characters (letters,
/// digits, apostrophes) become one token each; everything else (spaces,
/// punctuation) becomes its own passthrough token with no phonemes.
pub fn process(text: &str, dict: &EnglishDict) -> TokenList {
    let mut result = TokenList::new();
    if text.is_empty() {
        return result;
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (byte_start, ch) = chars[i];
        if is_word_char(ch) {
            let mut j = i;
            while j < chars.len() && is_word_char(chars[j].1) {
                j += 1;
            }
            let byte_end = chars.get(j).map(|(b, _)| *b).unwrap_or(text.len());
            let surface = &text[byte_start..byte_end];
            let phonemes = dict.lookup(surface).unwrap_or(surface);
            result.push(Token::new(surface, byte_start).with_phonemes(phonemes));
            i = j;
        } else {
            let byte_end = chars.get(i + 1).map(|(b, _)| *b).unwrap_or(text.len());
            result.push(Token::new(&text[byte_start..byte_end], byte_start));
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> EnglishDict {
        let mut dict = EnglishDict::new();
        dict.insert("hello", "h ə l ˈoʊ");
        dict.insert("world", "w ˈɜː l d");
        dict
    }

    #[test]
    fn dictionary_hit_resolves_phonemes() {
        let dict = test_dict();
        let tokens = process("hello world", &dict);
        let words: Vec<&str> = tokens.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["hello", " ", "world"]);
        assert_eq!(tokens.tokens[0].phonemes.as_deref(), Some("h ə l ˈoʊ"));
    }

    #[test]
    fn oov_word_falls_back_to_surface_form() {
        let dict = test_dict();
        let tokens = process("hello xyzabc world", &dict);
        let oov = tokens
            .tokens
            .iter()
            .find(|t| t.text == "xyzabc")
            .expect("xyzabc token present");
        assert_eq!(oov.phonemes.as_deref(), Some("xyzabc"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dict = test_dict();
        let tokens = process("HELLO", &dict);
        assert_eq!(tokens.tokens[0].phonemes.as_deref(), Some("h ə l ˈoʊ"));
    }

    #[test]
    fn punctuation_tokens_carry_no_phonemes() {
        let dict = test_dict();
        let tokens = process("hello, world!", &dict);
        let comma = tokens.tokens.iter().find(|t| t.text == ",").unwrap();
        assert!(comma.phonemes.is_none());
    }

    #[test]
    fn three_token_scenario_matches_expected_shape() {
        let dict = test_dict();
        let tokens = process("hello xyzabc world", &dict);
        let word_tokens: Vec<&Token> = tokens
            .tokens
            .iter()
            .filter(|t| t.text.chars().all(|c| c.is_alphanumeric()))
            .collect();
        assert_eq!(word_tokens.len(), 3);
    }
}
