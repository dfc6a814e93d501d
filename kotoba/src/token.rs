//! Token and token-list types shared by every language's segmenter.

use serde::Serialize;

/// A single segmented unit of text with its resolved pronunciation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    pub tag: Option<String>,
    pub phonemes: Option<String>,
    pub byte_start: usize,
    pub byte_length: usize,
    /// Cost accumulated by the segmenter producing this token (lower is
    /// better for lattice-based segmenters; diagnostic only).
    pub score: f64,
}

impl Token {
    pub fn new(text: impl Into<String>, byte_start: usize) -> Self {
        let text = text.into();
        let byte_length = text.len();
        Token {
            text,
            tag: None,
            phonemes: None,
            byte_start,
            byte_length,
            score: 0.0,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_phonemes(mut self, phonemes: impl Into<String>) -> Self {
        self.phonemes = Some(phonemes.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

/// An ordered sequence of tokens in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Concatenated phonemes for all tokens, space-separated, skipping
    /// tokens with no resolved phonemes.
    pub fn phoneme_string(&self) -> String {
        self.tokens
            .iter()
            .filter_map(|t| t.phonemes.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Concatenation of token texts in order; for lossless segmenters this
    /// must equal the original input byte-for-byte.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenated_text_matches_input_for_lossless_tokens() {
        let mut list = TokenList::new();
        list.push(Token::new("你好", 0));
        list.push(Token::new("世界", 6));
        assert_eq!(list.text(), "你好世界");
    }

    #[test]
    fn phoneme_string_skips_unresolved_tokens() {
        let mut list = TokenList::new();
        list.push(Token::new("你好", 0).with_phonemes("ni↓ xɑʊ↓"));
        list.push(Token::new("?", 6));
        assert_eq!(list.phoneme_string(), "ni↓ xɑʊ↓");
    }
}
