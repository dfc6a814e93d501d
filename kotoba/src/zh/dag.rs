//! DAG-based Chinese word segmentation (§4.3), jieba-style: build a graph of
//! every dictionary-backed edge, then pick the max-log-probability path with
//! a backward dynamic program.

use crate::token::{Token, TokenList};
use crate::trie::Trie;

/// Single-character fallback edges use this as their word frequency floor,
/// so an unknown character never beats a real dictionary entry of equal length.
const SINGLE_CHAR_LOG_FREQ_FLOOR: f64 = -0.693_147_180_559_945_3; // ln(0.5)

struct CharPositions {
    /// Byte offset of each character, plus one trailing entry for the
    /// end-of-text sentinel, so `offsets[i]..offsets[i+1]` is character i.
    offsets: Vec<usize>,
}

impl CharPositions {
    fn new(text: &str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());
        CharPositions { offsets }
    }

    fn char_count(&self) -> usize {
        self.offsets.len() - 1
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.offsets[char_index]
    }

    /// Character index whose span starts at `byte_offset`, if any.
    fn char_index_of_byte(&self, byte_offset: usize) -> Option<usize> {
        self.offsets.binary_search(&byte_offset).ok()
    }
}

/// One DAG edge: word spans character positions `[from, to)`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    log_freq: f64,
}

/// Build the DAG: for every character position, the set of reachable next
/// positions with dictionary backing, falling back to a single-character
/// edge when nothing in `dict` matches there.
fn build_dag(text: &str, positions: &CharPositions, dict: &Trie) -> Vec<Vec<Edge>> {
    let n = positions.char_count();
    let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); n];

    for i in 0..n {
        let byte_start = positions.byte_offset(i);
        let matches = dict.match_all(text, byte_start);

        if matches.is_empty() {
            edges[i].push(Edge {
                to: i + 1,
                log_freq: SINGLE_CHAR_LOG_FREQ_FLOOR,
            });
            continue;
        }

        for m in matches {
            let end_byte = byte_start + m.byte_length;
            let to = positions
                .char_index_of_byte(end_byte)
                .expect("trie match must end on a character boundary");
            let log_freq = m.frequency.max(0.5).ln();
            edges[i].push(Edge { to, log_freq });
        }
    }

    edges
}

/// Backward DP over the DAG: `dp[n] = 0`, `dp[i] = max over edges(i→j) of
/// (log_freq + dp[j])`, ties broken toward the larger `j` (longer word).
fn score_dag(edges: &[Vec<Edge>]) -> Vec<usize> {
    let n = edges.len();
    let mut dp = vec![f64::NEG_INFINITY; n + 1];
    let mut route = vec![n; n + 1];
    dp[n] = 0.0;

    for i in (0..n).rev() {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_to = i + 1;
        for edge in &edges[i] {
            let score = edge.log_freq + dp[edge.to];
            if score > best_score || (score == best_score && edge.to > best_to) {
                best_score = score;
                best_to = edge.to;
            }
        }
        dp[i] = best_score;
        route[i] = best_to;
    }

    route
}

/// Segment `text` against `dict` using the DAG + backward-DP algorithm.
/// Returns tokens with byte offsets into `text`; no phonemes are resolved
/// here (see `zh::mod` for the full pipeline).
pub fn segment(text: &str, dict: &Trie) -> TokenList {
    let mut tokens = TokenList::new();
    if text.is_empty() {
        return tokens;
    }

    let positions = CharPositions::new(text);
    let edges = build_dag(text, &positions, dict);
    let route = score_dag(&edges);

    let mut i = 0;
    while i < positions.char_count() {
        let j = route[i];
        let byte_start = positions.byte_offset(i);
        let byte_end = positions.byte_offset(j);
        tokens.push(Token::new(&text[byte_start..byte_end], byte_start));
        i = j;
    }

    tokens
}

/// True if every token in `list` is a single Chinese character, used to
/// decide whether a run of DAG fallback tokens is worth re-segmenting by HMM.
pub fn is_single_char_run(tokens: &[Token]) -> bool {
    tokens.iter().all(|t| t.text.chars().count() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_dict() -> Trie {
        let mut trie = Trie::new();
        trie.insert("中国", 1000.0, Some("ns"), None).unwrap();
        trie.insert("中", 500.0, Some("n"), None).unwrap();
        trie.insert("国", 300.0, Some("n"), None).unwrap();
        trie.insert("人", 800.0, Some("n"), None).unwrap();
        trie
    }

    #[test]
    fn prefers_longer_high_frequency_word() {
        let dict = build_test_dict();
        let tokens = segment("中国人", &dict);
        let words: Vec<&str> = tokens.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["中国", "人"]);
    }

    #[test]
    fn unknown_chars_fall_back_to_single_char_tokens() {
        let dict = build_test_dict();
        let tokens = segment("中X国", &dict);
        let words: Vec<&str> = tokens.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["中", "X", "国"]);
    }

    #[test]
    fn empty_text_produces_no_tokens() {
        let dict = build_test_dict();
        let tokens = segment("", &dict);
        assert!(tokens.tokens.is_empty());
    }

    #[test]
    fn token_concatenation_reproduces_input() {
        let dict = build_test_dict();
        let tokens = segment("中国人中国", &dict);
        assert_eq!(tokens.text(), "中国人中国");
    }
}
