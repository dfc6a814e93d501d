//! Japanese segmentation lattice and Viterbi shortest-path search (§4.6).
//!
//! Node costs favor longer dictionary matches over short ones (unigram
//! scoring otherwise over-splits); edge costs come from the POS transition
//! table. BOS/EOS are explicit sentinel nodes rather than special-cased
//! positions, so the relaxation loop has no position-0/position-N branches.

use crate::trie::Trie;
use tracing::{debug, debug_span};

const UNK_NODE_COST: f64 = 20.0;
const LENGTH_BONUS_PER_CHAR: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct LatticeNode {
    pub start: usize,
    pub end: usize,
    pub surface: String,
    pub tag: String,
    pub reading: Option<String>,
    pub node_cost: f64,
    pub total_cost: f64,
    pub prev: Option<usize>,
}

pub struct Lattice {
    nodes: Vec<LatticeNode>,
    nodes_by_start: Vec<Vec<usize>>,
    nodes_by_end: Vec<Vec<usize>>,
    char_count: usize,
    bos: usize,
    eos: usize,
}

fn node_cost(frequency: f64, char_length: usize) -> f64 {
    -frequency.max(0.5).ln() - (char_length.saturating_sub(1) as f64) * LENGTH_BONUS_PER_CHAR
}

impl Lattice {
    /// Build the lattice over `text` using `dict` for pronunciation lookups.
    /// One UNK node of length 1 is added at every position with no match.
    pub fn build(text: &str, dict: &Trie) -> Self {
        let _span = debug_span!("build_lattice", len = text.len()).entered();
        let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = byte_offsets.len();

        let mut nodes = Vec::new();
        let mut nodes_by_start: Vec<Vec<usize>> = vec![Vec::new(); char_count + 1];
        let mut nodes_by_end: Vec<Vec<usize>> = vec![Vec::new(); char_count + 1];

        let bos = nodes.len();
        nodes.push(LatticeNode {
            start: 0,
            end: 0,
            surface: String::new(),
            tag: String::new(),
            reading: None,
            node_cost: 0.0,
            total_cost: 0.0,
            prev: None,
        });
        nodes_by_start[0].push(bos);
        nodes_by_end[0].push(bos);

        for start in 0..char_count {
            let byte_start = byte_offsets[start];
            let matches = dict.match_all(text, byte_start);

            for m in &matches {
                let char_len = m.word.chars().count();
                let end = start + char_len;
                let idx = nodes.len();
                nodes.push(LatticeNode {
                    start,
                    end,
                    surface: m.word.to_string(),
                    tag: m.tag.unwrap_or("").to_string(),
                    reading: m.reading.map(String::from),
                    node_cost: node_cost(m.frequency, char_len),
                    total_cost: f64::INFINITY,
                    prev: None,
                });
                nodes_by_start[start].push(idx);
                nodes_by_end[end].push(idx);
            }

            if matches.is_empty() {
                let next_byte = byte_offsets.get(start + 1).copied().unwrap_or(text.len());
                let ch = text[byte_start..next_byte].to_string();
                let idx = nodes.len();
                nodes.push(LatticeNode {
                    start,
                    end: start + 1,
                    surface: ch,
                    tag: String::new(),
                    reading: None,
                    node_cost: UNK_NODE_COST,
                    total_cost: f64::INFINITY,
                    prev: None,
                });
                nodes_by_start[start].push(idx);
                nodes_by_end[start + 1].push(idx);
            }
        }

        let eos = nodes.len();
        nodes.push(LatticeNode {
            start: char_count,
            end: char_count,
            surface: String::new(),
            tag: String::new(),
            reading: None,
            node_cost: 0.0,
            total_cost: f64::INFINITY,
            prev: None,
        });
        nodes_by_start[char_count].push(eos);
        nodes_by_end[char_count].push(eos);

        debug!(node_count = nodes.len());

        Lattice {
            nodes,
            nodes_by_start,
            nodes_by_end,
            char_count,
            bos,
            eos,
        }
    }

    /// Relax every edge in increasing position order, BOS first. Ties keep
    /// the earlier-inserted predecessor (strict `<` comparison).
    pub fn viterbi_search(&mut self) {
        self.nodes[self.bos].total_cost = 0.0;

        for position in 0..=self.char_count {
            let from_indices = self.nodes_by_end[position].clone();
            for &from_idx in &from_indices {
                let from_total = self.nodes[from_idx].total_cost;
                if from_total.is_infinite() {
                    continue;
                }
                let to_indices = self.nodes_by_start[position].clone();
                for &to_idx in &to_indices {
                    if to_idx == from_idx {
                        continue;
                    }
                    let edge_cost = if to_idx == self.eos || from_idx == self.bos {
                        0.0
                    } else {
                        crate::ja::transition::transition_cost(&self.nodes[from_idx].tag, &self.nodes[to_idx].tag)
                    };
                    let candidate = from_total + self.nodes[to_idx].node_cost + edge_cost;
                    if candidate < self.nodes[to_idx].total_cost {
                        self.nodes[to_idx].total_cost = candidate;
                        self.nodes[to_idx].prev = Some(from_idx);
                    }
                }
            }
        }
    }

    /// Backtrack from EOS to BOS, returning nodes in left-to-right order
    /// (excluding the BOS/EOS sentinels).
    pub fn best_path(&self) -> Vec<&LatticeNode> {
        let mut path = Vec::new();
        let mut current = self.nodes[self.eos].prev;
        while let Some(idx) = current {
            if idx == self.bos {
                break;
            }
            path.push(&self.nodes[idx]);
            current = self.nodes[idx].prev;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> Trie {
        let mut trie = Trie::new();
        trie.insert("東京", 5000.0, Some("名詞"), Some("とうきょう")).unwrap();
        trie.insert("は", 9000.0, Some("助詞"), Some("は")).unwrap();
        trie.insert("大きい", 3000.0, Some("形容詞"), Some("おおきい")).unwrap();
        trie.insert("です", 8000.0, Some("助動詞"), Some("です")).unwrap();
        trie
    }

    #[test]
    fn best_path_covers_whole_input() {
        let dict = test_dict();
        let mut lattice = Lattice::build("東京は大きいです", &dict);
        lattice.viterbi_search();
        let path = lattice.best_path();
        let surface: String = path.iter().map(|n| n.surface.as_str()).collect();
        assert_eq!(surface, "東京は大きいです");
    }

    #[test]
    fn unknown_character_gets_unk_node() {
        let dict = test_dict();
        let mut lattice = Lattice::build("X", &dict);
        lattice.viterbi_search();
        let path = lattice.best_path();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].node_cost, UNK_NODE_COST);
    }

    #[test]
    fn empty_text_has_trivial_path() {
        let dict = test_dict();
        let mut lattice = Lattice::build("", &dict);
        lattice.viterbi_search();
        assert!(lattice.best_path().is_empty());
    }
}
