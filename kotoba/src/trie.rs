//! Arena-backed trie over Unicode code points.
//!
//! Stored as a flat `Vec<TrieNode>` indexed by `u32`, with each node's
//! children held as a small `Vec<(codepoint, child_index)>` rather than
//! `HashMap<char, Box<TrieNode>>` — a trie built for a large dictionary
//! has millions of nodes, and a `Box`-per-node tree scatters them across
//! the heap and costs an allocation per insertion. Fan-out per node is
//! small in practice (distinct following characters), so linear scan over
//! the children vector is both simpler and, for realistic fan-out, faster
//! than a hash lookup.

use crate::error::{G2pError, Result};

pub type NodeIndex = u32;

const ROOT: NodeIndex = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: Vec<(u32, NodeIndex)>,
    is_word: bool,
    frequency: f64,
    tag: Option<String>,
    reading: Option<String>,
    word: Option<String>,
}

/// A single prefix match returned by `match_all`.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub word: &'a str,
    pub byte_length: usize,
    pub frequency: f64,
    pub tag: Option<&'a str>,
    pub reading: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            nodes: vec![TrieNode::default()],
            word_count: 0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    fn find_child(&self, node: NodeIndex, codepoint: u32) -> Option<NodeIndex> {
        self.nodes[node as usize]
            .children
            .iter()
            .find(|(cp, _)| *cp == codepoint)
            .map(|(_, idx)| *idx)
    }

    fn find_or_create_child(&mut self, node: NodeIndex, codepoint: u32) -> Result<NodeIndex> {
        if let Some(idx) = self.find_child(node, codepoint) {
            return Ok(idx);
        }
        if self.nodes.len() >= u32::MAX as usize {
            return Err(G2pError::OutOfMemory);
        }
        let new_idx = self.nodes.len() as NodeIndex;
        self.nodes.push(TrieNode::default());
        self.nodes[node as usize].children.push((codepoint, new_idx));
        Ok(new_idx)
    }

    /// Insert `word` with the given payload. Re-inserting an existing word
    /// overwrites its payload without creating duplicate nodes.
    pub fn insert(
        &mut self,
        word: &str,
        frequency: f64,
        tag: Option<&str>,
        reading: Option<&str>,
    ) -> Result<()> {
        if word.is_empty() {
            return Err(G2pError::NullInput);
        }
        let mut current = ROOT;
        for ch in word.chars() {
            current = self.find_or_create_child(current, ch as u32)?;
        }
        let node = &mut self.nodes[current as usize];
        if !node.is_word {
            self.word_count += 1;
        }
        node.is_word = true;
        node.frequency = frequency;
        node.tag = tag.map(String::from);
        node.reading = reading.map(String::from);
        node.word = Some(word.to_string());
        Ok(())
    }

    fn walk(&self, word: &str) -> Option<NodeIndex> {
        let mut current = ROOT;
        for ch in word.chars() {
            current = self.find_child(current, ch as u32)?;
        }
        Some(current)
    }

    /// Exact lookup. Returns `None` if `word` is not a stored entry.
    pub fn lookup(&self, word: &str) -> Option<Match<'_>> {
        let idx = self.walk(word)?;
        let node = &self.nodes[idx as usize];
        if !node.is_word {
            return None;
        }
        Some(Match {
            word: node.word.as_deref().unwrap_or(word),
            byte_length: word.len(),
            frequency: node.frequency,
            tag: node.tag.as_deref(),
            reading: node.reading.as_deref(),
        })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Marks `word` as no longer a stored entry. The path nodes are left in
    /// place (shared by other words in most real dictionaries); only the
    /// terminal's `is_word` flag is cleared.
    pub fn remove(&mut self, word: &str) -> bool {
        if let Some(idx) = self.walk(word) {
            let node = &mut self.nodes[idx as usize];
            if node.is_word {
                node.is_word = false;
                self.word_count -= 1;
                return true;
            }
        }
        false
    }

    /// Every prefix of `text[start..]` (byte offset) that terminates at a
    /// word node, in order of increasing length.
    pub fn match_all<'a>(&'a self, text: &'a str, start: usize) -> Vec<Match<'a>> {
        let mut matches = Vec::new();
        let mut current = ROOT;
        let mut pos = start;
        for ch in text[start..].chars() {
            let next = match self.find_child(current, ch as u32) {
                Some(idx) => idx,
                None => break,
            };
            pos += ch.len_utf8();
            current = next;
            let node = &self.nodes[current as usize];
            if node.is_word {
                matches.push(Match {
                    word: &text[start..pos],
                    byte_length: pos - start,
                    frequency: node.frequency,
                    tag: node.tag.as_deref(),
                    reading: node.reading.as_deref(),
                });
            }
        }
        matches
    }

    /// The longest of `match_all`'s results, if any.
    pub fn match_longest<'a>(&'a self, text: &'a str, start: usize) -> Option<Match<'a>> {
        self.match_all(text, start).into_iter().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup_then_remove() {
        let mut trie = Trie::new();
        trie.insert("你好", 10.0, Some("n"), None).unwrap();
        assert!(trie.contains("你好"));
        assert!(!trie.contains("你"));
        assert!(trie.remove("你好"));
        assert!(!trie.contains("你好"));
    }

    #[test]
    fn reinsert_updates_payload_without_duplicating() {
        let mut trie = Trie::new();
        trie.insert("你好", 1.0, None, None).unwrap();
        trie.insert("你好", 2.0, Some("greeting"), None).unwrap();
        assert_eq!(trie.word_count(), 1);
        let m = trie.lookup("你好").unwrap();
        assert_eq!(m.frequency, 2.0);
        assert_eq!(m.tag, Some("greeting"));
    }

    #[test]
    fn match_all_returns_prefixes_in_increasing_length() {
        let mut trie = Trie::new();
        trie.insert("你", 1.0, None, None).unwrap();
        trie.insert("你好", 5.0, None, None).unwrap();
        trie.insert("你好世界", 9.0, None, None).unwrap();

        let matches = trie.match_all("你好世界！", 0);
        let words: Vec<&str> = matches.iter().map(|m| m.word).collect();
        assert_eq!(words, vec!["你", "你好", "你好世界"]);
    }

    #[test]
    fn match_longest_picks_last() {
        let mut trie = Trie::new();
        trie.insert("长", 1.0, None, None).unwrap();
        trie.insert("长城", 5.0, None, None).unwrap();
        let longest = trie.match_longest("长城", 0).unwrap();
        assert_eq!(longest.word, "长城");
    }

    #[test]
    fn no_match_returns_empty() {
        let trie = Trie::new();
        assert!(trie.match_all("abc", 0).is_empty());
        assert!(trie.match_longest("abc", 0).is_none());
    }
}
