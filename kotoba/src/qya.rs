//! Quenya grapheme-to-phoneme: no dictionary, purely rule-based letter-
//! cluster matching with syllable counting and stress placement (§4.8).
//!
//! Tokenization here is a real per-word scan (whitespace and punctuation
//! delimit words), rather than treating the whole input as a single word —
//! see DESIGN.md's Open Question resolution for why this departs from a
//! placeholder single-word behavior.

use crate::token::{Token, TokenList};

const STRESS_MARK: char = 'ˈ';

fn is_word_char(c: char) -> bool {
    c.is_alphabetic()
}

/// One matched phonological unit: its IPA rendering and whether it is the
/// syllable nucleus (a vowel or diphthong match).
struct Unit {
    ipa: String,
    is_vowel: bool,
}

fn match_diphthong(chars: &[char], i: usize) -> Option<(&'static str, usize)> {
    if i + 1 >= chars.len() {
        return None;
    }
    let pair: String = [chars[i], chars[i + 1]].iter().collect::<String>().to_lowercase();
    let ipa = match pair.as_str() {
        "ai" => "ai̯",
        "au" => "au̯",
        "iu" => "iu̯",
        "eu" => "eu̯",
        "oi" => "oi̯",
        "ui" => "ui̯",
        _ => return None,
    };
    Some((ipa, 2))
}

fn match_long_vowel(c: char) -> Option<&'static str> {
    match c.to_lowercase().next().unwrap_or(c) {
        'á' => Some("aː"),
        'é' => Some("eː"),
        'í' => Some("iː"),
        'ó' => Some("oː"),
        'ú' => Some("uː"),
        _ => None,
    }
}

fn match_short_vowel(c: char) -> Option<&'static str> {
    match c.to_lowercase().next().unwrap_or(c) {
        'a' => Some("a"),
        'e' | 'ë' => Some("e"),
        'i' => Some("i"),
        'o' => Some("o"),
        'u' => Some("u"),
        _ => None,
    }
}

fn match_consonant_cluster(chars: &[char], i: usize) -> Option<(&'static str, usize)> {
    if i + 1 >= chars.len() {
        return None;
    }
    let pair: String = [chars[i], chars[i + 1]].iter().collect::<String>().to_lowercase();
    let ipa = match pair.as_str() {
        "qu" => "kw",
        "ng" => "ŋɡ",
        "th" => "θ",
        "hl" => "l̥",
        "hr" => "r̥",
        "hw" => "ʍ",
        "hy" => "j̊",
        "ty" => "tʲ",
        "ny" => "ɲ",
        "ly" => "ʎ",
        "ry" => "rʲ",
        "sy" => "ʃ",
        "ht" => "xt",
        "pt" => "φt",
        _ => return None,
    };
    Some((ipa, 2))
}

fn match_single_consonant(c: char) -> Option<&'static str> {
    match c.to_lowercase().next().unwrap_or(c) {
        'p' => Some("p"),
        'b' => Some("b"),
        't' => Some("t"),
        'd' => Some("d"),
        'c' | 'k' => Some("k"),
        'g' => Some("ɡ"),
        'q' => Some("k"),
        'r' => Some("r"),
        'f' => Some("f"),
        'v' => Some("v"),
        's' => Some("s"),
        'z' => Some("z"),
        'h' => Some("h"),
        'l' => Some("l"),
        'm' => Some("m"),
        'n' => Some("n"),
        'w' => Some("w"),
        'y' => Some("j"),
        'x' => Some("ks"),
        _ => None,
    }
}

/// Scan one letter-cluster unit at `chars[i..]`, in the spec's longest-
/// match priority order: diphthongs, long vowels, short vowels, consonant
/// clusters, single consonants. Returns `(unit, chars_consumed)`.
fn match_unit(chars: &[char], i: usize) -> (Unit, usize) {
    if let Some((ipa, len)) = match_diphthong(chars, i) {
        return (Unit { ipa: ipa.to_string(), is_vowel: true }, len);
    }
    if let Some(ipa) = match_long_vowel(chars[i]) {
        return (Unit { ipa: ipa.to_string(), is_vowel: true }, 1);
    }
    if let Some(ipa) = match_short_vowel(chars[i]) {
        return (Unit { ipa: ipa.to_string(), is_vowel: true }, 1);
    }
    if let Some((ipa, len)) = match_consonant_cluster(chars, i) {
        return (Unit { ipa: ipa.to_string(), is_vowel: false }, len);
    }
    if let Some(ipa) = match_single_consonant(chars[i]) {
        return (Unit { ipa: ipa.to_string(), is_vowel: false }, 1);
    }
    // Unrecognized character (digits, unmapped symbols): pass through
    // verbatim rather than dropping it silently.
    (Unit { ipa: chars[i].to_string(), is_vowel: false }, 1)
}

/// Split a word's matched units into syllables: each syllable is the run of
/// onset consonants up to and including its nucleus; trailing consonants
/// after the last nucleus attach to the final syllable as coda.
fn group_syllables(units: &[Unit]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for (idx, unit) in units.iter().enumerate() {
        current.push(idx);
        if unit.is_vowel {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        if let Some(last) = groups.last_mut() {
            last.extend(current);
        } else {
            groups.push(current);
        }
    }
    groups
}

/// Convert one word to `(ipa, syllable_count)`. Stress is placed per §4.8:
/// words of ≤3 syllables stress the first syllable; words of ≥4 syllables
/// stress the antepenult (`syllable_count - 3`, 0-indexed).
fn word_to_ipa(word: &str) -> (String, usize) {
    let chars: Vec<char> = word.chars().collect();
    let mut units = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (unit, consumed) = match_unit(&chars, i);
        units.push(unit);
        i += consumed;
    }

    let groups = group_syllables(&units);
    let syllable_count = groups.len();

    if syllable_count > 0 {
        let stress_syllable = if syllable_count <= 3 {
            0
        } else {
            syllable_count - 3
        };
        if let Some(&onset_idx) = groups[stress_syllable].first() {
            units[onset_idx].ipa.insert(0, STRESS_MARK);
        }
    }

    let ipa = units
        .iter()
        .map(|u| u.ipa.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    (ipa, syllable_count)
}

/// Tokenize `text` on whitespace/punctuation and apply Quenya G2P to each
/// word; non-word runs pass through with no phonemes.
pub fn process(text: &str) -> TokenList {
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
            let (ipa, syllables) = word_to_ipa(surface);
            result.push(
                Token::new(surface, byte_start)
                    .with_phonemes(ipa)
                    .with_score(syllables as f64),
            );
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

    #[test]
    fn five_syllable_word_stresses_antepenult() {
        // Sil-ma-ri-lli-on: 5 syllables, antepenult is "ri" (index 2).
        let (ipa, syllables) = word_to_ipa("Silmarillion");
        assert_eq!(syllables, 5);
        assert!(ipa.contains("ˈr"), "got {ipa:?}");
    }

    #[test]
    fn short_word_stresses_first_syllable() {
        let (ipa, syllables) = word_to_ipa("Elda");
        assert_eq!(syllables, 2);
        assert!(ipa.starts_with('ˈ'), "got {ipa:?}");
    }

    #[test]
    fn qu_cluster_maps_to_kw() {
        let (ipa, _) = word_to_ipa("quesse");
        assert!(ipa.contains("kw"), "got {ipa:?}");
    }

    #[test]
    fn diphthong_counts_as_one_syllable() {
        let (_, syllables) = word_to_ipa("laurë");
        assert_eq!(syllables, 2); // lau-rë
    }

    #[test]
    fn long_vowel_gets_length_mark() {
        let (ipa, _) = word_to_ipa("Atar");
        assert!(!ipa.contains('ː'));
        let (ipa_long, _) = word_to_ipa("Rómello");
        assert!(ipa_long.contains('ː'));
    }

    #[test]
    fn sentence_tokenizes_per_word() {
        let tokens = process("Elen síla lúmenn'");
        let words: Vec<&str> = tokens
            .tokens
            .iter()
            .filter(|t| t.text.chars().next().map(|c| c.is_alphabetic()).unwrap_or(false))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["Elen", "síla", "lúmenn"]);
    }

    #[test]
    fn empty_text_produces_no_tokens() {
        assert!(process("").tokens.is_empty());
    }
}
