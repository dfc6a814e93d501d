//! Pinyin syllable to IPA transcription (§4.4).

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref INITIAL_TO_IPA: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("b", "p");
        m.insert("p", "pʰ");
        m.insert("m", "m");
        m.insert("f", "f");
        m.insert("d", "t");
        m.insert("t", "tʰ");
        m.insert("n", "n");
        m.insert("l", "l");
        m.insert("g", "k");
        m.insert("k", "kʰ");
        m.insert("h", "x");
        m.insert("j", "ʨ");
        m.insert("q", "ʨʰ");
        m.insert("x", "ɕ");
        m.insert("zh", "ʈʂ");
        m.insert("ch", "ʈʂʰ");
        m.insert("sh", "ʂ");
        m.insert("r", "ɻ");
        m.insert("z", "ts");
        m.insert("c", "tsʰ");
        m.insert("s", "s");
        m
    };

    static ref FINAL_TO_IPA: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("a", "a");
        m.insert("ai", "ai̯");
        m.insert("an", "an");
        m.insert("ang", "aŋ");
        m.insert("ao", "au̯");
        m.insert("e", "ɤ");
        m.insert("ei", "ei̯");
        m.insert("en", "ən");
        m.insert("eng", "əŋ");
        m.insert("er", "ɚ");
        m.insert("i", "i");
        m.insert("ia", "ja");
        m.insert("ian", "jɛn");
        m.insert("iang", "jaŋ");
        m.insert("iao", "jau̯");
        m.insert("ie", "je");
        m.insert("in", "in");
        m.insert("ing", "iŋ");
        m.insert("iong", "jʊŋ");
        m.insert("iou", "jou̯");
        m.insert("o", "wo");
        m.insert("ong", "ʊŋ");
        m.insert("ou", "ou̯");
        m.insert("u", "u");
        m.insert("ua", "wa");
        m.insert("uai", "wai̯");
        m.insert("uan", "wan");
        m.insert("uang", "waŋ");
        m.insert("ue", "ɥe");
        m.insert("uei", "wei̯");
        m.insert("uen", "wən");
        m.insert("ueng", "wəŋ");
        m.insert("uo", "wo");
        m.insert("v", "y");
        m.insert("ve", "ɥe");
        m.insert("van", "ɥɛn");
        m.insert("vn", "yn");
        // zhi/chi/shi/ri
        m.insert("iii", "ɻ̩");
        // zi/ci/si
        m.insert("ii", "ɹ̩");
        m
    };

    static ref TONE_TO_IPA: HashMap<u8, &'static str> = {
        let mut m = HashMap::new();
        m.insert(1, "˥");
        m.insert(2, "˧˥");
        m.insert(3, "˧˩˧");
        m.insert(4, "˥˩");
        m.insert(5, "");
        m
    };

    /// Longest-match-first so `zh`/`ch`/`sh` win over `z`/`c`/`s`.
    static ref INITIALS: Vec<&'static str> = vec![
        "zh", "ch", "sh",
        "b", "p", "m", "f", "d", "t", "n", "l",
        "g", "k", "h", "j", "q", "x", "r", "z", "c", "s",
        "y", "w",
    ];

    /// Diacritic vowel -> (plain letter, tone 1-5). `ü` and its toned forms
    /// fold to the `v` letter, matching how the bare-ASCII dictionary format
    /// spells the umlaut (§4.4, §6).
    static ref TONE_DIACRITICS: HashMap<char, (char, u8)> = {
        let mut m = HashMap::new();
        m.insert('ā', ('a', 1)); m.insert('á', ('a', 2)); m.insert('ǎ', ('a', 3)); m.insert('à', ('a', 4));
        m.insert('ē', ('e', 1)); m.insert('é', ('e', 2)); m.insert('ě', ('e', 3)); m.insert('è', ('e', 4));
        m.insert('ī', ('i', 1)); m.insert('í', ('i', 2)); m.insert('ǐ', ('i', 3)); m.insert('ì', ('i', 4));
        m.insert('ō', ('o', 1)); m.insert('ó', ('o', 2)); m.insert('ǒ', ('o', 3)); m.insert('ò', ('o', 4));
        m.insert('ū', ('u', 1)); m.insert('ú', ('u', 2)); m.insert('ǔ', ('u', 3)); m.insert('ù', ('u', 4));
        m.insert('ǖ', ('v', 1)); m.insert('ǘ', ('v', 2)); m.insert('ǚ', ('v', 3)); m.insert('ǜ', ('v', 4));
        m.insert('ü', ('v', 5));
        m
    };
}

/// Replace any accent-marked vowel in `s` with its plain letter, returning
/// the tone carried by that mark (or 5 if the syllable has none, i.e. a
/// neutral-tone accented dictionary entry such as bare `ü`).
fn normalize_diacritics(s: &str) -> (String, u8) {
    let mut tone = 5u8;
    let mut base = String::with_capacity(s.len());
    for c in s.chars() {
        match TONE_DIACRITICS.get(&c) {
            Some(&(plain, t)) => {
                base.push(plain);
                tone = t;
            }
            None => base.push(c),
        }
    }
    (base, tone)
}

/// Parsed syllable: initial consonant (if any), final vowel/coda, numeric tone (1-5).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSyllable {
    pub initial: Option<&'static str>,
    pub finale: String,
    pub tone: u8,
}

pub fn parse_pinyin(pinyin: &str) -> ParsedSyllable {
    let pinyin = pinyin.to_lowercase();

    // Trailing ASCII digit (1-5) and accent marks are the two tone notations
    // the dictionary formats use (§4.4, §6); a syllable carries at most one.
    let (base, tone): (String, u8) = match pinyin.chars().last() {
        Some(last) if last.is_ascii_digit() => {
            let tone = last.to_digit(10).unwrap_or(5) as u8;
            (pinyin[..pinyin.len() - last.len_utf8()].to_string(), tone)
        }
        Some(_) => normalize_diacritics(&pinyin),
        None => return ParsedSyllable { initial: None, finale: String::new(), tone: 5 },
    };
    let base = base.as_str();

    let mut initial: Option<&'static str> = None;
    let mut final_start = 0;
    for init in INITIALS.iter() {
        if base.starts_with(init) {
            initial = Some(init);
            final_start = init.len();
            break;
        }
    }

    let raw_final = &base[final_start..];

    let finale = match (initial, raw_final) {
        (Some("z"), "i") | (Some("c"), "i") | (Some("s"), "i") => "ii".to_string(),
        (Some("zh"), "i") | (Some("ch"), "i") | (Some("sh"), "i") | (Some("r"), "i") => {
            "iii".to_string()
        }
        (_, "iu") => "iou".to_string(),
        (_, "ui") => "uei".to_string(),
        (_, "un") => "uen".to_string(),
        (Some("j"), f) | (Some("q"), f) | (Some("x"), f) | (Some("y"), f)
            if f.starts_with('u') && !f.starts_with("ua") && !f.starts_with("uo") =>
        {
            f.replacen('u', "v", 1)
        }
        (_, f) => f.to_string(),
    };

    ParsedSyllable { initial, finale, tone }
}

/// Convert a single numeric-tone pinyin syllable (e.g. `"zhong1"`) to IPA.
pub fn pinyin_to_ipa(pinyin: &str) -> String {
    let parsed = parse_pinyin(pinyin);
    let mut result = String::new();

    if let Some(init) = parsed.initial {
        if let Some(ipa) = INITIAL_TO_IPA.get(init) {
            result.push_str(ipa);
        }
    }

    if let Some(ipa) = FINAL_TO_IPA.get(parsed.finale.as_str()) {
        result.push_str(ipa);
    } else {
        result.push_str(&parsed.finale);
    }

    if let Some(marker) = TONE_TO_IPA.get(&parsed.tone) {
        result.push_str(marker);
    }

    result
}

/// Rewrite the five-level tone-letter markers as the compact arrow notation
/// used elsewhere in the token stream (tone 5, neutral, leaves no marker).
pub fn retone_ipa(ipa: &str) -> String {
    ipa.replace("˧˩˧", "↓")
        .replace("˧˥", "↗")
        .replace("˥˩", "↘")
        .replace("˥", "→")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pinyin_splits_initial_final_tone() {
        let p = parse_pinyin("zhong1");
        assert_eq!(p.initial, Some("zh"));
        assert_eq!(p.finale, "ong");
        assert_eq!(p.tone, 1);

        let p = parse_pinyin("guo2");
        assert_eq!(p.initial, Some("g"));
        assert_eq!(p.finale, "uo");
        assert_eq!(p.tone, 2);
    }

    #[test]
    fn zh_initial_wins_over_z() {
        let p = parse_pinyin("zhi4");
        assert_eq!(p.initial, Some("zh"));
        assert_eq!(p.finale, "iii");
    }

    #[test]
    fn z_initial_with_bare_i() {
        let p = parse_pinyin("zi3");
        assert_eq!(p.initial, Some("z"));
        assert_eq!(p.finale, "ii");
    }

    #[test]
    fn pinyin_to_ipa_contains_tone_marker() {
        let result = pinyin_to_ipa("ma1");
        assert!(result.contains('m'));
        assert!(result.contains('a'));
        assert!(result.ends_with('˥'));
    }

    #[test]
    fn retone_maps_tone_markers_to_arrows() {
        assert_eq!(retone_ipa("ma˥"), "ma→");
        assert_eq!(retone_ipa("xɑʊ˧˩˧"), "xɑʊ↓");
    }

    #[test]
    fn parse_pinyin_handles_diacritic_tone_marks() {
        let p = parse_pinyin("cháng");
        assert_eq!(p.initial, Some("ch"));
        assert_eq!(p.finale, "ang");
        assert_eq!(p.tone, 2);

        let p = parse_pinyin("nǐ");
        assert_eq!(p.initial, Some("n"));
        assert_eq!(p.finale, "i");
        assert_eq!(p.tone, 3);
    }

    #[test]
    fn pinyin_to_ipa_resolves_diacritic_input() {
        let result = pinyin_to_ipa("cháng");
        assert!(result.contains("ʈʂʰ"));
        assert!(result.contains('a'));
        assert!(result.contains('˧'));
    }

    #[test]
    fn parse_pinyin_handles_bare_umlaut() {
        let p = parse_pinyin("lü");
        assert_eq!(p.initial, Some("l"));
        assert_eq!(p.finale, "v");
        assert_eq!(p.tone, 5);
    }
}
