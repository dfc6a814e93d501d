//! Kana → IPA transcription (§4.7). Katakana is folded to hiragana before
//! lookup; digraphs are tried before monographs so e.g. きゃ doesn't match
//! as き followed by stray ゃ.

use lazy_static::lazy_static;
use std::collections::HashMap;

const SOKUON_IPA: &str = "ʔ";
const CHOONPU_IPA: &str = "ː";
const DEFAULT_HATSUON_IPA: &str = "ɴ";

lazy_static! {
    static ref HEPBURN_SINGLE: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("ぁ", "a"); m.insert("あ", "a"); m.insert("ぃ", "i"); m.insert("い", "i");
        m.insert("ぅ", "ɯ"); m.insert("う", "ɯ"); m.insert("ぇ", "e"); m.insert("え", "e");
        m.insert("ぉ", "o"); m.insert("お", "o");
        m.insert("か", "ka"); m.insert("が", "ɡa"); m.insert("き", "kʲi"); m.insert("ぎ", "ɡʲi");
        m.insert("く", "kɯ"); m.insert("ぐ", "ɡɯ"); m.insert("け", "ke"); m.insert("げ", "ɡe");
        m.insert("こ", "ko"); m.insert("ご", "ɡo");
        m.insert("さ", "sa"); m.insert("ざ", "ʣa"); m.insert("し", "ɕi"); m.insert("じ", "ʥi");
        m.insert("す", "sɨ"); m.insert("ず", "zɨ"); m.insert("せ", "se"); m.insert("ぜ", "ʣe");
        m.insert("そ", "so"); m.insert("ぞ", "ʣo");
        m.insert("た", "ta"); m.insert("だ", "da"); m.insert("ち", "ʨi"); m.insert("ぢ", "ʥi");
        m.insert("つ", "ʦɨ"); m.insert("づ", "zɨ"); m.insert("て", "te"); m.insert("で", "de");
        m.insert("と", "to"); m.insert("ど", "do");
        m.insert("な", "na"); m.insert("に", "ɲi"); m.insert("ぬ", "nɯ"); m.insert("ね", "ne");
        m.insert("の", "no");
        m.insert("は", "ha"); m.insert("ば", "ba"); m.insert("ぱ", "pa"); m.insert("ひ", "çi");
        m.insert("び", "bʲi"); m.insert("ぴ", "pʲi"); m.insert("ふ", "ɸɯ"); m.insert("ぶ", "bɯ");
        m.insert("ぷ", "pɯ"); m.insert("へ", "he"); m.insert("べ", "be"); m.insert("ぺ", "pe");
        m.insert("ほ", "ho"); m.insert("ぼ", "bo"); m.insert("ぽ", "po");
        m.insert("ま", "ma"); m.insert("み", "mʲi"); m.insert("む", "mɯ"); m.insert("め", "me");
        m.insert("も", "mo");
        m.insert("ゃ", "ja"); m.insert("や", "ja"); m.insert("ゅ", "jɯ"); m.insert("ゆ", "jɯ");
        m.insert("ょ", "jo"); m.insert("よ", "jo");
        m.insert("ら", "ɾa"); m.insert("り", "ɾʲi"); m.insert("る", "ɾɯ"); m.insert("れ", "ɾe");
        m.insert("ろ", "ɾo");
        m.insert("ゎ", "wa"); m.insert("わ", "wa"); m.insert("ゐ", "i"); m.insert("ゑ", "e");
        m.insert("を", "o");
        m.insert("ゔ", "vɯ"); m.insert("ゕ", "ka"); m.insert("ゖ", "ke");
        m
    };

    static ref HEPBURN_DIGRAPH: Vec<(&'static str, &'static str)> = vec![
        ("いぇ", "je"),
        ("うぃ", "wi"), ("うぇ", "we"), ("うぉ", "wo"),
        ("きぇ", "kʲe"), ("きゃ", "kʲa"), ("きゅ", "kʲɨ"), ("きょ", "kʲo"),
        ("ぎゃ", "ɡʲa"), ("ぎゅ", "ɡʲɨ"), ("ぎょ", "ɡʲo"),
        ("くぁ", "kᵝa"), ("くぃ", "kᵝi"), ("くぇ", "kᵝe"), ("くぉ", "kᵝo"),
        ("ぐぁ", "ɡᵝa"), ("ぐぃ", "ɡᵝi"), ("ぐぇ", "ɡᵝe"), ("ぐぉ", "ɡᵝo"),
        ("しぇ", "ɕe"), ("しゃ", "ɕa"), ("しゅ", "ɕɨ"), ("しょ", "ɕo"),
        ("じぇ", "ʥe"), ("じゃ", "ʥa"), ("じゅ", "ʥɨ"), ("じょ", "ʥo"),
        ("ちぇ", "ʨe"), ("ちゃ", "ʨa"), ("ちゅ", "ʨɨ"), ("ちょ", "ʨo"),
        ("ぢゃ", "ʥa"), ("ぢゅ", "ʥɨ"), ("ぢょ", "ʥo"),
        ("つぁ", "ʦa"), ("つぃ", "ʦʲi"), ("つぇ", "ʦe"), ("つぉ", "ʦo"),
        ("てぃ", "tʲi"), ("てゅ", "tʲɨ"),
        ("でぃ", "dʲi"), ("でゅ", "dʲɨ"),
        ("とぅ", "tɯ"),
        ("どぅ", "dɯ"),
        ("にぇ", "ɲe"), ("にゃ", "ɲa"), ("にゅ", "ɲɨ"), ("にょ", "ɲo"),
        ("ひぇ", "çe"), ("ひゃ", "ça"), ("ひゅ", "çɨ"), ("ひょ", "ço"),
        ("びゃ", "bʲa"), ("びゅ", "bʲɨ"), ("びょ", "bʲo"),
        ("ぴゃ", "pʲa"), ("ぴゅ", "pʲɨ"), ("ぴょ", "pʲo"),
        ("ふぁ", "ɸa"), ("ふぃ", "ɸʲi"), ("ふぇ", "ɸe"), ("ふぉ", "ɸo"),
        ("ふゅ", "ɸʲɨ"), ("ふょ", "ɸʲo"),
        ("みゃ", "mʲa"), ("みゅ", "mʲɨ"), ("みょ", "mʲo"),
        ("りゃ", "ɾʲa"), ("りゅ", "ɾʲɨ"), ("りょ", "ɾʲo"),
        ("ゔぁ", "va"), ("ゔぃ", "vʲi"), ("ゔぇ", "ve"), ("ゔぉ", "vo"),
        ("ゔゅ", "bʲɨ"), ("ゔょ", "bʲo"),
    ];

    static ref PUNCT_MAPPING: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("。", "."); m.insert("、", ","); m.insert("？", "?"); m.insert("！", "!");
        m.insert("「", "\""); m.insert("」", "\""); m.insert("『", "\""); m.insert("』", "\"");
        m.insert("：", ":"); m.insert("；", ";"); m.insert("（", "("); m.insert("）", ")");
        m.insert("《", "("); m.insert("》", ")"); m.insert("【", "["); m.insert("】", "]");
        m.insert("・", " "); m.insert("，", ","); m.insert("～", "-"); m.insert("〜", "-");
        m.insert("—", "-"); m.insert("«", "\""); m.insert("»", "\"");
        m
    };
}

/// Fold a katakana character to its hiragana equivalent (U+30A1..U+30F6
/// shifted down by 0x60). Characters outside that range pass through.
fn kata_to_hira(c: char) -> char {
    let cp = c as u32;
    if (0x30A1..=0x30F6).contains(&cp) {
        char::from_u32(cp - 0x60).unwrap_or(c)
    } else {
        c
    }
}

fn hiraganize(s: &str) -> String {
    s.chars().map(kata_to_hira).collect()
}

/// 撥音 ん/ン resolves to a place of articulation matching the onset of the
/// following mora's IPA.
fn hatsuon_ipa(next_ipa: Option<&str>) -> &'static str {
    let Some(ipa) = next_ipa else {
        return DEFAULT_HATSUON_IPA;
    };
    let first = ipa.chars().next();
    match first {
        Some('m') | Some('p') | Some('b') => "m",
        Some('k') | Some('g') | Some('ɡ') => "ŋ",
        Some('ɲ') => "ɲ",
        Some('n') | Some('t') | Some('d') | Some('r') | Some('z') => "n",
        _ if ipa.starts_with('ʨ') || ipa.starts_with('ʥ') => "ɲ",
        _ => DEFAULT_HATSUON_IPA,
    }
}

/// Convert a full kana string (already surface-form, katakana or hiragana)
/// to IPA, greedily matching the longest kana unit at each position.
pub fn kana_to_ipa(kana: &str) -> String {
    let hira = hiraganize(kana);
    let chars: Vec<char> = hira.chars().collect();
    let mut result = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == 'っ' {
            result.push_str(SOKUON_IPA);
            i += 1;
            continue;
        }
        if ch == 'ー' {
            result.push_str(CHOONPU_IPA);
            i += 1;
            continue;
        }
        if ch == 'ん' {
            let next_ipa = if i + 1 < chars.len() {
                Some(resolve_unit(&chars, i + 1))
            } else {
                None
            };
            result.push_str(hatsuon_ipa(next_ipa.as_deref()));
            i += 1;
            continue;
        }

        let (matched_ipa, consumed) = match_unit(&chars, i);
        result.push_str(matched_ipa);
        i += consumed;
    }

    result
}

/// Resolve the IPA text a single following unit (digraph-then-monograph)
/// would produce, used only to decide 撥音's place of articulation.
fn resolve_unit(chars: &[char], i: usize) -> String {
    let (ipa, _) = match_unit(chars, i);
    ipa.to_string()
}

fn match_unit(chars: &[char], i: usize) -> (&'static str, usize) {
    if i + 1 < chars.len() {
        let pair: String = chars[i..i + 2].iter().collect();
        for (kana, ipa) in HEPBURN_DIGRAPH.iter() {
            if pair == *kana {
                return (ipa, 2);
            }
        }
    }

    let single: String = chars[i].to_string();
    if let Some(ipa) = HEPBURN_SINGLE.get(single.as_str()) {
        return (ipa, 1);
    }
    if let Some(ipa) = PUNCT_MAPPING.get(single.as_str()) {
        return (ipa, 1);
    }
    ("", 1)
}

/// Long-vowel post-processing hook (§9c): fold same-vowel sequences such as
/// おお/えい into a single long vowel. Not invoked by `kana_to_ipa` by
/// default — a caller opts in explicitly.
pub fn apply_long_vowel_merge(ipa: &str) -> String {
    let mut result = String::new();
    let mut chars = ipa.chars().peekable();
    while let Some(c) = chars.next() {
        if (c == 'o' || c == 'e') && chars.peek() == Some(&c) {
            chars.next();
            result.push(c);
            result.push('ː');
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn katakana_folds_to_hiragana_before_lookup() {
        assert_eq!(kana_to_ipa("カ"), kana_to_ipa("か"));
    }

    #[test]
    fn digraph_preferred_over_monograph() {
        assert_eq!(kana_to_ipa("きゃ"), "kʲa");
    }

    #[test]
    fn sokuon_maps_to_glottal_stop() {
        assert_eq!(kana_to_ipa("っ"), "ʔ");
    }

    #[test]
    fn choonpu_maps_to_length_mark() {
        assert_eq!(kana_to_ipa("ー"), "ː");
    }

    #[test]
    fn hatsuon_before_bilabial_is_m() {
        assert_eq!(kana_to_ipa("んば"), "mba");
    }

    #[test]
    fn hatsuon_at_end_of_string_is_default() {
        assert_eq!(kana_to_ipa("ん"), "ɴ");
    }

    #[test]
    fn long_vowel_merge_is_not_applied_by_default() {
        let ipa = kana_to_ipa("おお");
        assert_eq!(ipa, "oo");
        assert_eq!(apply_long_vowel_merge(&ipa), "oː");
    }
}
