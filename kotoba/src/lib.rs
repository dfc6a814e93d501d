//! Multilingual grapheme-to-phoneme engine for Mandarin Chinese, Japanese,
//! English and Quenya.
//!
//! The engine converts raw text into IPA phoneme sequences through a
//! pipeline of script detection, language-specific segmentation, dictionary
//! lookup and phoneme mapping. Every component here is pure and stateless
//! between calls: tries, the HMM model and the transition table are
//! constructed once at load time and shared by `&` reference across every
//! `phonemize` call (see `EngineConfig` and `Dictionaries`).

pub mod codepoint;
pub mod detect;
pub mod dict;
pub mod en;
pub mod error;
pub mod ja;
pub mod qya;
pub mod token;
pub mod trie;
pub mod zh;

use std::str::FromStr;

use token::TokenList;
use trie::Trie;

/// Engine-wide feature toggles, threaded by value into the top-level entry
/// point. Carries no file paths or I/O state — loading dictionaries and
/// constructing this struct are the CLI's job, not the core's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Re-segment runs of single-character Chinese DAG fallback tokens with
    /// the HMM segmenter, recovering multi-character OOV spans (§4.3).
    pub enable_hmm_oov: bool,
    /// Apply tone sandhi (不/一/neutral/third-tone rules) to Chinese pinyin
    /// before IPA conversion (§4.4).
    pub enable_tone_sandhi: bool,
    /// Apply erhua coda-fusion to Chinese pinyin. Currently a no-op hook
    /// (§9a) — the rule set to implement is unspecified.
    pub enable_erhua: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            enable_hmm_oov: true,
            enable_tone_sandhi: true,
            enable_erhua: false,
        }
    }
}

/// Languages recognized at the processing boundary (§6). `Unknown` is
/// returned by the detector for empty/too-short/unrecognizable input, and
/// is never itself a valid argument to `phonemize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Mandarin,
    Japanese,
    Korean,
    Quenya,
    Vietnamese,
    Unknown,
}

impl Language {
    /// The canonical boundary code for this language (§6).
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Mandarin => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Quenya => "qya",
            Language::Vietnamese => "vi",
            Language::Unknown => "",
        }
    }
}

impl FromStr for Language {
    type Err = ();

    /// Parse a boundary language code, honoring the aliases in §6
    /// (`cn`->zh, `jp`->ja, `quenya`->qya). Unrecognized or empty input
    /// parses to `Unknown` rather than erroring — auto-detection is the
    /// caller's fallback, not a parse failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "en-us" | "en-gb" => Language::English,
            "zh" | "cn" | "zho" | "chi" | "cmn" | "zh-cn" => Language::Mandarin,
            "ja" | "jp" | "jpn" | "jap" => Language::Japanese,
            "ko" | "kor" => Language::Korean,
            "qya" | "quenya" => Language::Quenya,
            "vi" | "vie" => Language::Vietnamese,
            _ => Language::Unknown,
        })
    }
}

/// Every immutable, read-only-after-construction resource the engine might
/// need for a call. Each field is independently optional: a caller that
/// only loaded a Chinese dictionary can still call `phonemize` with
/// `Language::English`, which simply yields an empty token list per the
/// "recognized language, unloaded resource" policy in §7.
#[derive(Debug, Default)]
pub struct Dictionaries {
    pub zh_dict: Option<Trie>,
    pub zh_hmm: Option<zh::hmm::HmmModel>,
    pub zh_phrase_dict: Option<Trie>,
    pub ja_dict: Option<Trie>,
    pub en_dict: Option<en::EnglishDict>,
}

/// Run the full G2P pipeline over `text` for the given `language`.
///
/// An unrecognized language (`Language::Unknown`) produces an empty token
/// list, not an error (§7). A recognized language whose backing dictionary
/// was never loaded also produces an empty token list — this is considered
/// a configuration error by the caller, not a runtime failure here.
pub fn phonemize(
    text: &str,
    language: Language,
    dicts: &Dictionaries,
    config: &EngineConfig,
) -> TokenList {
    if text.is_empty() {
        return TokenList::new();
    }

    match language {
        Language::Mandarin => match (&dicts.zh_dict, &dicts.zh_hmm) {
            (Some(dict), Some(hmm)) => {
                zh::process(text, dict, hmm, dicts.zh_phrase_dict.as_ref(), config)
            }
            _ => TokenList::new(),
        },
        Language::Japanese => match &dicts.ja_dict {
            Some(dict) => ja::process(text, dict),
            None => TokenList::new(),
        },
        Language::English => match &dicts.en_dict {
            Some(dict) => en::process(text, dict),
            None => TokenList::new(),
        },
        Language::Quenya => qya::process(text),
        Language::Korean | Language::Vietnamese | Language::Unknown => TokenList::new(),
    }
}

/// Detect the language of `text`, then run `phonemize` for it. Convenience
/// wrapper for callers that want auto-detection baked in; `phonemize`
/// itself never detects.
pub fn phonemize_auto(text: &str, dicts: &Dictionaries, config: &EngineConfig) -> TokenList {
    let detection = detect::detect_language(text);
    phonemize(text, detection.language, dicts, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_yields_empty_tokens() {
        let dicts = Dictionaries::default();
        let config = EngineConfig::default();
        let tokens = phonemize("hello", Language::Unknown, &dicts, &config);
        assert!(tokens.tokens.is_empty());
    }

    #[test]
    fn recognized_language_without_dictionary_yields_empty_tokens() {
        let dicts = Dictionaries::default();
        let config = EngineConfig::default();
        let tokens = phonemize("你好", Language::Mandarin, &dicts, &config);
        assert!(tokens.tokens.is_empty());
    }

    #[test]
    fn language_code_aliases_resolve() {
        assert_eq!("cn".parse::<Language>().unwrap(), Language::Mandarin);
        assert_eq!("jp".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!("quenya".parse::<Language>().unwrap(), Language::Quenya);
        assert_eq!("xx".parse::<Language>().unwrap(), Language::Unknown);
    }

    #[test]
    fn empty_input_never_panics() {
        let dicts = Dictionaries::default();
        let config = EngineConfig::default();
        let tokens = phonemize("", Language::Mandarin, &dicts, &config);
        assert!(tokens.tokens.is_empty());
    }
}
