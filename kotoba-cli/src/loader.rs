//! Builds a `kotoba::Dictionaries` bundle from the paths in `AppConfig`.
//!
//! This is the CLI's file-I/O wrapper layer (out of core scope per the
//! core crate's own docs) — it owns the only `fs`/path logic in this
//! binary, calling straight into `kotoba::dict`'s loaders and turning a
//! missing or unreadable file into a logged warning rather than a hard
//! failure, so the CLI stays runnable with a partial configuration.

use kotoba::trie::Trie;
use kotoba::zh::hmm::HmmModel;
use kotoba::Dictionaries;
use tracing::warn;

use crate::config::DictionaryPaths;

pub fn load_dictionaries(paths: &DictionaryPaths) -> Dictionaries {
    let mut dicts = Dictionaries::default();

    let mut zh_dict = Trie::new();
    let mut zh_loaded = false;
    if let Some(path) = paths.zh_freq() {
        match kotoba::dict::load_zh_word_freq_dict(&path) {
            Ok(trie) => {
                zh_dict = trie;
                zh_loaded = true;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load Chinese word-frequency dictionary"),
        }
    }
    if let Some(path) = paths.zh_char() {
        match kotoba::dict::load_zh_char_pinyin_dict(&path, &mut zh_dict) {
            Ok(()) => zh_loaded = true,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load Chinese character pinyin dictionary"),
        }
    }
    if zh_loaded {
        dicts.zh_dict = Some(zh_dict);
    }

    if let Some(path) = paths.zh_phrase() {
        match kotoba::dict::load_zh_phrase_dict(&path) {
            Ok(trie) => dicts.zh_phrase_dict = Some(trie),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load Chinese phrase dictionary"),
        }
    }

    // The HMM OOV segmenter always has a usable model: the built-in default
    // (§4.5), optionally overridden in place by any trained parameter
    // files the configuration points at.
    let mut hmm = HmmModel::default_model();
    if let Some(path) = paths.hmm_start() {
        if let Err(e) = kotoba::dict::load_hmm_start(&path, &mut hmm) {
            warn!(path = %path.display(), error = %e, "failed to load HMM start probabilities");
        }
    }
    if let Some(path) = paths.hmm_transition() {
        if let Err(e) = kotoba::dict::load_hmm_transition(&path, &mut hmm) {
            warn!(path = %path.display(), error = %e, "failed to load HMM transition probabilities");
        }
    }
    if let Some(path) = paths.hmm_emission() {
        if let Err(e) = kotoba::dict::load_hmm_emission(&path, &mut hmm) {
            warn!(path = %path.display(), error = %e, "failed to load HMM emission probabilities");
        }
    }
    dicts.zh_hmm = Some(hmm);

    if let Some(path) = paths.ja() {
        match kotoba::dict::load_ja_dict(&path) {
            Ok(trie) => dicts.ja_dict = Some(trie),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load Japanese pronunciation dictionary"),
        }
    }
    // The Japanese vocabulary list (§6) supplies additional segmentation
    // candidates with no reading/frequency of their own; merge it into the
    // pronunciation trie at a low default frequency so it only wins when
    // nothing better matches.
    if let Some(path) = paths.ja_vocab() {
        match kotoba::dict::load_word_list(&path) {
            Ok(words) => {
                let trie = dicts.ja_dict.get_or_insert_with(Trie::new);
                for word in words {
                    if !trie.contains(&word) {
                        let _ = trie.insert(&word, 1.0, None, None);
                    }
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load Japanese vocabulary list"),
        }
    }

    if let Some(path) = paths.en() {
        match kotoba::dict::load_english_dict(&path) {
            Ok(dict) => dicts.en_dict = Some(dict),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load English pronunciation dictionary"),
        }
    }

    dicts
}
