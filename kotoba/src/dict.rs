//! Dictionary / TSV loaders for the file formats in §6. Deliberately thin:
//! one function per format, a straight-line loop over lines, no retries, no
//! caching, no async. Malformed lines are skipped (`InvalidFormat` never
//! aborts a load on its own); I/O failures abort the whole load and return
//! no partial dictionary, per §7's policy.

use std::fs;
use std::path::Path;

use crate::error::{G2pError, Result};
use crate::trie::Trie;
use crate::zh::hmm::HmmModel;

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            G2pError::FileNotFound(path.display().to_string())
        } else {
            G2pError::ReadError {
                path: path.display().to_string(),
                source,
            }
        }
    })
}

/// English pronunciation dictionary: `word<TAB>ipa_phonemes`, words folded
/// to lowercase on load.
pub fn load_english_dict(path: &Path) -> Result<crate::en::EnglishDict> {
    let text = read_file(path)?;
    let mut dict = crate::en::EnglishDict::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '\t');
        let (Some(word), Some(ipa)) = (fields.next(), fields.next()) else {
            continue;
        };
        dict.insert(word, ipa);
    }
    Ok(dict)
}

/// Chinese character pinyin dictionary: `hanzi<TAB>pinyin1[,pinyin2,...]`.
/// Only the first (most common) reading is kept, per the first-entry-wins
/// polyphone policy (§9b) — callers needing disambiguation rely on the
/// phrase dictionary and POS tables instead. Merges into an existing trie,
/// preserving any frequency/tag already present from a word-frequency load.
pub fn load_zh_char_pinyin_dict(path: &Path, trie: &mut Trie) -> Result<()> {
    let text = read_file(path)?;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '\t');
        let (Some(hanzi), Some(readings)) = (fields.next(), fields.next()) else {
            continue;
        };
        if hanzi.is_empty() {
            continue;
        }
        let first_reading = readings.split(',').next().unwrap_or(readings).trim();
        if first_reading.is_empty() {
            continue;
        }
        let (frequency, tag) = match trie.lookup(hanzi) {
            Some(m) => (m.frequency, m.tag.map(String::from)),
            None => (1.0, None),
        };
        let _ = trie.insert(hanzi, frequency, tag.as_deref(), Some(first_reading));
    }
    Ok(())
}

/// Chinese phrase pinyin dictionary: `phrase<TAB>space-separated-syllables`.
/// Stored with the reading string in `tag`, matching the priority-one
/// lookup in `zh::word_to_pinyin`.
pub fn load_zh_phrase_dict(path: &Path) -> Result<Trie> {
    let text = read_file(path)?;
    let mut trie = Trie::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '\t');
        let (Some(phrase), Some(reading)) = (fields.next(), fields.next()) else {
            continue;
        };
        if phrase.is_empty() || reading.trim().is_empty() {
            continue;
        }
        let _ = trie.insert(phrase, 1.0, Some(reading.trim()), None);
    }
    Ok(trie)
}

/// Chinese word frequency dictionary: `word<TAB>frequency[<TAB>tag]`.
pub fn load_zh_word_freq_dict(path: &Path) -> Result<Trie> {
    let text = read_file(path)?;
    let mut trie = Trie::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let word = match fields.next() {
            Some(w) if !w.is_empty() => w,
            _ => continue,
        };
        let frequency = match fields.next().and_then(|f| f.parse::<f64>().ok()) {
            Some(f) => f,
            None => continue,
        };
        let tag = fields.next().filter(|t| !t.is_empty());
        let _ = trie.insert(word, frequency, tag, None);
    }
    Ok(trie)
}

/// Japanese pronunciation dictionary:
/// `surface<TAB>reading_in_katakana<TAB>frequency<TAB>POS_tag`.
pub fn load_ja_dict(path: &Path) -> Result<Trie> {
    let text = read_file(path)?;
    let mut trie = Trie::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            continue;
        }
        let (surface, reading, frequency, tag) = (fields[0], fields[1], fields[2], fields[3]);
        let frequency: f64 = match frequency.parse() {
            Ok(f) => f,
            Err(_) => continue,
        };
        if surface.is_empty() {
            continue;
        }
        let _ = trie.insert(surface, frequency, Some(tag), Some(reading));
    }
    Ok(trie)
}

/// One plain word per line, used for Japanese vocabulary lists that supply
/// segmentation candidates without a frequency or pronunciation of their own.
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let text = read_file(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// HMM start-probability file: `state<TAB>log_prob`.
pub fn load_hmm_start(path: &Path, model: &mut HmmModel) -> Result<()> {
    let text = read_file(path)?;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '\t');
        let (Some(state), Some(log_prob)) = (fields.next(), fields.next()) else {
            continue;
        };
        if let Ok(log_prob) = log_prob.trim().parse::<f64>() {
            model.set_start_prob(state, log_prob);
        }
    }
    Ok(())
}

/// HMM transition-probability file: `from<TAB>to<TAB>log_prob`.
pub fn load_hmm_transition(path: &Path, model: &mut HmmModel) -> Result<()> {
    let text = read_file(path)?;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            continue;
        }
        if let Ok(log_prob) = fields[2].trim().parse::<f64>() {
            model.set_transition_prob(fields[0], fields[1], log_prob);
        }
    }
    Ok(())
}

/// HMM emission-probability file: `state<TAB>character<TAB>log_prob`.
pub fn load_hmm_emission(path: &Path, model: &mut HmmModel) -> Result<()> {
    let text = read_file(path)?;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            continue;
        }
        let Some(ch) = fields[1].chars().next() else {
            continue;
        };
        if let Ok(log_prob) = fields[2].trim().parse::<f64>() {
            model.set_emission_prob(fields[0], ch, log_prob);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("kotoba-dict-test-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn english_dict_loads_and_folds_case() {
        let path = temp_file("en.tsv", "Hello\th ə l ˈoʊ\n\nworld\tw ˈɜː l d\n");
        let dict = load_english_dict(&path).unwrap();
        assert_eq!(dict.lookup("HELLO"), Some("h ə l ˈoʊ"));
        assert_eq!(dict.len(), 2);
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_yields_file_not_found() {
        let path = Path::new("/nonexistent/path/to/dict.tsv");
        match load_english_dict(path) {
            Err(G2pError::FileNotFound(_)) => {}
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn char_pinyin_dict_keeps_first_reading_and_merges_with_existing_freq() {
        let mut trie = Trie::new();
        trie.insert("行", 500.0, Some("v"), None).unwrap();
        let path = temp_file("zh-char.tsv", "行\txing2,hang2\n好\thao3\n");
        load_zh_char_pinyin_dict(&path, &mut trie).unwrap();

        let m = trie.lookup("行").unwrap();
        assert_eq!(m.reading, Some("xing2"));
        assert_eq!(m.frequency, 500.0);
        assert_eq!(m.tag, Some("v"));

        let hao = trie.lookup("好").unwrap();
        assert_eq!(hao.reading, Some("hao3"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn phrase_dict_stores_reading_in_tag() {
        let path = temp_file("zh-phrase.tsv", "银行\tyin2 xing2\n");
        let trie = load_zh_phrase_dict(&path).unwrap();
        assert_eq!(trie.lookup("银行").unwrap().tag, Some("yin2 xing2"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn word_freq_dict_skips_malformed_lines() {
        let path = temp_file("zh-freq.tsv", "你好\t1000\tl\n\nbad-line-no-freq\n世界\t500\n");
        let trie = load_zh_word_freq_dict(&path).unwrap();
        assert!(trie.contains("你好"));
        assert!(trie.contains("世界"));
        assert!(!trie.contains("bad-line-no-freq"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn ja_dict_requires_four_fields() {
        let path = temp_file(
            "ja.tsv",
            "私\tワタクシ\t4000\t代名詞\n短い\tミジカイ\n",
        );
        let trie = load_ja_dict(&path).unwrap();
        assert!(trie.contains("私"));
        assert!(!trie.contains("短い"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn hmm_files_override_default_model() {
        let start_path = temp_file("hmm-start.tsv", "B\t-0.1\n");
        let trans_path = temp_file("hmm-trans.tsv", "B\tM\t-1.0\n");
        let emit_path = temp_file("hmm-emit.tsv", "B\t京\t-0.05\n");

        let mut model = HmmModel::default_model();
        load_hmm_start(&start_path, &mut model).unwrap();
        load_hmm_transition(&trans_path, &mut model).unwrap();
        load_hmm_emission(&emit_path, &mut model).unwrap();

        // Indirect check: a re-segmentation call should not panic and must
        // still account for every character, even with trained overrides.
        let words = crate::zh::hmm::segment(&model, "北京");
        assert_eq!(words.concat(), "北京");

        fs::remove_file(start_path).ok();
        fs::remove_file(trans_path).ok();
        fs::remove_file(emit_path).ok();
    }

    #[test]
    fn word_list_trims_and_skips_blank_lines() {
        let path = temp_file("words.txt", "桜\n\n  花見  \n");
        let words = load_word_list(&path).unwrap();
        assert_eq!(words, vec!["桜".to_string(), "花見".to_string()]);
        fs::remove_file(path).ok();
    }
}
