//! Configuration management for the kotoba CLI.
//!
//! Configuration priority (highest to lowest):
//! 1. Command line arguments
//! 2. Config file specified via --config flag
//! 3. Environment variables (KOTOBA_*)
//! 4. Local config file (./config.toml)
//! 5. Global config file ($XDG_CONFIG_HOME/kotoba/config.toml)
//!
//! XDG Base Directory Specification:
//! - Config: $XDG_CONFIG_HOME or ~/.config
//! - Data: $XDG_DATA_HOME or ~/.local/share
//!
//! XDG environment variables are checked first on all platforms, including
//! macOS.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Paths to the dictionary/model files consumed by `kotoba::dict`'s
/// loaders. Each is optional: an empty string means "not configured", and
/// the corresponding language simply produces empty token lists per the
/// engine's "recognized language, unloaded resource" policy.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DictionaryPaths {
    pub en_path: String,
    pub zh_char_path: String,
    pub zh_phrase_path: String,
    pub zh_freq_path: String,
    pub ja_path: String,
    pub ja_vocab_path: String,
    pub hmm_start_path: String,
    pub hmm_transition_path: String,
    pub hmm_emission_path: String,
}

impl DictionaryPaths {
    fn path_of(s: &str) -> Option<PathBuf> {
        if s.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(shellexpand::tilde(s).into_owned()))
        }
    }

    pub fn en(&self) -> Option<PathBuf> {
        Self::path_of(&self.en_path)
    }
    pub fn zh_char(&self) -> Option<PathBuf> {
        Self::path_of(&self.zh_char_path)
    }
    pub fn zh_phrase(&self) -> Option<PathBuf> {
        Self::path_of(&self.zh_phrase_path)
    }
    pub fn zh_freq(&self) -> Option<PathBuf> {
        Self::path_of(&self.zh_freq_path)
    }
    pub fn ja(&self) -> Option<PathBuf> {
        Self::path_of(&self.ja_path)
    }
    pub fn ja_vocab(&self) -> Option<PathBuf> {
        Self::path_of(&self.ja_vocab_path)
    }
    pub fn hmm_start(&self) -> Option<PathBuf> {
        Self::path_of(&self.hmm_start_path)
    }
    pub fn hmm_transition(&self) -> Option<PathBuf> {
        Self::path_of(&self.hmm_transition_path)
    }
    pub fn hmm_emission(&self) -> Option<PathBuf> {
        Self::path_of(&self.hmm_emission_path)
    }
}

/// Application configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Default language code (`en`/`zh`/`ja`/`qya`/...); empty means
    /// auto-detect.
    pub language: String,

    /// Auto-detect language from input text when `language` is empty (or
    /// always, if set explicitly true and a language is also given, CLI
    /// flags still win per priority order).
    pub auto_detect: bool,

    /// Output format: "text" or "json".
    pub format: String,

    /// Enable verbose diagnostic logging.
    pub verbose: bool,

    /// Re-segment single-character Chinese DAG fallback runs with the HMM
    /// segmenter (§4.3).
    pub enable_hmm_oov: bool,

    /// Apply tone sandhi to Chinese pinyin before IPA conversion (§4.4).
    pub enable_tone_sandhi: bool,

    /// Apply erhua coda-fusion (currently a no-op hook, §9a).
    pub enable_erhua: bool,

    /// Dictionary file paths.
    pub dictionaries: DictionaryPaths,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            auto_detect: true,
            format: "text".to_string(),
            verbose: false,
            enable_hmm_oov: true,
            enable_tone_sandhi: true,
            enable_erhua: false,
            dictionaries: DictionaryPaths::default(),
        }
    }
}

// ============================================================================
// XDG Base Directory helpers - checked on all platforms, including macOS.
// ============================================================================

/// Get the XDG config directory ($XDG_CONFIG_HOME or ~/.config).
pub fn xdg_config_home() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl AppConfig {
    /// Global config directory ($XDG_CONFIG_HOME/kotoba or ~/.config/kotoba).
    pub fn global_config_dir() -> PathBuf {
        xdg_config_home().join("kotoba")
    }

    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    pub fn local_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Load configuration with the documented priority chain. CLI flags are
    /// merged on top of the returned value by the caller; this function only
    /// resolves the file/env layers.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = builder.add_source(config::File::from_str(
            include_str!("default_config.toml"),
            config::FileFormat::Toml,
        ));

        let global_path = Self::global_config_path();
        if global_path.exists() {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        let local_path = Self::local_config_path();
        if local_path.exists() {
            builder = builder.add_source(File::from(local_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("KOTOBA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(config_path) = config_file {
            let expanded = expand_path(config_path);
            builder = builder.add_source(File::with_name(&expanded).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Write the embedded default config to the global config path, unless
    /// it already exists.
    pub fn ensure_config_exists() -> std::io::Result<()> {
        let path = Self::global_config_path();
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, include_str!("default_config.toml"))
    }

    /// Print every config path this CLI consults, in priority order.
    pub fn print_paths() {
        println!("Configuration paths (highest to lowest priority):");
        println!("  1. --config <file>");
        println!("  2. Environment variables (KOTOBA_*)");
        println!("  3. {}", Self::local_config_path().display());
        println!("  4. {}", Self::global_config_path().display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_from_embedded_toml() {
        let config = AppConfig::load(None).expect("embedded default config must parse");
        assert_eq!(config.format, "text");
        assert!(config.auto_detect);
        assert!(config.enable_hmm_oov);
    }

    #[test]
    fn empty_dictionary_path_resolves_to_none() {
        let paths = DictionaryPaths::default();
        assert!(paths.en().is_none());
        assert!(paths.zh_char().is_none());
    }
}
