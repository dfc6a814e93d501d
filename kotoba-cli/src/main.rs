use std::io;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use kotoba::{phonemize, phonemize_auto, Dictionaries, EngineConfig, Language};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod loader;

use config::AppConfig;

#[derive(Subcommand, Debug, Clone)]
enum Mode {
    /// Convert text to an IPA phoneme sequence
    #[command(alias = "p")]
    Phonemize {
        /// Text to phonemize. Reads stdin to EOF if omitted.
        text: Option<String>,
    },

    /// Detect the language of a piece of text and print the verdict
    #[command(name = "detect-lang", alias = "d")]
    DetectLang {
        /// Text to detect. Reads stdin to EOF if omitted.
        text: Option<String>,
    },

    /// Continuously read lines from stdin and phonemize each one
    #[command(aliases = ["stdio", "stdin", "-"])]
    Stream,

    /// Show configuration paths and the currently resolved settings
    #[command(name = "config", alias = "cfg")]
    Config {
        /// Show all configuration file paths consulted, in priority order
        #[arg(long)]
        paths: bool,

        /// Write the default config file to the global config directory
        #[arg(long)]
        init: bool,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "kotoba")]
#[command(version)]
#[command(about = "Multilingual grapheme-to-phoneme engine for Mandarin, Japanese, English and Quenya")]
#[command(after_help = "Configuration files are loaded from (highest to lowest priority):
  1. --config <file>
  2. Environment variables (KOTOBA_*)
  3. ./config.toml (local)
  4. $XDG_CONFIG_HOME/kotoba/config.toml (global)

Run 'kotoba config --paths' to see configuration paths.
Run 'kotoba config --init' to create a default config file.")]
struct Cli {
    /// Path to a custom config file (highest priority)
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE", global = true)]
    config_file: Option<String>,

    /// Language code (en, zh/cn, ja/jp, ko, qya/quenya, vi). Empty auto-detects.
    #[arg(short = 'l', long = "lan", value_name = "LANGUAGE", global = true)]
    lan: Option<String>,

    /// Auto-detect language from input text instead of using --lan
    #[arg(short = 'a', long = "auto-detect", value_name = "AUTO_DETECT", global = true)]
    auto_detect: Option<bool>,

    /// Output format: text or json
    #[arg(short = 'f', long = "format", value_name = "FORMAT", global = true)]
    format: Option<String>,

    /// Enable verbose tracing output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Disable HMM re-segmentation of Chinese OOV runs (§4.3)
    #[arg(long = "no-hmm-oov", global = true)]
    no_hmm_oov: bool,

    /// Disable Chinese tone sandhi post-processing (§4.4)
    #[arg(long = "no-tone-sandhi", global = true)]
    no_tone_sandhi: bool,

    /// Enable the erhua post-processing hook (currently a no-op, §9a)
    #[arg(long = "erhua", global = true)]
    erhua: bool,

    #[command(subcommand)]
    mode: Mode,
}

/// CLI args merged with the loaded config file; CLI flags take priority.
struct Resolved {
    lan: String,
    auto_detect: bool,
    format: String,
    verbose: bool,
    engine_config: EngineConfig,
    dictionaries: AppConfig,
}

impl Resolved {
    fn from_cli_and_config(cli: &Cli, file_config: &AppConfig) -> Self {
        let engine_config = EngineConfig {
            enable_hmm_oov: file_config.enable_hmm_oov && !cli.no_hmm_oov,
            enable_tone_sandhi: file_config.enable_tone_sandhi && !cli.no_tone_sandhi,
            enable_erhua: file_config.enable_erhua || cli.erhua,
        };
        Resolved {
            lan: cli.lan.clone().unwrap_or_else(|| file_config.language.clone()),
            auto_detect: cli.auto_detect.unwrap_or(file_config.auto_detect),
            format: cli.format.clone().unwrap_or_else(|| file_config.format.clone()),
            verbose: cli.verbose || file_config.verbose,
            engine_config,
            dictionaries: file_config.clone(),
        }
    }
}

fn read_stdin_to_string() -> io::Result<String> {
    use std::io::Read;
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[derive(Serialize)]
struct DetectOutput {
    language: String,
    confidence: f64,
}

fn run_phonemize(text: &str, resolved: &Resolved, dicts: &Dictionaries) -> kotoba::token::TokenList {
    let language = Language::from_str(&resolved.lan).unwrap_or(Language::Unknown);
    if language == Language::Unknown || resolved.auto_detect {
        phonemize_auto(text, dicts, &resolved.engine_config)
    } else {
        phonemize(text, language, dicts, &resolved.engine_config)
    }
}

fn print_tokens(tokens: &kotoba::token::TokenList, format: &str) {
    match format {
        "json" => match tokens.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to serialize tokens: {e}"),
        },
        _ => {
            let words: Vec<&str> = tokens.tokens.iter().map(|t| t.text.as_str()).collect();
            println!("tokens:   {}", words.join(" | "));
            println!("phonemes: {}", tokens.phoneme_string());
        }
    }
}

fn print_detection(text: &str, format: &str) {
    let detection = kotoba::detect::detect_language(text);
    match format {
        "json" => {
            let out = DetectOutput {
                language: detection.language.code().to_string(),
                confidence: detection.confidence,
            };
            match serde_json::to_string(&out) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("failed to serialize detection: {e}"),
            }
        }
        _ => {
            println!(
                "language: {} (confidence {:.2})",
                detection.language.code(),
                detection.confidence
            );
        }
    }
}

fn handle_config_subcommand(cli_config_file: Option<&str>, paths: bool, init: bool) {
    if paths {
        AppConfig::print_paths();
    }
    if init {
        if let Err(e) = AppConfig::ensure_config_exists() {
            eprintln!("Failed to create config: {e}");
            std::process::exit(1);
        }
        println!("Wrote default config to {}", AppConfig::global_config_path().display());
    }
    if !paths && !init {
        AppConfig::print_paths();
        println!();
        match AppConfig::load(cli_config_file) {
            Ok(config) => {
                println!("Current configuration:");
                println!("  language: {:?}", config.language);
                println!("  auto_detect: {}", config.auto_detect);
                println!("  format: {}", config.format);
                println!("  enable_hmm_oov: {}", config.enable_hmm_oov);
                println!("  enable_tone_sandhi: {}", config.enable_tone_sandhi);
                println!("  enable_erhua: {}", config.enable_erhua);
            }
            Err(e) => eprintln!("Failed to load config: {e}"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Mode::Config { paths, init } = &cli.mode {
        handle_config_subcommand(cli.config_file.as_deref(), *paths, *init);
        return Ok(());
    }

    let file_config = match AppConfig::load(cli.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    let resolved = Resolved::from_cli_and_config(&cli, &file_config);

    let filter = if resolved.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dicts = loader::load_dictionaries(&resolved.dictionaries.dictionaries);

    match &cli.mode {
        Mode::Config { .. } => unreachable!("handled above"),

        Mode::Phonemize { text } => {
            let text = match text {
                Some(t) => t.clone(),
                None => read_stdin_to_string()?,
            };
            let tokens = run_phonemize(text.trim_end(), &resolved, &dicts);
            print_tokens(&tokens, &resolved.format);
        }

        Mode::DetectLang { text } => {
            let text = match text {
                Some(t) => t.clone(),
                None => read_stdin_to_string()?,
            };
            print_detection(text.trim_end(), &resolved.format);
        }

        Mode::Stream => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let stdin = tokio::io::stdin();
                let reader = BufReader::new(stdin);
                let mut lines = reader.lines();

                eprintln!("Entering streaming mode. Type text and press Enter. Use Ctrl+D to exit.");

                while let Some(line) = lines.next_line().await? {
                    let stripped = line.trim();
                    if stripped.is_empty() {
                        continue;
                    }
                    // Each line is one complete, synchronous G2P call
                    // dispatched from this async read loop (§5): there are
                    // no suspension points inside `run_phonemize` itself.
                    let tokens = run_phonemize(stripped, &resolved, &dicts);
                    print_tokens(&tokens, &resolved.format);
                }
                Ok::<(), Box<dyn std::error::Error>>(())
            })?;
        }
    }

    Ok(())
}
