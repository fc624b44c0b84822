// src/config/subsystems/text_processing.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextProcessingConfig {
    #[serde(default = "default_strip_accents")]
    pub strip_accents: bool,

    #[serde(default = "default_ngram_size")]
    pub ngram_size: usize,

    // Names with more words than this are not expanded into sub-names
    #[serde(default = "default_max_expansion_words")]
    pub max_expansion_words: usize,

    #[serde(default = "default_uri_prefix")]
    pub uri_prefix: String,

    #[serde(default = "default_alias_separator")]
    pub alias_separator: String,
}

// Default functions
fn default_strip_accents() -> bool { true }
fn default_ngram_size() -> usize { 2 }
fn default_max_expansion_words() -> usize { 6 }
fn default_uri_prefix() -> String { "http://dbpedia.org/resource/".to_string() }
fn default_alias_separator() -> String { "||".to_string() }

impl Default for TextProcessingConfig {
    fn default() -> Self {
        Self {
            strip_accents: default_strip_accents(),
            ngram_size: default_ngram_size(),
            max_expansion_words: default_max_expansion_words(),
            uri_prefix: default_uri_prefix(),
            alias_separator: default_alias_separator(),
        }
    }
}

impl FromIni for TextProcessingConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "text_processing" {
            return None;
        }

        match key {
            "strip_accents" => {
                match value.parse() {
                    Ok(flag) => {
                        self.strip_accents = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid strip_accents value (must be true/false): {}", value)
                    ))),
                }
            },
            "ngram_size" => {
                match value.parse() {
                    Ok(size) if size > 0 => {
                        self.ngram_size = size;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid ngram_size (must be > 0): {}", value)
                    ))),
                }
            },
            "max_expansion_words" => {
                match value.parse() {
                    Ok(words) if words >= 2 => {
                        self.max_expansion_words = words;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid max_expansion_words (must be >= 2): {}", value)
                    ))),
                }
            },
            "uri_prefix" => {
                self.uri_prefix = value.trim_matches('"').to_string();
                Some(Ok(()))
            },
            "alias_separator" => {
                let separator = value.trim_matches('"');
                if separator.is_empty() {
                    Some(Err(Error::config("alias_separator must not be empty")))
                } else {
                    self.alias_separator = separator.to_string();
                    Some(Ok(()))
                }
            },
            _ => None,
        }
    }
}

impl TextProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ngram_size == 0 {
            return Err(Error::config("ngram_size must be greater than 0"));
        }
        if self.alias_separator.is_empty() {
            return Err(Error::config("alias_separator must not be empty"));
        }
        Ok(())
    }

    /// Returns a description of which processing options are enabled
    pub fn describe(&self) -> String {
        let accents = if self.strip_accents { "folding accents" } else { "keeping accents" };
        format!("{}, {}-character n-grams, expanding names up to {} words",
            accents, self.ngram_size, self.max_expansion_words)
    }
}
