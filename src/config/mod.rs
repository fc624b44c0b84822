pub mod file;
pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use crate::error::Result;
use log::{debug, warn, trace};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkerConfig {
    // File paths
    pub files: file::FileConfig,

    // Subsystem configs
    pub text_processing: subsystems::TextProcessingConfig,
    pub matcher: subsystems::MatcherConfig,
    pub processor: subsystems::ProcessorConfig,
}

impl LinkerConfig {
    /// Validates every section, including the existence of the input files.
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.validate_settings()
    }

    /// Validates the matching settings only; input paths are not touched.
    pub fn validate_settings(&self) -> Result<()> {
        self.text_processing.validate()?;
        self.matcher.validate()?;
        self.processor.validate()?;
        Ok(())
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        let absolute_path = std::fs::canonicalize(&path)
            .unwrap_or_else(|_| path.as_ref().to_path_buf());

        trace!("Loading configuration from: {:?}", absolute_path);

        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content);
        config.validate_settings()?;
        Ok(config)
    }

    /// Parses INI text. Bad values are logged and the default is kept.
    pub fn from_ini_str(content: &str) -> Self {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len()-1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Delegate to appropriate subsystem config
                let handled = match current_section.as_str() {
                    "file" => config.files.from_ini_section(&current_section, key, value),
                    "text_processing" => config.text_processing.from_ini_section(&current_section, key, value),
                    "matcher" => config.matcher.from_ini_section(&current_section, key, value),
                    "processor" => config.processor.from_ini_section(&current_section, key, value),
                    _ => None,
                };

                match handled {
                    Some(Err(e)) => warn!("Error processing config key {}={}: {}", key, value, e),
                    Some(Ok(())) => debug!("Config [{}] {}={}", current_section, key, value),
                    None => warn!("Unrecognized config key: {}={} in section [{}]", key, value, current_section),
                }
            }
        }

        config
    }
}
