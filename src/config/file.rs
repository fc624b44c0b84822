// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::Result;
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub reference_file: PathBuf,
    pub concept_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub summary_file: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            reference_file: PathBuf::from("data/references.csv"),
            concept_file: PathBuf::from("data/concepts.tsv"),
            output_dir: PathBuf::from("data/matches"),
            output_file: "matching_athletes.tsv".to_string(),
            summary_file: "matching_summary.json".to_string(),
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        let value = value.trim_matches('"');
        match key {
            "reference_file" => {
                self.reference_file = PathBuf::from(value);
                Some(Ok(()))
            },
            "concept_file" => {
                self.concept_file = PathBuf::from(value);
                Some(Ok(()))
            },
            "output_dir" => {
                self.output_dir = PathBuf::from(value);
                Some(Ok(()))
            },
            "output_file" => {
                self.output_file = value.to_string();
                Some(Ok(()))
            },
            "summary_file" => {
                self.summary_file = value.to_string();
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.reference_file.is_file() {
            return Err(crate::error::Error::Config(
                format!("Reference file does not exist: {:?}", self.reference_file)
            ));
        }
        if !self.concept_file.is_file() {
            return Err(crate::error::Error::Config(
                format!("Concept file does not exist: {:?}", self.concept_file)
            ));
        }
        if self.output_file.is_empty() {
            return Err(crate::error::Error::config("output_file must not be empty"));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }
}
