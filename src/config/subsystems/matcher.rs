// src/config/subsystems/matcher.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

pub const DEFAULT_THRESHOLDS: [f64; 6] = [0.95, 0.90, 0.85, 0.80, 0.75, 0.70];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    // Fuzzy pass thresholds, strictly descending
    pub thresholds: Vec<f64>,
    // Real neighbours requested per pooled name (identity is never returned)
    pub neighbors_per_name: usize,
    // Exact phase also consults the concept alias index
    pub use_aliases: bool,
    // Exact phase falls back to sub-name (synonym) blocking
    pub use_name_expansion: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            neighbors_per_name: 1,
            use_aliases: true,
            use_name_expansion: false,
        }
    }
}

fn parse_thresholds(value: &str) -> Result<Vec<f64>> {
    let thresholds = value
        .trim_matches('"')
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>()
            .map_err(|_| Error::Config(format!("Invalid threshold: {}", t))))
        .collect::<Result<Vec<f64>>>()?;

    check_thresholds(&thresholds)?;
    Ok(thresholds)
}

fn check_thresholds(thresholds: &[f64]) -> Result<()> {
    if thresholds.is_empty() {
        return Err(Error::config("At least one fuzzy threshold is required"));
    }
    if let Some(t) = thresholds.iter().find(|t| !(**t > 0.0 && **t <= 1.0)) {
        return Err(Error::Config(
            format!("Invalid threshold (must be in (0, 1]): {}", t)
        ));
    }
    if thresholds.windows(2).any(|w| w[1] >= w[0]) {
        return Err(Error::Config(
            format!("Thresholds must be strictly descending: {:?}", thresholds)
        ));
    }
    Ok(())
}

impl FromIni for MatcherConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "matcher" {
            return None;
        }

        match key {
            "thresholds" => {
                match parse_thresholds(value) {
                    Ok(thresholds) => {
                        self.thresholds = thresholds;
                        Some(Ok(()))
                    },
                    Err(e) => Some(Err(e)),
                }
            },
            "neighbors_per_name" => {
                match value.parse() {
                    Ok(n) if n > 0 => {
                        self.neighbors_per_name = n;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid neighbors_per_name (must be > 0): {}", value)
                    ))),
                }
            },
            "use_aliases" => {
                match value.parse() {
                    Ok(flag) => {
                        self.use_aliases = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid use_aliases value (must be true/false): {}", value)
                    ))),
                }
            },
            "use_name_expansion" => {
                match value.parse() {
                    Ok(flag) => {
                        self.use_name_expansion = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid use_name_expansion value (must be true/false): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        check_thresholds(&self.thresholds)?;
        if self.neighbors_per_name == 0 {
            return Err(Error::config("neighbors_per_name must be greater than 0"));
        }
        Ok(())
    }
}
