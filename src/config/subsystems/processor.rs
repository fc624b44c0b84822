// src/config/subsystems/processor.rs

use serde::{Serialize, Deserialize};
use log::{info, warn, LevelFilter};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    // Row-parallel similarity computation
    pub parallel: bool,
    // 0 keeps rayon's global pool
    pub thread_count: usize,
    pub log_level: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            thread_count: 0,
            log_level: "info".to_string(),
        }
    }
}

impl FromIni for ProcessorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "processor" {
            return None;
        }

        match key {
            "parallel" => {
                match value.parse() {
                    Ok(flag) => {
                        self.parallel = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid parallel value (must be true/false): {}", value)
                    ))),
                }
            },
            "thread_count" => {
                match value.parse() {
                    Ok(count) => {
                        self.thread_count = count;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid thread_count: {}", value)
                    ))),
                }
            },
            "log_level" => {
                self.log_level = value.trim_matches('"').to_lowercase();
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Converts the configured level name, defaulting to Info for unknown names.
    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "none" | "off" => LevelFilter::Off,
            other => {
                warn!("Invalid log level '{}', defaulting to Info", other);
                LevelFilter::Info
            }
        }
    }

    /// Number of threads for a dedicated pool, or `None` to use rayon's global pool.
    pub fn effective_thread_count(&self) -> Option<usize> {
        if !self.parallel || self.thread_count == 0 {
            return None;
        }
        let cpus = num_cpus::get();
        if self.thread_count > cpus {
            info!("thread_count {} exceeds available CPUs, capping at {}", self.thread_count, cpus);
        }
        Some(self.thread_count.min(cpus))
    }

    pub fn build_thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        match self.effective_thread_count() {
            Some(threads) => Ok(Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?
            )),
            None => Ok(None),
        }
    }
}
