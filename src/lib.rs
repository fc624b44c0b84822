//! namelink links free-text person names to knowledge-base concepts.
//! It canonicalizes labels, blocks on identical keys, and falls back to
//! sparse n-gram cosine similarity over successively lower thresholds for
//! whatever is left unmatched.

// Module declarations
pub mod error;
pub mod types;
pub mod parser;
pub mod ngram;
pub mod catalog;
pub mod matcher;
pub mod report;
pub mod source;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{ConceptRecord, ConceptRow, MatchEdge, MatchType, ReferenceRecord};
pub use catalog::{ConceptCatalog, ReferenceCatalog};
pub use matcher::{MatchRelation, MatchStats, Normalizer, SimilarityEngine};
pub use report::{ReportEmitter, ReportRow};

// Re-export the config from config module
pub use config::LinkerConfig;
