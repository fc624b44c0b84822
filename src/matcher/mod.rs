pub mod sparse;
pub mod similarity;
pub mod relation;
pub mod normalizer;

// Re-export the main types
pub use self::similarity::{SimilarityEngine, SimilarityPair};
pub use self::relation::MatchRelation;
pub use self::normalizer::{Normalizer, MatchStats, FuzzyPassStats};
