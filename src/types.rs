use serde::{Serialize, Deserialize};
use std::hash::{Hash, Hasher};

/// A reference-side record: one distinct raw label and its canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub identifier: String,
    pub display_label: String,
}

/// A knowledge-base concept as loaded from one row of the concept table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub uri: String,
    pub identifier: String,
    pub display_label: String,
    pub alias_labels: Vec<String>,
}

/// One row of the concept table as produced by a concept source.
///
/// `names` holds zero or more alias names joined by a separator (`||` by default).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRow {
    pub concept: String,
    pub label: String,
    #[serde(default)]
    pub names: String,
}

impl ConceptRow {
    pub fn new<C: Into<String>, L: Into<String>, N: Into<String>>(concept: C, label: L, names: N) -> Self {
        Self {
            concept: concept.into(),
            label: label.into(),
            names: names.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Fuzzy,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
        }
    }
}

/// One side of a bipartite match edge.
///
/// Equality and hashing look at `other_key` only: two edges pointing at the
/// same counterpart are the same edge, however they were found. The edge
/// sets in [`crate::matcher::MatchRelation`] rely on this to ignore
/// re-discovered pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEdge {
    pub other_key: String,
    pub match_type: MatchType,
    pub similarity: f64,
}

impl MatchEdge {
    pub fn exact<S: Into<String>>(other_key: S) -> Self {
        Self {
            other_key: other_key.into(),
            match_type: MatchType::Exact,
            similarity: 1.0,
        }
    }

    pub fn fuzzy<S: Into<String>>(other_key: S, similarity: f64) -> Self {
        Self {
            other_key: other_key.into(),
            match_type: MatchType::Fuzzy,
            similarity,
        }
    }
}

impl PartialEq for MatchEdge {
    fn eq(&self, other: &Self) -> bool {
        self.other_key == other.other_key
    }
}

impl Eq for MatchEdge {}

impl Hash for MatchEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.other_key.hash(state);
    }
}
