use ahash::{AHashMap, AHashSet};
use log::trace;

use crate::types::{MatchEdge, MatchType};

/// Bipartite graph between reference keys and concept uris.
///
/// Both sides are kept as mirror images: every edge `r -> c` on the
/// reference side has an edge `c -> r` with the same type and similarity on
/// the concept side. Edge sets compare on the counterpart key only, so a
/// pair can be added once.
#[derive(Debug, Clone, Default)]
pub struct MatchRelation {
    reference_side: AHashMap<String, AHashSet<MatchEdge>>,
    concept_side: AHashMap<String, AHashSet<MatchEdge>>,
}

impl MatchRelation {
    /// Start with every known key mapped to an empty edge set.
    pub fn new<R, C, S, T>(reference_keys: R, concept_uris: C) -> Self
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            reference_side: reference_keys.into_iter()
                .map(|k| (k.into(), AHashSet::new()))
                .collect(),
            concept_side: concept_uris.into_iter()
                .map(|u| (u.into(), AHashSet::new()))
                .collect(),
        }
    }

    /// Add the edge on both sides. Returns false, leaving the relation
    /// untouched, when the pair is already connected.
    pub fn add_edge(&mut self, reference_key: &str, uri: &str, match_type: MatchType, similarity: f64) -> bool {
        let forward = MatchEdge {
            other_key: uri.to_string(),
            match_type,
            similarity,
        };

        let reference_edges = self.reference_side.entry(reference_key.to_string()).or_default();
        if reference_edges.contains(&forward) {
            return false;
        }
        reference_edges.insert(forward);

        self.concept_side.entry(uri.to_string())
            .or_default()
            .insert(MatchEdge {
                other_key: reference_key.to_string(),
                match_type,
                similarity,
            });

        trace!("{:?} -> {:?} ({}, {:.4})", reference_key, uri, match_type.as_str(), similarity);
        true
    }

    pub fn reference_edges(&self, key: &str) -> Option<&AHashSet<MatchEdge>> {
        self.reference_side.get(key)
    }

    pub fn concept_edges(&self, uri: &str) -> Option<&AHashSet<MatchEdge>> {
        self.concept_side.get(uri)
    }

    /// Edges of a reference ordered by counterpart, for stable output
    pub fn sorted_reference_edges(&self, key: &str) -> Vec<&MatchEdge> {
        let mut edges: Vec<&MatchEdge> = self.reference_side.get(key)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        edges.sort_by(|a, b| a.other_key.cmp(&b.other_key));
        edges
    }

    pub fn reference_edge_count(&self, key: &str) -> usize {
        self.reference_side.get(key).map_or(0, |set| set.len())
    }

    pub fn concept_edge_count(&self, uri: &str) -> usize {
        self.concept_side.get(uri).map_or(0, |set| set.len())
    }

    /// Reference keys with no edge, sorted
    pub fn unmatched_references(&self) -> Vec<&str> {
        unmatched(&self.reference_side)
    }

    /// Concept uris with no edge, sorted
    pub fn unmatched_concepts(&self) -> Vec<&str> {
        unmatched(&self.concept_side)
    }

    pub fn reference_count(&self) -> usize {
        self.reference_side.len()
    }

    pub fn concept_count(&self) -> usize {
        self.concept_side.len()
    }

    pub fn matched_reference_count(&self) -> usize {
        self.reference_side.values().filter(|edges| !edges.is_empty()).count()
    }

    pub fn matched_concept_count(&self) -> usize {
        self.concept_side.values().filter(|edges| !edges.is_empty()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.reference_side.values().map(|edges| edges.len()).sum()
    }

    pub fn edge_count_by_type(&self, match_type: MatchType) -> usize {
        self.reference_side.values()
            .flat_map(|edges| edges.iter())
            .filter(|edge| edge.match_type == match_type)
            .count()
    }

    /// Whether both sides describe the same edge set
    pub fn is_mirrored(&self) -> bool {
        let mirrored_from = |from: &AHashMap<String, AHashSet<MatchEdge>>,
                             to: &AHashMap<String, AHashSet<MatchEdge>>| {
            from.iter().all(|(key, edges)| {
                edges.iter().all(|edge| {
                    to.get(&edge.other_key)
                        .and_then(|back| back.get(&MatchEdge::exact(key.as_str())))
                        .map_or(false, |back| {
                            back.match_type == edge.match_type && back.similarity == edge.similarity
                        })
                })
            })
        };

        mirrored_from(&self.reference_side, &self.concept_side)
            && mirrored_from(&self.concept_side, &self.reference_side)
    }
}

fn unmatched(side: &AHashMap<String, AHashSet<MatchEdge>>) -> Vec<&str> {
    let mut keys: Vec<&str> = side.iter()
        .filter(|(_, edges)| edges.is_empty())
        .map(|(key, _)| key.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
