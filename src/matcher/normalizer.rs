// Exact blocking followed by threshold-descending fuzzy passes

use log::{debug, info, warn};
use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::catalog::{ConceptCatalog, ReferenceCatalog};
use crate::config::subsystems::{MatcherConfig, ProcessorConfig, TextProcessingConfig};
use crate::types::MatchType;
use super::relation::MatchRelation;
use super::similarity::SimilarityEngine;

/// Outcome of one fuzzy threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyPassStats {
    pub threshold: f64,
    // Both unmatched sides non-empty; otherwise the pass was a no-op
    pub ran: bool,
    pub pooled_names: usize,
    pub candidate_pairs: usize,
    pub cross_pairs: usize,
    pub edges_added: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub references_total: usize,
    pub references_matched: usize,
    pub references_unmatched: usize,
    pub concepts_total: usize,
    pub concepts_matched: usize,
    pub concepts_unmatched: usize,
    pub exact_edges: usize,
    pub alias_edges: usize,
    pub synonym_edges: usize,
    pub fuzzy_passes: Vec<FuzzyPassStats>,
}

impl MatchStats {
    fn refresh(&mut self, relation: &MatchRelation) {
        self.references_total = relation.reference_count();
        self.references_matched = relation.matched_reference_count();
        self.references_unmatched = self.references_total - self.references_matched;
        self.concepts_total = relation.concept_count();
        self.concepts_matched = relation.matched_concept_count();
        self.concepts_unmatched = self.concepts_total - self.concepts_matched;
    }

    pub fn fuzzy_edges(&self) -> usize {
        self.fuzzy_passes.iter().map(|p| p.edges_added).sum()
    }

    fn log(&self, stage: &str) {
        info!(
            "[{}] references: {} total, {} found, {} unmatched | concepts: {} total, {} found, {} unmatched",
            stage,
            self.references_total, self.references_matched, self.references_unmatched,
            self.concepts_total, self.concepts_matched, self.concepts_unmatched
        );
    }
}

/// Drives the match relation through its two phases.
///
/// The exact phase runs once and must come first; fuzzy passes then only see
/// keys that are still unmatched. Catalogs are borrowed read-only.
pub struct Normalizer<'a> {
    references: &'a ReferenceCatalog,
    concepts: &'a ConceptCatalog,
    config: MatcherConfig,
    engine: SimilarityEngine,
    relation: MatchRelation,
    stats: MatchStats,
    exact_done: bool,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        references: &'a ReferenceCatalog,
        concepts: &'a ConceptCatalog,
        config: &MatcherConfig,
        text_processing: &TextProcessingConfig,
        processor: &ProcessorConfig,
    ) -> Self {
        let relation = MatchRelation::new(references.keys(), concepts.uris());
        let engine = SimilarityEngine::new(text_processing.ngram_size)
            .with_parallel(processor.parallel);

        let mut stats = MatchStats::default();
        stats.refresh(&relation);

        Self {
            references,
            concepts,
            config: config.clone(),
            engine,
            relation,
            stats,
            exact_done: false,
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.config.thresholds
    }

    pub fn relation(&self) -> &MatchRelation {
        &self.relation
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    /// Connect every reference key to the concepts sharing it, through the
    /// primary label, then aliases, then sub-name synonyms for references
    /// still without a hit. Returns the number of edges added.
    ///
    /// References whose key is empty are never blocked here; they can only
    /// be matched by the fuzzy passes, where they score zero.
    pub fn run_exact_phase(&mut self) -> usize {
        if self.exact_done {
            warn!("Exact phase already ran, skipping");
            return 0;
        }
        self.exact_done = true;

        let start = Instant::now();
        if self.config.use_name_expansion && self.concepts.synonym_count() == 0 {
            debug!("Name expansion enabled but the synonym index is empty");
        }

        let mut added = 0;
        for key in self.references.sorted_keys() {
            // An empty key would block every unusable label together
            if key.is_empty() {
                continue;
            }

            for uri in self.concepts.uris_for_identifier(key) {
                if self.relation.add_edge(key, uri, MatchType::Exact, 1.0) {
                    self.stats.exact_edges += 1;
                    added += 1;
                }
            }

            if self.config.use_aliases {
                if let Some(uris) = self.concepts.uris_for_alias(key) {
                    for uri in uris {
                        if self.relation.add_edge(key, uri, MatchType::Exact, 1.0) {
                            self.stats.alias_edges += 1;
                            added += 1;
                        }
                    }
                }
            }

            if self.config.use_name_expansion && self.relation.reference_edge_count(key) == 0 {
                if let Some(uris) = self.concepts.uris_for_synonym(key) {
                    for uri in uris {
                        if self.relation.add_edge(key, uri, MatchType::Exact, 1.0) {
                            self.stats.synonym_edges += 1;
                            added += 1;
                        }
                    }
                }
            }
        }

        self.stats.refresh(&self.relation);
        info!("Exact phase added {} edges in {:.2?}", added, start.elapsed());
        self.stats.log("exact");
        added
    }

    /// One fuzzy threshold over the names still unmatched on both sides.
    pub fn run_fuzzy_pass(&mut self, threshold: f64) -> FuzzyPassStats {
        if !self.exact_done {
            self.run_exact_phase();
        }

        let mut pass = FuzzyPassStats {
            threshold,
            ..FuzzyPassStats::default()
        };

        let references: Vec<String> = self.relation.unmatched_references()
            .into_iter()
            .map(str::to_string)
            .collect();
        let concept_ids: Vec<String> = self.unmatched_concept_identifiers();

        if references.is_empty() || concept_ids.is_empty() {
            debug!(
                "Skipping threshold {:.2}: {} unmatched references, {} unmatched concept names",
                threshold, references.len(), concept_ids.len()
            );
            self.stats.fuzzy_passes.push(pass.clone());
            return pass;
        }

        let split = references.len();
        let pooled: Vec<&str> = references.iter()
            .chain(concept_ids.iter())
            .map(|s| s.as_str())
            .collect();

        pass.ran = true;
        pass.pooled_names = pooled.len();

        let pairs = self.engine.top_similar(&pooled, self.config.neighbors_per_name, threshold);
        pass.candidate_pairs = pairs.len();

        for pair in pairs {
            let (reference, concept_id) = match (pair.left < split, pair.right < split) {
                (true, false) => (pooled[pair.left], pooled[pair.right]),
                (false, true) => (pooled[pair.right], pooled[pair.left]),
                _ => continue,
            };
            pass.cross_pairs += 1;

            for uri in self.concepts.uris_for_identifier(concept_id) {
                if self.relation.add_edge(reference, uri, MatchType::Fuzzy, pair.similarity) {
                    pass.edges_added += 1;
                }
            }
        }

        self.stats.refresh(&self.relation);
        self.stats.fuzzy_passes.push(pass.clone());
        debug!(
            "Threshold {:.2}: {} pooled, {} candidate pairs, {} cross-side, {} new edges",
            threshold, pass.pooled_names, pass.candidate_pairs, pass.cross_pairs, pass.edges_added
        );
        self.stats.log(&format!("fuzzy {:.2}", threshold));
        pass
    }

    /// Every configured threshold, highest first.
    pub fn run_fuzzy_phase(&mut self) -> Vec<FuzzyPassStats> {
        let thresholds = self.config.thresholds.clone();
        thresholds.into_iter()
            .map(|t| self.run_fuzzy_pass(t))
            .collect()
    }

    /// Exact phase then fuzzy phase.
    pub fn run(&mut self) {
        self.run_exact_phase();
        self.run_fuzzy_phase();
    }

    /// Freeze the relation.
    pub fn finish(self) -> (MatchRelation, MatchStats) {
        (self.relation, self.stats)
    }

    // Canonical keys of concepts whose uri has no edge yet
    fn unmatched_concept_identifiers(&self) -> Vec<String> {
        let identifiers: BTreeSet<&str> = self.relation.unmatched_concepts()
            .into_iter()
            .filter_map(|uri| self.concepts.records_for_uri(uri))
            .flat_map(|records| records.iter().map(|r| r.identifier.as_str()))
            .collect();
        identifiers.into_iter().map(str::to_string).collect()
    }
}
