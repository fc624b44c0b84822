use proptest::prelude::*;

use namelink::config::subsystems::{MatcherConfig, ProcessorConfig, TextProcessingConfig};
use namelink::ngram::{cosine_similarity, NGramVector};
use namelink::parser::{LabelParser, NameParser};
use namelink::{ConceptCatalog, ConceptRow, Normalizer, ReferenceCatalog, SimilarityEngine};

proptest! {
    #[test]
    fn canonicalization_is_idempotent(label in ".{0,40}", fold in any::<bool>()) {
        let parser = NameParser::with_accent_folding(fold);
        let once = parser.canonicalize(&label);
        prop_assert_eq!(parser.canonicalize(&once), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
    }

    #[test]
    fn top_similar_respects_cap_and_floor(
        strings in prop::collection::vec("[a-e ]{0,10}", 0..25),
        max_per_item in 1usize..4,
        min_similarity in 0.05f64..1.0,
    ) {
        let pairs = SimilarityEngine::new(2)
            .with_parallel(false)
            .top_similar(&strings, max_per_item, min_similarity);

        for left in 0..strings.len() {
            prop_assert!(pairs.iter().filter(|p| p.left == left).count() <= max_per_item);
        }
        for pair in &pairs {
            prop_assert!(pair.left != pair.right);
            prop_assert!(pair.similarity >= min_similarity);
            prop_assert!(pair.similarity <= 1.0);
        }
    }

    #[test]
    fn best_partner_matches_brute_force(
        strings in prop::collection::vec("[a-e ]{0,10}", 2..25),
        min_similarity in 0.05f64..1.0,
    ) {
        let pairs = SimilarityEngine::new(2)
            .with_parallel(false)
            .top_similar(&strings, 1, min_similarity);
        let vectors: Vec<NGramVector> = strings.iter().map(|s| NGramVector::from_text(s, 2)).collect();

        for i in 0..strings.len() {
            let best = (0..strings.len())
                .filter(|&j| j != i)
                .map(|j| cosine_similarity(&vectors[i], &vectors[j]))
                .fold(0.0f64, f64::max);
            let found = pairs.iter().find(|p| p.left == i);

            match found {
                Some(pair) => prop_assert!((pair.similarity - best).abs() < 1e-9, "row {}: {} vs {}", i, pair.similarity, best),
                // Scores within rounding of the floor may fall either side
                None => prop_assert!(best < min_similarity + 1e-9, "row {} missed a partner at {}", i, best),
            }
        }
    }

    #[test]
    fn relation_stays_mirrored(
        refs in prop::collection::vec("[a-d]{1,5} [a-d]{1,5}", 1..12),
        labels in prop::collection::vec("[a-d]{1,5} [a-d]{1,5}", 1..12),
    ) {
        let text = TextProcessingConfig::default();
        let parser = NameParser::new(&text);
        let rows: Vec<ConceptRow> = labels.iter()
            .enumerate()
            .map(|(i, label)| ConceptRow::new(format!("C{}", i), label.as_str(), ""))
            .collect();

        let references = ReferenceCatalog::build(&parser, &refs);
        let concepts = ConceptCatalog::build(&parser, rows, &text);
        let processor = ProcessorConfig { parallel: false, ..ProcessorConfig::default() };
        let mut normalizer = Normalizer::new(&references, &concepts, &MatcherConfig::default(), &text, &processor);

        normalizer.run_exact_phase();
        prop_assert!(normalizer.relation().is_mirrored());
        for key in references.sorted_keys() {
            for uri in concepts.uris_for_identifier(key) {
                let edges = normalizer.relation().reference_edges(key).unwrap();
                prop_assert!(edges.iter().any(|e| e.other_key == uri));
            }
        }

        normalizer.run_fuzzy_phase();
        prop_assert!(normalizer.relation().is_mirrored());
    }
}
