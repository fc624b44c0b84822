use namelink::config::subsystems::{MatcherConfig, ProcessorConfig, TextProcessingConfig};
use namelink::parser::NameParser;
use namelink::report::ReportEmitter;
use namelink::{ConceptCatalog, ConceptRow, MatchType, Normalizer, ReferenceCatalog, ReportRow};

fn link(refs: &[&str], rows: Vec<ConceptRow>, text: TextProcessingConfig) -> Vec<ReportRow> {
    let parser = NameParser::new(&text);
    let references = ReferenceCatalog::build(&parser, refs.iter());
    let concepts = ConceptCatalog::build(&parser, rows, &text);
    let processor = ProcessorConfig { parallel: false, ..ProcessorConfig::default() };

    let mut normalizer = Normalizer::new(&references, &concepts, &MatcherConfig::default(), &text, &processor);
    normalizer.run();
    let (relation, _) = normalizer.finish();
    assert!(relation.is_mirrored());
    ReportEmitter::new(&references, &concepts).emit(&relation)
}

#[test]
fn identical_names_match_exactly() {
    let rows = link(
        &["Jean Dupont"],
        vec![ConceptRow::new("Jean_Dupont", "Jean Dupont", "")],
        TextProcessingConfig::default(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uri, "Jean_Dupont");
    assert_eq!(rows[0].ref_id, "jean dupont");
    assert_eq!(rows[0].similarity, Some(1.0));
    assert_eq!(rows[0].matching_concepts_count, 1);
    assert_eq!(rows[0].matching_refs_count, 1);
}

#[test]
fn alias_gives_an_exact_match() {
    let rows = link(
        &["J. Dupont"],
        vec![ConceptRow::new("Jean_Dupont", "Jean Dupont", "J Dupont")],
        TextProcessingConfig::default(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reference, "J. Dupont");
    assert_eq!(rows[0].uri, "Jean_Dupont");
    assert_eq!(rows[0].ref_id, "j dupont");
    assert_eq!(rows[0].uri_id, "jean dupont");
    assert_eq!(rows[0].similarity, Some(1.0));
}

#[test]
fn accented_names_match_exactly_when_folding() {
    let rows = link(
        &["Teemu Selanne"],
        vec![ConceptRow::new("Teemu_Selänne", "Teemu Selänne", "")],
        TextProcessingConfig::default(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uri, "Teemu_Selänne");
    assert_eq!(rows[0].uri_id, "teemu selanne");
    assert_eq!(rows[0].similarity, Some(1.0));
}

#[test]
fn accented_names_match_fuzzily_without_folding() {
    let text = TextProcessingConfig { strip_accents: false, ..TextProcessingConfig::default() };
    let rows = link(
        &["Teemu Selanne"],
        vec![ConceptRow::new("Teemu_Selänne", "Teemu Selänne", "")],
        text,
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uri, "Teemu_Selänne");
    assert_eq!(rows[0].uri_id, "teemu selnne");

    let similarity = rows[0].similarity.unwrap();
    assert!(similarity < 1.0);
    assert!(similarity >= 0.85, "similarity {}", similarity);
}

#[test]
fn implausible_name_stays_unmatched() {
    let rows = link(
        &["Xyzabc Qwerty", "Jean Dupont"],
        vec![ConceptRow::new("Jean_Dupont", "Jean Dupont", "")],
        TextProcessingConfig::default(),
    );
    assert_eq!(rows.len(), 2);

    let unmatched = rows.iter().find(|r| r.reference == "Xyzabc Qwerty").unwrap();
    assert!(unmatched.uri.is_empty());
    assert!(unmatched.uri_id.is_empty());
    assert_eq!(unmatched.similarity, None);
    assert_eq!(unmatched.matching_concepts_count, 0);
}

#[test]
fn every_label_is_reported_once_when_unmatched() {
    let rows = link(
        &["Qqq Zzz", "QQQ-zzz", "Qqq Zzz"],
        vec![ConceptRow::new("Jean_Dupont", "Jean Dupont", "")],
        TextProcessingConfig::default(),
    );
    let labels: Vec<&str> = rows.iter().map(|r| r.reference.as_str()).collect();
    assert_eq!(labels, vec!["QQQ-zzz", "Qqq Zzz"]);
}

#[test]
fn references_matched_early_gain_no_later_edges() {
    let text = TextProcessingConfig::default();
    let parser = NameParser::new(&text);
    let references = ReferenceCatalog::build(&parser, [
        "Jean Dupont", "Jean Dupond", "Pierre Martinez", "Ann Leigh", "Marie Curie",
    ]);
    let concepts = ConceptCatalog::build(&parser, vec![
        ConceptRow::new("Jean_Dupont", "Jean Dupont", ""),
        ConceptRow::new("Pierre_Martin", "Pierre Martin", ""),
        ConceptRow::new("Ann_Lee", "Ann Lee", ""),
        ConceptRow::new("Marie_Curie", "Marie Curie", ""),
        ConceptRow::new("Jean_Dupond_(cyclist)", "Jean Dupond", ""),
    ], &text);
    let processor = ProcessorConfig::default();
    let mut normalizer = Normalizer::new(&references, &concepts, &MatcherConfig::default(), &text, &processor);
    normalizer.run_exact_phase();

    for threshold in MatcherConfig::default().thresholds {
        let before: Vec<(String, usize)> = references.sorted_keys()
            .into_iter()
            .map(|k| (k.to_string(), normalizer.relation().reference_edge_count(k)))
            .collect();

        normalizer.run_fuzzy_pass(threshold);

        for (key, count) in before.into_iter().filter(|(_, count)| *count > 0) {
            assert_eq!(normalizer.relation().reference_edge_count(&key), count, "{} at {}", key, threshold);
        }
    }

    let relation = normalizer.relation();
    for key in references.sorted_keys() {
        if let Some(edges) = relation.reference_edges(key) {
            let exact = edges.iter().any(|e| e.match_type == MatchType::Exact);
            let fuzzy = edges.iter().any(|e| e.match_type == MatchType::Fuzzy);
            assert!(!(exact && fuzzy), "{} matched both ways", key);
            assert!(edges.iter().all(|e| e.similarity > 0.0 && e.similarity <= 1.0));
        }
    }
    assert_eq!(relation.reference_edge_count("jean dupont"), 1);
    assert_eq!(relation.reference_edge_count("jean dupond"), 1);
}
