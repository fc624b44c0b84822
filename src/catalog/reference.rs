use ahash::AHashMap;
use log::info;
use std::collections::BTreeSet;

use crate::parser::LabelParser;
use crate::types::ReferenceRecord;

/// Reference records indexed by canonical key.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    id_index: AHashMap<String, BTreeSet<ReferenceRecord>>,
}

impl ReferenceCatalog {
    /// Index raw labels. Repeated labels collapse into one record and labels
    /// sharing a key are kept together under it.
    pub fn build<P, I, S>(parser: &P, labels: I) -> Self
    where
        P: LabelParser,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut id_index: AHashMap<String, BTreeSet<ReferenceRecord>> = AHashMap::new();

        for label in labels {
            let label = label.as_ref();
            let identifier = parser.canonicalize(label);
            id_index.entry(identifier.clone())
                .or_default()
                .insert(ReferenceRecord {
                    identifier,
                    display_label: label.to_string(),
                });
        }

        let catalog = Self { id_index };
        info!("Loaded {} references under {} keys", catalog.record_count(), catalog.len());
        catalog
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<ReferenceRecord>> {
        self.id_index.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.id_index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.id_index.keys().map(|k| k.as_str())
    }

    /// Keys in lexical order, for deterministic passes and output
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.id_index.values().map(|records| records.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NameParser;

    #[test]
    fn labels_sharing_a_key_are_grouped() {
        let parser = NameParser::new_with_defaults();
        let catalog = ReferenceCatalog::build(&parser, [
            "Jean-Pierre Dupont",
            "jean pierre dupont",
            "Jean-Pierre Dupont",
            "Ann Lee (swimmer)",
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.record_count(), 3);

        let labels: Vec<&str> = catalog.get("jean pierre dupont").unwrap()
            .iter()
            .map(|r| r.display_label.as_str())
            .collect();
        assert_eq!(labels, vec!["Jean-Pierre Dupont", "jean pierre dupont"]);
        assert!(catalog.contains("ann lee"));
        assert_eq!(catalog.sorted_keys(), vec!["ann lee", "jean pierre dupont"]);
    }

    #[test]
    fn empty_input_builds_empty_catalog() {
        let parser = NameParser::new_with_defaults();
        let catalog = ReferenceCatalog::build(&parser, Vec::<String>::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.record_count(), 0);
    }
}
