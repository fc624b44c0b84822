use ahash::AHashMap;
use log::{debug, info, warn};
use std::collections::BTreeSet;

use crate::config::subsystems::TextProcessingConfig;
use crate::parser::{LabelParser, NameExpander};
use crate::types::{ConceptRecord, ConceptRow};

/// Knowledge-base concepts indexed by canonical key, by uri and by alias.
///
/// Alias and synonym keys map to uris rather than records: they are only used
/// for blocking, and the records themselves stay reachable through
/// [`ConceptCatalog::records_for_uri`].
#[derive(Debug, Clone, Default)]
pub struct ConceptCatalog {
    id_index: AHashMap<String, BTreeSet<ConceptRecord>>,
    uri_index: AHashMap<String, BTreeSet<ConceptRecord>>,
    alias_index: AHashMap<String, BTreeSet<String>>,
    synonym_index: AHashMap<String, BTreeSet<String>>,
}

impl ConceptCatalog {
    pub fn build<P, I>(parser: &P, rows: I, settings: &TextProcessingConfig) -> Self
    where
        P: LabelParser,
        I: IntoIterator<Item = ConceptRow>,
    {
        let mut catalog = Self::default();
        let mut skipped = 0usize;

        for row in rows {
            let uri = strip_uri_prefix(row.concept.trim(), &settings.uri_prefix);
            if uri.is_empty() {
                skipped += 1;
                warn!("Skipping concept row with empty uri (label {:?})", row.label);
                continue;
            }

            let alias_labels = split_aliases(&row.names, &settings.alias_separator);
            let record = ConceptRecord {
                uri: uri.to_string(),
                identifier: parser.canonicalize(&row.label),
                display_label: row.label.clone(),
                alias_labels,
            };
            catalog.insert(parser, record);
        }

        info!(
            "Loaded {} concepts under {} keys ({} alias keys, {} rows skipped)",
            catalog.uri_index.len(),
            catalog.id_index.len(),
            catalog.alias_index.len(),
            skipped
        );
        catalog
    }

    fn insert<P: LabelParser>(&mut self, parser: &P, record: ConceptRecord) {
        for alias in &record.alias_labels {
            let key = parser.canonicalize(alias);
            if key.is_empty() {
                continue;
            }
            self.alias_index.entry(key).or_default().insert(record.uri.clone());
        }

        self.uri_index.entry(record.uri.clone())
            .or_default()
            .insert(record.clone());
        self.id_index.entry(record.identifier.clone())
            .or_default()
            .insert(record);
    }

    /// Index the sub-name variants of every primary and alias key.
    pub fn build_synonym_index<P: LabelParser>(&mut self, expander: &NameExpander<'_, P>) {
        let mut synonym_index: AHashMap<String, BTreeSet<String>> = AHashMap::new();

        let sources = self.id_index.iter()
            .map(|(key, records)| (key, records.iter().map(|r| &r.uri).collect::<Vec<_>>()))
            .chain(self.alias_index.iter().map(|(key, uris)| (key, uris.iter().collect::<Vec<_>>())));

        for (key, uris) in sources {
            for variant in expander.expand(key) {
                let entry = synonym_index.entry(variant).or_default();
                entry.extend(uris.iter().map(|uri| (*uri).clone()));
            }
        }

        debug!("Synonym index holds {} sub-name keys", synonym_index.len());
        self.synonym_index = synonym_index;
    }

    pub fn records_for_identifier(&self, key: &str) -> Option<&BTreeSet<ConceptRecord>> {
        self.id_index.get(key)
    }

    pub fn records_for_uri(&self, uri: &str) -> Option<&BTreeSet<ConceptRecord>> {
        self.uri_index.get(uri)
    }

    pub fn uris_for_alias(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.alias_index.get(key)
    }

    pub fn uris_for_synonym(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.synonym_index.get(key)
    }

    /// Uris of every record whose primary key is `key`, in lexical order
    pub fn uris_for_identifier(&self, key: &str) -> BTreeSet<&str> {
        self.id_index.get(key)
            .map(|records| records.iter().map(|r| r.uri.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn contains_identifier(&self, key: &str) -> bool {
        self.id_index.contains_key(key)
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.uri_index.keys().map(|k| k.as_str())
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.id_index.keys().map(|k| k.as_str())
    }

    /// Number of distinct uris
    pub fn len(&self) -> usize {
        self.uri_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uri_index.is_empty()
    }

    pub fn identifier_count(&self) -> usize {
        self.id_index.len()
    }

    pub fn synonym_count(&self) -> usize {
        self.synonym_index.len()
    }
}

/// Drop a knowledge-base namespace from a uri if present.
pub fn strip_uri_prefix<'a>(uri: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return uri;
    }
    uri.strip_prefix(prefix).unwrap_or(uri)
}

/// Split a joined alias string, ignoring empty and blank segments.
pub fn split_aliases(names: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        let single = names.trim();
        return if single.is_empty() { Vec::new() } else { vec![single.to_string()] };
    }
    names.split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
