// Delimited-text readers for the reference and concept tables

use ahash::AHashMap;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ConceptRow;
use super::{ConceptSource, LoadStats};

const REFERENCE_NAME_FIELD: &str = "Name";
const CONCEPT_FIELD: &str = "concept";
const LABEL_FIELD: &str = "label";
const NAMES_FIELD: &str = "names";

/// Reference names from a comma-delimited table with a `Name` column.
pub fn read_references<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, LoadStats)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (names, stats) = read_references_from(BufReader::new(file))?;
    info!("Read {} references from {} ({} skipped)", stats.accepted, path.display(), stats.skipped);
    Ok((names, stats))
}

pub fn read_references_from<R: Read>(reader: R) -> Result<(Vec<String>, LoadStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let name_col = column(&headers, REFERENCE_NAME_FIELD)?;

    let mut names = Vec::new();
    let mut stats = LoadStats::default();

    for (i, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Error parsing reference row #{}: {}. Skipping.", i + 1, e);
                stats.skipped += 1;
                continue;
            }
        };

        match record.get(name_col).filter(|name| !name.is_empty()) {
            Some(name) => {
                names.push(name.to_string());
                stats.accepted += 1;
            }
            None => {
                warn!("Reference row #{} has no {}. Skipping.", i + 1, REFERENCE_NAME_FIELD);
                stats.skipped += 1;
            }
        }
    }

    Ok((names, stats))
}

/// Concept rows from a tab-delimited table with `concept`, `label` and an
/// optional `names` column. Fields may be `"`-quoted with doubled quotes as
/// escapes, so quoted values can hold tabs and newlines.
pub fn read_concepts<P: AsRef<Path>>(path: P) -> Result<(Vec<ConceptRow>, LoadStats)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (rows, stats) = read_concepts_from(BufReader::new(file))?;
    info!("Read {} concept rows from {} ({} skipped)", stats.accepted, path.display(), stats.skipped);
    Ok((rows, stats))
}

pub fn read_concepts_from<R: Read>(reader: R) -> Result<(Vec<ConceptRow>, LoadStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let concept_col = column(&headers, CONCEPT_FIELD)?;
    let label_col = column(&headers, LABEL_FIELD)?;
    let names_col = column(&headers, NAMES_FIELD).ok();

    let mut rows = Vec::new();
    let mut stats = LoadStats::default();

    for (i, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Error parsing concept row #{}: {}. Skipping.", i + 1, e);
                stats.skipped += 1;
                continue;
            }
        };

        let concept = record.get(concept_col).unwrap_or_default();
        let label = record.get(label_col).unwrap_or_default();
        if concept.is_empty() || label.is_empty() {
            warn!("Concept row #{} is missing {} or {}. Skipping.", i + 1, CONCEPT_FIELD, LABEL_FIELD);
            stats.skipped += 1;
            continue;
        }

        let names = names_col
            .and_then(|col| record.get(col))
            .unwrap_or_default();
        rows.push(ConceptRow::new(concept, label, names));
        stats.accepted += 1;
    }

    Ok((rows, stats))
}

fn column(headers: &csv::StringRecord, field: &str) -> Result<usize> {
    headers.iter()
        .position(|h| h.eq_ignore_ascii_case(field))
        .ok_or_else(|| Error::malformed(format!("Missing column '{}' in header {:?}", field, headers)))
}

/// A concept source over an already-dumped concept table: each concept uri
/// is its own subject.
#[derive(Debug, Clone, Default)]
pub struct TabularConceptSource {
    subjects: Vec<String>,
    rows: AHashMap<String, Vec<ConceptRow>>,
}

impl TabularConceptSource {
    pub fn new(rows: Vec<ConceptRow>) -> Self {
        let mut subjects = Vec::new();
        let mut grouped: AHashMap<String, Vec<ConceptRow>> = AHashMap::new();

        for row in rows {
            let group = grouped.entry(row.concept.clone()).or_insert_with(|| {
                subjects.push(row.concept.clone());
                Vec::new()
            });
            group.push(row);
        }

        Self { subjects, rows: grouped }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<(Self, LoadStats)> {
        let (rows, stats) = read_concepts(path)?;
        Ok((Self::new(rows), stats))
    }
}

impl ConceptSource for TabularConceptSource {
    fn fetch_subjects_under_category(&self) -> Result<Vec<String>> {
        Ok(self.subjects.clone())
    }

    fn fetch_person_records_for_subject(&self, subject: &str) -> Result<Vec<ConceptRow>> {
        self.rows.get(subject)
            .cloned()
            .ok_or_else(|| Error::source(format!("Unknown subject: {}", subject)))
    }
}
