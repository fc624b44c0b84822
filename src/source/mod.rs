// Input tables and the knowledge-base query boundary

pub mod tabular;

use ahash::AHashMap;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::types::ConceptRow;

pub use self::tabular::{read_references, read_concepts, TabularConceptSource};

/// Rows kept and rows skipped while loading a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub accepted: usize,
    pub skipped: usize,
}

/// Anything that can enumerate concept rows the way a remote
/// knowledge-base query does: a list of subjects, then people per subject.
pub trait ConceptSource {
    fn fetch_subjects_under_category(&self) -> Result<Vec<String>>;

    fn fetch_person_records_for_subject(&self, subject: &str) -> Result<Vec<ConceptRow>>;
}

/// Pull every subject's rows from `source` and merge rows sharing a concept
/// uri, keeping the first non-empty value of each field.
///
/// Failures never propagate: a failed subject listing yields no rows and a
/// failed subject contributes none.
pub fn collect_concept_rows<S: ConceptSource + ?Sized>(source: &S) -> Vec<ConceptRow> {
    let subjects = match source.fetch_subjects_under_category() {
        Ok(subjects) => subjects,
        Err(e) => {
            warn!("Failed to list subjects: {}. Continuing with no concepts", e);
            return Vec::new();
        }
    };
    info!("Fetching people for {} subjects", subjects.len());

    let mut merged: Vec<ConceptRow> = Vec::new();
    let mut position: AHashMap<String, usize> = AHashMap::new();
    let mut failed = 0usize;

    for subject in &subjects {
        let rows = match source.fetch_person_records_for_subject(subject) {
            Ok(rows) => rows,
            Err(e) => {
                failed += 1;
                warn!("Failed to fetch people for subject {}: {}", subject, e);
                continue;
            }
        };

        for row in rows {
            match position.get(&row.concept) {
                Some(&i) => merge_row(&mut merged[i], row),
                None => {
                    position.insert(row.concept.clone(), merged.len());
                    merged.push(row);
                }
            }
        }
    }

    debug!("{} subjects failed", failed);
    info!("Collected {} distinct concepts from {} subjects", merged.len(), subjects.len());
    merged
}

fn merge_row(existing: &mut ConceptRow, row: ConceptRow) {
    if existing.label.is_empty() {
        existing.label = row.label;
    }
    if existing.names.is_empty() {
        existing.names = row.names;
    }
}
