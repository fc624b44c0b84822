// Flattening the match relation into report rows

use chrono::Local;
use log::info;
use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::catalog::{ConceptCatalog, ReferenceCatalog};
use crate::config::LinkerConfig;
use crate::error::Result;
use crate::matcher::{MatchRelation, MatchStats};

/// One line of the match report.
///
/// Unmatched references leave `uri`, `uri_id` and `similarity` empty and
/// carry zero for both counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ref")]
    pub reference: String,
    pub uri: String,
    pub ref_id: String,
    pub uri_id: String,
    pub similarity: Option<f64>,
    pub matching_concepts_count: usize,
    pub matching_refs_count: usize,
}

impl ReportRow {
    pub fn is_match(&self) -> bool {
        !self.uri.is_empty()
    }
}

pub struct ReportEmitter<'a> {
    references: &'a ReferenceCatalog,
    concepts: &'a ConceptCatalog,
}

impl<'a> ReportEmitter<'a> {
    pub fn new(references: &'a ReferenceCatalog, concepts: &'a ConceptCatalog) -> Self {
        Self { references, concepts }
    }

    /// Rows ordered by reference key, display label, uri and concept key.
    ///
    /// A matched label yields one row per edge and per distinct concept key
    /// under the edge's uri; an unmatched label yields exactly one row.
    pub fn emit(&self, relation: &MatchRelation) -> Vec<ReportRow> {
        let mut rows = Vec::new();

        for key in self.references.sorted_keys() {
            let records = match self.references.get(key) {
                Some(records) => records,
                None => continue,
            };
            let edges = relation.sorted_reference_edges(key);

            for record in records {
                if edges.is_empty() {
                    rows.push(ReportRow {
                        reference: record.display_label.clone(),
                        uri: String::new(),
                        ref_id: key.to_string(),
                        uri_id: String::new(),
                        similarity: None,
                        matching_concepts_count: 0,
                        matching_refs_count: 0,
                    });
                    continue;
                }

                for edge in &edges {
                    let uri = edge.other_key.as_str();
                    let concept_ids: BTreeSet<&str> = self.concepts.records_for_uri(uri)
                        .map(|set| set.iter().map(|c| c.identifier.as_str()).collect())
                        .unwrap_or_default();

                    for uri_id in concept_ids {
                        rows.push(ReportRow {
                            reference: record.display_label.clone(),
                            uri: uri.to_string(),
                            ref_id: key.to_string(),
                            uri_id: uri_id.to_string(),
                            similarity: Some(edge.similarity),
                            matching_concepts_count: edges.len(),
                            matching_refs_count: relation.concept_edge_count(uri),
                        });
                    }
                }
            }
        }

        rows
    }
}

/// Tab-delimited report with a header line.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(writer);

    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_file<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_report(BufWriter::new(file), rows)?;
    info!("Wrote {} report rows to {}", rows.len(), path.display());
    Ok(())
}

/// Machine-readable record of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub reference_file: String,
    pub concept_file: String,
    pub strip_accents: bool,
    pub thresholds: Vec<f64>,
    pub rows_written: usize,
    pub stats: MatchStats,
}

impl RunSummary {
    pub fn new(config: &LinkerConfig, stats: &MatchStats, rows_written: usize) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            reference_file: config.files.reference_file.display().to_string(),
            concept_file: config.files.concept_file.display().to_string(),
            strip_accents: config.text_processing.strip_accents,
            thresholds: config.matcher.thresholds.clone(),
            rows_written,
            stats: stats.clone(),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Wrote run summary to {}", path.display());
        Ok(())
    }
}
