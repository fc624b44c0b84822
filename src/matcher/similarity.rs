use ahash::AHashMap;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::ngram::{NGramVector, DEFAULT_NGRAM_SIZE};
use super::sparse::SparseMatrix;

// Slack on the pruning bound so rounding never drops a qualifying pair
const PRUNE_EPSILON: f64 = 1e-9;

/// One entry of the sparse top-N relation: `right` is among the best
/// neighbours of `left`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub left: usize,
    pub right: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy)]
struct Ranked {
    similarity: f64,
    // Position at which the candidate was first reached
    order: usize,
    column: usize,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    // Greater is better: higher similarity, then earlier encounter
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity.total_cmp(&other.similarity)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Bounded best-of-N accumulator. The heap top is the weakest kept entry.
struct TopN {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopN {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    fn push(&mut self, candidate: Ranked) {
        if self.capacity == 0 {
            return;
        }
        self.heap.push(Reverse(candidate));
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Best first
    fn into_sorted(self) -> Vec<Ranked> {
        let mut ranked: Vec<Ranked> = self.heap.into_iter().map(|Reverse(r)| r).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked
    }
}

/// Per-worker accumulation buffers, reused across rows.
struct RowScratch {
    sums: Vec<f64>,
    seen: Vec<bool>,
    touched: Vec<usize>,
}

impl RowScratch {
    fn new(n: usize) -> Self {
        Self {
            sums: vec![0.0; n],
            seen: vec![false; n],
            touched: Vec::new(),
        }
    }

    fn reset(&mut self) {
        for &j in &self.touched {
            self.sums[j] = 0.0;
            self.seen[j] = false;
        }
        self.touched.clear();
    }
}

/// Sparse top-N cosine similarity over character n-gram vectors.
///
/// Every string becomes an L2-normalised row of raw n-gram counts. A row's
/// neighbours are found by walking the postings of its own n-grams, so only
/// strings sharing at least one n-gram are ever scored. Terms are visited in
/// descending weight; once the norm of the unvisited part of the row drops
/// below the floor no new candidate can reach it and admission stops.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    ngram_size: usize,
    parallel: bool,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(DEFAULT_NGRAM_SIZE)
    }
}

impl SimilarityEngine {
    pub fn new(ngram_size: usize) -> Self {
        Self {
            ngram_size,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    /// For every string, at most `max_per_item` other strings with cosine
    /// similarity of at least `min_similarity`, best first.
    ///
    /// Pairs are grouped by `left` in input order. Identity pairs are never
    /// returned, so a single string (or none) yields an empty relation.
    pub fn top_similar<S>(&self, strings: &[S], max_per_item: usize, min_similarity: f64) -> Vec<SimilarityPair>
    where
        S: AsRef<str> + Sync,
    {
        if strings.len() < 2 || max_per_item == 0 {
            return Vec::new();
        }

        let start = Instant::now();
        let rows = self.build_rows(strings);
        let postings = rows.transpose();
        debug!(
            "Vector space: {} strings, {} n-grams, {} non-zeros",
            rows.n_rows(), rows.n_cols(), rows.nnz()
        );

        let n = rows.n_rows();
        let per_row: Vec<Vec<SimilarityPair>> = if self.parallel {
            (0..n).into_par_iter()
                .map_init(
                    || RowScratch::new(n),
                    |scratch, i| top_for_row(&rows, &postings, i, max_per_item, min_similarity, scratch),
                )
                .collect()
        } else {
            let mut scratch = RowScratch::new(n);
            (0..n)
                .map(|i| top_for_row(&rows, &postings, i, max_per_item, min_similarity, &mut scratch))
                .collect()
        };

        let pairs: Vec<SimilarityPair> = per_row.into_iter().flatten().collect();
        debug!(
            "Found {} pairs at >= {:.2} in {:.2?}",
            pairs.len(), min_similarity, start.elapsed()
        );
        pairs
    }

    // Rows hold normalised weights sorted heaviest first
    fn build_rows<S: AsRef<str>>(&self, strings: &[S]) -> SparseMatrix {
        let mut vocabulary: AHashMap<String, u32> = AHashMap::new();
        let mut rows = Vec::with_capacity(strings.len());

        for text in strings {
            let vector = NGramVector::from_text(text.as_ref(), self.ngram_size);
            let norm = vector.norm();
            if norm == 0.0 {
                trace!("Zero vector for {:?}", text.as_ref());
                rows.push(Vec::new());
                continue;
            }

            // Ids follow first encounter in sorted per-row order
            let mut grams: Vec<(&str, u32)> = vector.iter().collect();
            grams.sort_unstable_by(|a, b| a.0.cmp(b.0));

            let mut row: Vec<(u32, f64)> = grams.into_iter()
                .map(|(gram, count)| {
                    let next_id = vocabulary.len() as u32;
                    let id = *vocabulary.entry(gram.to_string()).or_insert(next_id);
                    (id, count as f64 / norm)
                })
                .collect();
            row.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            rows.push(row);
        }

        SparseMatrix::from_rows(rows, vocabulary.len())
    }
}

fn top_for_row(
    rows: &SparseMatrix,
    postings: &SparseMatrix,
    i: usize,
    max_per_item: usize,
    min_similarity: f64,
    scratch: &mut RowScratch,
) -> Vec<SimilarityPair> {
    let (terms, weights) = rows.row(i);
    let mut remaining_sq: f64 = weights.iter().map(|w| w * w).sum();

    for (&term, &weight) in terms.iter().zip(weights) {
        let admit = remaining_sq.max(0.0).sqrt() + PRUNE_EPSILON >= min_similarity;
        let (docs, values) = postings.row(term as usize);

        for (&doc, &value) in docs.iter().zip(values) {
            let j = doc as usize;
            if j == i {
                continue;
            }
            if scratch.seen[j] {
                scratch.sums[j] += weight * value;
            } else if admit {
                scratch.seen[j] = true;
                scratch.sums[j] = weight * value;
                scratch.touched.push(j);
            }
        }

        remaining_sq -= weight * weight;
    }

    let mut best = TopN::new(max_per_item);
    for (order, &j) in scratch.touched.iter().enumerate() {
        let similarity = scratch.sums[j].min(1.0);
        if similarity >= min_similarity {
            best.push(Ranked { similarity, order, column: j });
        }
    }
    scratch.reset();

    best.into_sorted()
        .into_iter()
        .map(|r| SimilarityPair {
            left: i,
            right: r.column,
            similarity: r.similarity,
        })
        .collect()
}
