use ahash::AHashMap;

use super::tokenizer::tokenize_ngrams;

/// Sparse term-frequency vector of a string's character n-grams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NGramVector {
    counts: AHashMap<String, u32>,
}

impl NGramVector {
    pub fn from_text(text: &str, ngram_size: usize) -> Self {
        let mut counts = AHashMap::new();
        for gram in tokenize_ngrams(text, ngram_size) {
            *counts.entry(gram).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct n-grams
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, gram: &str) -> u32 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(g, c)| (g.as_str(), *c))
    }

    pub fn norm(&self) -> f64 {
        self.counts.values()
            .map(|c| (*c as f64) * (*c as f64))
            .sum::<f64>()
            .sqrt()
    }
}

/// Cosine of two n-gram vectors; 0.0 when either is the zero vector.
pub fn cosine_similarity(a: &NGramVector, b: &NGramVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small.iter()
        .map(|(gram, count)| count as f64 * large.count(gram) as f64)
        .sum();

    let norm = a.norm() * b.norm();
    if norm == 0.0 {
        0.0
    } else {
        (dot / norm).min(1.0)
    }
}
