// Sub-name combinations used as blocking synonyms

use ahash::AHashSet;
use log::debug;

use super::LabelParser;

// Word subsets are enumerated with a u64 mask
const MAX_MASK_WORDS: usize = 63;
// At least one retained word must be longer than this
const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

pub struct NameExpander<'p, P: LabelParser> {
    parser: &'p P,
    max_words: usize,
}

impl<'p, P: LabelParser> NameExpander<'p, P> {
    pub fn new(parser: &'p P, max_words: usize) -> Self {
        Self {
            parser,
            max_words: max_words.min(MAX_MASK_WORDS),
        }
    }

    /// Every order-preserving subset of two or more words that is anchored on
    /// the name's first or last word and keeps at least one word longer than
    /// three characters, re-canonicalized. Names longer than `max_words`
    /// words expand to nothing.
    pub fn expand(&self, key: &str) -> AHashSet<String> {
        let words = self.parser.tokenize_words(key);
        let mut variants = AHashSet::new();

        let n = words.len();
        if n < 2 {
            return variants;
        }
        if n > self.max_words {
            debug!("Not expanding {:?}: {} words exceeds limit of {}", key, n, self.max_words);
            return variants;
        }

        let first = words[0];
        let last = words[n - 1];
        let mut subset: Vec<&str> = Vec::with_capacity(n);

        for mask in 1u64..(1u64 << n) {
            if mask.count_ones() < 2 {
                continue;
            }

            subset.clear();
            subset.extend((0..n).filter(|i| mask & (1u64 << i) != 0).map(|i| words[i]));

            if !subset.iter().any(|w| w.len() > MIN_SIGNIFICANT_WORD_LEN) {
                continue;
            }
            let anchored = subset.first() == Some(&first) || subset.last() == Some(&last);
            if !anchored {
                continue;
            }

            let variant = self.parser.canonicalize(&subset.join(" "));
            if !variant.is_empty() {
                variants.insert(variant);
            }
        }

        variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NameParser;

    fn sorted(set: AHashSet<String>) -> Vec<String> {
        let mut v: Vec<String> = set.into_iter().collect();
        v.sort();
        v
    }

    #[test]
    fn three_word_name_keeps_anchored_subsets() {
        let parser = NameParser::new_with_defaults();
        let expander = NameExpander::new(&parser, 6);
        let variants = sorted(expander.expand("jean pierre dupont"));
        assert_eq!(variants, vec![
            "jean dupont".to_string(),
            "jean pierre".to_string(),
            "jean pierre dupont".to_string(),
            "pierre dupont".to_string(),
        ]);
    }

    #[test]
    fn infix_fragments_are_rejected() {
        let parser = NameParser::new_with_defaults();
        let expander = NameExpander::new(&parser, 6);
        let variants = expander.expand("maria de la cruz");
        assert!(!variants.contains("de la"));
        assert!(variants.contains("maria cruz"));
        assert!(variants.contains("la cruz"));
        assert!(variants.contains("maria de"));
    }

    #[test]
    fn short_words_only_produce_nothing() {
        let parser = NameParser::new_with_defaults();
        let expander = NameExpander::new(&parser, 6);
        assert!(expander.expand("li na").is_empty());
        assert!(expander.expand("pele").is_empty());
        assert!(expander.expand("").is_empty());
    }

    #[test]
    fn long_names_are_capped() {
        let parser = NameParser::new_with_defaults();
        let expander = NameExpander::new(&parser, 3);
        assert!(expander.expand("anna maria luisa garcia").is_empty());
        assert_eq!(expander.expand("anna garcia").len(), 1);
    }
}
