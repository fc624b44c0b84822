// src/ngram/tokenizer.rs

use log::trace;

// Characters dropped before windowing
const STRIPPED_CHARS: [char; 4] = [',', '-', '.', '/'];

pub const DEFAULT_NGRAM_SIZE: usize = 2;

/// Overlapping character windows of length `n`, left to right.
///
/// `"abcd"` with `n = 2` yields `"ab"`, `"bc"`, `"cd"`. Text shorter than `n`
/// (after stripping `,-./`) yields nothing, as does `n = 0`.
pub fn tokenize_ngrams(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    if n == 0 || chars.len() < n {
        trace!("Text too short for ngram size {} (length: {})", n, chars.len());
        return Vec::new();
    }

    chars.windows(n)
        .map(|window| window.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_overlapping_and_ordered() {
        assert_eq!(tokenize_ngrams("abcd", 2), vec!["ab", "bc", "cd"]);
        assert_eq!(tokenize_ngrams("abcd", 3), vec!["abc", "bcd"]);
        assert_eq!(tokenize_ngrams("ab", 2), vec!["ab"]);
    }

    #[test]
    fn punctuation_is_stripped_before_windowing() {
        assert_eq!(tokenize_ngrams("a.b-c", 2), vec!["ab", "bc"]);
        assert_eq!(tokenize_ngrams("j, d/e", 2), vec!["j ", " d", "de"]);
    }

    #[test]
    fn short_text_yields_nothing() {
        assert!(tokenize_ngrams("a", 2).is_empty());
        assert!(tokenize_ngrams("", 2).is_empty());
        assert!(tokenize_ngrams("-.", 1).is_empty());
        assert!(tokenize_ngrams("abc", 0).is_empty());
    }

    #[test]
    fn multibyte_characters_are_single_units() {
        assert_eq!(tokenize_ngrams("säl", 2), vec!["sä", "äl"]);
    }
}
