// Canonical keys for Latin-script person names

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use crate::config::subsystems::TextProcessingConfig;

use super::LabelParser;

lazy_static! {
    // Non-greedy up to the first closing parenthesis; nesting is not supported
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref NON_ASCII_ALPHA: Regex = Regex::new(r"[^a-zA-Z ]+").unwrap();
}

#[derive(Debug, Clone)]
pub struct NameParser {
    strip_accents: bool,
}

impl NameParser {
    pub fn new(settings: &TextProcessingConfig) -> Self {
        Self {
            strip_accents: settings.strip_accents,
        }
    }

    pub fn new_with_defaults() -> Self {
        Self::new(&TextProcessingConfig::default())
    }

    pub fn with_accent_folding(strip_accents: bool) -> Self {
        Self { strip_accents }
    }

    pub fn strips_accents(&self) -> bool {
        self.strip_accents
    }
}

/// NFD-decompose and drop combining marks: "Selänne" -> "Selanne".
pub fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

impl LabelParser for NameParser {
    fn canonicalize(&self, label: &str) -> String {
        let spaced = label.replace('-', " ");
        let unbracketed = PARENTHETICAL.replace_all(&spaced, "");
        let trimmed = unbracketed.trim();

        let folded = if self.strip_accents {
            fold_accents(trimmed)
        } else {
            trimmed.to_string()
        };

        let ascii = NON_ASCII_ALPHA.replace_all(&folded, "");
        // Removing characters can expose edge whitespace again
        ascii.trim().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> NameParser {
        NameParser::new_with_defaults()
    }

    #[test]
    fn hyphen_and_case_insensitive() {
        let p = parser();
        assert_eq!(p.canonicalize("Jean-Pierre"), p.canonicalize("jean pierre"));
        assert_eq!(p.canonicalize("Jean-Pierre"), "jean pierre");
    }

    #[test]
    fn parenthetical_segments_are_dropped() {
        let p = parser();
        assert_eq!(p.canonicalize("Lee (footballer)"), p.canonicalize("Lee"));
        assert_eq!(p.canonicalize("Lee (born 1980) Smith (athlete)"), "lee  smith");
    }

    #[test]
    fn unbalanced_parentheses_are_best_effort() {
        let p = parser();
        assert_eq!(p.canonicalize("Ann (swimmer"), "ann swimmer");
        assert_eq!(p.canonicalize("Ann (a (b) c)"), "ann  c");
    }

    #[test]
    fn punctuation_and_digits_are_removed() {
        let p = parser();
        assert_eq!(p.canonicalize("J. Dupont"), "j dupont");
        assert_eq!(p.canonicalize("  O'Neil 2nd "), "oneil nd");
        assert_eq!(p.canonicalize("..."), "");
    }

    #[test]
    fn accents_fold_when_enabled() {
        let folding = NameParser::with_accent_folding(true);
        let plain = NameParser::with_accent_folding(false);
        assert_eq!(folding.canonicalize("Teemu Selänne"), "teemu selanne");
        assert_eq!(folding.canonicalize("Teemu Selänne"), folding.canonicalize("Teemu Selanne"));
        assert_eq!(plain.canonicalize("Teemu Selänne"), "teemu selnne");
    }

    #[test]
    fn canonicalization_is_idempotent_on_samples() {
        let p = parser();
        for label in ["A .", " Émile  Zola (writer) ", "x-(y)-z", "北京 Li", "(only)"] {
            let once = p.canonicalize(label);
            assert_eq!(p.canonicalize(&once), once, "label {:?}", label);
        }
    }

    #[test]
    fn words_split_on_whitespace() {
        let p = parser();
        assert_eq!(p.tokenize_words("lee  smith"), vec!["lee", "smith"]);
        assert!(p.tokenize_words("").is_empty());
    }
}
