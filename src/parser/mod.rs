pub mod latin;
pub mod expander;

pub trait LabelParser: Sync + Send {
    /// Turn a raw label into its canonical key. Total and idempotent.
    fn canonicalize(&self, label: &str) -> String;

    /// Split a canonical key into its words
    fn tokenize_words<'a>(&self, key: &'a str) -> Vec<&'a str> {
        key.split_whitespace().collect()
    }
}

pub use self::latin::NameParser;
pub use self::expander::NameExpander;
