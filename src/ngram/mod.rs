pub mod tokenizer;
pub mod types;

pub use self::tokenizer::{tokenize_ngrams, DEFAULT_NGRAM_SIZE};
pub use self::types::{NGramVector, cosine_similarity};
