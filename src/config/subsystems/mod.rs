pub mod text_processing;
pub mod matcher;
pub mod processor;

pub use text_processing::TextProcessingConfig;
pub use matcher::MatcherConfig;
pub use processor::ProcessorConfig;
