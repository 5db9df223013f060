// Local, model-free text analysis: tokenization and keyword gap detection.

pub mod keywords;
pub mod tokenizer;

pub use keywords::missing_keywords;
pub use tokenizer::tokenize;
