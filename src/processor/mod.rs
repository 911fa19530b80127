pub mod explanation;
pub use explanation::*;

pub mod nlp_processor;
pub use nlp_processor::*;
