pub mod clauses;
pub use clauses::*;
