pub mod column;
pub use column::*;

pub mod table;
pub use table::*;

pub mod schema_model;
pub use schema_model::*;

#[cfg(test)]
pub mod fixtures;
