pub mod intent;
pub use intent::*;

pub mod synonyms;
pub use synonyms::*;

pub mod tables;
pub use tables::*;

pub mod columns;
pub use columns::*;

pub mod conditions;
pub use conditions::*;

pub mod grouping;
pub use grouping::*;

pub mod sorting;
pub use sorting::*;

pub mod limits;
pub use limits::*;

pub mod joins;
pub use joins::*;

pub mod detector;
pub use detector::*;
