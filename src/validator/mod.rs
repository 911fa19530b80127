pub mod repair;
pub use repair::*;
