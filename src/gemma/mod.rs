pub mod translator;
pub use translator::*;

pub mod client;
pub use client::*;
