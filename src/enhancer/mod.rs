pub mod doctor;
pub use doctor::*;

pub mod patient;
pub use patient::*;
