pub mod engine;
pub mod outcome;

pub use engine::{check_record, classify};
pub use outcome::{Advisory, ClassificationResult, Judgment};
