pub mod analyzer;

pub use analyzer::{Analyzer, EMPTY_INPUT_MESSAGE};
