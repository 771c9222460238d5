pub mod analysis;
pub mod severity;

pub use analysis::*;
pub use severity::*;
