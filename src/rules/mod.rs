//! Rule catalog: the ordered, immutable list of patterns that map log text
//! to probable causes.
//!
//! The built-in catalog is always present and always scanned first. Extra
//! rules may be appended from a YAML file at startup; once a [`RuleCatalog`]
//! is built it is never mutated, and is shared read-only (behind an `Arc`)
//! by every analysis.

mod builtin;
mod catalog;

pub use builtin::builtin_definitions;
pub use catalog::{Rule, RuleCatalog, RuleDefinition, RuleSummary};
