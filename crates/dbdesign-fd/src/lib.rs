//! Functional-dependency analysis: text notation parser, attribute closure and
//! candidate-key enumeration.

pub mod closure;
pub mod combinations;
pub mod errors;
pub mod keys;
pub mod model;
pub mod parser;

pub use closure::closure;
pub use combinations::{Combinations, combinations};
pub use errors::DependencyParseError;
pub use keys::{
    CandidateKeySearch, MAX_OPTIONAL_ATTRIBUTES, PrimaryAttributeSuggestion, find_candidate_keys,
    infer_primary_attributes, search_candidate_keys,
};
pub use model::{FunctionalDependency, ParsedDependencySet};
pub use parser::parse_functional_dependencies;
