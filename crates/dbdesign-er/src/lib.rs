//! Translation between relational schema snapshots and ER models.
//!
//! [`relational_to_er_model`] infers entities and relationships from primary
//! and foreign keys; [`er_model_to_relational`] synthesizes tables back from
//! an edited model, folding 1:N relationships into foreign-key columns and
//! creating junction tables for everything else.

pub mod extract;
pub mod model;
pub mod synthesize;

pub use extract::{is_associative_table, relational_to_er_model};
pub use model::{SynthesisReport, UnresolvedEndpoint};
pub use synthesize::{er_model_to_relational, primary_attributes, synthesize_with_report};
