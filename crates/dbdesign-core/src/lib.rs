//! Core contracts and helpers for dbdesign.
//!
//! This crate defines the relational schema snapshot, the ER model, the
//! identifier helpers shared by the generators, and snapshot validation.

pub mod er;
pub mod error;
pub mod ident;
pub mod schema;
pub mod validation;

pub use er::{Attribute, Cardinality, Endpoint, Entity, ErModel, Relationship};
pub use error::{Error, Result};
pub use ident::{ensure_unique, normalize_name, quote_identifier};
pub use schema::{Column, ForeignKey, RelationalSchema, Table};
pub use validation::validate_schema;
