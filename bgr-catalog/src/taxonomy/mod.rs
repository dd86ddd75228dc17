//! Taxonomy mapping: source catalog vocabulary to the curated site taxonomy

pub mod mapper;
pub mod tables;

pub use mapper::{TaxonomyMapper, TaxonomyMapping};
pub use tables::{MappingError, MappingTables};
