//! Catalog data model, assembly, and snapshot publication

mod assembler;
mod store;
mod types;

pub use assembler::{assemble, AssemblyStats, CategoryResult};
pub use store::CatalogStore;
pub use types::{Catalog, Category, ProductRecord};
