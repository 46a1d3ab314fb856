//! Query construction and dispatch against a document collection.

pub mod codec;
pub mod collection;
pub mod executor;
pub mod query;

pub use collection::Collection;
pub use executor::{Cursor, Document, Executor};
pub use query::{CompiledQuery, QueryError};
