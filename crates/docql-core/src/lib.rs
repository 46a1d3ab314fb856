//! Core runtime for docql: values, bind-variable interning, the filter
//! expression tree, query chains, and the executor seam drivers implement.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only query vocabulary.
/// No drivers, codecs, or errors are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::CollectionConfig,
        db::{
            collection::Collection,
            executor::{Cursor, Document, Executor},
            query::{CollectionQuery, Expr, ListQuery, Ops},
        },
        value::Value,
    };
}
