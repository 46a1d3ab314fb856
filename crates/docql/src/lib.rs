//! ## Crate layout
//! - `core`: values, bind-variable interning, expression tree, query chains,
//!   the record codec, and the executor seam.
//!
//! The `prelude` module carries everything needed to describe and run a
//! query against a driver that implements [`crate::core::db::Executor`].

pub use docql_core as core;

/// re-exports
///
/// drivers hand documents around as `serde_json` values; this saves them
/// pinning a matching version in their own Cargo.toml
pub mod __reexports {
    pub use serde;
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::CollectionConfig,
        db::{
            codec::{decode_record, encode_record},
            collection::Collection,
            executor::{Cursor, Document, Executor},
            query::{CollectionQuery, CompiledQuery, Expr, ListQuery, Ops, QueryError},
        },
        error::DriverError,
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}
