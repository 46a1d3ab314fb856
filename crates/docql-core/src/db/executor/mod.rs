//! Driver boundary.
//!
//! The core never talks to a database directly. A driver implements
//! [`Executor`]; each dispatch hands back a [`Cursor`] that is pulled one row
//! at a time and released on drop.

use crate::{db::query::var::BindVars, error::DriverError};

///
/// Document
///
/// Generic record as returned by the driver.
///

pub type Document = serde_json::Value;

///
/// Cursor
///
/// Server-side result cursor. Dropping it releases the server resources.
///

pub trait Cursor {
    /// Whether another row can be read.
    fn has_more(&self) -> bool;

    /// Pull the next row.
    fn read_next(&mut self) -> Result<Document, DriverError>;
}

///
/// Executor
///

pub trait Executor {
    type Cursor: Cursor;

    /// Run one query with its bind variables. Blocking; deadlines belong to
    /// the implementation.
    fn execute(&self, query: &str, bind_vars: &BindVars) -> Result<Self::Cursor, DriverError>;
}

impl<X: Executor + ?Sized> Executor for &X {
    type Cursor = X::Cursor;

    fn execute(&self, query: &str, bind_vars: &BindVars) -> Result<Self::Cursor, DriverError> {
        (**self).execute(query, bind_vars)
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn has_more(&self) -> bool {
        (**self).has_more()
    }

    fn read_next(&mut self) -> Result<Document, DriverError> {
        (**self).read_next()
    }
}
