//! Query builder modules.
//!
//! A [`CollectionQuery`] accumulates `FILTER` clauses and owns the bind
//! variable interner for one query. [`ListQuery`] adds ordering and row
//! selection. Terminals render everything into a [`CompiledQuery`] and
//! dispatch it through the collection's executor.

pub mod chain;
pub mod expr;
pub mod list;
pub mod ops;
pub mod var;

use crate::{db::codec::CodecError, error::InternalError};
use expr::DOCUMENT_ALIAS;
use thiserror::Error as ThisError;
use var::{BindVars, COLLECTION_BIND_KEY};

pub use chain::CollectionQuery;
pub use expr::{CompareOp, EmptyCheck, Expr};
pub use list::{ListQuery, Order, OrderBy, OrderDirection, Paging};
pub use ops::{Operand, Ops};
pub use var::{Var, VarInterner};

///
/// QueryError
///
/// Failure of a terminal operation. Builder calls never fail.
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("{0}")]
    Execute(#[from] InternalError),

    #[error("{0}")]
    Decode(#[from] CodecError),
}

///
/// CompiledQuery
///
/// Query text plus the bind table it references, ready for dispatch.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
    pub text: String,
    pub bind_vars: BindVars,
}

///
/// Template
///
/// The statement wrapped around the accumulated `FILTER` clauses.
///

#[derive(Clone, Debug)]
pub(crate) enum Template<'a> {
    Read {
        order: Option<String>,
        limit: Option<String>,
    },
    Count,
    Remove,
    Update {
        patch: &'a str,
    },
}

impl Template<'_> {
    pub(crate) fn render(&self, filters: &str) -> String {
        let alias = DOCUMENT_ALIAS;
        let collection = format!("@{COLLECTION_BIND_KEY}");
        let mut text = format!("FOR {alias} IN {collection}\n{filters}");

        let tail = match self {
            Self::Read { order, limit } => {
                for line in [order, limit].into_iter().flatten() {
                    text.push_str(line);
                    text.push('\n');
                }
                format!("RETURN {alias}")
            }
            Self::Count => "COLLECT WITH COUNT INTO length\nRETURN length".to_string(),
            Self::Remove => {
                format!("REMOVE {alias} IN {collection}\nLET removed = OLD\nRETURN removed._key")
            }
            Self::Update { patch } => {
                format!("UPDATE {alias} WITH {patch} IN {collection}\nRETURN {alias}._key")
            }
        };
        text.push_str(&tail);

        text
    }
}
