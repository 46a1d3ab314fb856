
use crate::db::{
    codec,
    executor::Executor,
    query::{
        CompiledQuery, QueryError, Template, chain::CollectionQuery, expr::DOCUMENT_ALIAS,
        var::Var,
    },
};
use derive_more::Display;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::warn;

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum OrderDirection {
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

///
/// Order
///
/// Renders the `SORT` line. Random order is evaluated by the database and
/// differs per execution.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Order {
    Field {
        field: String,
        direction: OrderDirection,
    },
    Random,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { field, direction } => {
                write!(f, "SORT {DOCUMENT_ALIAS}.{field} {direction} ")
            }
            Self::Random => f.write_str("SORT RAND()"),
        }
    }
}

///
/// Paging
///
/// Offset/count window. The offset is always `page * page_size`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paging {
    pub offset: Var,
    pub count: Var,
}

impl fmt::Display for Paging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIMIT {}, {}", self.offset, self.count)
    }
}

///
/// ListQuery
///
/// Result shaper over a filter chain.
///
/// Ordering is last-write-wins and replacing one is logged. When both a
/// paging window and a limit are set, the paging window is rendered
/// regardless of call order.
///

pub struct ListQuery<'a, X, E> {
    query: CollectionQuery<'a, X, E>,
    limit: Option<Var>,
    order: Option<Order>,
    paging: Option<Paging>,
}

impl<'a, X, E> ListQuery<'a, X, E>
where
    X: Executor,
{
    pub(crate) const fn new(query: CollectionQuery<'a, X, E>) -> Self {
        Self {
            query,
            limit: None,
            order: None,
            paging: None,
        }
    }

    #[must_use]
    pub const fn query(&self) -> &CollectionQuery<'a, X, E> {
        &self.query
    }

    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    #[must_use]
    pub const fn paging_window(&self) -> Option<&Paging> {
        self.paging.as_ref()
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Order by a document field; commit the direction with
    /// [`OrderBy::asc`] or [`OrderBy::desc`].
    #[must_use]
    pub fn order_by(self, field: impl Into<String>) -> OrderBy<'a, X, E> {
        let field = field.into();
        if self.order.is_some() {
            warn!(field = %field, "order_by: dropping previous ordering");
        }

        OrderBy { list: self, field }
    }

    #[must_use]
    pub fn random_order(mut self) -> Self {
        if let Some(previous) = self.order.replace(Order::Random) {
            warn!(previous = ?previous, "random_order: dropping previous ordering");
        }
        self
    }

    // ------------------------------------------------------------------
    // Row selection
    // ------------------------------------------------------------------

    /// Return at most `count` rows.
    #[must_use]
    pub fn limit(mut self, count: u32) -> Self {
        self.limit = Some(self.query.intern(count));
        self
    }

    /// Return page `page` (zero-based) of `page_size` rows.
    ///
    /// Skipped without error unless `page_size > 0` and `page >= 0`.
    #[must_use]
    pub fn paging(mut self, page_size: i64, page: i64) -> Self {
        if page_size > 0 && page > -1 {
            let offset = self.query.intern(page.saturating_mul(page_size));
            let count = self.query.intern(page_size);
            self.paging = Some(Paging { offset, count });
        }
        self
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn limit_line(&self) -> Option<String> {
        match (&self.paging, &self.limit) {
            (Some(paging), _) => Some(paging.to_string()),
            (None, Some(limit)) => Some(format!("LIMIT {limit}")),
            (None, None) => None,
        }
    }

    /// Render the read query without executing it.
    #[must_use]
    pub fn compile(&self) -> CompiledQuery {
        self.query.compile(&Template::Read {
            order: self.order.as_ref().map(ToString::to_string),
            limit: self.limit_line(),
        })
    }

    // ------------------------------------------------------------------
    // Terminals
    // ------------------------------------------------------------------

    /// Execute and decode every row. The first decode failure aborts.
    pub fn all(&self) -> Result<Vec<E>, QueryError>
    where
        E: DeserializeOwned,
    {
        self.query
            .collection()
            .fetch(&self.compile(), codec::decode_record)
    }

    /// `limit(1)` then [`Self::all`]; `None` when nothing matched.
    pub fn first(self) -> Result<Option<E>, QueryError>
    where
        E: DeserializeOwned,
    {
        Ok(self.limit(1).all()?.into_iter().next())
    }
}

///
/// OrderBy
///
/// Pending field ordering; the direction commits it.
///

pub struct OrderBy<'a, X, E> {
    list: ListQuery<'a, X, E>,
    field: String,
}

impl<'a, X, E> OrderBy<'a, X, E>
where
    X: Executor,
{
    #[must_use]
    pub fn asc(self) -> ListQuery<'a, X, E> {
        self.commit(OrderDirection::Asc)
    }

    #[must_use]
    pub fn desc(self) -> ListQuery<'a, X, E> {
        self.commit(OrderDirection::Desc)
    }

    fn commit(self, direction: OrderDirection) -> ListQuery<'a, X, E> {
        let mut list = self.list;
        list.order = Some(Order::Field {
            field: self.field,
            direction,
        });

        list
    }
}
