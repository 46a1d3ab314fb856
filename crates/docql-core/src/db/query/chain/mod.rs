
use crate::{
    config::is_identifier,
    db::{
        codec::{self, KEY_FIELD},
        collection::Collection,
        executor::Executor,
        query::{
            CompiledQuery, QueryError, Template,
            expr::{CompareOp, Expr},
            list::ListQuery,
            ops::{Ops, SharedVars},
            var::{BindVars, COLLECTION_BIND_KEY, Var},
        },
    },
    error::InternalError,
    value::Value,
};
use serde::de::DeserializeOwned;
use std::rc::Rc;

///
/// CollectionQuery
///
/// Filter chain scoped to one collection.
///
/// Each appended filter becomes its own `FILTER` line, in append order;
/// the lines are implicitly AND-ed by the database. The chain owns the bind
/// variable interner for this query, shared with every [`Ops`] handle it
/// gives out. Not meant to be shared across threads.
///

pub struct CollectionQuery<'a, X, E> {
    collection: &'a Collection<X, E>,
    filters: Vec<Expr>,
    vars: SharedVars,
}

impl<'a, X, E> CollectionQuery<'a, X, E>
where
    X: Executor,
{
    pub(crate) fn new(collection: &'a Collection<X, E>) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            vars: SharedVars::default(),
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Operator factory bound to this chain's bind variables.
    #[must_use]
    pub fn ops(&self) -> Ops {
        Ops::new(Rc::clone(&self.vars))
    }

    #[must_use]
    pub const fn collection(&self) -> &'a Collection<X, E> {
        self.collection
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Append one expression as its own clause.
    #[must_use]
    pub fn filter_expr(mut self, expr: Expr) -> Self {
        self.filters.push(expr);
        self
    }

    /// `doc.<key> == value`
    #[must_use]
    pub fn filter(self, key: &str, value: impl Into<Value>) -> Self {
        self.filter_eq(key, value)
    }

    /// Restrict to one organization through the configured scope field.
    #[must_use]
    pub fn within_org(self, organization_id: impl Into<Value>) -> Self {
        let field = self.collection.config().organization_field.clone();

        self.filter_eq(&field, organization_id)
    }

    #[must_use]
    pub fn by_id(self, id: impl Into<Value>) -> Self {
        self.filter_eq(KEY_FIELD, id)
    }

    /// `value IN doc.<array>`
    #[must_use]
    pub fn in_array(self, value: impl Into<Value>, array: &str) -> Self {
        let value = Expr::Var(self.intern(value));

        self.filter_expr(Expr::in_array(value, Expr::attr(array)))
    }

    /// `value IN doc.<array>[*].<key>`
    #[must_use]
    pub fn in_array_of_documents(self, value: impl Into<Value>, array: &str, key: &str) -> Self {
        self.in_array(value, &Expr::document_array_path(array, key))
    }

    fn filter_eq(self, key: &str, value: impl Into<Value>) -> Self {
        let right = Expr::Var(self.intern(value));

        self.filter_expr(Expr::compare(Expr::attr(key), CompareOp::Eq, right))
    }

    pub(crate) fn intern(&self, value: impl Into<Value>) -> Var {
        self.vars.borrow_mut().intern(value)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub(crate) fn render_filters(&self) -> String {
        self.filters
            .iter()
            .map(|expr| format!("FILTER {expr}\n"))
            .collect()
    }

    /// Interned variables plus the collection binding.
    #[must_use]
    pub fn bind_vars(&self) -> BindVars {
        let mut bind_vars = self.vars.borrow().symbol_table();
        bind_vars.insert(
            COLLECTION_BIND_KEY.to_string(),
            Value::from(self.collection.name()),
        );

        bind_vars
    }

    pub(crate) fn compile(&self, template: &Template<'_>) -> CompiledQuery {
        CompiledQuery {
            text: template.render(&self.render_filters()),
            bind_vars: self.bind_vars(),
        }
    }

    #[must_use]
    pub fn count_query(&self) -> CompiledQuery {
        self.compile(&Template::Count)
    }

    #[must_use]
    pub fn delete_query(&self) -> CompiledQuery {
        self.compile(&Template::Remove)
    }

    /// Render an update of every matching document. Patch values are
    /// interned; entries keep the caller's order. Every key must be a plain
    /// attribute name, checked before anything is interned.
    pub fn update_query<I, K, V>(&self, updates: I) -> Result<CompiledQuery, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let updates: Vec<(K, V)> = updates.into_iter().collect();
        if let Some((key, _)) = updates.iter().find(|(key, _)| !is_identifier(key.as_ref())) {
            return Err(InternalError::query_unsupported(format!(
                "update key '{}' is not a plain attribute name",
                key.as_ref()
            ))
            .into());
        }

        let entries: Vec<String> = updates
            .into_iter()
            .map(|(key, value)| format!("{}: {}", key.as_ref(), self.intern(value)))
            .collect();
        let patch = format!("{{{}}}", entries.join(", "));

        Ok(self.compile(&Template::Update { patch: &patch }))
    }

    // ------------------------------------------------------------------
    // Terminals
    // ------------------------------------------------------------------

    /// Shape the result set: ordering, limit, paging.
    #[must_use]
    pub fn list(self) -> ListQuery<'a, X, E> {
        ListQuery::new(self)
    }

    /// First matching record, if any.
    pub fn first(self) -> Result<Option<E>, QueryError>
    where
        E: DeserializeOwned,
    {
        self.list().first()
    }

    /// Number of matching documents.
    pub fn count(&self) -> Result<u64, QueryError> {
        self.collection
            .fetch_one(&self.count_query(), codec::decode_scalar)
    }

    /// Remove every matching document; returns the removed keys.
    pub fn delete_all(&self) -> Result<Vec<String>, QueryError> {
        self.collection
            .fetch(&self.delete_query(), codec::decode_scalar)
    }

    /// Patch every matching document; returns the modified keys.
    pub fn update_all<I, K, V>(&self, updates: I) -> Result<Vec<String>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let query = self.update_query(updates)?;

        self.collection.fetch(&query, codec::decode_scalar)
    }
}
