
use crate::{
    config::{CollectionConfig, ConfigError, is_identifier},
    db::{
        codec::{CodecError, KEY_FIELD},
        executor::{Cursor, Document, Executor},
        query::{
            CollectionQuery, CompiledQuery, QueryError,
            var::{BindVars, COLLECTION_BIND_KEY},
        },
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    value::Value,
};
use std::marker::PhantomData;
use tracing::{debug, info};

///
/// Collection
///
/// One collection reachable through an executor, decoding rows into `E`.
/// Every [`Self::query`] starts an independent filter chain with its own
/// bind variables.
///

pub struct Collection<X, E> {
    executor: X,
    config: CollectionConfig,
    _marker: PhantomData<fn() -> E>,
}

impl<X, E> Collection<X, E>
where
    X: Executor,
{
    #[must_use]
    pub const fn new(executor: X, config: CollectionConfig) -> Self {
        Self {
            executor,
            config,
            _marker: PhantomData,
        }
    }

    /// Validate `config`, then bind it.
    pub fn open(executor: X, config: CollectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self::new(executor, config))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub const fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Start a new filter chain.
    #[must_use]
    pub fn query(&self) -> CollectionQuery<'_, X, E> {
        CollectionQuery::new(self)
    }

    /// Add one to a numeric field of a single document within an organization.
    pub fn increment(
        &self,
        id: &str,
        organization_id: impl Into<Value>,
        field: &str,
    ) -> Result<(), QueryError> {
        if !is_identifier(field) {
            return Err(InternalError::query_unsupported(format!(
                "increment field '{field}' is not a plain attribute name"
            ))
            .into());
        }

        let org_field = &self.config.organization_field;
        let text = format!(
            "FOR d IN @{COLLECTION_BIND_KEY}\n\
             FILTER d.{KEY_FIELD} == @key && d.{org_field} == @org_id\n\
             UPDATE d WITH {{ {field}: d.{field} + 1 }} IN @{COLLECTION_BIND_KEY}"
        );
        let bind_vars = BindVars::from([
            (COLLECTION_BIND_KEY.to_string(), Value::from(self.name())),
            ("key".to_string(), Value::from(id)),
            ("org_id".to_string(), organization_id.into()),
        ]);

        self.dispatch(&CompiledQuery { text, bind_vars })?;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    pub(crate) fn dispatch(&self, query: &CompiledQuery) -> Result<X::Cursor, QueryError> {
        info!(
            collection = %self.config.name,
            query = %query.text,
            bind_vars = ?query.bind_vars,
            "dispatching query"
        );

        self.executor
            .execute(&query.text, &query.bind_vars)
            .map_err(|err| InternalError::driver(err).into())
    }

    /// Run `query` and decode rows until the cursor is exhausted.
    /// The first failure aborts and nothing decoded so far is returned.
    pub(crate) fn fetch<T>(
        &self,
        query: &CompiledQuery,
        mut decode: impl FnMut(Document) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, QueryError> {
        let mut cursor = self.dispatch(query)?;
        let mut rows = Vec::new();

        while cursor.has_more() {
            rows.push(decode(self.read_row(&mut cursor)?)?);
        }

        Ok(rows)
    }

    /// Run `query` and decode exactly its first row.
    pub(crate) fn fetch_one<T>(
        &self,
        query: &CompiledQuery,
        decode: impl FnOnce(Document) -> Result<T, CodecError>,
    ) -> Result<T, QueryError> {
        let mut cursor = self.dispatch(query)?;
        if !cursor.has_more() {
            return Err(InternalError::new(
                ErrorClass::Internal,
                ErrorOrigin::Cursor,
                "query returned no rows",
            )
            .into());
        }

        Ok(decode(self.read_row(&mut cursor)?)?)
    }

    fn read_row(&self, cursor: &mut X::Cursor) -> Result<Document, QueryError> {
        let row = cursor.read_next().map_err(InternalError::cursor)?;
        if self.config.debug {
            debug!(collection = %self.config.name, row = %row, "read row");
        }

        Ok(row)
    }
}
