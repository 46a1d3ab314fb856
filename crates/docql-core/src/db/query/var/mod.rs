
use crate::value::Value;
use derive_more::Display;
use std::collections::{BTreeMap, HashMap};

///
/// CONSTANTS
///

/// Prefix of every generated bind-variable name.
pub const VAR_PREFIX: &str = "var";

/// Bind-variable key reserved for the collection being queried.
pub const COLLECTION_BIND_KEY: &str = "@collection";

///
/// BindVars
///
/// Placeholder name → value table handed to the driver with the query text.
///

pub type BindVars = BTreeMap<String, Value>;

///
/// Var
///
/// A named placeholder. Renders as `@<name>` inside query text.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("@{name}")]
pub struct Var {
    name: String,
}

impl Var {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

///
/// VarInterner
///
/// Maps values to stable placeholder names for one query.
/// Values sharing a canonical key share a variable; names are handed out
/// sequentially and never reused. Append-only.
///

#[derive(Debug, Default)]
pub struct VarInterner {
    next: usize,
    by_key: HashMap<String, Var>,
    symbols: Vec<(Var, Value)>,
}

impl VarInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the variable bound to `value`, allocating one on first sight.
    pub fn intern(&mut self, value: impl Into<Value>) -> Var {
        let value = value.into();
        let key = value.canonical_key();

        if let Some(var) = self.by_key.get(&key) {
            return var.clone();
        }

        let var = Var {
            name: format!("{VAR_PREFIX}_{}", self.next),
        };
        self.next += 1;
        self.by_key.insert(key, var.clone());
        self.symbols.push((var.clone(), value));

        var
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Snapshot of the bindings keyed by bare variable name.
    #[must_use]
    pub fn symbol_table(&self) -> BindVars {
        self.symbols
            .iter()
            .map(|(var, value)| (var.name.clone(), value.clone()))
            .collect()
    }
}
