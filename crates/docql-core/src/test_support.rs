//! Recording executor and canned-row cursor for unit tests.

use crate::{
    config::CollectionConfig,
    db::{
        collection::Collection,
        executor::{Cursor, Document, Executor},
        query::var::BindVars,
    },
    error::DriverError,
};
use serde::Deserialize;
use serde_json::json;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::Rc,
    sync::{Arc, Mutex},
};
use tracing::{
    Event, Level, Metadata, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};

///
/// MockExecutor
///

#[derive(Default)]
pub(crate) struct MockExecutor {
    rows: Vec<Document>,
    fail_execute: Option<String>,
    fail_read_at: Option<usize>,
    last_query: RefCell<Option<String>>,
    last_bind_vars: RefCell<Option<BindVars>>,
    calls: Cell<usize>,
    released: Rc<Cell<usize>>,
    rows_read: Rc<Cell<usize>>,
}

impl MockExecutor {
    pub(crate) fn with_rows(rows: Vec<Document>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_execute: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn fail_read_at(mut self, index: usize) -> Self {
        self.fail_read_at = Some(index);
        self
    }

    /// Last dispatched query text with whitespace runs collapsed.
    pub(crate) fn last_query(&self) -> String {
        squash_ws(self.last_query.borrow().as_deref().unwrap_or_default())
    }

    pub(crate) fn last_bind_vars(&self) -> serde_json::Value {
        serde_json::to_value(self.last_bind_vars.borrow().clone().unwrap_or_default())
            .expect("bind vars serialize")
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn released(&self) -> usize {
        self.released.get()
    }

    pub(crate) fn rows_read(&self) -> usize {
        self.rows_read.get()
    }
}

impl Executor for MockExecutor {
    type Cursor = MockCursor;

    fn execute(&self, query: &str, bind_vars: &BindVars) -> Result<Self::Cursor, DriverError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_query.borrow_mut() = Some(query.to_string());
        *self.last_bind_vars.borrow_mut() = Some(bind_vars.clone());

        if let Some(message) = &self.fail_execute {
            return Err(message.clone().into());
        }

        Ok(MockCursor {
            rows: self.rows.iter().cloned().collect(),
            index: 0,
            fail_read_at: self.fail_read_at,
            released: Rc::clone(&self.released),
            rows_read: Rc::clone(&self.rows_read),
        })
    }
}

///
/// MockCursor
///

pub(crate) struct MockCursor {
    rows: VecDeque<Document>,
    index: usize,
    fail_read_at: Option<usize>,
    released: Rc<Cell<usize>>,
    rows_read: Rc<Cell<usize>>,
}

impl Cursor for MockCursor {
    fn has_more(&self) -> bool {
        !self.rows.is_empty()
    }

    fn read_next(&mut self) -> Result<Document, DriverError> {
        if self.fail_read_at == Some(self.index) {
            return Err("cursor read failed".into());
        }

        let row = self.rows.pop_front().ok_or("no more documents")?;
        self.index += 1;
        self.rows_read.set(self.rows_read.get() + 1);

        Ok(row)
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

///
/// EventLog
///
/// Subscriber that keeps the level and message of every event.
///

#[derive(Clone, Default)]
pub(crate) struct EventLog {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl EventLog {
    /// Run `f` with this log as the thread's default subscriber.
    pub(crate) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::subscriber::with_default(self.clone(), f)
    }

    pub(crate) fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .expect("event log lock")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Subscriber for EventLog {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut message = MessageField::default();
        event.record(&mut message);
        self.events
            .lock()
            .expect("event log lock")
            .push((*event.metadata().level(), message.0));
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

#[derive(Default)]
struct MessageField(String);

impl Visit for MessageField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

///
/// Fixtures
///

#[derive(Debug, Deserialize, PartialEq)]
pub(crate) struct MyDoc {
    pub(crate) name: String,
    pub(crate) b: String,
    pub(crate) c: String,
    pub(crate) d: String,
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) counter: i64,
    #[serde(default)]
    pub(crate) organization_id: String,
}

pub(crate) fn fixture_rows() -> Vec<Document> {
    vec![
        json!({ "name": "Suzie Q", "b": "Bank", "c": "Cash", "d": "dollars", "_key": "11" }),
        json!({ "name": "Bill", "b": "Blank", "c": "Check", "d": "dollars", "_key": "22" }),
        json!({ "name": "Hank", "b": "blanket", "c": "cleaners", "d": "delighted", "_key": "33" }),
    ]
}

pub(crate) fn collection(executor: &MockExecutor) -> Collection<&MockExecutor, MyDoc> {
    Collection::new(executor, CollectionConfig::new("foo"))
}

pub(crate) fn assert_fixture_records(records: &[MyDoc]) {
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();

    assert_eq!(names, ["Suzie Q", "Bill", "Hank"]);
    assert_eq!(ids, ["11", "22", "33"]);
    assert_eq!(records[2].c, "cleaners");
}

pub(crate) fn squash_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
