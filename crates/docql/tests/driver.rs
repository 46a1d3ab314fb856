use docql::{__reexports::serde_json::json, prelude::*};
use std::{cell::RefCell, collections::BTreeMap, vec::IntoIter};

///
/// StaticDriver
///
/// Answers every query with the same rows and remembers what it was sent.
///

struct StaticDriver {
    rows: Vec<Document>,
    sent: RefCell<Vec<(String, BTreeMap<String, Value>)>>,
}

struct RowCursor(IntoIter<Document>);

impl Cursor for RowCursor {
    fn has_more(&self) -> bool {
        !self.0.as_slice().is_empty()
    }

    fn read_next(&mut self) -> Result<Document, DriverError> {
        self.0.next().ok_or_else(|| "cursor exhausted".into())
    }
}

impl Executor for StaticDriver {
    type Cursor = RowCursor;

    fn execute(
        &self,
        query: &str,
        bind_vars: &BTreeMap<String, Value>,
    ) -> Result<Self::Cursor, DriverError> {
        self.sent
            .borrow_mut()
            .push((query.to_string(), bind_vars.clone()));

        Ok(RowCursor(self.rows.clone().into_iter()))
    }
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
struct Fruit {
    id: String,
    name: String,
    tags: Vec<String>,
}

#[test]
fn prelude_drives_a_custom_executor() {
    let driver = StaticDriver {
        rows: vec![
            json!({ "_key": "1", "_id": "fruit/1", "name": "apple", "tags": ["red"] }),
            json!({ "_key": "2", "_id": "fruit/2", "name": "pear", "tags": [] }),
        ],
        sent: RefCell::default(),
    };
    let fruit: Collection<_, Fruit> =
        Collection::open(&driver, CollectionConfig::new("fruit")).unwrap();

    let q = fruit.query();
    let o = q.ops();
    let rows = q
        .within_org("acme")
        .filter_expr(o.or(o.contains("name", "pp"), o.is_empty_array("tags")))
        .list()
        .order_by("name")
        .asc()
        .limit(10)
        .all()
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "1");
    assert_eq!(rows[1].name, "pear");

    let sent = driver.sent.borrow();
    let (text, bind_vars) = &sent[0];
    assert!(text.starts_with("FOR doc IN @@collection\n"));
    assert!(text.contains("SORT doc.name ASC"));
    assert_eq!(bind_vars["@collection"], Value::from("fruit"));
    assert_eq!(bind_vars["var_1"], Value::from("%pp%"));
}

#[test]
fn records_round_trip_through_documents() {
    let record = Fruit {
        id: "9".to_string(),
        name: "plum".to_string(),
        tags: vec!["purple".to_string()],
    };

    let document = encode_record(&record).unwrap();
    assert_eq!(document["_key"], json!("9"));
    assert!(document.get("id").is_none());

    let decoded: Fruit = decode_record(document).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn version_is_exported() {
    assert!(!docql::VERSION.is_empty());
}
